//! The handler chain behind the [`Alert`](crate::facade::Alert) facade.
//!
//! [`AlertHandler::handle_alert`] routes each alert to exactly one of seven
//! per-category hooks. Concrete handlers implement the hooks; a handler that
//! wants to keep another handler's behaviour holds it and calls its hook
//! after doing its own work, which is how [`TracingHandler`] chains to
//! [`ConsoleHandler`].

pub mod console;
pub mod standard;

use crate::core::{AlertCategory, AlertFields, CallSite};
use crate::error::panic_message;
use anyhow::Result;
use std::panic::{self, AssertUnwindSafe};
use tracing::{error, trace};

pub use console::ConsoleHandler;
pub use standard::TracingHandler;

/// Per-category alert processing.
pub trait AlertHandler: Send + Sync {
    /// Routes an alert to the hook of its category.
    fn handle_alert(&self, category: AlertCategory, fields: &AlertFields, site: &CallSite) -> Result<()> {
        trace!(category = %category, "Dispatching alert to handler hook");
        match category {
            AlertCategory::Information => self.handle_information(fields, site),
            AlertCategory::Warning => self.handle_warning(fields, site),
            AlertCategory::Error => self.handle_error(fields, site),
            AlertCategory::Critical => self.handle_critical(fields, site),
            AlertCategory::Audit => self.handle_audit(fields, site),
            AlertCategory::Debug => self.handle_debug(fields, site),
            AlertCategory::Trace => self.handle_trace(fields, site),
        }
    }

    fn handle_information(&self, fields: &AlertFields, site: &CallSite) -> Result<()>;
    fn handle_warning(&self, fields: &AlertFields, site: &CallSite) -> Result<()>;
    fn handle_error(&self, fields: &AlertFields, site: &CallSite) -> Result<()>;
    fn handle_critical(&self, fields: &AlertFields, site: &CallSite) -> Result<()>;
    fn handle_audit(&self, fields: &AlertFields, site: &CallSite) -> Result<()>;
    fn handle_debug(&self, fields: &AlertFields, site: &CallSite) -> Result<()>;
    fn handle_trace(&self, fields: &AlertFields, site: &CallSite) -> Result<()>;
}

/// Runs hook logic inside a failure boundary. Errors and panics are logged
/// and swallowed.
pub fn guarded<F>(category: AlertCategory, hook: F) -> Result<()>
where
    F: FnOnce() -> Result<()>,
{
    match panic::catch_unwind(AssertUnwindSafe(hook)) {
        Ok(Ok(())) => {}
        Ok(Err(e)) => {
            error!(category = %category, error = %e, "Failed to process {} alert!", category.label().to_lowercase());
        }
        Err(payload) => {
            error!(
                category = %category,
                panic = %panic_message(payload.as_ref()),
                "Failed to process {} alert!",
                category.label().to_lowercase()
            );
        }
    }
    Ok(())
}
