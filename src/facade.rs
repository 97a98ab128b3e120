//! The ambient `Alert` facade.
//!
//! Application code raises categorized alerts through [`Alert`] without
//! holding a reference to a handler. The handler behind the facade can be
//! replaced at any time; a raise that is already running keeps the handler
//! it loaded.

use crate::core::{AlertCategory, AlertFields, CallSite};
use crate::error::{panic_message, AlertError};
use crate::handler::{AlertHandler, ConsoleHandler};
use arc_swap::ArcSwap;
use once_cell::sync::Lazy;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use tracing::{error, warn};

static INSTANCE: Lazy<Alert> = Lazy::new(Alert::default);

pub struct Alert {
    handler: ArcSwap<Box<dyn AlertHandler>>,
}

impl Alert {
    pub fn new(handler: impl AlertHandler + 'static) -> Self {
        Self::from_boxed(Box::new(handler))
    }

    pub fn from_boxed(handler: Box<dyn AlertHandler>) -> Self {
        Self {
            handler: ArcSwap::from_pointee(handler),
        }
    }

    /// The process-wide facade. Starts out with a [`ConsoleHandler`].
    pub fn instance() -> &'static Alert {
        &INSTANCE
    }

    /// Atomically replaces the handler.
    pub fn set_handler(&self, handler: impl AlertHandler + 'static) {
        self.set_boxed_handler(Box::new(handler));
    }

    pub fn set_boxed_handler(&self, handler: Box<dyn AlertHandler>) {
        self.handler.store(Arc::new(handler));
    }

    pub fn handler(&self) -> Arc<Box<dyn AlertHandler>> {
        self.handler.load_full()
    }

    /// Raises an alert, reporting success as a flag. Returns `false` when
    /// `fields` is `None` or the handler fails.
    #[track_caller]
    pub fn try_raise(&self, category: AlertCategory, fields: Option<AlertFields>) -> bool {
        self.try_raise_at(category, fields, CallSite::caller())
    }

    pub fn try_raise_at(&self, category: AlertCategory, fields: Option<AlertFields>, site: CallSite) -> bool {
        match fields {
            Some(fields) => self.deliver(category, &fields, &site),
            None => {
                warn!(category = %category, "Alert raised without arguments");
                false
            }
        }
    }

    /// Raises an alert. Missing arguments are a usage error and are
    /// returned; handler failures are logged and swallowed.
    #[track_caller]
    pub fn raise(&self, category: AlertCategory, fields: Option<AlertFields>) -> Result<(), AlertError> {
        self.raise_at(category, fields, CallSite::caller())
    }

    pub fn raise_at(
        &self,
        category: AlertCategory,
        fields: Option<AlertFields>,
        site: CallSite,
    ) -> Result<(), AlertError> {
        let fields = fields.ok_or_else(|| {
            AlertError::config(format!("arguments are required to raise a {} alert", category))
        })?;
        self.deliver(category, &fields, &site);
        Ok(())
    }

    #[track_caller]
    pub fn raise_information(&self, message: impl Into<String>) -> bool {
        self.try_raise(AlertCategory::Information, Some(AlertFields::message(message)))
    }

    #[track_caller]
    pub fn raise_warning(&self, message: impl Into<String>) -> bool {
        self.try_raise(AlertCategory::Warning, Some(AlertFields::message(message)))
    }

    #[track_caller]
    pub fn raise_warning_with(&self, message: impl Into<String>, err: impl Into<anyhow::Error>) -> bool {
        self.try_raise(
            AlertCategory::Warning,
            Some(AlertFields::message(message).with_error(err)),
        )
    }

    #[track_caller]
    pub fn raise_error(&self, message: impl Into<String>) -> bool {
        self.try_raise(AlertCategory::Error, Some(AlertFields::message(message)))
    }

    #[track_caller]
    pub fn raise_error_with(&self, message: impl Into<String>, err: impl Into<anyhow::Error>) -> bool {
        self.try_raise(
            AlertCategory::Error,
            Some(AlertFields::message(message).with_error(err)),
        )
    }

    #[track_caller]
    pub fn raise_critical(&self, message: impl Into<String>) -> bool {
        self.try_raise(AlertCategory::Critical, Some(AlertFields::message(message)))
    }

    #[track_caller]
    pub fn raise_critical_with(&self, message: impl Into<String>, err: impl Into<anyhow::Error>) -> bool {
        self.try_raise(
            AlertCategory::Critical,
            Some(AlertFields::message(message).with_error(err)),
        )
    }

    #[track_caller]
    pub fn raise_audit(&self, message: impl Into<String>) -> bool {
        self.try_raise(AlertCategory::Audit, Some(AlertFields::message(message)))
    }

    #[track_caller]
    pub fn raise_debug(&self, message: impl Into<String>) -> bool {
        self.try_raise(AlertCategory::Debug, Some(AlertFields::message(message)))
    }

    #[track_caller]
    pub fn raise_trace(&self, message: impl Into<String>) -> bool {
        self.try_raise(AlertCategory::Trace, Some(AlertFields::message(message)))
    }

    fn deliver(&self, category: AlertCategory, fields: &AlertFields, site: &CallSite) -> bool {
        let handler = self.handler.load_full();
        match panic::catch_unwind(AssertUnwindSafe(|| handler.handle_alert(category, fields, site))) {
            Ok(Ok(())) => true,
            Ok(Err(source)) => {
                let failure = AlertError::Handler {
                    hook: category.label(),
                    source,
                };
                error!(file = %site.file, line = site.line, error = %failure, "Failed to raise a '{}' alert!", category);
                false
            }
            Err(payload) => {
                error!(
                    file = %site.file,
                    line = site.line,
                    panic = %panic_message(payload.as_ref()),
                    "Failed to raise a '{}' alert!",
                    category
                );
                false
            }
        }
    }
}

impl Default for Alert {
    fn default() -> Self {
        Self::new(ConsoleHandler::default())
    }
}
