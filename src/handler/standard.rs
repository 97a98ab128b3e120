//! Host-integrated handler.
//!
//! Writes every alert to the application's tracing log at the level that
//! matches its category, then hands the same alert to the console handler
//! it wraps.

use super::{AlertHandler, ConsoleHandler};
use crate::core::{AlertFields, CallSite, MESSAGE_KEY};
use anyhow::{anyhow, Result};
use tracing::{debug, error, info, trace, warn};

pub struct TracingHandler {
    console: ConsoleHandler,
}

impl TracingHandler {
    pub fn new(console: ConsoleHandler) -> Self {
        Self { console }
    }

    pub fn console(&self) -> &ConsoleHandler {
        &self.console
    }
}

impl Default for TracingHandler {
    fn default() -> Self {
        Self::new(ConsoleHandler::default())
    }
}

fn message_of(fields: &AlertFields) -> Result<String> {
    fields
        .message_text()
        .ok_or_else(|| anyhow!("alert is missing the '{}' argument", MESSAGE_KEY))
}

fn error_of(fields: &AlertFields) -> Option<String> {
    fields.error().map(|e| e.to_string())
}

impl AlertHandler for TracingHandler {
    fn handle_information(&self, fields: &AlertFields, site: &CallSite) -> Result<()> {
        let message = message_of(fields)?;
        info!(file = %site.file, line = site.line, "{}", message);
        self.console.handle_information(fields, site)
    }

    fn handle_warning(&self, fields: &AlertFields, site: &CallSite) -> Result<()> {
        let message = message_of(fields)?;
        let error = error_of(fields);
        warn!(file = %site.file, line = site.line, error = error.as_deref(), "{}", message);
        self.console.handle_warning(fields, site)
    }

    fn handle_error(&self, fields: &AlertFields, site: &CallSite) -> Result<()> {
        let message = message_of(fields)?;
        let error = error_of(fields);
        error!(file = %site.file, line = site.line, error = error.as_deref(), "{}", message);
        self.console.handle_error(fields, site)
    }

    fn handle_critical(&self, fields: &AlertFields, site: &CallSite) -> Result<()> {
        let message = message_of(fields)?;
        let error = error_of(fields);
        error!(
            critical = true,
            file = %site.file,
            line = site.line,
            error = error.as_deref(),
            "{}",
            message
        );
        self.console.handle_critical(fields, site)
    }

    fn handle_audit(&self, fields: &AlertFields, site: &CallSite) -> Result<()> {
        let message = message_of(fields)?;
        info!(audit = true, file = %site.file, line = site.line, "{}", message);
        self.console.handle_audit(fields, site)
    }

    fn handle_debug(&self, fields: &AlertFields, site: &CallSite) -> Result<()> {
        let message = message_of(fields)?;
        debug!(file = %site.file, line = site.line, "{}", message);
        self.console.handle_debug(fields, site)
    }

    fn handle_trace(&self, fields: &AlertFields, site: &CallSite) -> Result<()> {
        let message = message_of(fields)?;
        trace!(file = %site.file, line = site.line, "{}", message);
        self.console.handle_trace(fields, site)
    }
}
