// src/handler/console.rs

use super::{guarded, AlertHandler};
use crate::config::ConsoleConfig;
use crate::core::{AlertCategory, AlertFields, CallSite, MESSAGE_KEY};
use crate::formatting::{ConsoleFormatter, TextFormatter};
use anyhow::{bail, Result};
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use tracing::debug;

/// The default handler: one formatted line per alert on the console.
///
/// Debug alerts go to the diagnostic log instead of the console. Every hook
/// runs inside [`guarded`], so a broken writer never reaches the caller.
pub struct ConsoleHandler {
    formatter: Box<dyn TextFormatter>,
    out: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleHandler {
    pub fn new(formatter: impl TextFormatter + 'static) -> Self {
        Self {
            formatter: Box::new(formatter),
            out: Mutex::new(Box::new(io::stdout())),
        }
    }

    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self::new(ConsoleFormatter::new(config.timestamp_format.as_str()))
    }

    /// Redirects console output, e.g. into a buffer under test.
    pub fn with_writer(mut self, writer: impl Write + Send + 'static) -> Self {
        self.out = Mutex::new(Box::new(writer));
        self
    }

    fn render(&self, category: AlertCategory, fields: &AlertFields) -> Result<String> {
        if !fields.contains_key(MESSAGE_KEY) {
            bail!("alert is missing the '{}' argument", MESSAGE_KEY);
        }
        Ok(self.formatter.format_line(category, fields))
    }

    fn write_line(&self, category: AlertCategory, fields: &AlertFields) -> Result<()> {
        guarded(category, || {
            let line = self.render(category, fields)?;
            let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
            writeln!(out, "{}", line)?;
            out.flush()?;
            Ok(())
        })
    }
}

impl Default for ConsoleHandler {
    fn default() -> Self {
        Self::new(ConsoleFormatter::default())
    }
}

impl AlertHandler for ConsoleHandler {
    fn handle_information(&self, fields: &AlertFields, _site: &CallSite) -> Result<()> {
        self.write_line(AlertCategory::Information, fields)
    }

    fn handle_warning(&self, fields: &AlertFields, _site: &CallSite) -> Result<()> {
        self.write_line(AlertCategory::Warning, fields)
    }

    fn handle_error(&self, fields: &AlertFields, _site: &CallSite) -> Result<()> {
        self.write_line(AlertCategory::Error, fields)
    }

    fn handle_critical(&self, fields: &AlertFields, _site: &CallSite) -> Result<()> {
        self.write_line(AlertCategory::Critical, fields)
    }

    fn handle_audit(&self, fields: &AlertFields, _site: &CallSite) -> Result<()> {
        self.write_line(AlertCategory::Audit, fields)
    }

    fn handle_debug(&self, fields: &AlertFields, site: &CallSite) -> Result<()> {
        guarded(AlertCategory::Debug, || {
            let line = self.render(AlertCategory::Debug, fields)?;
            debug!(file = %site.file, line = site.line, "{}", line);
            Ok(())
        })
    }

    fn handle_trace(&self, fields: &AlertFields, _site: &CallSite) -> Result<()> {
        self.write_line(AlertCategory::Trace, fields)
    }
}
