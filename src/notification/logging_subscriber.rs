//! A listener that writes published alerts to the tracing log.
//!
//! This is the consumer installed for the standard alert types. Error,
//! warning and critical alerts pull the first error out of the argument list
//! and log it as a structured field; every other category logs the arguments
//! as-is. An empty argument list logs the `(No args)` sentinel.

use crate::core::{AlertCategory, AlertEnvelope, AlertListener, ErrorValue};
use crate::error::panic_message;
use crate::formatting::join_args;
use anyhow::Result;
use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, error, info, trace, warn};

/// Logs every alert published on its topic.
#[derive(Debug, Clone)]
pub struct LoggingListener {
    category: AlertCategory,
    alert_name: String,
}

impl LoggingListener {
    pub fn new(category: AlertCategory, alert_name: impl Into<String>) -> Self {
        Self {
            category,
            alert_name: alert_name.into(),
        }
    }

    pub fn category(&self) -> AlertCategory {
        self.category
    }

    fn log(&self, envelope: &AlertEnvelope) {
        match self.category {
            AlertCategory::Error | AlertCategory::Warning | AlertCategory::Critical => {
                let (err, rest) = envelope.split_first_error();
                self.emit(&join_args(rest), err);
            }
            _ => self.emit(&join_args(envelope.args()), None),
        }
    }

    fn emit(&self, args: &str, err: Option<&ErrorValue>) {
        let name = self.alert_name.as_str();
        let rendered = err.map(|e| e.to_string());
        let error = rendered.as_deref();
        match self.category {
            AlertCategory::Information | AlertCategory::Audit => {
                info!(alert_type = name, args, "'{}' Alert --> {}", name, args)
            }
            AlertCategory::Warning => {
                warn!(alert_type = name, args, error, "'{}' Alert --> {}", name, args)
            }
            AlertCategory::Error => {
                error!(alert_type = name, args, error, "'{}' Alert --> {}", name, args)
            }
            AlertCategory::Critical => {
                error!(critical = true, alert_type = name, args, error, "'{}' Alert --> {}", name, args)
            }
            AlertCategory::Debug => debug!(alert_type = name, args, "'{}' Alert --> {}", name, args),
            AlertCategory::Trace => trace!(alert_type = name, args, "'{}' Alert --> {}", name, args),
        }
    }
}

impl AlertListener for LoggingListener {
    fn name(&self) -> &str {
        &self.alert_name
    }

    fn on_alert(&self, envelope: &AlertEnvelope) -> Result<()> {
        if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| self.log(envelope))) {
            error!(
                alert_type = %self.alert_name,
                panic = %panic_message(payload.as_ref()),
                "Failed to process {} alert event!",
                self.category.label().to_lowercase()
            );
        }
        Ok(())
    }
}
