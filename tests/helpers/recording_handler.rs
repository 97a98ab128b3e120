#![allow(dead_code)]
use alertbus::{AlertCategory, AlertFields, AlertHandler, CallSite};
use anyhow::Result;
use std::sync::{Arc, Mutex};

/// One hook invocation seen by [`RecordingHandler`].
#[derive(Clone, Debug)]
pub struct HandledAlert {
    pub category: AlertCategory,
    pub message: Option<String>,
    pub error: Option<String>,
    pub site: CallSite,
}

/// A handler that records every hook call instead of writing anywhere.
#[derive(Clone, Debug, Default)]
pub struct RecordingHandler {
    pub handled: Arc<Mutex<Vec<HandledAlert>>>,
}

impl RecordingHandler {
    pub fn handled(&self) -> Vec<HandledAlert> {
        self.handled.lock().unwrap().clone()
    }

    fn record(&self, category: AlertCategory, fields: &AlertFields, site: &CallSite) -> Result<()> {
        self.handled.lock().unwrap().push(HandledAlert {
            category,
            message: fields.message_text(),
            error: fields.error().map(|e| e.to_string()),
            site: site.clone(),
        });
        Ok(())
    }
}

impl AlertHandler for RecordingHandler {
    fn handle_information(&self, fields: &AlertFields, site: &CallSite) -> Result<()> {
        self.record(AlertCategory::Information, fields, site)
    }

    fn handle_warning(&self, fields: &AlertFields, site: &CallSite) -> Result<()> {
        self.record(AlertCategory::Warning, fields, site)
    }

    fn handle_error(&self, fields: &AlertFields, site: &CallSite) -> Result<()> {
        self.record(AlertCategory::Error, fields, site)
    }

    fn handle_critical(&self, fields: &AlertFields, site: &CallSite) -> Result<()> {
        self.record(AlertCategory::Critical, fields, site)
    }

    fn handle_audit(&self, fields: &AlertFields, site: &CallSite) -> Result<()> {
        self.record(AlertCategory::Audit, fields, site)
    }

    fn handle_debug(&self, fields: &AlertFields, site: &CallSite) -> Result<()> {
        self.record(AlertCategory::Debug, fields, site)
    }

    fn handle_trace(&self, fields: &AlertFields, site: &CallSite) -> Result<()> {
        self.record(AlertCategory::Trace, fields, site)
    }
}
