#![allow(dead_code)]
use alertbus::{AlertEnvelope, AlertListener};
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};

/// A listener that records the text of every argument it receives.
#[derive(Clone, Debug, Default)]
pub struct RecordingListener {
    pub name: String,
    pub received: Arc<Mutex<Vec<Vec<String>>>>,
}

impl RecordingListener {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            received: Arc::default(),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.received.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.received.lock().unwrap().len()
    }
}

#[async_trait]
impl AlertListener for RecordingListener {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_alert(&self, envelope: &AlertEnvelope) -> Result<()> {
        let args = envelope.args().iter().map(|v| v.to_string()).collect();
        self.received.lock().unwrap().push(args);
        Ok(())
    }
}

/// A listener that always fails and counts how often it was called.
#[derive(Clone, Debug, Default)]
pub struct FailingListener {
    pub attempts: Arc<AtomicUsize>,
}

#[async_trait]
impl AlertListener for FailingListener {
    fn name(&self) -> &str {
        "failing_mock"
    }

    fn on_alert(&self, _envelope: &AlertEnvelope) -> Result<()> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        Err(anyhow!("listener is down"))
    }
}
