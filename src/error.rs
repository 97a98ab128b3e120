//! Error taxonomy for alert configuration and delivery.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    /// Invalid or missing arguments to a setup call. Surfaced to the caller.
    #[error("invalid alert configuration: {0}")]
    Configuration(String),

    /// Resolution, topic lookup or publish failed while raising an alert.
    #[error("failed to raise a '{alert_type}' alert: {source}")]
    Dispatch {
        alert_type: String,
        #[source]
        source: anyhow::Error,
    },

    /// A handler hook failed while processing an alert.
    #[error("alert handler failed in '{hook}' hook: {source}")]
    Handler {
        hook: &'static str,
        #[source]
        source: anyhow::Error,
    },

    /// A topic subscriber failed during publish.
    #[error("listener '{listener}' failed: {source}")]
    Listener {
        listener: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AlertError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Renders a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
