// src/formatting.rs

use crate::core::{AlertCategory, AlertFields, AlertValue, ErrorValue};
use chrono::Local;
use std::fmt::Write;

/// Rendered in place of an empty argument list so log lines keep their shape.
pub const NO_ARGS: &str = "(No args)";

/// Default `chrono` format for console timestamps.
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Joins alert arguments with `", "`, or returns [`NO_ARGS`] when there are none.
pub fn join_args<'a, I>(args: I) -> String
where
    I: IntoIterator<Item = &'a AlertValue>,
{
    let parts: Vec<String> = args.into_iter().map(|v| v.to_string()).collect();
    if parts.is_empty() {
        NO_ARGS.to_string()
    } else {
        parts.join(", ")
    }
}

/// A trait for formatting one alert into a single console line.
pub trait TextFormatter: Send + Sync {
    fn format_line(&self, category: AlertCategory, fields: &AlertFields) -> String;
}

/// Formats `{timestamp} [{Level}] -> {message}[, {error}]`.
pub struct ConsoleFormatter {
    timestamp_format: String,
}

impl ConsoleFormatter {
    pub fn new(timestamp_format: impl Into<String>) -> Self {
        Self {
            timestamp_format: timestamp_format.into(),
        }
    }
}

impl Default for ConsoleFormatter {
    fn default() -> Self {
        Self::new(DEFAULT_TIMESTAMP_FORMAT)
    }
}

impl TextFormatter for ConsoleFormatter {
    fn format_line(&self, category: AlertCategory, fields: &AlertFields) -> String {
        let now = Local::now();
        let mut timestamp = String::new();
        if write!(timestamp, "{}", now.format(&self.timestamp_format)).is_err() {
            timestamp = now.format(DEFAULT_TIMESTAMP_FORMAT).to_string();
        }
        let message = fields.message_text().unwrap_or_default();
        render_line(&timestamp, category, &message, fields.error())
    }
}

fn render_line(
    timestamp: &str,
    category: AlertCategory,
    message: &str,
    error: Option<&ErrorValue>,
) -> String {
    match error {
        Some(err) => format!("{} [{}] -> {}, {}", timestamp, category.label(), message, err),
        None => format!("{} [{}] -> {}", timestamp, category.label(), message),
    }
}
