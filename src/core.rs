//! Core domain types and service traits for alert dispatch
//!
//! This module defines the alert categories, the values carried by a raise,
//! the envelope handed to subscribers and the listener contract that every
//! topic subscriber implements.

use crate::error::AlertError;
use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::panic::Location;
use std::str::FromStr;
use std::sync::Arc;

/// Key under which the facade stores the alert message.
pub const MESSAGE_KEY: &str = "message";
/// Key under which the facade stores the optional error.
pub const ERROR_KEY: &str = "ex";

/// The closed set of alert kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertCategory {
    Information,
    Warning,
    Error,
    Critical,
    Audit,
    Debug,
    Trace,
}

impl AlertCategory {
    /// Every category, in declaration order.
    pub const ALL: [AlertCategory; 7] = [
        AlertCategory::Information,
        AlertCategory::Warning,
        AlertCategory::Error,
        AlertCategory::Critical,
        AlertCategory::Audit,
        AlertCategory::Debug,
        AlertCategory::Trace,
    ];

    /// The categories that own an overridable alert type, in resolution
    /// priority order.
    pub const STANDARD: [AlertCategory; 5] = [
        AlertCategory::Audit,
        AlertCategory::Information,
        AlertCategory::Warning,
        AlertCategory::Error,
        AlertCategory::Critical,
    ];

    /// Returns `true` for the five categories that can be overridden.
    pub fn is_standard(self) -> bool {
        !matches!(self, AlertCategory::Debug | AlertCategory::Trace)
    }

    /// The label used in console lines, e.g. `[Warning]`.
    pub fn label(self) -> &'static str {
        match self {
            AlertCategory::Information => "Information",
            AlertCategory::Warning => "Warning",
            AlertCategory::Error => "Error",
            AlertCategory::Critical => "Critical",
            AlertCategory::Audit => "Audit",
            AlertCategory::Debug => "Debug",
            AlertCategory::Trace => "Trace",
        }
    }
}

impl fmt::Display for AlertCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for AlertCategory {
    type Err = AlertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AlertCategory::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AlertError::config(format!("unknown alert category '{}'", s)))
    }
}

impl TryFrom<u8> for AlertCategory {
    type Error = AlertError;

    fn try_from(value: u8) -> Result<Self, AlertError> {
        AlertCategory::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| AlertError::config(format!("unknown alert category code {}", value)))
    }
}

/// An error carried inside an alert. Cheap to clone.
#[derive(Clone)]
pub struct ErrorValue(Arc<anyhow::Error>);

impl ErrorValue {
    pub fn new(err: impl Into<anyhow::Error>) -> Self {
        Self(Arc::new(err.into()))
    }

    /// The top-level error message.
    pub fn message(&self) -> String {
        self.0.to_string()
    }

    pub fn inner(&self) -> &anyhow::Error {
        &self.0
    }
}

impl fmt::Debug for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.0)
    }
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<anyhow::Error> for ErrorValue {
    fn from(err: anyhow::Error) -> Self {
        Self(Arc::new(err))
    }
}

/// A single untyped argument of a raise.
#[derive(Debug, Clone)]
pub enum AlertValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Error(ErrorValue),
}

impl AlertValue {
    /// Wraps any error type as an alert argument.
    pub fn error(err: impl Into<anyhow::Error>) -> Self {
        AlertValue::Error(ErrorValue::new(err))
    }

    /// Returns the error if this value is exception-like.
    pub fn as_error(&self) -> Option<&ErrorValue> {
        match self {
            AlertValue::Error(e) => Some(e),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            AlertValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for AlertValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlertValue::Text(s) => f.write_str(s),
            AlertValue::Integer(i) => write!(f, "{}", i),
            AlertValue::Float(v) => write!(f, "{}", v),
            AlertValue::Bool(b) => write!(f, "{}", b),
            AlertValue::Error(e) => write!(f, "{}", e),
        }
    }
}

impl From<&str> for AlertValue {
    fn from(value: &str) -> Self {
        AlertValue::Text(value.to_string())
    }
}

impl From<String> for AlertValue {
    fn from(value: String) -> Self {
        AlertValue::Text(value)
    }
}

impl From<i64> for AlertValue {
    fn from(value: i64) -> Self {
        AlertValue::Integer(value)
    }
}

impl From<i32> for AlertValue {
    fn from(value: i32) -> Self {
        AlertValue::Integer(value.into())
    }
}

impl From<u32> for AlertValue {
    fn from(value: u32) -> Self {
        AlertValue::Integer(value.into())
    }
}

impl From<f64> for AlertValue {
    fn from(value: f64) -> Self {
        AlertValue::Float(value)
    }
}

impl From<bool> for AlertValue {
    fn from(value: bool) -> Self {
        AlertValue::Bool(value)
    }
}

impl From<ErrorValue> for AlertValue {
    fn from(value: ErrorValue) -> Self {
        AlertValue::Error(value)
    }
}

impl From<anyhow::Error> for AlertValue {
    fn from(value: anyhow::Error) -> Self {
        AlertValue::Error(value.into())
    }
}

/// Builds a `Vec<AlertValue>` from heterogeneous arguments.
///
/// ```
/// let args = alertbus::alert_args!["disk full", 42, true];
/// assert_eq!(args.len(), 3);
/// ```
#[macro_export]
macro_rules! alert_args {
    () => { ::std::vec::Vec::<$crate::core::AlertValue>::new() };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::core::AlertValue::from($value)),+]
    };
}

/// Where an alert was raised from. Missing parts are empty or zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallSite {
    pub member: String,
    pub file: String,
    pub line: u32,
}

impl CallSite {
    pub fn new(member: impl Into<String>, file: impl Into<String>, line: u32) -> Self {
        Self {
            member: member.into(),
            file: file.into(),
            line,
        }
    }

    /// Captures the location of the caller. The member name is not
    /// available this way and stays empty.
    #[track_caller]
    pub fn caller() -> Self {
        let location = Location::caller();
        Self {
            member: String::new(),
            file: location.file().to_string(),
            line: location.line(),
        }
    }
}

/// The immutable payload of one raise.
#[derive(Debug, Clone)]
pub struct AlertEnvelope {
    args: Arc<[AlertValue]>,
    site: CallSite,
}

impl AlertEnvelope {
    pub fn new(args: Vec<AlertValue>, site: CallSite) -> Self {
        Self {
            args: args.into(),
            site,
        }
    }

    pub fn args(&self) -> &[AlertValue] {
        &self.args
    }

    pub fn site(&self) -> &CallSite {
        &self.site
    }

    pub fn is_empty(&self) -> bool {
        self.args.is_empty()
    }

    pub fn len(&self) -> usize {
        self.args.len()
    }

    /// The first exception-like argument, if any.
    pub fn first_error(&self) -> Option<&ErrorValue> {
        self.args.iter().find_map(AlertValue::as_error)
    }

    /// Splits off the first exception-like argument, returning it together
    /// with the remaining arguments in their original order.
    pub fn split_first_error(&self) -> (Option<&ErrorValue>, Vec<&AlertValue>) {
        match self.args.iter().position(|v| v.as_error().is_some()) {
            Some(index) => {
                let rest = self
                    .args
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| *i != index)
                    .map(|(_, v)| v)
                    .collect();
                (self.args[index].as_error(), rest)
            }
            None => (None, self.args.iter().collect()),
        }
    }
}

/// The keyed arguments the facade hands to a handler.
#[derive(Debug, Clone, Default)]
pub struct AlertFields(BTreeMap<String, AlertValue>);

impl AlertFields {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fields holding only a `message` entry.
    pub fn message(message: impl Into<String>) -> Self {
        let mut fields = Self::new();
        fields.insert(MESSAGE_KEY, AlertValue::Text(message.into()));
        fields
    }

    /// Adds the `ex` entry.
    pub fn with_error(mut self, err: impl Into<anyhow::Error>) -> Self {
        self.insert(ERROR_KEY, AlertValue::error(err));
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AlertValue>) -> Option<AlertValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&AlertValue> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// The rendered `message` entry.
    pub fn message_text(&self) -> Option<String> {
        self.get(MESSAGE_KEY).map(|v| v.to_string())
    }

    /// The `ex` entry, when it holds an error.
    pub fn error(&self) -> Option<&ErrorValue> {
        self.get(ERROR_KEY).and_then(AlertValue::as_error)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &AlertValue)> {
        self.0.iter()
    }
}

// =============================================================================
// Service Traits
// =============================================================================

/// Receives alerts published on a topic.
#[async_trait]
pub trait AlertListener: Send + Sync {
    /// A short, descriptive name used in logs and errors.
    fn name(&self) -> &str;

    /// Processes an alert synchronously on the raiser's thread.
    ///
    /// # Returns
    /// * `Ok(())` if the alert was processed
    /// * `Err` to abort the publish and report the failure to the raiser's boundary
    fn on_alert(&self, envelope: &AlertEnvelope) -> Result<()>;

    /// Processes an alert raised through the async path. Defaults to the
    /// synchronous hook.
    async fn on_alert_async(&self, envelope: &AlertEnvelope) -> Result<()> {
        self.on_alert(envelope)
    }
}

/// Adapts a closure into an [`AlertListener`].
pub struct FnListener<F> {
    name: String,
    callback: F,
}

impl<F> FnListener<F>
where
    F: Fn(&AlertEnvelope) -> Result<()> + Send + Sync,
{
    pub fn new(name: impl Into<String>, callback: F) -> Self {
        Self {
            name: name.into(),
            callback,
        }
    }
}

#[async_trait]
impl<F> AlertListener for FnListener<F>
where
    F: Fn(&AlertEnvelope) -> Result<()> + Send + Sync,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_alert(&self, envelope: &AlertEnvelope) -> Result<()> {
        (self.callback)(envelope)
    }
}
