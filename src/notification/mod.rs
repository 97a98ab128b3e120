//! Standard listeners attached to alert topics.
//!
//! Alert types may name a consumer for their topic; the standard alert types
//! use the [`logging_subscriber::LoggingListener`] defined here, which writes
//! every published alert to the tracing log at the level of its category.
pub mod logging_subscriber;

pub use logging_subscriber::LoggingListener;
