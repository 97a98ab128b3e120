//! alertbus - categorized application alerts
//!
//! This library lets application code raise alerts in seven categories
//! (information, warning, error, critical, audit, debug, trace) along two
//! paths:
//!
//! * a publish/subscribe path, where typed alerts are resolved through an
//!   override registry and published to per-type topics on an [`EventBus`];
//! * a facade path, where [`Alert`] hands categorized fields to a replaceable
//!   [`AlertHandler`].
//!
//! Raising an alert never fails the caller: delivery problems are logged
//! through `tracing` and reported as `false`.
//!
//! ```
//! use alertbus::{alert_args, AlertContext, Config, InformationAlert};
//!
//! let context = AlertContext::builder(Config::default()).build()?;
//! assert!(context
//!     .dispatcher()
//!     .raise::<InformationAlert>(alert_args!["service started"]));
//! context.alert().raise_information("service started");
//! # Ok::<(), alertbus::AlertError>(())
//! ```

pub mod alert_type;
pub mod bus;
pub mod config;
pub mod context;
pub mod core;
pub mod dispatcher;
pub mod error;
pub mod facade;
pub mod formatting;
pub mod handler;
pub mod logging;
pub mod notification;
pub mod registry;

// Re-export the main types for convenience
pub use alert_type::{
    AlertEvent, AlertType, AuditAlert, CriticalAlert, ErrorAlert, InformationAlert, WarningAlert,
};
pub use bus::{EventBus, SubscriptionId, Topic};
pub use config::Config;
pub use context::{AlertContext, AlertContextBuilder};
pub use core::{
    AlertCategory, AlertEnvelope, AlertFields, AlertListener, AlertValue, CallSite, ErrorValue,
    FnListener,
};
pub use dispatcher::AlertDispatcher;
pub use error::AlertError;
pub use facade::Alert;
pub use handler::{AlertHandler, ConsoleHandler, TracingHandler};
pub use registry::OverrideRegistry;
