//! Alert type descriptors.
//!
//! An alert type is any `'static` type implementing [`AlertEvent`]. Instead of
//! a class hierarchy, each type declares which standard category it is a kind
//! of (if any) and may supply the listener that consumes its topic. The
//! [`AlertType`] descriptor captures all of that as plain data so resolution
//! and topic lookup never need runtime reflection.

use crate::core::{AlertCategory, AlertListener};
use crate::notification::logging_subscriber::LoggingListener;
use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Implemented by every type that can be raised as an alert.
pub trait AlertEvent: Send + Sync + 'static {
    /// Display name used in logs.
    const NAME: &'static str;

    /// The standard category this type is a kind of. `None` for free-standing
    /// custom alerts.
    const KIND_OF: Option<AlertCategory> = None;

    /// The listener subscribed to this type's topic when standard listeners
    /// are installed. Types that are a kind of a standard category log like
    /// that category unless they supply their own consumer; free-standing
    /// types have none.
    fn consumer() -> Option<Arc<dyn AlertListener>> {
        Self::KIND_OF.map(|category| {
            Arc::new(LoggingListener::new(category, Self::NAME)) as Arc<dyn AlertListener>
        })
    }
}

type ConsumerFactory = fn() -> Option<Arc<dyn AlertListener>>;

/// Runtime descriptor of an [`AlertEvent`] type. Identity is the Rust type.
#[derive(Clone, Copy)]
pub struct AlertType {
    id: TypeId,
    name: &'static str,
    kind_of: Option<AlertCategory>,
    consumer: ConsumerFactory,
}

impl AlertType {
    pub fn of<T: AlertEvent>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: T::NAME,
            kind_of: T::KIND_OF,
            consumer: T::consumer,
        }
    }

    /// The compiled-in default type of a standard category.
    pub fn default_for(category: AlertCategory) -> Option<Self> {
        match category {
            AlertCategory::Information => Some(Self::of::<InformationAlert>()),
            AlertCategory::Warning => Some(Self::of::<WarningAlert>()),
            AlertCategory::Error => Some(Self::of::<ErrorAlert>()),
            AlertCategory::Critical => Some(Self::of::<CriticalAlert>()),
            AlertCategory::Audit => Some(Self::of::<AuditAlert>()),
            AlertCategory::Debug | AlertCategory::Trace => None,
        }
    }

    pub fn id(&self) -> TypeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn kind_of(&self) -> Option<AlertCategory> {
        self.kind_of
    }

    /// Subtype test against the default type of `category`.
    pub fn is_kind_of(&self, category: AlertCategory) -> bool {
        self.kind_of == Some(category)
    }

    pub fn is<T: AlertEvent>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Builds the consumer for this type's topic, if it has one.
    pub fn consumer(&self) -> Option<Arc<dyn AlertListener>> {
        (self.consumer)()
    }
}

impl PartialEq for AlertType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for AlertType {}

impl Hash for AlertType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlertType")
            .field("name", &self.name)
            .field("kind_of", &self.kind_of)
            .finish()
    }
}

impl fmt::Display for AlertType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

// =============================================================================
// Standard alert types
// =============================================================================

macro_rules! standard_alert {
    ($(#[$doc:meta])* $ty:ident, $category:expr) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $ty;

        impl AlertEvent for $ty {
            const NAME: &'static str = stringify!($ty);
            const KIND_OF: Option<AlertCategory> = Some($category);
        }
    };
}

standard_alert!(
    /// Something informational happened.
    InformationAlert,
    AlertCategory::Information
);
standard_alert!(
    /// A condition worth noting that is not an error.
    WarningAlert,
    AlertCategory::Warning
);
standard_alert!(
    /// A non-fatal error condition.
    ErrorAlert,
    AlertCategory::Error
);
standard_alert!(
    /// A fatal error condition.
    CriticalAlert,
    AlertCategory::Critical
);
standard_alert!(
    /// Something to record for audit purposes.
    AuditAlert,
    AlertCategory::Audit
);
