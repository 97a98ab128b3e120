//! Publish/subscribe transport for alerts.
//!
//! The [`EventBus`] maps each resolved alert type to exactly one [`Topic`] for
//! the life of the bus. Topics are created on first use and are safe for
//! concurrent publish and subscribe.

pub mod topic;

use crate::alert_type::{AlertEvent, AlertType};
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::debug;

pub use topic::{SubscriptionId, Topic};

#[derive(Default)]
pub struct EventBus {
    topics: Mutex<HashMap<TypeId, Arc<Topic>>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the topic for `alert_type`, creating it on first use. The same
    /// type always yields the same topic instance.
    pub fn topic_for(&self, alert_type: &AlertType) -> Arc<Topic> {
        let mut topics = self.topics.lock().unwrap_or_else(PoisonError::into_inner);
        topics
            .entry(alert_type.id())
            .or_insert_with(|| {
                debug!(alert_type = %alert_type, "Creating topic");
                Arc::new(Topic::new(*alert_type))
            })
            .clone()
    }

    pub fn topic<T: AlertEvent>(&self) -> Arc<Topic> {
        self.topic_for(&AlertType::of::<T>())
    }

    /// Returns the topic for `alert_type` only if it already exists.
    pub fn existing_topic(&self, alert_type: &AlertType) -> Option<Arc<Topic>> {
        self.topics
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&alert_type.id())
            .cloned()
    }

    /// Number of topics created so far.
    pub fn topic_count(&self) -> usize {
        self.topics.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}
