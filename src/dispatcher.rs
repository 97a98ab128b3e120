//! The alert dispatcher: raise, raise asynchronously and subscribe.
//!
//! Every entry point resolves the requested alert type against the
//! [`OverrideRegistry`], finds the topic of the effective type on the
//! [`EventBus`] and publishes or subscribes there. Failures anywhere on that
//! path, panics included, are logged with the requested type's name and never
//! reach the caller.

use crate::alert_type::{AlertEvent, AlertType};
use crate::bus::{EventBus, SubscriptionId};
use crate::core::{AlertEnvelope, AlertListener, AlertValue, CallSite};
use crate::error::{panic_message, AlertError};
use crate::registry::OverrideRegistry;
use futures::future::BoxFuture;
use futures::FutureExt;
use std::collections::HashSet;
use std::fmt::Display;
use std::future::Future;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::{debug, error, info, trace};

/// Routes raised alerts to the topic of their effective type.
#[derive(Clone)]
pub struct AlertDispatcher {
    registry: Arc<OverrideRegistry>,
    bus: Arc<EventBus>,
    listeners_installed: Arc<AtomicBool>,
}

impl AlertDispatcher {
    pub fn new(registry: Arc<OverrideRegistry>, bus: Arc<EventBus>) -> Self {
        Self {
            registry,
            bus,
            listeners_installed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Creates a dispatcher with its own, empty bus.
    pub fn with_registry(registry: OverrideRegistry) -> Self {
        Self::new(Arc::new(registry), Arc::new(EventBus::new()))
    }

    pub fn registry(&self) -> &OverrideRegistry {
        &self.registry
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Publishes an alert of type `T` synchronously. All matched listeners
    /// run on the caller's thread before this returns.
    ///
    /// # Returns
    /// * `true` if the publish completed
    /// * `false` if it failed; the failure has already been logged
    #[track_caller]
    pub fn raise<T: AlertEvent>(&self, args: Vec<AlertValue>) -> bool {
        self.raise_type(&AlertType::of::<T>(), args, CallSite::caller())
    }

    pub fn raise_type(&self, requested: &AlertType, args: Vec<AlertValue>, site: CallSite) -> bool {
        let envelope = AlertEnvelope::new(args, site);
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| self.publish(requested, &envelope)));
        self.settle(requested, outcome)
    }

    /// Publishes an alert of type `T` through the async path. Completes once
    /// every matched listener has finished.
    #[track_caller]
    pub fn raise_async<T: AlertEvent>(
        &self,
        args: Vec<AlertValue>,
    ) -> impl Future<Output = bool> + Send + '_ {
        self.raise_type_async(AlertType::of::<T>(), args, CallSite::caller())
    }

    pub async fn raise_type_async(
        &self,
        requested: AlertType,
        args: Vec<AlertValue>,
        site: CallSite,
    ) -> bool {
        let envelope = AlertEnvelope::new(args, site);
        let outcome = AssertUnwindSafe(self.publish_async(&requested, &envelope))
            .catch_unwind()
            .await;
        self.settle(&requested, outcome)
    }

    /// Raises `T` with a message and the caller's location as arguments.
    #[track_caller]
    pub fn raise_message<T: AlertEvent>(&self, message: impl Display) -> bool {
        let site = CallSite::caller();
        let args = message_args(&message, None, &site);
        self.raise_type(&AlertType::of::<T>(), args, site)
    }

    #[track_caller]
    pub fn raise_message_with_error<T: AlertEvent>(
        &self,
        message: impl Display,
        err: impl Display,
    ) -> bool {
        let site = CallSite::caller();
        let args = message_args(&message, Some(&err), &site);
        self.raise_type(&AlertType::of::<T>(), args, site)
    }

    /// Async twin of [`Self::raise_message`]. The arguments are rendered
    /// before the returned future is first polled.
    #[track_caller]
    pub fn raise_message_async<T: AlertEvent>(&self, message: impl Display) -> BoxFuture<'_, bool> {
        let site = CallSite::caller();
        let args = message_args(&message, None, &site);
        self.raise_type_async(AlertType::of::<T>(), args, site).boxed()
    }

    #[track_caller]
    pub fn raise_message_with_error_async<T: AlertEvent>(
        &self,
        message: impl Display,
        err: impl Display,
    ) -> BoxFuture<'_, bool> {
        let site = CallSite::caller();
        let args = message_args(&message, Some(&err), &site);
        self.raise_type_async(AlertType::of::<T>(), args, site).boxed()
    }

    /// Subscribes `listener` to the topic of the effective type of `T`.
    ///
    /// # Returns
    /// * `Some(id)` on success
    /// * `None` if subscribing failed; the failure has already been logged
    pub fn subscribe<T: AlertEvent>(
        &self,
        listener: Arc<dyn AlertListener>,
        strong: bool,
    ) -> Option<SubscriptionId> {
        self.subscribe_type(&AlertType::of::<T>(), listener, strong)
    }

    pub fn subscribe_type(
        &self,
        requested: &AlertType,
        listener: Arc<dyn AlertListener>,
        strong: bool,
    ) -> Option<SubscriptionId> {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| {
            let effective = self.registry.resolve(requested);
            self.bus.topic_for(&effective).subscribe(listener, strong)
        }));
        match outcome {
            Ok(id) => Some(id),
            Err(payload) => {
                error!(
                    alert_type = requested.name(),
                    panic = %panic_message(payload.as_ref()),
                    "Failed to subscribe to '{}' alerts!",
                    requested.name()
                );
                None
            }
        }
    }

    /// Removes a subscription made through [`Self::subscribe`] for `T`.
    pub fn unsubscribe<T: AlertEvent>(&self, id: SubscriptionId) -> bool {
        let effective = self.registry.resolve_type::<T>();
        self.bus
            .existing_topic(&effective)
            .map(|topic| topic.unsubscribe(id))
            .unwrap_or(false)
    }

    /// Subscribes the consumer of every effective standard alert type and of
    /// every custom alert type, strongly. Topics of types without a consumer
    /// are created anyway. Only the first call has an effect.
    ///
    /// # Returns
    /// The number of consumers subscribed.
    pub fn install_standard_listeners(&self) -> usize {
        if self.listeners_installed.swap(true, Ordering::SeqCst) {
            debug!("Standard alert listeners already installed");
            return 0;
        }

        let mut seen = HashSet::new();
        let mut installed = 0;
        let types = self
            .registry
            .effective_standard_types()
            .map(|(_, t)| t)
            .chain(self.registry.custom_alerts().iter().copied());

        for alert_type in types {
            if !seen.insert(alert_type) {
                continue;
            }
            let topic = self.bus.topic_for(&alert_type);
            if let Some(consumer) = alert_type.consumer() {
                topic.subscribe(consumer, true);
                installed += 1;
            }
        }

        info!(installed, topics = self.bus.topic_count(), "Standard alert listeners installed");
        installed
    }

    fn publish(&self, requested: &AlertType, envelope: &AlertEnvelope) -> Result<usize, AlertError> {
        let effective = self.registry.resolve(requested);
        if effective != *requested {
            trace!(requested = %requested, effective = %effective, "Alert type overridden");
        }
        self.bus.topic_for(&effective).publish(envelope)
    }

    async fn publish_async(
        &self,
        requested: &AlertType,
        envelope: &AlertEnvelope,
    ) -> Result<usize, AlertError> {
        let effective = self.registry.resolve(requested);
        if effective != *requested {
            trace!(requested = %requested, effective = %effective, "Alert type overridden");
        }
        let topic = self.bus.topic_for(&effective);
        topic.publish_async(envelope).await
    }

    fn settle(&self, requested: &AlertType, outcome: std::thread::Result<Result<usize, AlertError>>) -> bool {
        match outcome {
            Ok(Ok(delivered)) => {
                trace!(alert_type = requested.name(), delivered, "Alert raised");
                true
            }
            Ok(Err(e)) => {
                let failure = AlertError::Dispatch {
                    alert_type: requested.name().to_string(),
                    source: e.into(),
                };
                error!(alert_type = requested.name(), error = %failure, "Failed to raise a '{}' alert!", requested.name());
                false
            }
            Err(payload) => {
                error!(
                    alert_type = requested.name(),
                    panic = %panic_message(payload.as_ref()),
                    "Failed to raise a '{}' alert!",
                    requested.name()
                );
                false
            }
        }
    }
}

fn message_args(message: &dyn Display, err: Option<&dyn Display>, site: &CallSite) -> Vec<AlertValue> {
    let mut args = vec![AlertValue::Text(format!("message: {}", message))];
    if let Some(err) = err {
        args.push(AlertValue::Text(format!("exception: {}", err)));
    }
    args.push(AlertValue::Text(format!("source: {}", site.member)));
    args.push(AlertValue::Text(format!("file: {}", site.file)));
    args.push(AlertValue::Text(format!("line: {}", site.line)));
    args
}
