//! A single publish/subscribe channel keyed by an alert type.

use crate::alert_type::AlertType;
use crate::core::{AlertEnvelope, AlertListener};
use crate::error::AlertError;
use arc_swap::ArcSwap;
use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Weak,
};
use tracing::{debug, trace};

/// Identifies one subscription on a topic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Clone)]
enum ListenerRef {
    /// Owned by the topic for its whole lifetime.
    Strong(Arc<dyn AlertListener>),
    /// A back-reference checked for liveness before each delivery.
    Weak(Weak<dyn AlertListener>),
}

impl ListenerRef {
    fn upgrade(&self) -> Option<Arc<dyn AlertListener>> {
        match self {
            ListenerRef::Strong(listener) => Some(Arc::clone(listener)),
            ListenerRef::Weak(listener) => listener.upgrade(),
        }
    }

    fn is_alive(&self) -> bool {
        match self {
            ListenerRef::Strong(_) => true,
            ListenerRef::Weak(listener) => listener.strong_count() > 0,
        }
    }
}

#[derive(Clone)]
struct Subscriber {
    id: SubscriptionId,
    listener: ListenerRef,
}

/// Publish/subscribe channel for one resolved alert type.
///
/// The subscriber list is copy-on-write: publishing iterates a snapshot, so a
/// listener may subscribe further listeners while it is being invoked. New
/// subscriptions are seen by the next publish.
pub struct Topic {
    alert_type: AlertType,
    subscribers: ArcSwap<Vec<Subscriber>>,
    next_id: AtomicU64,
}

impl Topic {
    pub(crate) fn new(alert_type: AlertType) -> Self {
        Self {
            alert_type,
            subscribers: ArcSwap::from_pointee(Vec::new()),
            next_id: AtomicU64::new(1),
        }
    }

    pub fn alert_type(&self) -> AlertType {
        self.alert_type
    }

    /// Adds a listener. A strong subscription keeps the listener alive for
    /// the topic's lifetime; a weak one is skipped once the caller drops
    /// every other reference to it.
    pub fn subscribe(&self, listener: Arc<dyn AlertListener>, strong: bool) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        debug!(
            alert_type = %self.alert_type,
            listener = listener.name(),
            strong,
            "Subscribing listener"
        );
        let entry = Subscriber {
            id,
            listener: if strong {
                ListenerRef::Strong(listener)
            } else {
                ListenerRef::Weak(Arc::downgrade(&listener))
            },
        };
        self.subscribers.rcu(|current| {
            let mut next = current.to_vec();
            next.push(entry.clone());
            next
        });
        id
    }

    /// Removes a subscription. Returns `false` if it was already gone.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut removed = false;
        self.subscribers.rcu(|current| {
            let next: Vec<Subscriber> = current.iter().filter(|s| s.id != id).cloned().collect();
            removed = next.len() != current.len();
            next
        });
        removed
    }

    /// Number of subscriptions whose listener is still alive.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers
            .load()
            .iter()
            .filter(|s| s.listener.is_alive())
            .count()
    }

    /// Delivers `envelope` to every live subscriber, in subscription order,
    /// on the caller's thread.
    ///
    /// # Returns
    /// * `Ok(n)` with the number of listeners invoked
    /// * `Err(AlertError::Listener)` for the first listener that failed;
    ///   later listeners are not invoked
    pub fn publish(&self, envelope: &AlertEnvelope) -> Result<usize, AlertError> {
        let snapshot = self.subscribers.load_full();
        let mut delivered = 0;
        let mut saw_dead = false;

        for subscriber in snapshot.iter() {
            let Some(listener) = subscriber.listener.upgrade() else {
                saw_dead = true;
                continue;
            };
            trace!(alert_type = %self.alert_type, listener = listener.name(), "Delivering alert");
            listener
                .on_alert(envelope)
                .map_err(|source| AlertError::Listener {
                    listener: listener.name().to_string(),
                    source,
                })?;
            delivered += 1;
        }

        if saw_dead {
            self.prune();
        }
        Ok(delivered)
    }

    /// Async twin of [`Self::publish`]. Each listener's continuation is
    /// awaited before the next one starts; no lock is held across awaits, so
    /// a listener may raise again on this topic.
    pub async fn publish_async(&self, envelope: &AlertEnvelope) -> Result<usize, AlertError> {
        let snapshot = self.subscribers.load_full();
        let mut delivered = 0;
        let mut saw_dead = false;

        for subscriber in snapshot.iter() {
            let Some(listener) = subscriber.listener.upgrade() else {
                saw_dead = true;
                continue;
            };
            trace!(alert_type = %self.alert_type, listener = listener.name(), "Delivering alert asynchronously");
            listener
                .on_alert_async(envelope)
                .await
                .map_err(|source| AlertError::Listener {
                    listener: listener.name().to_string(),
                    source,
                })?;
            delivered += 1;
        }

        if saw_dead {
            self.prune();
        }
        Ok(delivered)
    }

    /// Drops weak subscriptions whose listener has been released.
    fn prune(&self) {
        self.subscribers.rcu(|current| {
            current
                .iter()
                .filter(|s| s.listener.is_alive())
                .cloned()
                .collect::<Vec<_>>()
        });
        trace!(alert_type = %self.alert_type, "Pruned released listeners");
    }
}
