//! Program event bus implementation.
//!
//! Synchronous handlers run on the publishing task; async consumers poll a
//! broadcast receiver. The bus doubles as the host's change-notification
//! sink.

use parking_lot::RwLock;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::broadcast;
use uuid::Uuid;

use super::events::{EventCategory, ProgramEvent};
use crate::host::ChangeNotifier;
use crate::program::NodeId;

/// Subscription handle for unsubscribing from events
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", &self.0.to_string()[..8])
    }
}

/// Filter to receive only specific event types
#[derive(Debug, Clone, Default)]
pub enum EventFilter {
    /// Receive all events.
    #[default]
    All,
    /// Receive events matching any of these categories.
    Categories(Vec<EventCategory>),
}

impl EventFilter {
    /// Check if an event matches this filter
    pub fn matches(&self, event: &ProgramEvent) -> bool {
        match self {
            EventFilter::All => true,
            EventFilter::Categories(categories) => categories.contains(&event.category()),
        }
    }
}

type EventHandler = Box<dyn Fn(ProgramEvent) + Send + Sync>;

/// Configuration for the event bus
#[derive(Debug, Clone)]
pub struct EventBusConfig {
    /// Channel capacity for broadcast.
    pub channel_capacity: usize,
    /// Whether to keep event history.
    pub enable_history: bool,
    /// Maximum number of events to retain in history.
    pub max_history_size: usize,
}

impl Default for EventBusConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            enable_history: false,
            max_history_size: 500,
        }
    }
}

/// Event bus for program events
pub struct ProgramEventBus {
    sender: broadcast::Sender<ProgramEvent>,
    handlers: Arc<RwLock<HashMap<SubscriptionId, (EventFilter, EventHandler)>>>,
    history: Arc<RwLock<VecDeque<ProgramEvent>>>,
    config: EventBusConfig,
}

impl ProgramEventBus {
    /// Create a new event bus with default configuration
    pub fn new() -> Self {
        Self::with_config(EventBusConfig::default())
    }

    /// Create a new event bus with custom configuration
    pub fn with_config(config: EventBusConfig) -> Self {
        let (sender, _) = broadcast::channel(config.channel_capacity);
        Self {
            sender,
            handlers: Arc::new(RwLock::new(HashMap::new())),
            history: Arc::new(RwLock::new(VecDeque::new())),
            config,
        }
    }

    /// Publish an event to all subscribers
    ///
    /// Returns the number of async receivers the event was queued for.
    /// Publishing with nobody listening is not an error.
    pub fn publish(&self, event: ProgramEvent) -> usize {
        tracing::trace!(category = %event.category(), "{}", event.description());

        if self.config.enable_history {
            let mut history = self.history.write();
            history.push_back(event.clone());
            while history.len() > self.config.max_history_size {
                history.pop_front();
            }
        }

        for (filter, handler) in self.handlers.read().values() {
            if filter.matches(&event) {
                handler(event.clone());
            }
        }

        self.sender.send(event).unwrap_or(0)
    }

    /// Subscribe with a synchronous handler
    ///
    /// The handler runs on the publishing task and must return quickly.
    pub fn subscribe<F>(&self, filter: EventFilter, handler: F) -> SubscriptionId
    where
        F: Fn(ProgramEvent) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        self.handlers.write().insert(id, (filter, Box::new(handler)));
        tracing::debug!("Subscription {} added", id);
        id
    }

    /// Get a receiver for polling events from an async task
    pub fn receiver(&self) -> broadcast::Receiver<ProgramEvent> {
        self.sender.subscribe()
    }

    /// Unsubscribe; returns true if the subscription existed
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let removed = self.handlers.write().remove(&id).is_some();
        if removed {
            tracing::debug!("Subscription {} removed", id);
        }
        removed
    }

    /// Number of synchronous subscriptions
    pub fn subscriber_count(&self) -> usize {
        self.handlers.read().len()
    }

    /// Retained events, oldest first
    pub fn history(&self) -> Vec<ProgramEvent> {
        self.history.read().iter().cloned().collect()
    }

    /// Drop retained events
    pub fn clear_history(&self) {
        self.history.write().clear();
    }
}

impl Default for ProgramEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ProgramEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgramEventBus")
            .field("subscribers", &self.subscriber_count())
            .field("config", &self.config)
            .finish()
    }
}

impl ChangeNotifier for ProgramEventBus {
    fn request_refresh(&self, node_id: &NodeId) {
        self.publish(ProgramEvent::RefreshRequested {
            node_id: node_id.clone(),
        });
    }

    fn notify(&self, event: ProgramEvent) {
        self.publish(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn removed(child: &str) -> ProgramEvent {
        ProgramEvent::ChildRemoved {
            parent: NodeId::from("center"),
            child: NodeId::from(child),
        }
    }

    #[test]
    fn test_subscribe_and_unsubscribe() {
        let bus = ProgramEventBus::new();
        let id = bus.subscribe(EventFilter::All, |_| {});
        assert_eq!(bus.subscriber_count(), 1);
        assert!(bus.unsubscribe(id));
        assert!(!bus.unsubscribe(id));
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[test]
    fn test_event_filtering() {
        let bus = ProgramEventBus::new();
        let tree = Arc::new(AtomicUsize::new(0));
        let ui = Arc::new(AtomicUsize::new(0));

        let t = tree.clone();
        bus.subscribe(EventFilter::Categories(vec![EventCategory::Tree]), move |_| {
            t.fetch_add(1, Ordering::SeqCst);
        });
        let u = ui.clone();
        bus.subscribe(EventFilter::Categories(vec![EventCategory::Ui]), move |_| {
            u.fetch_add(1, Ordering::SeqCst);
        });

        bus.publish(removed("a"));
        bus.request_refresh(&NodeId::from("center"));
        bus.publish(removed("b"));

        assert_eq!(tree.load(Ordering::SeqCst), 2);
        assert_eq!(ui.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_history_max_size() {
        let bus = ProgramEventBus::with_config(EventBusConfig {
            enable_history: true,
            max_history_size: 2,
            ..Default::default()
        });
        bus.publish(removed("a"));
        bus.publish(removed("b"));
        bus.publish(removed("c"));

        let history = bus.history();
        assert_eq!(history, vec![removed("b"), removed("c")]);
        bus.clear_history();
        assert!(bus.history().is_empty());
    }

    #[tokio::test]
    async fn test_async_receiver() {
        let bus = ProgramEventBus::new();
        let mut rx = bus.receiver();
        assert_eq!(bus.publish(removed("a")), 1);
        assert_eq!(rx.recv().await.unwrap(), removed("a"));
    }
}
