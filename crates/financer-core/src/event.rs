//! Event bus for financer using tokio::broadcast
//!
//! Background request tasks publish their outcome here; the TUI drains the
//! receiver once per frame.

use crate::error::Alert;
use crate::models::{Investment, MonthlyBalance, Session, Transaction};
use tokio::sync::broadcast;

/// Session a request was issued under; bumped on every logout
pub type Generation = u64;

/// Outcomes published by request tasks
///
/// Results of authenticated requests carry the [`Generation`] they were issued
/// under so a receiver can drop those that outlived their session.
#[derive(Debug, Clone)]
pub enum FinanceEvent {
    /// Login succeeded
    LoggedIn(Session),
    /// Account created; carries the server confirmation, if any
    Registered(Option<String>),
    /// Login or registration failed
    AuthFailed(Alert),
    /// Dashboard fetch finished (empty on failure)
    DashboardLoaded {
        generation: Generation,
        list: Vec<MonthlyBalance>,
    },
    /// Transaction fetch finished (empty on failure)
    TransactionsLoaded {
        generation: Generation,
        list: Vec<Transaction>,
    },
    /// Investment fetch finished (empty on failure)
    InvestmentsLoaded {
        generation: Generation,
        list: Vec<Investment>,
    },
    /// Statement upload finished
    UploadFinished {
        generation: Generation,
        succeeded: bool,
    },
    /// Outcome message of an authenticated write
    Notice {
        generation: Generation,
        alert: Alert,
    },
}

/// Event bus for broadcasting request outcomes
pub struct EventBus {
    sender: broadcast::Sender<FinanceEvent>,
}

impl EventBus {
    /// Create a new event bus with specified channel capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Create with default capacity (64 events)
    pub fn default_capacity() -> Self {
        Self::new(64)
    }

    /// Publish an event to all subscribers
    pub fn publish(&self, event: FinanceEvent) {
        // No subscribers is fine
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<FinanceEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::default_capacity()
    }
}

impl Clone for EventBus {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_event_bus_publish_subscribe() {
        let bus = EventBus::default_capacity();
        let mut rx = bus.subscribe();

        bus.publish(FinanceEvent::DashboardLoaded {
            generation: 0,
            list: Vec::new(),
        });
        bus.publish(FinanceEvent::UploadFinished {
            generation: 2,
            succeeded: true,
        });

        let first = rx.recv().await.unwrap();
        assert!(matches!(
            first,
            FinanceEvent::DashboardLoaded { generation: 0, list } if list.is_empty()
        ));

        let second = rx.recv().await.unwrap();
        assert!(matches!(
            second,
            FinanceEvent::UploadFinished {
                generation: 2,
                succeeded: true
            }
        ));
    }

    #[tokio::test]
    async fn test_clones_share_channel() {
        let bus = EventBus::default_capacity();
        let mut rx = bus.subscribe();
        let clone = bus.clone();

        clone.publish(FinanceEvent::Notice {
            generation: 1,
            alert: Alert::info("Import", "done"),
        });
        let event = rx.recv().await.unwrap();
        assert!(matches!(
            event,
            FinanceEvent::Notice { generation: 1, alert } if alert.message == "done"
        ));
    }

    #[test]
    fn test_event_bus_no_subscribers_ok() {
        let bus = EventBus::default_capacity();
        bus.publish(FinanceEvent::TransactionsLoaded {
            generation: 0,
            list: Vec::new(),
        });
    }
}
