use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::info;

use crate::entities::stock_transaction::TransactionType;

/// Domain events emitted after successful mutations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    ProductCreated {
        product_id: i32,
        name: String,
        initial_quantity: i32,
    },
    ProductUpdated {
        product_id: i32,
        quantity_delta: i32,
    },
    ProductDeleted {
        product_id: i32,
    },
    CategoryCreated {
        category_id: i32,
        name: String,
    },
    CategoryDeleted {
        category_id: i32,
    },
    StockRecorded {
        product_id: i32,
        transaction_type: TransactionType,
        quantity: i32,
    },
    SettingsUpdated {
        keys: Vec<String>,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }
}

/// Drains the event channel, logging each event. Runs until every sender is
/// dropped.
pub async fn process_events(mut receiver: mpsc::Receiver<Event>) {
    while let Some(event) = receiver.recv().await {
        match &event {
            Event::ProductCreated {
                product_id,
                name,
                initial_quantity,
            } => {
                info!(product_id, name = %name, initial_quantity, "product created");
            }
            Event::ProductUpdated {
                product_id,
                quantity_delta,
            } => {
                info!(product_id, quantity_delta, "product updated");
            }
            Event::ProductDeleted { product_id } => {
                info!(product_id, "product deleted");
            }
            Event::CategoryCreated { category_id, name } => {
                info!(category_id, name = %name, "category created");
            }
            Event::CategoryDeleted { category_id } => {
                info!(category_id, "category deleted");
            }
            Event::StockRecorded {
                product_id,
                transaction_type,
                quantity,
            } => {
                info!(
                    product_id,
                    transaction_type = transaction_type.as_str(),
                    quantity,
                    "stock movement recorded"
                );
            }
            Event::SettingsUpdated { keys } => {
                info!(keys = ?keys, "settings updated");
            }
        }
    }
    info!("Event channel closed; event processor shutting down");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_events_in_order() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);

        sender
            .send(Event::CategoryCreated {
                category_id: 1,
                name: "Tools".into(),
            })
            .await
            .unwrap();
        sender
            .send(Event::CategoryDeleted { category_id: 1 })
            .await
            .unwrap();

        assert!(matches!(
            rx.recv().await,
            Some(Event::CategoryCreated { category_id: 1, .. })
        ));
        assert!(matches!(
            rx.recv().await,
            Some(Event::CategoryDeleted { category_id: 1 })
        ));
    }

    #[tokio::test]
    async fn send_fails_after_receiver_dropped() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);

        let result = sender
            .send(Event::ProductDeleted { product_id: 9 })
            .await;
        assert!(result.is_err());
    }
}
