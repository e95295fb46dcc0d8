// In memory implementation of the queue ports.
//
// Purpose
// - Connect the producer and the consumer inside one process, and give tests a
//   queue whose redelivery and dead-letter behaviour can be inspected.
//
// Responsibilities
// - Hand out each ready message to one receiver at a time.
// - Redeliver released messages until `max_receives`, then dead-letter them.
// - Reclaim deliveries left unsettled past the visibility timeout the same way.

use crate::shared::infrastructure::event_queue::{
    DeadLetter, QueueError, QueueMessage, QueueReceiver, QueueSender,
};
use std::collections::{HashMap, VecDeque};
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

const DEFAULT_MAX_RECEIVES: u32 = 5;
const DEFAULT_VISIBILITY_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone)]
struct StoredMessage {
    message_id: String,
    body: String,
    receive_count: u32,
}

struct InFlight {
    message: StoredMessage,
    visible_at: Instant,
}

#[derive(Default)]
struct QueueState {
    ready: VecDeque<StoredMessage>,
    in_flight: HashMap<String, InFlight>,
    dead: Vec<DeadLetter>,
}

impl QueueState {
    /// Back to `ready`, or to the dead-letter list once `max_receives` is spent.
    fn requeue(&mut self, queue: &str, message: StoredMessage, max_receives: u32, cause: &str) {
        if message.receive_count >= max_receives {
            tracing::warn!(
                queue,
                message_id = %message.message_id,
                receive_count = message.receive_count,
                cause,
                "redrive threshold reached, moving message to dead-letter list"
            );
            self.dead.push(DeadLetter {
                message_id: message.message_id,
                body: message.body,
                receive_count: message.receive_count,
                reason: format!("{cause} {max_receives} times"),
            });
        } else {
            self.ready.push_back(message);
        }
    }

    fn reclaim_expired(&mut self, queue: &str, max_receives: u32, now: Instant) {
        let expired: Vec<String> = self
            .in_flight
            .iter()
            .filter(|(_, entry)| entry.visible_at <= now)
            .map(|(receipt, _)| receipt.clone())
            .collect();
        for receipt in expired {
            if let Some(entry) = self.in_flight.remove(&receipt) {
                tracing::warn!(
                    queue,
                    message_id = %entry.message.message_id,
                    "delivery not settled within the visibility timeout"
                );
                self.requeue(queue, entry.message, max_receives, "unsettled");
            }
        }
    }
}

pub struct InMemoryQueue {
    name: String,
    max_receives: u32,
    visibility_timeout: Duration,
    state: Mutex<QueueState>,
    is_offline: bool,
    send_budget: Mutex<Option<usize>>,
}

impl InMemoryQueue {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            max_receives: DEFAULT_MAX_RECEIVES,
            visibility_timeout: DEFAULT_VISIBILITY_TIMEOUT,
            state: Mutex::new(QueueState::default()),
            is_offline: false,
            send_budget: Mutex::new(None),
        }
    }

    pub fn with_max_receives(mut self, max_receives: u32) -> Self {
        self.max_receives = max_receives.max(1);
        self
    }

    /// How long a delivery may stay unsettled before it is handed out again.
    pub fn with_visibility_timeout(mut self, visibility_timeout: Duration) -> Self {
        self.visibility_timeout = visibility_timeout;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn toggle_offline(&mut self) {
        self.is_offline = !self.is_offline;
    }

    /// Accept `sends` more messages, then fail every further send.
    pub async fn fail_sends_after(&self, sends: usize) {
        *self.send_budget.lock().await = Some(sends);
    }

    pub async fn ready_len(&self) -> usize {
        self.state.lock().await.ready.len()
    }

    pub async fn in_flight_len(&self) -> usize {
        self.state.lock().await.in_flight.len()
    }

    pub async fn dead_letters(&self) -> Vec<DeadLetter> {
        self.state.lock().await.dead.clone()
    }

    fn ensure_online(&self) -> Result<(), QueueError> {
        if self.is_offline {
            return Err(QueueError::Backend(format!("Queue {} offline", self.name)));
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl QueueSender for InMemoryQueue {
    async fn send(&self, body: String) -> Result<String, QueueError> {
        self.ensure_online()?;
        {
            let mut budget = self.send_budget.lock().await;
            if let Some(remaining) = budget.as_mut() {
                if *remaining == 0 {
                    return Err(QueueError::Backend(format!("Queue {} rejected send", self.name)));
                }
                *remaining -= 1;
            }
        }
        let message_id = Uuid::now_v7().to_string();
        self.state.lock().await.ready.push_back(StoredMessage {
            message_id: message_id.clone(),
            body,
            receive_count: 0,
        });
        Ok(message_id)
    }
}

#[async_trait::async_trait]
impl QueueReceiver for InMemoryQueue {
    async fn receive(&self, max_messages: usize) -> Result<Vec<QueueMessage>, QueueError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        let now = Instant::now();
        state.reclaim_expired(&self.name, self.max_receives, now);
        let take = max_messages.min(state.ready.len());
        let batch: Vec<StoredMessage> = state.ready.drain(..take).collect();
        let mut delivered = Vec::with_capacity(take);
        for mut message in batch {
            message.receive_count += 1;
            let receipt = Uuid::now_v7().to_string();
            delivered.push(QueueMessage {
                message_id: message.message_id.clone(),
                receipt: receipt.clone(),
                body: message.body.clone(),
                receive_count: message.receive_count,
            });
            state.in_flight.insert(
                receipt,
                InFlight {
                    message,
                    visible_at: now + self.visibility_timeout,
                },
            );
        }
        Ok(delivered)
    }

    async fn ack(&self, receipt: &str) -> Result<(), QueueError> {
        self.ensure_online()?;
        self.state
            .lock()
            .await
            .in_flight
            .remove(receipt)
            .map(|_| ())
            .ok_or_else(|| QueueError::UnknownReceipt(receipt.to_string()))
    }

    async fn release(&self, receipt: &str) -> Result<(), QueueError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        let entry = state
            .in_flight
            .remove(receipt)
            .ok_or_else(|| QueueError::UnknownReceipt(receipt.to_string()))?;
        state.requeue(&self.name, entry.message, self.max_receives, "released");
        Ok(())
    }

    async fn dead_letter(&self, receipt: &str, reason: &str) -> Result<(), QueueError> {
        self.ensure_online()?;
        let mut state = self.state.lock().await;
        let message = state
            .in_flight
            .remove(receipt)
            .map(|entry| entry.message)
            .ok_or_else(|| QueueError::UnknownReceipt(receipt.to_string()))?;
        state.dead.push(DeadLetter {
            message_id: message.message_id,
            body: message.body,
            receive_count: message.receive_count,
            reason: reason.to_string(),
        });
        Ok(())
    }
}
