use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{broadcast, mpsc};
use tracing::trace;

use waitwise_core_types::WaitError;

/// Trait implemented by payload types that can be carried on the bus.
pub trait Event: Clone + Send + Sync + std::fmt::Debug + 'static {}

impl<T> Event for T where T: Clone + Send + Sync + std::fmt::Debug + 'static {}

#[async_trait]
pub trait EventBus<E>: Send + Sync
where
    E: Event,
{
    async fn publish(&self, event: E) -> Result<(), WaitError>;
    fn subscribe(&self) -> broadcast::Receiver<E>;
}

/// In-memory bus backed by a tokio broadcast channel.
///
/// The detector publishes into this bus on every state transition; during
/// long idle stretches there may be no subscribers at all, so
/// [`InMemoryBus::publish_lossy`] exists for emitters that treat a
/// subscriber-free send as a no-op rather than an error.
pub struct InMemoryBus<E>
where
    E: Event,
{
    sender: broadcast::Sender<E>,
}

impl<E> InMemoryBus<E>
where
    E: Event,
{
    pub fn new(capacity: usize) -> Arc<Self> {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Arc::new(Self { sender })
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }

    /// Publish, treating "nobody is listening" as success.
    pub fn publish_lossy(&self, event: E) {
        match self.sender.send(event) {
            Ok(receivers) => {
                trace!(target: "waitwise.bus", receivers, "event delivered");
            }
            Err(_) => {
                trace!(target: "waitwise.bus", "event dropped: no subscribers");
            }
        }
    }
}

#[async_trait]
impl<E> EventBus<E> for InMemoryBus<E>
where
    E: Event,
{
    async fn publish(&self, event: E) -> Result<(), WaitError> {
        self.sender
            .send(event)
            .map(|_| ())
            .map_err(|err| WaitError::new(err.to_string()))
    }

    fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }
}

/// Helper to materialise an mpsc receiver from the bus subscription
/// so callers can await events without handling broadcast semantics directly.
pub fn to_mpsc<E>(bus: Arc<InMemoryBus<E>>, capacity: usize) -> mpsc::Receiver<E>
where
    E: Event,
{
    let mut rx = bus.subscribe();
    let (tx, out_rx) = mpsc::channel(capacity.max(1));
    tokio::spawn(async move {
        while let Ok(ev) = rx.recv().await {
            if tx.send(ev).await.is_err() {
                break;
            }
        }
    });
    out_rx
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_reaches_subscriber() {
        let bus = InMemoryBus::<u32>::new(8);
        let mut rx = bus.subscribe();
        bus.publish(7).await.unwrap();
        assert_eq!(rx.recv().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn publish_without_subscribers_is_an_error_lossy_is_not() {
        let bus = InMemoryBus::<u32>::new(8);
        assert!(bus.publish(1).await.is_err());
        bus.publish_lossy(2);
        assert_eq!(bus.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn mpsc_bridge_forwards_in_order() {
        let bus = InMemoryBus::<u32>::new(8);
        let mut rx = to_mpsc(Arc::clone(&bus), 8);
        for n in 0..3 {
            bus.publish(n).await.unwrap();
        }
        for n in 0..3 {
            assert_eq!(rx.recv().await, Some(n));
        }
    }
}
