//! Outbound notification of committed privilege changes.
//!
//! Notification is fire-and-forget: [`Notifier::publish`] returns nothing and
//! a failing transport is only logged. By the time an event is published the
//! change is already committed and the verdict already returned.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use rolegate_events::{Event, EventBus, EventEnvelope};
use rolegate_governance::GovernanceEvent;

/// Receives governance events after a successful commit.
pub trait Notifier: Send + Sync {
    fn publish(&self, event: GovernanceEvent);
}

impl<N> Notifier for Arc<N>
where
    N: Notifier + ?Sized,
{
    fn publish(&self, event: GovernanceEvent) {
        (**self).publish(event)
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopNotifier;

impl Notifier for NoopNotifier {
    fn publish(&self, event: GovernanceEvent) {
        debug!(event_type = event.event_type(), "notification discarded");
    }
}

/// Publishes enveloped events on an [`EventBus`].
#[derive(Debug)]
pub struct BusNotifier<B> {
    bus: B,
    sequence: AtomicU64,
}

impl<B> BusNotifier<B>
where
    B: EventBus<EventEnvelope<GovernanceEvent>>,
{
    pub fn new(bus: B) -> Self {
        Self {
            bus,
            sequence: AtomicU64::new(0),
        }
    }

    pub fn bus(&self) -> &B {
        &self.bus
    }
}

impl<B> Notifier for BusNotifier<B>
where
    B: EventBus<EventEnvelope<GovernanceEvent>>,
{
    fn publish(&self, event: GovernanceEvent) {
        let sequence = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let envelope = EventEnvelope::wrap(sequence, event);
        let event_type = envelope.event_type().to_string();

        if let Err(err) = self.bus.publish(envelope) {
            warn!(event_type, sequence, error = ?err, "governance event publication failed");
        }
    }
}
