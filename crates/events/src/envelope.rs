use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rolegate_core::EventId;

use crate::Event;

/// Envelope for a published event.
///
/// Carries the metadata a consumer needs to deduplicate and order deliveries
/// without having to understand the payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventEnvelope<E> {
    event_id: EventId,
    event_type: String,
    event_version: u32,
    occurred_at: DateTime<Utc>,

    /// Position assigned by the publisher; monotonically increasing per publisher.
    sequence_number: u64,

    payload: E,
}

impl<E> EventEnvelope<E> {
    pub fn new(
        event_id: EventId,
        event_type: impl Into<String>,
        event_version: u32,
        occurred_at: DateTime<Utc>,
        sequence_number: u64,
        payload: E,
    ) -> Self {
        Self {
            event_id,
            event_type: event_type.into(),
            event_version,
            occurred_at,
            sequence_number,
            payload,
        }
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_version(&self) -> u32 {
        self.event_version
    }

    pub fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    pub fn payload(&self) -> &E {
        &self.payload
    }

    pub fn into_payload(self) -> E {
        self.payload
    }
}

impl<E: Event> EventEnvelope<E> {
    /// Wrap a typed event, copying its metadata into the envelope.
    pub fn wrap(sequence_number: u64, payload: E) -> Self {
        Self::new(
            EventId::new(),
            payload.event_type(),
            payload.version(),
            payload.occurred_at(),
            sequence_number,
            payload,
        )
    }
}
