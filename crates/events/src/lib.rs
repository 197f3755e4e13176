//! `rolegate-events`: outbound event mechanics.
//!
//! Governance decisions never talk to the audit/sync collaborator directly.
//! Committed changes are wrapped in an [`EventEnvelope`] and published on an
//! [`EventBus`]; consumers subscribe independently.

pub mod bus;
pub mod envelope;
pub mod event;
pub mod in_memory_bus;

pub use bus::{Delivery, EventBus, Subscription};
pub use envelope::EventEnvelope;
pub use event::Event;
pub use in_memory_bus::{InMemoryBusError, InMemoryEventBus};
