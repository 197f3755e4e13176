//! Event publishing/subscription abstraction (mechanics only).
//!
//! The bus is the seam between the governance pipeline and whoever mirrors
//! privilege changes elsewhere (audit log, spreadsheet sync, mail).
//!
//! - **Transport-agnostic**: in-memory channels here; a broker elsewhere
//! - **At-least-once**: consumers must be idempotent
//! - **No persistence**: the account store is the source of truth, not the bus
//!
//! Publishing happens after the role change has been committed, so a bus
//! failure can never undo or block an authorization decision.

use std::sync::Arc;
use std::sync::mpsc::{Receiver, RecvTimeoutError, TryRecvError};
use std::time::Duration;

/// Outcome of waiting on a [`Subscription`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery<M> {
    Message(M),
    /// Nothing arrived in time; the bus is still alive.
    Idle,
    /// Every publisher is gone. No further messages will arrive.
    Closed,
}

/// A subscription to an event stream.
///
/// Each subscription receives a copy of every message published after it was
/// created (broadcast semantics). Intended for a single consuming thread.
#[derive(Debug)]
pub struct Subscription<M> {
    receiver: Receiver<M>,
}

impl<M> Subscription<M> {
    pub fn new(receiver: Receiver<M>) -> Self {
        Self { receiver }
    }

    /// Wait up to `timeout` for the next message.
    pub fn poll(&self, timeout: Duration) -> Delivery<M> {
        match self.receiver.recv_timeout(timeout) {
            Ok(message) => Delivery::Message(message),
            Err(RecvTimeoutError::Timeout) => Delivery::Idle,
            Err(RecvTimeoutError::Disconnected) => Delivery::Closed,
        }
    }

    /// Take the next message if one is already queued.
    pub fn try_recv(&self) -> Result<M, TryRecvError> {
        self.receiver.try_recv()
    }

    /// Everything queued right now, oldest first.
    pub fn drain(&self) -> Vec<M> {
        self.receiver.try_iter().collect()
    }
}

/// Domain-agnostic event bus (pub/sub abstraction).
///
/// ```text
/// decide → commit role change → EventBus::publish → AuditWorker → AuditSink
/// ```
///
/// `publish()` may fail (lock poisoned, broker down). Callers on the
/// governance path log the failure and carry on; the change is already
/// committed.
pub trait EventBus<M>: Send + Sync {
    type Error: core::fmt::Debug + Send + Sync + 'static;

    fn publish(&self, message: M) -> Result<(), Self::Error>;

    fn subscribe(&self) -> Subscription<M>;
}

impl<M, B> EventBus<M> for Arc<B>
where
    B: EventBus<M> + ?Sized,
{
    type Error = B::Error;

    fn publish(&self, message: M) -> Result<(), Self::Error> {
        (**self).publish(message)
    }

    fn subscribe(&self) -> Subscription<M> {
        (**self).subscribe()
    }
}
