use chrono::{DateTime, Utc};

/// An outbound event describing a committed change.
///
/// Events are facts: once published they are never edited. Consumers must
/// tolerate duplicates.
pub trait Event: Clone + core::fmt::Debug + Send + Sync + 'static {
    /// Stable event name (e.g. "governance.account.role_changed").
    fn event_type(&self) -> &'static str;

    /// Schema version for this event type.
    fn version(&self) -> u32;

    /// When the change was committed.
    fn occurred_at(&self) -> DateTime<Utc>;
}
