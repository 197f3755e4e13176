//! Outbound events emitted after a committed privilege change.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use rolegate_core::AccountId;
use rolegate_events::Event;

use crate::Role;

/// Emitted after a role change has been persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleChanged {
    pub actor_id: AccountId,
    pub target_id: AccountId,
    pub previous_role: Role,
    pub new_role: Role,
    pub occurred_at: DateTime<Utc>,
}

/// Emitted after an account has been removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountDeleted {
    pub actor_id: AccountId,
    pub target_id: AccountId,
    /// Role the account held when it was removed.
    pub role: Role,
    pub occurred_at: DateTime<Utc>,
}

/// All governance events.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    RoleChanged(RoleChanged),
    AccountDeleted(AccountDeleted),
}

impl GovernanceEvent {
    pub fn target_id(&self) -> AccountId {
        match self {
            GovernanceEvent::RoleChanged(e) => e.target_id,
            GovernanceEvent::AccountDeleted(e) => e.target_id,
        }
    }
}

impl Event for GovernanceEvent {
    fn event_type(&self) -> &'static str {
        match self {
            GovernanceEvent::RoleChanged(_) => "governance.account.role_changed",
            GovernanceEvent::AccountDeleted(_) => "governance.account.deleted",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            GovernanceEvent::RoleChanged(e) => e.occurred_at,
            GovernanceEvent::AccountDeleted(e) => e.occurred_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use rolegate_events::EventEnvelope;

    #[test]
    fn envelope_copies_event_metadata() {
        let at = Utc::now();
        let event = GovernanceEvent::RoleChanged(RoleChanged {
            actor_id: AccountId::new(),
            target_id: AccountId::new(),
            previous_role: Role::User,
            new_role: Role::Editor,
            occurred_at: at,
        });

        let envelope = EventEnvelope::wrap(4, event.clone());

        assert_eq!(envelope.event_type(), "governance.account.role_changed");
        assert_eq!(envelope.event_version(), 1);
        assert_eq!(envelope.occurred_at(), at);
        assert_eq!(envelope.sequence_number(), 4);
        assert_eq!(envelope.payload(), &event);
    }
}
