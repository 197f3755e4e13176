//! Hidden-admin resolution.
//!
//! An account is hidden when it carries the explicit flag, or when it is an
//! admin and is the oldest admin in the system. The predicate is derived per
//! decision and never stored.

use crate::{Account, Role};

/// The oldest admin among `admins`.
///
/// Earliest `created_at` wins; equal timestamps fall back to the smallest id.
/// Entries whose role is not admin are ignored.
pub fn oldest_admin(admins: &[Account]) -> Option<&Account> {
    admins
        .iter()
        .filter(|a| a.role == Role::Admin)
        .min_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)))
}

/// Whether `account` holds concealed, non-demotable privilege.
pub fn is_hidden(account: &Account, admins: &[Account]) -> bool {
    if account.is_hidden_admin {
        return true;
    }
    account.role == Role::Admin && oldest_admin(admins).is_some_and(|oldest| oldest.id == account.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use rolegate_core::AccountId;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn id(s: &str) -> AccountId {
        s.parse().unwrap()
    }

    fn admin(id: AccountId, offset_secs: i64) -> Account {
        Account::new(id, Role::Admin, t0() + Duration::seconds(offset_secs))
    }

    #[test]
    fn oldest_admin_is_implicitly_hidden() {
        let first = admin(AccountId::new(), 0);
        let second = admin(AccountId::new(), 60);
        let admins = vec![second.clone(), first.clone()];

        assert!(!first.is_hidden_admin);
        assert!(is_hidden(&first, &admins));
        assert!(!is_hidden(&second, &admins));
    }

    #[test]
    fn explicit_flag_protects_any_account() {
        let first = admin(AccountId::new(), 0);
        let mut second = admin(AccountId::new(), 60);
        second.mark_hidden();
        let admins = vec![first.clone(), second.clone()];

        assert!(is_hidden(&first, &admins));
        assert!(is_hidden(&second, &admins));
    }

    #[test]
    fn equal_timestamps_break_ties_on_smallest_id() {
        let low = admin(id("00000000-0000-7000-8000-000000000001"), 0);
        let high = admin(id("00000000-0000-7000-8000-000000000002"), 0);
        let admins = vec![high.clone(), low.clone()];

        assert_eq!(oldest_admin(&admins).map(|a| a.id), Some(low.id));
        assert!(is_hidden(&low, &admins));
        assert!(!is_hidden(&high, &admins));
    }

    #[test]
    fn demoted_oldest_account_is_not_implicitly_hidden() {
        let first = admin(AccountId::new(), 0);
        let demoted = first.with_role(Role::Editor);
        let second = admin(AccountId::new(), 60);
        let admins = vec![demoted.clone(), second.clone()];

        assert!(!is_hidden(&demoted, &admins));
        assert!(is_hidden(&second, &admins));
    }

    #[test]
    fn no_admins_means_nobody_is_implicitly_hidden() {
        let user = Account::new(AccountId::new(), Role::User, t0());
        assert!(oldest_admin(&[]).is_none());
        assert!(!is_hidden(&user, &[]));
    }
}
