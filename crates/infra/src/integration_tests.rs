//! Integration tests for the full governance pipeline.
//!
//! Tests: Settings + AccountStore → Decision → Commit → EventBus → AuditWorker
//!
//! Verifies:
//! - End-to-end verdicts for each governance mode
//! - The oldest admin stays protected from other admins and can act freely
//! - Committed changes reach the audit sink and stamp `last_sync`
//! - Missing accounts surface as errors, never as denials

mod tests {
    use std::sync::mpsc;
    use std::sync::{Arc, Barrier};
    use std::thread;
    use std::time::{Duration, Instant};

    use chrono::Utc;

    use rolegate_core::AccountId;
    use rolegate_events::{EventBus, EventEnvelope, InMemoryEventBus};
    use rolegate_governance::{
        Account, GovernanceConfig, GovernanceEvent, GovernanceMode, ReasonCode, Role, Verdict,
    };

    use crate::config::EngineConfig;
    use crate::governance_service::GovernanceService;
    use crate::notifier::{BusNotifier, NoopNotifier};
    use crate::settings::{GovernanceSettings, SettingsError};
    use crate::store::{AccountStore, InMemoryAccountStore, InMemoryConfigStore};
    use crate::workers::AuditWorker;

    type Bus = Arc<InMemoryEventBus<EventEnvelope<GovernanceEvent>>>;
    type Service = GovernanceService<Arc<InMemoryConfigStore>, Arc<InMemoryAccountStore>, BusNotifier<Bus>>;

    struct Harness {
        service: Service,
        accounts: Arc<InMemoryAccountStore>,
        bus: Bus,
    }

    fn setup(config: GovernanceConfig) -> Harness {
        rolegate_observability::init();

        let config_store = Arc::new(InMemoryConfigStore::with_config(config));
        let accounts = Arc::new(InMemoryAccountStore::new());
        let bus: Bus = Arc::new(InMemoryEventBus::new());
        let service = GovernanceService::new(
            config_store,
            accounts.clone(),
            BusNotifier::new(bus.clone()),
            EngineConfig::default(),
        );

        Harness {
            service,
            accounts,
            bus,
        }
    }

    /// Accounts are created one second apart, in call order.
    fn seed(accounts: &InMemoryAccountStore, role: Role) -> Account {
        let created_at = Utc::now() + chrono::Duration::seconds(accounts.len().unwrap() as i64);
        let account = Account::new(AccountId::new(), role, created_at);
        accounts.save(account.clone()).unwrap();
        account
    }

    fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        let deadline = Instant::now() + Duration::from_secs(2);
        while Instant::now() < deadline {
            if condition() {
                return true;
            }
            thread::sleep(Duration::from_millis(10));
        }
        false
    }

    #[test]
    fn mode_1_user_cannot_grant_admin() {
        let h = setup(GovernanceConfig::default().with_mode(GovernanceMode::Mode1));
        let _founder = seed(&h.accounts, Role::Admin);
        let actor = seed(&h.accounts, Role::User);
        let target = seed(&h.accounts, Role::User);

        let verdict = h.service.change_role(actor.id, target.id, Role::Admin).unwrap();

        assert_eq!(verdict, Verdict::deny(ReasonCode::AssignmentNotPermitted));
        assert_eq!(h.accounts.find_by_id(target.id).unwrap().unwrap().role, Role::User);
    }

    #[test]
    fn mode_2_editor_can_demote_editor_to_user() {
        let h = setup(GovernanceConfig::default().with_mode(GovernanceMode::Mode2));
        let _founder = seed(&h.accounts, Role::Admin);
        let actor = seed(&h.accounts, Role::Editor);
        let target = seed(&h.accounts, Role::Editor);

        let verdict = h.service.change_role(actor.id, target.id, Role::User).unwrap();

        assert_eq!(verdict, Verdict::allow(ReasonCode::Granted));
        assert_eq!(h.accounts.find_by_id(target.id).unwrap().unwrap().role, Role::User);
    }

    #[test]
    fn kill_switch_denies_everyone() {
        let h = setup(GovernanceConfig::default().with_enabled(false));
        let founder = seed(&h.accounts, Role::Admin);
        let admin = seed(&h.accounts, Role::Admin);
        let user = seed(&h.accounts, Role::User);

        for actor in [&founder, &admin] {
            for requested in Role::ALL {
                let verdict = h.service.change_role(actor.id, user.id, requested).unwrap();
                assert_eq!(verdict, Verdict::deny(ReasonCode::SystemDisabled));
            }
        }
    }

    #[test]
    fn oldest_admin_is_protected_from_other_admins() {
        let h = setup(GovernanceConfig::default());
        let founder = seed(&h.accounts, Role::Admin);
        let admin = seed(&h.accounts, Role::Admin);

        let change = h.service.change_role(admin.id, founder.id, Role::User).unwrap();
        let delete = h.service.delete_account(admin.id, founder.id).unwrap();

        assert_eq!(change, Verdict::deny(ReasonCode::ProtectedAccount));
        assert_eq!(delete, Verdict::deny(ReasonCode::ProtectedAccount));
        assert!(h.accounts.find_by_id(founder.id).unwrap().is_some());
    }

    #[test]
    fn oldest_admin_bypasses_matrix_but_not_kill_switch() {
        let h = setup(GovernanceConfig::default().with_mode(GovernanceMode::Mode1));
        let founder = seed(&h.accounts, Role::Admin);
        let admin = seed(&h.accounts, Role::Admin);

        // Mode 1 admins cannot manage admins; the hidden admin can.
        let verdict = h.service.change_role(founder.id, admin.id, Role::Editor).unwrap();
        assert_eq!(verdict, Verdict::allow(ReasonCode::Granted));

        h.service.set_enabled(Role::Admin, false).unwrap();
        let verdict = h.service.change_role(founder.id, admin.id, Role::Admin).unwrap();
        assert_eq!(verdict, Verdict::deny(ReasonCode::SystemDisabled));
    }

    #[test]
    fn explicitly_flagged_admin_is_hidden_too() {
        let h = setup(GovernanceConfig::default());
        let _founder = seed(&h.accounts, Role::Admin);
        let mut flagged = Account::new(AccountId::new(), Role::Admin, Utc::now() + chrono::Duration::hours(1));
        flagged.mark_hidden();
        h.accounts.save(flagged.clone()).unwrap();
        let admin = seed(&h.accounts, Role::Admin);

        let verdict = h.service.change_role(admin.id, flagged.id, Role::User).unwrap();

        assert_eq!(verdict, Verdict::deny(ReasonCode::ProtectedAccount));
    }

    #[test]
    fn self_delete_is_forbidden_even_for_the_oldest_admin() {
        let h = setup(GovernanceConfig::default());
        let founder = seed(&h.accounts, Role::Admin);

        let verdict = h.service.delete_account(founder.id, founder.id).unwrap();

        assert_eq!(verdict, Verdict::deny(ReasonCode::SelfDeleteForbidden));
        assert!(h.accounts.find_by_id(founder.id).unwrap().is_some());
    }

    #[test]
    fn switching_modes_changes_delegation() {
        let h = setup(GovernanceConfig::default());
        let _founder = seed(&h.accounts, Role::Admin);
        let author = seed(&h.accounts, Role::Author);
        let user = seed(&h.accounts, Role::User);

        let before = h.service.change_role(author.id, user.id, Role::Editor).unwrap();
        assert_eq!(before, Verdict::deny(ReasonCode::AssignmentNotPermitted));

        assert_eq!(
            h.service.set_mode(Role::Author, GovernanceMode::Mode3),
            Err(SettingsError::NotAdmin(Role::Author))
        );
        h.service.set_mode(Role::Admin, GovernanceMode::Mode3).unwrap();

        let after = h.service.change_role(author.id, user.id, Role::Editor).unwrap();
        assert_eq!(after, Verdict::allow(ReasonCode::Granted));
    }

    #[test]
    fn committed_change_reaches_audit_sink_and_stamps_last_sync() {
        let h = setup(GovernanceConfig::default());
        let settings: GovernanceSettings<Arc<InMemoryConfigStore>> = h.service.settings().clone();
        settings
            .set_sheet_id(Role::Admin, Some("governance-audit".into()))
            .unwrap();

        let (tx, rx) = mpsc::channel::<(Option<String>, EventEnvelope<GovernanceEvent>)>();
        let sink = move |sheet: Option<&str>, envelope: &EventEnvelope<GovernanceEvent>| -> anyhow::Result<()> {
            tx.send((sheet.map(str::to_string), envelope.clone()))
                .map_err(|_| anyhow::anyhow!("test receiver dropped"))
        };
        let worker = AuditWorker::spawn(h.bus.clone(), sink, settings.clone()).unwrap();

        let founder = seed(&h.accounts, Role::Admin);
        let user = seed(&h.accounts, Role::User);
        h.service.change_role(founder.id, user.id, Role::Author).unwrap();

        let (sheet, envelope) = rx.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(sheet.as_deref(), Some("governance-audit"));
        assert_eq!(envelope.event_type(), "governance.account.role_changed");
        match envelope.payload() {
            GovernanceEvent::RoleChanged(e) => {
                assert_eq!(e.actor_id, founder.id);
                assert_eq!(e.target_id, user.id);
                assert_eq!((e.previous_role, e.new_role), (Role::User, Role::Author));
            }
            other => panic!("unexpected event: {other:?}"),
        }
        assert!(wait_until(|| settings.load().unwrap().last_sync.is_some()));

        worker.shutdown();
    }

    #[test]
    fn denied_and_noop_requests_publish_nothing() {
        let h = setup(GovernanceConfig::default());
        let sub = h.bus.subscribe();
        let founder = seed(&h.accounts, Role::Admin);
        let editor = seed(&h.accounts, Role::Editor);

        h.service.change_role(editor.id, founder.id, Role::User).unwrap();
        h.service.change_role(founder.id, editor.id, Role::Editor).unwrap();
        h.service.delete_account(editor.id, editor.id).unwrap();

        assert!(sub.try_recv().is_err());
    }

    #[test]
    fn racing_admins_each_see_a_consistent_state() {
        let accounts = Arc::new(InMemoryAccountStore::new());
        let founder = seed(&accounts, Role::Admin);
        let target = seed(&accounts, Role::User);

        let service = Arc::new(GovernanceService::new(
            InMemoryConfigStore::new(),
            accounts.clone(),
            NoopNotifier,
            EngineConfig::default(),
        ));
        let barrier = Arc::new(Barrier::new(2));

        let handles: Vec<_> = [Role::Author, Role::Editor]
            .into_iter()
            .map(|requested| {
                let service = service.clone();
                let barrier = barrier.clone();
                thread::spawn(move || {
                    barrier.wait();
                    service.change_role(founder.id, target.id, requested)
                })
            })
            .collect();

        for handle in handles {
            let verdict = handle.join().unwrap().unwrap();
            assert!(verdict.allowed);
        }

        let final_role = accounts.find_by_id(target.id).unwrap().unwrap().role;
        assert!(matches!(final_role, Role::Author | Role::Editor));
    }

    #[test]
    fn deleted_account_is_gone_for_subsequent_requests() {
        let h = setup(GovernanceConfig::default());
        let founder = seed(&h.accounts, Role::Admin);
        let author = seed(&h.accounts, Role::Author);

        assert!(h.service.delete_account(founder.id, author.id).unwrap().allowed);

        let err = h.service.change_role(founder.id, author.id, Role::User).unwrap_err();
        assert_eq!(err.to_string(), format!("account {} not found", author.id));
    }
}
