use std::io;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use chrono::Utc;
use tracing::{debug, warn};

use rolegate_events::{Delivery, EventBus, EventEnvelope, Subscription};
use rolegate_governance::GovernanceEvent;

use crate::settings::GovernanceSettings;
use crate::store::ConfigStore;

/// External collaborator that mirrors governance events (audit log, sheet).
///
/// Failures are the collaborator's own business: the worker logs and drops them.
pub trait AuditSink: Send + 'static {
    fn record(
        &mut self,
        sheet_id: Option<&str>,
        envelope: &EventEnvelope<GovernanceEvent>,
    ) -> anyhow::Result<()>;
}

impl<F> AuditSink for F
where
    F: FnMut(Option<&str>, &EventEnvelope<GovernanceEvent>) -> anyhow::Result<()> + Send + 'static,
{
    fn record(
        &mut self,
        sheet_id: Option<&str>,
        envelope: &EventEnvelope<GovernanceEvent>,
    ) -> anyhow::Result<()> {
        self(sheet_id, envelope)
    }
}

/// Handle to control and join a background worker.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the worker to stop.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

/// Forwards published governance events to an [`AuditSink`].
///
/// - Subscribes before returning, so nothing published afterwards is missed
/// - Sink failures are logged and dropped
/// - On success, stamps `last_sync` in the governance settings
#[derive(Debug)]
pub struct AuditWorker;

impl AuditWorker {
    pub fn spawn<B, S, C>(bus: B, sink: S, settings: GovernanceSettings<C>) -> io::Result<WorkerHandle>
    where
        B: EventBus<EventEnvelope<GovernanceEvent>>,
        S: AuditSink,
        C: ConfigStore + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let sub = bus.subscribe();

        let join = thread::Builder::new()
            .name("governance-audit".to_string())
            .spawn(move || worker_loop(sub, shutdown_rx, sink, settings))?;

        Ok(WorkerHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        })
    }
}

fn worker_loop<S, C>(
    sub: Subscription<EventEnvelope<GovernanceEvent>>,
    shutdown_rx: mpsc::Receiver<()>,
    mut sink: S,
    settings: GovernanceSettings<C>,
) where
    S: AuditSink,
    C: ConfigStore,
{
    let tick = Duration::from_millis(100);

    loop {
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        match sub.poll(tick) {
            Delivery::Message(envelope) => forward(&envelope, &mut sink, &settings),
            Delivery::Idle => continue,
            Delivery::Closed => break,
        }
    }
}

fn forward<S, C>(envelope: &EventEnvelope<GovernanceEvent>, sink: &mut S, settings: &GovernanceSettings<C>)
where
    S: AuditSink,
    C: ConfigStore,
{
    let sheet_id = match settings.load() {
        Ok(config) => config.sheet_id,
        Err(err) => {
            warn!(error = %err, "could not read settings for audit sync");
            None
        }
    };

    if let Err(err) = sink.record(sheet_id.as_deref(), envelope) {
        warn!(
            event_type = envelope.event_type(),
            sequence = envelope.sequence_number(),
            error = %err,
            "audit sink failed; event dropped"
        );
        return;
    }

    match settings.record_sync(Utc::now()) {
        Ok(_) => debug!(sequence = envelope.sequence_number(), "audit sync recorded"),
        Err(err) => warn!(error = %err, "could not record audit sync time"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    use rolegate_core::AccountId;
    use rolegate_events::InMemoryEventBus;
    use rolegate_governance::{Role, RoleChanged};

    use crate::store::InMemoryConfigStore;

    fn role_changed() -> EventEnvelope<GovernanceEvent> {
        EventEnvelope::wrap(
            1,
            GovernanceEvent::RoleChanged(RoleChanged {
                actor_id: AccountId::new(),
                target_id: AccountId::new(),
                previous_role: Role::User,
                new_role: Role::Author,
                occurred_at: Utc::now(),
            }),
        )
    }

    #[test]
    fn successful_record_stamps_last_sync() {
        let store = Arc::new(InMemoryConfigStore::new());
        let settings = GovernanceSettings::new(store.clone());
        let seen: Arc<Mutex<Vec<Option<String>>>> = Arc::new(Mutex::new(Vec::new()));
        let seen_in_sink = seen.clone();
        let mut sink = move |sheet: Option<&str>, _e: &EventEnvelope<GovernanceEvent>| -> anyhow::Result<()> {
            seen_in_sink.lock().unwrap().push(sheet.map(str::to_string));
            Ok(())
        };

        settings.set_sheet_id(Role::Admin, Some("sheet-1".into())).unwrap();
        forward(&role_changed(), &mut sink, &settings);

        assert_eq!(*seen.lock().unwrap(), vec![Some("sheet-1".to_string())]);
        assert!(settings.load().unwrap().last_sync.is_some());
    }

    #[test]
    fn failing_sink_leaves_last_sync_untouched() {
        let settings = GovernanceSettings::new(InMemoryConfigStore::new());
        let mut sink = |_s: Option<&str>, _e: &EventEnvelope<GovernanceEvent>| -> anyhow::Result<()> {
            Err(anyhow::anyhow!("sheet api returned 503"))
        };

        forward(&role_changed(), &mut sink, &settings);

        assert!(settings.load().unwrap().last_sync.is_none());
    }

    #[test]
    fn worker_shuts_down_cleanly() {
        let bus: Arc<InMemoryEventBus<EventEnvelope<GovernanceEvent>>> = Arc::new(InMemoryEventBus::new());
        let sink = |_s: Option<&str>, _e: &EventEnvelope<GovernanceEvent>| -> anyhow::Result<()> { Ok(()) };
        let handle = AuditWorker::spawn(
            bus.clone(),
            sink,
            GovernanceSettings::new(InMemoryConfigStore::new()),
        )
        .unwrap();

        assert_eq!(bus.subscriber_count(), Ok(1));
        handle.shutdown();
    }
}
