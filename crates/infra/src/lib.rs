//! Infrastructure layer: stores, settings, the decision pipeline and audit fan-out.

pub mod config;
pub mod governance_service;
pub mod notifier;
pub mod settings;
pub mod store;
pub mod workers;

#[cfg(test)]
mod integration_tests;

pub use config::EngineConfig;
pub use governance_service::{GovernanceService, ServiceError};
pub use notifier::{BusNotifier, NoopNotifier, Notifier};
pub use settings::{GovernanceSettings, SettingsError};
pub use store::{
    AccountStore, ConfigStore, InMemoryAccountStore, InMemoryConfigStore, PersistenceError,
};
pub use workers::{AuditSink, AuditWorker, WorkerHandle};
