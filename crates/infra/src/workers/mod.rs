//! Background workers.

pub mod audit_worker;

pub use audit_worker::{AuditSink, AuditWorker, WorkerHandle};
