//! Store boundary for governance settings and accounts.
//!
//! The real backends live outside this workspace; the in-memory versions
//! here back tests and local development.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::{InMemoryAccountStore, InMemoryConfigStore};
pub use r#trait::{AccountStore, ConfigStore, PersistenceError};
