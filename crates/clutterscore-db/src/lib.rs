//! Clutterscore database layer
//!
//! Postgres repositories for files, integrations and the two audit sinks,
//! plus the store traits the API depends on.

pub mod db;
#[cfg(any(test, feature = "memory"))]
pub mod memory;
pub mod store;

pub use db::{ActivityRepository, AuditLogRepository, FileRepository, IntegrationRepository};
#[cfg(any(test, feature = "memory"))]
pub use memory::{FailPoint, MemoryStore};
pub use store::{ActivityStore, AuditLogStore, FileStore, IntegrationStore};
