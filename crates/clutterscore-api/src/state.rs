//! Application state shared by every handler.

use crate::services::file_deletion::FileDeletionService;
use crate::services::integrations::IntegrationService;
use clutterscore_connectors::ConnectorFactory;
use clutterscore_core::Config;
use clutterscore_db::{
    ActivityRepository, ActivityStore, AuditLogRepository, AuditLogStore, FileRepository,
    FileStore, IntegrationRepository, IntegrationStore,
};
use sqlx::PgPool;
use std::sync::Arc;

/// Record stores, held behind their traits so tests can swap in memory stores.
#[derive(Clone)]
pub struct DbState {
    pub files: Arc<dyn FileStore>,
    pub integrations: Arc<dyn IntegrationStore>,
    pub activities: Arc<dyn ActivityStore>,
    pub audit_logs: Arc<dyn AuditLogStore>,
}

impl DbState {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            files: Arc::new(FileRepository::new(pool.clone())),
            integrations: Arc::new(IntegrationRepository::new(pool.clone())),
            activities: Arc::new(ActivityRepository::new(pool.clone())),
            audit_logs: Arc::new(AuditLogRepository::new(pool)),
        }
    }

    /// Every store backed by clones of the same handle
    pub fn shared<S>(store: S) -> Self
    where
        S: FileStore + IntegrationStore + ActivityStore + AuditLogStore + Clone + 'static,
    {
        Self {
            files: Arc::new(store.clone()),
            integrations: Arc::new(store.clone()),
            activities: Arc::new(store.clone()),
            audit_logs: Arc::new(store),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub db: DbState,
    pub file_deletion: FileDeletionService,
    pub integration_service: IntegrationService,
}

impl AppState {
    pub fn new(config: Config, db: DbState, connectors: Arc<dyn ConnectorFactory>) -> Self {
        let integration_service =
            IntegrationService::new(&db, connectors.clone(), config.connector_timeout());
        let file_deletion = FileDeletionService::new(
            &db,
            connectors,
            config.connector_timeout(),
            config.audit_not_found_attempts(),
        );

        Self {
            config,
            db,
            file_deletion,
            integration_service,
        }
    }
}
