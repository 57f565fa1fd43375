//! In-memory store used by tests
//!
//! Implements every store trait over a single shared state, with fail points
//! to simulate an unavailable backend for individual operations.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::Utc;
use clutterscore_core::models::{
    Activity, AuditLog, AuditLogFilter, File, FileFilter, FileStatus, Integration, NewActivity,
    NewAuditLog, Page, TokenUpdate, ToolSource,
};
use clutterscore_core::AppError;
use uuid::Uuid;

use crate::store::{ActivityStore, AuditLogStore, FileStore, IntegrationStore};

/// Store operation that can be forced to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailPoint {
    Ping,
    FindFile,
    MarkDeleted,
    FindIntegration,
    UpdateTokens,
    Deactivate,
    AppendActivity,
    AppendAuditLog,
}

#[derive(Default)]
struct State {
    files: HashMap<String, File>,
    integrations: Vec<Integration>,
    activities: Vec<Activity>,
    audit_logs: Vec<AuditLog>,
    token_updates: Vec<(String, TokenUpdate)>,
    fail_points: HashSet<FailPoint>,
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

fn matches_search(haystack: &[Option<&str>], needle: &str) -> bool {
    let needle = needle.to_lowercase();
    haystack
        .iter()
        .flatten()
        .any(|value| value.to_lowercase().contains(&needle))
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(&self, point: FailPoint) -> Result<(), AppError> {
        if self.state().fail_points.contains(&point) {
            return Err(AppError::Unavailable(format!("{:?} unavailable", point)));
        }
        Ok(())
    }

    pub fn insert_file(&self, file: File) {
        self.state().files.insert(file.id.clone(), file);
    }

    pub fn insert_integration(&self, integration: Integration) {
        let mut state = self.state();
        state.integrations.retain(|existing| {
            !(existing.organization_id == integration.organization_id
                && existing.source == integration.source)
        });
        state.integrations.push(integration);
    }

    pub fn file(&self, id: &str) -> Option<File> {
        self.state().files.get(id).cloned()
    }

    pub fn integration(&self, id: &str) -> Option<Integration> {
        self.state()
            .integrations
            .iter()
            .find(|integration| integration.id == id)
            .cloned()
    }

    pub fn activities(&self) -> Vec<Activity> {
        self.state().activities.clone()
    }

    pub fn audit_logs(&self) -> Vec<AuditLog> {
        self.state().audit_logs.clone()
    }

    /// Every token rotation persisted, in order, keyed by integration ID
    pub fn token_updates(&self) -> Vec<(String, TokenUpdate)> {
        self.state().token_updates.clone()
    }

    pub fn fail_on(&self, point: FailPoint) {
        self.state().fail_points.insert(point);
    }

    pub fn clear_failures(&self) {
        self.state().fail_points.clear();
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn ping(&self) -> Result<(), AppError> {
        self.check(FailPoint::Ping)
    }

    async fn find_for_tenant(&self, tenant_id: &str, id: &str) -> Result<Option<File>, AppError> {
        self.check(FailPoint::FindFile)?;
        Ok(self
            .state()
            .files
            .get(id)
            .filter(|file| file.organization_id == tenant_id)
            .cloned())
    }

    async fn mark_deleted(&self, tenant_id: &str, id: &str) -> Result<bool, AppError> {
        self.check(FailPoint::MarkDeleted)?;
        let mut state = self.state();
        match state
            .files
            .get_mut(id)
            .filter(|file| file.organization_id == tenant_id)
        {
            Some(file) => {
                file.status = FileStatus::Deleted;
                file.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_for_tenant(
        &self,
        tenant_id: &str,
        filter: &FileFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Page<File>, AppError> {
        self.check(FailPoint::FindFile)?;
        let state = self.state();
        let mut files: Vec<File> = state
            .files
            .values()
            .filter(|file| file.organization_id == tenant_id)
            .filter(|file| filter.status.map_or(true, |status| file.status == status))
            .filter(|file| filter.source.map_or(true, |source| file.source == source))
            .filter(|file| {
                filter.search.as_deref().map_or(true, |term| {
                    matches_search(&[Some(file.name.as_str()), file.path.as_deref()], term)
                })
            })
            .cloned()
            .collect();
        files.sort_by(|a, b| {
            b.size_mb
                .total_cmp(&a.size_mb)
                .then_with(|| a.id.cmp(&b.id))
        });

        let total = files.len() as i64;
        let items = files
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok(Page::new(items, total))
    }
}

#[async_trait]
impl IntegrationStore for MemoryStore {
    async fn find_by_source(
        &self,
        tenant_id: &str,
        source: ToolSource,
    ) -> Result<Option<Integration>, AppError> {
        self.check(FailPoint::FindIntegration)?;
        Ok(self
            .state()
            .integrations
            .iter()
            .find(|integration| {
                integration.organization_id == tenant_id && integration.source == source
            })
            .cloned())
    }

    async fn update_tokens(&self, id: &str, update: &TokenUpdate) -> Result<(), AppError> {
        self.check(FailPoint::UpdateTokens)?;
        let mut state = self.state();
        let integration = state
            .integrations
            .iter_mut()
            .find(|integration| integration.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Integration {} not found", id)))?;
        integration.access_token = update.access_token.clone();
        if let Some(refresh_token) = &update.refresh_token {
            integration.refresh_token = Some(refresh_token.clone());
        }
        integration.expires_at = update.expires_at;
        state.token_updates.push((id.to_string(), update.clone()));
        Ok(())
    }

    async fn deactivate(
        &self,
        tenant_id: &str,
        source: ToolSource,
    ) -> Result<Option<Integration>, AppError> {
        self.check(FailPoint::Deactivate)?;
        Ok(self
            .state()
            .integrations
            .iter_mut()
            .find(|integration| {
                integration.organization_id == tenant_id && integration.source == source
            })
            .map(|integration| {
                integration.is_active = false;
                integration.clone()
            }))
    }

    async fn list_for_tenant(&self, tenant_id: &str) -> Result<Vec<Integration>, AppError> {
        self.check(FailPoint::FindIntegration)?;
        let mut integrations: Vec<Integration> = self
            .state()
            .integrations
            .iter()
            .filter(|integration| integration.organization_id == tenant_id)
            .cloned()
            .collect();
        integrations.sort_by_key(|integration| integration.connected_at);
        Ok(integrations)
    }
}

#[async_trait]
impl ActivityStore for MemoryStore {
    async fn append(&self, activity: NewActivity) -> Result<Activity, AppError> {
        self.check(FailPoint::AppendActivity)?;
        let row = Activity {
            id: Uuid::new_v4().to_string(),
            organization_id: activity.organization_id,
            user_id: activity.user_id,
            action: activity.action,
            metadata: activity.metadata,
            created_at: Utc::now(),
        };
        self.state().activities.push(row.clone());
        Ok(row)
    }
}

#[async_trait]
impl AuditLogStore for MemoryStore {
    async fn append(&self, entry: NewAuditLog) -> Result<AuditLog, AppError> {
        self.check(FailPoint::AppendAuditLog)?;
        let row = AuditLog {
            id: Uuid::new_v4().to_string(),
            organization_id: entry.organization_id,
            user_id: entry.user_id,
            action_type: entry.action_type,
            target: entry.target,
            target_type: entry.target_type,
            executor: entry.executor,
            status: entry.status,
            details: entry.details,
            created_at: Utc::now(),
        };
        self.state().audit_logs.push(row.clone());
        Ok(row)
    }

    async fn list_for_tenant(
        &self,
        tenant_id: &str,
        filter: &AuditLogFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Page<AuditLog>, AppError> {
        let state = self.state();
        // Appends are chronological, so reverse insertion order is newest first.
        let logs: Vec<AuditLog> = state
            .audit_logs
            .iter()
            .rev()
            .filter(|log| log.organization_id == tenant_id)
            .filter(|log| filter.status.map_or(true, |status| log.status == status))
            .filter(|log| {
                filter.search.as_deref().map_or(true, |term| {
                    matches_search(
                        &[
                            Some(log.action_type.as_str()),
                            Some(log.target.as_str()),
                            Some(log.executor.as_str()),
                        ],
                        term,
                    )
                })
            })
            .cloned()
            .collect();

        let total = logs.len() as i64;
        let items = logs
            .into_iter()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .collect();
        Ok(Page::new(items, total))
    }
}
