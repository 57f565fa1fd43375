//! Test fixtures: files and integrations.

use chrono::{Duration, Utc};
use clutterscore_core::models::{File, FileStatus, Integration, ToolSource};

pub fn file(id: &str, tenant_id: &str, source: ToolSource, external_id: &str) -> File {
    let now = Utc::now();
    File {
        id: id.to_string(),
        audit_result_id: format!("audit-{}", tenant_id),
        organization_id: tenant_id.to_string(),
        source,
        external_id: Some(external_id.to_string()),
        name: format!("{}.pdf", id),
        path: Some(format!("/shared/{}.pdf", id)),
        mime_type: Some("application/pdf".to_string()),
        size_mb: 4.0,
        status: FileStatus::Active,
        last_accessed_at: Some(now - Duration::days(400)),
        created_at: now,
        updated_at: now,
    }
}

pub fn integration(id: &str, tenant_id: &str, source: ToolSource) -> Integration {
    Integration {
        id: id.to_string(),
        organization_id: tenant_id.to_string(),
        source,
        access_token: format!("{}-access", id),
        refresh_token: Some(format!("{}-refresh", id)),
        expires_at: Some(Utc::now() + Duration::hours(1)),
        is_active: true,
        connected_at: Utc::now(),
        last_synced_at: None,
    }
}
