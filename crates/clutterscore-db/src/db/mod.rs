//! Database repositories
//!
//! Every query is tenant-scoped; files are scoped through their owning audit result.

pub mod activity;
pub mod audit_log;
pub mod file;
pub mod integration;

pub use activity::ActivityRepository;
pub use audit_log::AuditLogRepository;
pub use file::FileRepository;
pub use integration::IntegrationRepository;

/// Build an ILIKE pattern matching `term` as a literal substring.
pub(crate) fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}
