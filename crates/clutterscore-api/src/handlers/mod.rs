pub mod audit_logs;
pub mod files;
pub mod integrations;
