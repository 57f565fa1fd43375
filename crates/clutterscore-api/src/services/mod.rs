pub mod file_deletion;
pub mod integrations;
