//! Data models for the application
//!
//! Each sub-module holds one feature area's records and request/response shapes.

mod activity;
mod audit_log;
mod file;
mod integration;
mod pagination;
mod tool_source;

pub use activity::*;
pub use audit_log::*;
pub use file::*;
pub use integration::*;
pub use pagination::*;
pub use tool_source::*;
