//! Clutterscore API Library
//!
//! HTTP handlers, authentication, the file deletion reconciliation service
//! and application setup.

mod api_doc;
mod handlers;
mod middleware;
mod telemetry;

pub mod auth;
pub mod error;
pub mod services;
pub mod setup;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
