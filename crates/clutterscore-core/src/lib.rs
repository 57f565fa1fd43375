//! Clutterscore Core Library
//!
//! This crate provides the domain models, error types and configuration
//! shared by the database, connector and API crates.

pub mod config;
pub mod error;
pub mod models;

pub use config::{Config, OAuthClient};
pub use error::{AppError, ErrorMetadata, LogLevel};
