//! Clutterscore Connectors Library
//!
//! Per-platform adapters that delete files on the external systems a tenant
//! has connected. Every adapter implements [`Connector`]; the API resolves one
//! through a [`ConnectorFactory`] keyed by [`ToolSource`].
//!
//! Connectors receive credentials mutably. When an access token is close to
//! expiry the connector refreshes it before calling the platform and leaves
//! the rotated token in the credentials for the caller to persist.

pub mod dropbox;
pub mod factory;
pub mod google_drive;
pub mod microsoft;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod notion;
pub mod oauth;
pub mod slack;
pub mod traits;

pub use clutterscore_core::models::ToolSource;
pub use factory::{ConnectorFactory, DefaultConnectorFactory};
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockCall, MockConnector, MockConnectorFactory, MockOutcome};
pub use traits::{Connector, ConnectorCredentials, ConnectorError, ConnectorResult, FileMetadata};
