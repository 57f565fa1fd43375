//! Scripted connectors for tests
//!
//! Each platform gets a [`MockConnector`] whose outcome and token rotation
//! can be set per test. Calls are recorded for assertions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use clutterscore_core::models::ToolSource;

use crate::factory::ConnectorFactory;
use crate::traits::{Connector, ConnectorCredentials, ConnectorError, ConnectorResult, FileMetadata};

#[derive(Debug, Clone, PartialEq)]
pub enum MockOutcome {
    Succeed,
    Unsupported,
    /// Fail with an API error carrying this message
    Fail(String),
    /// Never answer within any reasonable deadline
    Hang,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub tenant_id: String,
    pub external_id: String,
    pub metadata: FileMetadata,
}

#[derive(Debug, Clone)]
struct Rotation {
    access_token: String,
    refresh_token: Option<String>,
    expires_at: Option<DateTime<Utc>>,
}

struct MockState {
    outcome: MockOutcome,
    rotation: Option<Rotation>,
    calls: Vec<MockCall>,
    refreshes: usize,
}

pub struct MockConnector {
    source: ToolSource,
    state: Mutex<MockState>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockConnector {
    pub fn new(source: ToolSource) -> Self {
        Self {
            source,
            state: Mutex::new(MockState {
                outcome: MockOutcome::Succeed,
                rotation: None,
                calls: Vec::new(),
                refreshes: 0,
            }),
        }
    }

    pub fn set_outcome(&self, outcome: MockOutcome) {
        lock(&self.state).outcome = outcome;
    }

    /// Rotate the access token on the next call, as a refresh would. Also
    /// what an explicit refresh returns; without it refreshing fails.
    pub fn rotate_token(
        &self,
        access_token: &str,
        refresh_token: Option<&str>,
        expires_at: Option<DateTime<Utc>>,
    ) {
        lock(&self.state).rotation = Some(Rotation {
            access_token: access_token.to_string(),
            refresh_token: refresh_token.map(String::from),
            expires_at,
        });
    }

    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.state).calls.clone()
    }

    pub fn refreshes(&self) -> usize {
        lock(&self.state).refreshes
    }
}

fn apply(rotation: Rotation, credentials: &mut ConnectorCredentials) {
    credentials.access_token = rotation.access_token;
    if rotation.refresh_token.is_some() {
        credentials.refresh_token = rotation.refresh_token;
    }
    credentials.expires_at = rotation.expires_at;
}

#[async_trait]
impl Connector for MockConnector {
    fn source(&self) -> ToolSource {
        self.source
    }

    async fn refresh_credentials(&self, credentials: &mut ConnectorCredentials) -> ConnectorResult<()> {
        let rotation = {
            let mut state = lock(&self.state);
            state.refreshes += 1;
            state.rotation.clone()
        };

        match rotation {
            Some(rotation) => {
                apply(rotation, credentials);
                Ok(())
            }
            None => Err(ConnectorError::RefreshUnavailable(self.source)),
        }
    }

    async fn delete_file(
        &self,
        credentials: &mut ConnectorCredentials,
        external_id: &str,
        metadata: &FileMetadata,
    ) -> ConnectorResult<()> {
        let (outcome, rotation) = {
            let mut state = lock(&self.state);
            state.calls.push(MockCall {
                tenant_id: credentials.tenant_id.clone(),
                external_id: external_id.to_string(),
                metadata: metadata.clone(),
            });
            (state.outcome.clone(), state.rotation.clone())
        };

        if let Some(rotation) = rotation {
            apply(rotation, credentials);
        }

        match outcome {
            MockOutcome::Succeed => Ok(()),
            MockOutcome::Unsupported => Err(ConnectorError::Unsupported(self.source)),
            MockOutcome::Fail(message) => Err(ConnectorError::Api {
                platform: self.source,
                message,
            }),
            MockOutcome::Hang => {
                tokio::time::sleep(Duration::from_secs(3600)).await;
                Ok(())
            }
        }
    }
}

/// Factory handing out one [`MockConnector`] per platform
pub struct MockConnectorFactory {
    connectors: HashMap<ToolSource, Arc<MockConnector>>,
}

impl MockConnectorFactory {
    pub fn new() -> Self {
        Self {
            connectors: ToolSource::ALL
                .into_iter()
                .map(|source| (source, Arc::new(MockConnector::new(source))))
                .collect(),
        }
    }

    pub fn connector(&self, source: ToolSource) -> Arc<MockConnector> {
        match self.connectors.get(&source) {
            Some(connector) => connector.clone(),
            None => unreachable!("every ToolSource has a mock connector"),
        }
    }
}

impl Default for MockConnectorFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl ConnectorFactory for MockConnectorFactory {
    fn connector_for(&self, source: ToolSource) -> Arc<dyn Connector> {
        self.connector(source)
    }
}
