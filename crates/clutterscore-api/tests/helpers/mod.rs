//! Test helpers: build AppState and router for integration tests.
//!
//! The router is the production one; only the stores and connectors are
//! swapped for the in-memory store and scripted mock connectors.

#![allow(dead_code)]

pub mod auth;
pub mod fixtures;

use axum_test::TestServer;
use clutterscore_api::setup::routes;
use clutterscore_api::state::{AppState, DbState};
use clutterscore_connectors::{MockConnector, MockConnectorFactory};
use clutterscore_core::models::ToolSource;
use clutterscore_core::Config;
use clutterscore_db::MemoryStore;
use std::sync::Arc;

pub struct TestApp {
    pub server: TestServer,
    pub store: MemoryStore,
    pub connectors: Arc<MockConnectorFactory>,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }

    pub fn connector(&self, source: ToolSource) -> Arc<MockConnector> {
        self.connectors.connector(source)
    }
}

pub fn test_config() -> Config {
    Config {
        server_port: 0,
        environment: "test".to_string(),
        cors_origins: vec!["*".to_string()],
        database_url: "postgresql://localhost/clutterscore_test".to_string(),
        db_max_connections: 1,
        db_timeout_seconds: 1,
        jwt_secret: auth::TEST_JWT_SECRET.to_string(),
        request_timeout_secs: 30,
        connector_timeout_secs: 5,
        audit_not_found_attempts: false,
        log_format: "pretty".to_string(),
        slack_oauth: None,
        google_oauth: None,
        microsoft_oauth: None,
        dropbox_oauth: None,
    }
}

pub fn setup_test_app() -> TestApp {
    setup_test_app_with(test_config())
}

pub fn setup_test_app_with(config: Config) -> TestApp {
    let store = MemoryStore::new();
    let connectors = Arc::new(MockConnectorFactory::new());
    let state = Arc::new(AppState::new(
        config.clone(),
        DbState::shared(store.clone()),
        connectors.clone(),
    ));

    let router = routes::setup_routes(&config, state).expect("Failed to build router");
    let server = TestServer::new(router).expect("Failed to start test server");

    TestApp {
        server,
        store,
        connectors,
    }
}
