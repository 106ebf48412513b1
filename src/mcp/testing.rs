//! Shared fixtures for tests that talk to a mocked ERP backend.

use std::{sync::Arc, time::Duration};

use mockito::{Matcher, ServerGuard};
use serde_json::json;

use crate::mcp::{config::ErpConfig, db::Database, http::Gateway};

pub const TEST_EMAIL: &str = "hr.agent@example.com";
pub const TEST_PASSWORD: &str = "correct-horse";
pub const TEST_TOKEN: &str = "test-token";

pub fn config_for(server: &ServerGuard) -> Arc<ErpConfig> {
    Arc::new(ErpConfig {
        base_url: server.url(),
        ..ErpConfig::default()
    })
}

pub fn gateway_for(server: &ServerGuard) -> Gateway {
    Gateway::new(config_for(server)).unwrap()
}

/// Gateway that has already logged in with the test credentials.
pub async fn signed_in(server: &mut ServerGuard) -> Gateway {
    let login = server
        .mock("POST", "/auth/login")
        .match_body(Matcher::PartialJson(json!({"password": TEST_PASSWORD})))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(json!({"success": true, "data": {"token": TEST_TOKEN}}).to_string())
        .create_async()
        .await;

    let gateway = gateway_for(server);
    let outcome = gateway.authenticate(TEST_EMAIL, TEST_PASSWORD).await.unwrap();
    assert!(outcome.is_success(), "login fixture failed: {outcome:?}");
    login.assert_async().await;
    gateway
}

/// Database handle pointed at a port nothing listens on. Must be created
/// inside a Tokio runtime.
pub fn offline_database() -> Database {
    Database::connect_lazy("mysql://erp@127.0.0.1:1/erp", Duration::from_millis(200)).unwrap()
}
