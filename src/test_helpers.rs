//! Test helper factories and mock state builders
//!
//! Provides convenience functions for building mock server state over the
//! in-memory monitoring API and profile store, plus auth fixtures.
#![allow(dead_code)]

use crate::api::handlers::{ChartsState, ServerState};
use crate::auth::jwt::encode_jwt;
use crate::charts::{ChartsController, ChartsSettings};
use crate::monitoring::mock::MockMonitoringApi;
use crate::profile::MemoryProfileStore;
use crate::AuthConfig;
use std::sync::Arc;

/// Secret shared by `test_auth_config` and `test_bearer_token`
pub const TEST_JWT_SECRET: &str = "test-secret-key-minimum-32-chars!!";

// ============================================================================
// Mock state builders
// ============================================================================

/// Server state over empty in-memory backends
pub fn mock_server_state(auth_config: Option<AuthConfig>) -> ChartsState {
    mock_server_state_with(
        Arc::new(MockMonitoringApi::new()),
        Arc::new(MemoryProfileStore::new()),
        auth_config,
    )
}

/// Server state over pre-seeded backends
pub fn mock_server_state_with(
    api: Arc<MockMonitoringApi>,
    profiles: Arc<MemoryProfileStore>,
    auth_config: Option<AuthConfig>,
) -> ChartsState {
    Arc::new(ServerState {
        charts: ChartsController::new(api, profiles, ChartsSettings::default()),
        auth_config,
    })
}

// ============================================================================
// Auth fixtures
// ============================================================================

/// Create a test AuthConfig signed with `TEST_JWT_SECRET`
pub fn test_auth_config() -> AuthConfig {
    AuthConfig {
        jwt_secret: TEST_JWT_SECRET.to_string(),
        jwt_expiry_secs: 3600,
    }
}

/// Generate a valid bearer token for the given user
pub fn test_bearer_token(user_id: u64, user_type: u8) -> String {
    encode_jwt(user_id, user_type, TEST_JWT_SECRET, 3600).expect("encode test token")
}
