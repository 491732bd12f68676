use std::sync::Arc;

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header};

use chat_api::auth::verifier::AccessClaims;
use chat_api::config::Config;
use chat_api::gateway::registry::ConnectionRegistry;
use chat_api::models::user::{Role, User};
use chat_api::store::memory::{MemoryMessageStore, MemoryUserStore};
use chat_api::AppState;

/// Shared secret used by every test token (mirrors the auth service config).
pub const TEST_JWT_SECRET: &str = "test-secret-do-not-use-in-production";

/// Typed handles onto the in-memory backends behind a test `AppState`.
pub struct TestBackend {
    pub users: Arc<MemoryUserStore>,
    pub messages: Arc<MemoryMessageStore>,
}

/// Build a test AppState wired to in-memory stores.
pub fn test_state() -> (AppState, TestBackend) {
    let users = Arc::new(MemoryUserStore::new());
    let messages = Arc::new(MemoryMessageStore::new());

    let config = Config {
        // Memory-backed tests never open a database pool.
        database_url: String::new(),
        jwt_access_secret: TEST_JWT_SECRET.to_string(),
        port: 0,
    };

    let state = AppState {
        config: Arc::new(config),
        users: users.clone(),
        messages: messages.clone(),
        registry: Arc::new(ConnectionRegistry::new()),
    };

    (state, TestBackend { users, messages })
}

/// Seed a user into the in-memory user store and return the record.
pub fn seed_user(backend: &TestBackend, email: &str, role: Role) -> User {
    let user = User {
        id: parley_common::id::prefixed_ulid(parley_common::id::prefix::USER),
        email: email.to_string(),
        role,
    };
    backend.users.insert(user.clone());
    user
}

/// Mint an access token the way the auth service would.
pub fn mint_test_token(user_id: &str, role: Role) -> String {
    mint_token(user_id, role, 300)
}

/// Mint an already-expired access token.
pub fn mint_expired_token(user_id: &str, role: Role) -> String {
    mint_token(user_id, role, -300)
}

fn mint_token(user_id: &str, role: Role, expires_in_secs: i64) -> String {
    let now = Utc::now();
    let claims = AccessClaims {
        sub: user_id.to_string(),
        role,
        iat: now.timestamp(),
        exp: (now + Duration::seconds(expires_in_secs)).timestamp(),
    };

    jsonwebtoken::encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(TEST_JWT_SECRET.as_bytes()),
    )
    .expect("mint test token")
}
