//! Store abstractions for the external collaborators the gateway consumes.
//!
//! Backed by Postgres in production and in-memory maps in tests.

pub mod memory;
pub mod postgres;

use async_trait::async_trait;

use crate::auth::Principal;
use crate::error::StoreError;
use crate::models::chat_message::ChatMessage;
use crate::models::user::User;

/// Read access to the user records backing principal resolution.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Look up a user by id. `Ok(None)` means the user no longer exists —
    /// a legitimate runtime case (deleted after token issuance), not an error.
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError>;
}

/// Durable append-only store for chat messages.
#[async_trait]
pub trait MessageStore: Send + Sync {
    /// Persist one message and return the stored record with a
    /// server-assigned id and timestamp.
    async fn append(&self, author: &Principal, text: &str) -> Result<ChatMessage, StoreError>;
}
