//! In-memory store implementations for tests and local development.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use parley_common::id::{prefix, prefixed_ulid};

use crate::auth::Principal;
use crate::error::StoreError;
use crate::models::chat_message::ChatMessage;
use crate::models::user::User;

use super::{MessageStore, UserStore};

#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<String, User>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, user: User) {
        self.users.lock().insert(user.id.clone(), user);
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        Ok(self.users.lock().get(user_id).cloned())
    }
}

#[derive(Default)]
pub struct MemoryMessageStore {
    messages: Mutex<Vec<ChatMessage>>,
}

impl MemoryMessageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything appended so far, in append order.
    pub fn all(&self) -> Vec<ChatMessage> {
        self.messages.lock().clone()
    }
}

#[async_trait]
impl MessageStore for MemoryMessageStore {
    async fn append(&self, author: &Principal, text: &str) -> Result<ChatMessage, StoreError> {
        let message = ChatMessage {
            id: prefixed_ulid(prefix::MESSAGE),
            user_id: author.user_id.clone(),
            user_email: author.email.clone(),
            role: author.role,
            text: text.to_string(),
            created_at: Utc::now(),
        };
        self.messages.lock().push(message.clone());
        Ok(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::user::Role;

    fn principal() -> Principal {
        Principal {
            user_id: "usr_test".to_string(),
            email: "test@example.com".to_string(),
            role: Role::Customer,
        }
    }

    #[tokio::test]
    async fn append_assigns_id_and_timestamp() {
        let store = MemoryMessageStore::new();
        let stored = store.append(&principal(), "hello").await.unwrap();

        assert!(stored.id.starts_with("msg_"));
        assert_eq!(stored.text, "hello");
        assert_eq!(stored.user_email, "test@example.com");
        assert_eq!(store.all().len(), 1);
    }

    #[tokio::test]
    async fn find_by_id_misses_unknown_user() {
        let store = MemoryUserStore::new();
        store.insert(User {
            id: "usr_a".to_string(),
            email: "a@example.com".to_string(),
            role: Role::Admin,
        });

        assert!(store.find_by_id("usr_a").await.unwrap().is_some());
        assert!(store.find_by_id("usr_b").await.unwrap().is_none());
    }
}
