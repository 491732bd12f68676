//! Postgres-backed store implementations.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel::result::OptionalExtension;
use parley_common::id::{prefix, prefixed_ulid};

use crate::auth::Principal;
use crate::db::pool::DbPool;
use crate::db::schema::{chat_messages, users};
use crate::error::StoreError;
use crate::models::chat_message::{ChatMessage, ChatMessageRow, NewChatMessage};
use crate::models::user::{Role, User, UserRow};

use super::{MessageStore, UserStore};

pub struct PgUserStore {
    db: DbPool,
}

impl PgUserStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, user_id: &str) -> Result<Option<User>, StoreError> {
        let mut conn = self.db.get().await?;

        let row: Option<UserRow> = diesel_async::RunQueryDsl::get_result(
            users::table.find(user_id).select(UserRow::as_select()),
            &mut conn,
        )
        .await
        .optional()?;

        row.map(user_from_row).transpose()
    }
}

pub struct PgMessageStore {
    db: DbPool,
}

impl PgMessageStore {
    pub fn new(db: DbPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl MessageStore for PgMessageStore {
    async fn append(&self, author: &Principal, text: &str) -> Result<ChatMessage, StoreError> {
        let mut conn = self.db.get().await?;

        let id = prefixed_ulid(prefix::MESSAGE);
        let now = Utc::now();

        let row: ChatMessageRow = diesel_async::RunQueryDsl::get_result(
            diesel::insert_into(chat_messages::table)
                .values(NewChatMessage {
                    id: &id,
                    user_id: &author.user_id,
                    user_email: &author.email,
                    role: author.role.as_str(),
                    text,
                    created_at: now,
                })
                .returning(ChatMessageRow::as_returning()),
            &mut conn,
        )
        .await?;

        message_from_row(row)
    }
}

fn user_from_row(row: UserRow) -> Result<User, StoreError> {
    let role = Role::parse(&row.role).ok_or_else(|| {
        StoreError::CorruptRecord(format!("unknown role `{}` for user {}", row.role, row.id))
    })?;
    Ok(User {
        id: row.id,
        email: row.email,
        role,
    })
}

fn message_from_row(row: ChatMessageRow) -> Result<ChatMessage, StoreError> {
    let role = Role::parse(&row.role).ok_or_else(|| {
        StoreError::CorruptRecord(format!("unknown role `{}` on message {}", row.role, row.id))
    })?;
    Ok(ChatMessage {
        id: row.id,
        user_id: row.user_id,
        user_email: row.user_email,
        role,
        text: row.text,
        created_at: row.created_at,
    })
}
