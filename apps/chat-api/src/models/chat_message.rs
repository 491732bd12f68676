use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::db::schema::chat_messages;
use crate::models::user::Role;

/// A durably stored chat message.
///
/// `id` and `created_at` are assigned by the message store at write time;
/// callers never supply them.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Queryable, Selectable)]
#[diesel(table_name = chat_messages)]
pub struct ChatMessageRow {
    pub id: String,
    pub user_id: String,
    pub user_email: String,
    pub role: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = chat_messages)]
pub struct NewChatMessage<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub user_email: &'a str,
    pub role: &'a str,
    pub text: &'a str,
    pub created_at: DateTime<Utc>,
}
