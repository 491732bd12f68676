//! Wire-format frames exchanged over the chat WebSocket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::Principal;
use crate::models::chat_message::ChatMessage;
use crate::models::user::Role;

// ---------------------------------------------------------------------------
// Close codes (4000-range for application-level)
// ---------------------------------------------------------------------------

pub const CLOSE_LOOKUP_FAILED: u16 = 4000;
pub const CLOSE_MISSING_TOKEN: u16 = 4001;
pub const CLOSE_USER_NOT_FOUND: u16 = 4003;
pub const CLOSE_INVALID_TOKEN: u16 = 4004;

// ---------------------------------------------------------------------------
// Client → Server frames
// ---------------------------------------------------------------------------

/// A frame received from the client.
///
/// Decoding fails closed: a payload that is not JSON, or that does not match
/// a recognized shape, is a parse error. A well-formed frame with an
/// unrecognized tag lands on `Unknown` instead.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ClientFrame {
    Ping,
    Message { text: String },
    #[serde(other)]
    Unknown,
}

// ---------------------------------------------------------------------------
// Server → Client frames
// ---------------------------------------------------------------------------

/// A frame sent to a client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ServerFrame {
    Hello { data: HelloPayload },
    Pong,
    Presence { data: PresencePayload },
    Message { data: MessagePayload },
    Error { error: ErrorPayload },
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloPayload {
    pub user_email: String,
    pub role: Role,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PresenceEvent {
    Join,
    Leave,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PresencePayload {
    pub event: PresenceEvent,
    pub user_email: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MessagePayload {
    pub id: String,
    pub user_email: String,
    pub role: Role,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorPayload {
    pub message: String,
}

impl ServerFrame {
    /// Build the unicast welcome frame sent right after the handshake.
    pub fn hello(principal: &Principal) -> Self {
        Self::Hello {
            data: HelloPayload {
                user_email: principal.email.clone(),
                role: principal.role,
            },
        }
    }

    /// Build a presence join/leave notification.
    pub fn presence(event: PresenceEvent, user_email: &str) -> Self {
        Self::Presence {
            data: PresencePayload {
                event,
                user_email: user_email.to_string(),
            },
        }
    }

    /// Build the broadcast frame for a stored message.
    pub fn message(message: &ChatMessage) -> Self {
        Self::Message {
            data: MessagePayload {
                id: message.id.clone(),
                user_email: message.user_email.clone(),
                role: message.role,
                text: message.text.clone(),
                created_at: message.created_at,
            },
        }
    }

    /// Build a unicast error report.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            error: ErrorPayload {
                message: message.into(),
            },
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap()
    }
}
