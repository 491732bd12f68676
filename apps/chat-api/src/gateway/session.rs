//! Per-connection session state.

use parley_common::id::{prefix, prefixed_ulid};

use crate::auth::Principal;

/// State for a single authenticated WebSocket connection.
///
/// Constructed only after the handshake succeeds, so the principal is always
/// present — frame dispatch never has to consider an unauthenticated sender.
#[derive(Debug)]
pub struct ChatSession {
    /// Unique connection identifier (`conn_`-prefixed ULID).
    pub connection_id: String,
    /// The identity attached to this connection for its whole lifetime.
    pub principal: Principal,
}

impl ChatSession {
    pub fn new(principal: Principal) -> Self {
        Self {
            connection_id: prefixed_ulid(prefix::CONNECTION),
            principal,
        }
    }
}
