pub mod verifier;

use crate::models::user::Role;

/// The authenticated identity attached to a connection after the handshake.
///
/// Immutable for the connection's lifetime; never persisted by the gateway.
#[derive(Debug, Clone)]
pub struct Principal {
    pub user_id: String,
    pub email: String,
    pub role: Role,
}
