//! Access-token validation for the WebSocket handshake.

use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::AuthError;
use crate::models::user::Role;

/// Claims carried by an access token minted by the auth service.
#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject — the user's prefixed ULID.
    pub sub: String,
    /// Role snapshot at issuance time. The resolved user record stays
    /// authoritative; the claim only scopes what the token was minted for.
    pub role: Role,
    /// Issued-at (unix timestamp).
    pub iat: i64,
    /// Expiration (unix timestamp).
    pub exp: i64,
}

/// Validate an access token and return its claims.
///
/// Checks the HMAC signature against the process-wide shared secret and the
/// `exp` claim (jsonwebtoken handles both). Anything malformed, forged, or
/// expired collapses into `InvalidCredential` — the caller closes the
/// connection either way.
pub fn verify_access_token(token: &str, secret: &str) -> Result<AccessClaims, AuthError> {
    let key = DecodingKey::from_secret(secret.as_bytes());
    let validation = Validation::new(Algorithm::HS256);

    let token_data = jsonwebtoken::decode::<AccessClaims>(token, &key, &validation).map_err(|e| {
        tracing::debug!(?e, "access token validation failed");
        AuthError::InvalidCredential
    })?;

    Ok(token_data.claims)
}
