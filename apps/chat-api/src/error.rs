use thiserror::Error;

/// Failure validating an access credential during the connection handshake.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("invalid access token")]
    InvalidCredential,
}

/// Failure talking to a backing store.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("connection pool error: {0}")]
    Pool(#[from] diesel_async::pooled_connection::deadpool::PoolError),
    #[error("database error: {0}")]
    Database(#[from] diesel::result::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
}
