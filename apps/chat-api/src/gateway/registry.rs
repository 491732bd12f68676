//! Registry of authenticated connections for presence tracking and fan-out.

use dashmap::DashMap;
use tokio::sync::mpsc::UnboundedSender;

use super::frames::ServerFrame;

/// A live, authenticated connection as seen by the registry.
///
/// Holds a handle to the connection's outbound queue, not the socket itself;
/// the connection task owns the transport and drains the queue, so every
/// queued payload goes out as one whole frame.
#[derive(Debug, Clone)]
pub struct RegisteredConnection {
    pub connection_id: String,
    pub user_email: String,
    outbound: UnboundedSender<String>,
}

impl RegisteredConnection {
    pub fn new(
        connection_id: String,
        user_email: String,
        outbound: UnboundedSender<String>,
    ) -> Self {
        Self {
            connection_id,
            user_email,
            outbound,
        }
    }

    /// Queue a serialized frame. A send to a since-closed connection is
    /// silently dropped.
    pub fn send_raw(&self, payload: String) {
        let _ = self.outbound.send(payload);
    }
}

/// Shared set of currently-authenticated connections.
///
/// Uses `DashMap` so concurrent add/remove from different connection tasks
/// never lose updates, and snapshots are never torn.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: DashMap<String, RegisteredConnection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection after its handshake completes.
    pub fn add(&self, connection: RegisteredConnection) {
        self.connections
            .insert(connection.connection_id.clone(), connection);
    }

    /// Remove a connection. Returns the entry if it was still registered,
    /// which makes duplicate removal a no-op and lets the caller gate
    /// leave notifications on the first removal only.
    pub fn remove(&self, connection_id: &str) -> Option<RegisteredConnection> {
        self.connections
            .remove(connection_id)
            .map(|(_, connection)| connection)
    }

    /// Point-in-time view of the membership set.
    pub fn snapshot(&self) -> Vec<RegisteredConnection> {
        self.connections
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Serialize once, deliver to every registered connection. A closed
    /// peer never aborts delivery to the rest.
    pub fn broadcast(&self, frame: &ServerFrame) {
        let payload = frame.to_json();
        for connection in self.snapshot() {
            connection.send_raw(payload.clone());
        }
    }
}
