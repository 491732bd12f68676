//! WebSocket upgrade handler and per-connection event loop.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use futures_util::stream::{SplitSink, SplitStream};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::auth::{verifier, Principal};
use crate::AppState;

use super::frames::{
    ClientFrame, PresenceEvent, ServerFrame, CLOSE_INVALID_TOKEN, CLOSE_LOOKUP_FAILED,
    CLOSE_MISSING_TOKEN, CLOSE_USER_NOT_FOUND,
};
use super::registry::RegisteredConnection;
use super::session::ChatSession;

pub fn router() -> Router<AppState> {
    Router::new().route("/ws", get(ws_upgrade))
}

#[derive(Debug, Deserialize)]
struct ConnectParams {
    token: Option<String>,
}

async fn ws_upgrade(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_connection(socket, state, params.token))
}

/// Why a handshake was rejected. Terminal for the connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HandshakeError {
    MissingToken,
    InvalidToken,
    UserNotFound,
    LookupFailed,
}

impl HandshakeError {
    fn close_code(self) -> u16 {
        match self {
            HandshakeError::MissingToken => CLOSE_MISSING_TOKEN,
            HandshakeError::InvalidToken => CLOSE_INVALID_TOKEN,
            HandshakeError::UserNotFound => CLOSE_USER_NOT_FOUND,
            HandshakeError::LookupFailed => CLOSE_LOOKUP_FAILED,
        }
    }

    fn reason(self) -> &'static str {
        match self {
            HandshakeError::MissingToken => "Missing token",
            HandshakeError::InvalidToken => "Invalid token",
            HandshakeError::UserNotFound => "User not found",
            HandshakeError::LookupFailed => "Lookup failed",
        }
    }
}

async fn handle_connection(socket: WebSocket, state: AppState, token: Option<String>) {
    let (mut ws_tx, ws_rx) = socket.split();

    let session = match authenticate(&state, token.as_deref()).await {
        Ok(session) => session,
        Err(err) => {
            tracing::debug!(reason = err.reason(), "handshake rejected");
            let _ = send_close(&mut ws_tx, err.close_code(), err.reason()).await;
            return;
        }
    };

    tracing::info!(
        connection_id = %session.connection_id,
        user_id = %session.principal.user_id,
        "chat session established"
    );

    // All outbound traffic for this connection funnels through one queue,
    // drained by the event loop below, so sends stay atomic at the frame
    // boundary.
    let (out_tx, out_rx) = mpsc::unbounded_channel::<String>();

    state.registry.add(RegisteredConnection::new(
        session.connection_id.clone(),
        session.principal.email.clone(),
        out_tx.clone(),
    ));

    // Unicast welcome, then announce the join to everyone — newcomer included.
    let _ = out_tx.send(ServerFrame::hello(&session.principal).to_json());
    state.registry.broadcast(&ServerFrame::presence(
        PresenceEvent::Join,
        &session.principal.email,
    ));

    run_session(&state, &session, ws_tx, ws_rx, out_rx, &out_tx).await;

    finish_session(&state, &session);
}

/// The one-time authentication sequence: extract the credential, verify it,
/// resolve the subject to a user record.
async fn authenticate(
    state: &AppState,
    token: Option<&str>,
) -> Result<ChatSession, HandshakeError> {
    let token = token
        .filter(|t| !t.is_empty())
        .ok_or(HandshakeError::MissingToken)?;

    let claims = verifier::verify_access_token(token, &state.config.jwt_access_secret)
        .map_err(|_| HandshakeError::InvalidToken)?;

    let user = state
        .users
        .find_by_id(&claims.sub)
        .await
        .map_err(|e| {
            tracing::error!(%e, "user lookup failed during handshake");
            HandshakeError::LookupFailed
        })?
        .ok_or(HandshakeError::UserNotFound)?;

    Ok(ChatSession::new(Principal {
        user_id: user.id,
        email: user.email,
        role: user.role,
    }))
}

/// Main session event loop: handle inbound frames in receipt order and
/// drain the outbound queue onto the socket.
async fn run_session(
    state: &AppState,
    session: &ChatSession,
    mut ws_tx: SplitSink<WebSocket, Message>,
    mut ws_rx: SplitStream<WebSocket>,
    mut out_rx: UnboundedReceiver<String>,
    out_tx: &UnboundedSender<String>,
) {
    loop {
        tokio::select! {
            // Client sends us a frame.
            msg = ws_rx.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => {
                        handle_frame(state, session, out_tx, text.as_str()).await;
                    }
                    Some(Ok(Message::Ping(_))) | Some(Ok(Message::Pong(_))) => continue,
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Err(e)) => {
                        tracing::debug!(?e, connection_id = %session.connection_id, "ws read error");
                        break;
                    }
                    _ => continue,
                }
            }

            // A queued outbound frame (unicast reply or broadcast).
            queued = out_rx.recv() => {
                match queued {
                    Some(payload) => {
                        if ws_tx.send(Message::Text(payload.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
        }
    }
}

/// Dispatch one inbound frame. Post-handshake failures never terminate the
/// connection — they degrade to a unicast error frame.
async fn handle_frame(
    state: &AppState,
    session: &ChatSession,
    out_tx: &UnboundedSender<String>,
    text: &str,
) {
    let frame: ClientFrame = match serde_json::from_str(text) {
        Ok(frame) => frame,
        Err(_) => {
            let _ = out_tx.send(ServerFrame::error("Invalid JSON").to_json());
            return;
        }
    };

    match frame {
        ClientFrame::Ping => {
            let _ = out_tx.send(ServerFrame::Pong.to_json());
        }
        ClientFrame::Message { text } => {
            handle_chat_message(state, session, out_tx, &text).await;
        }
        ClientFrame::Unknown => {
            let _ = out_tx.send(ServerFrame::error("Unknown message type").to_json());
        }
    }
}

/// Persist a chat message, then fan it out. The store write happens-before
/// the broadcast; the sender sees its own message only via the broadcast.
async fn handle_chat_message(
    state: &AppState,
    session: &ChatSession,
    out_tx: &UnboundedSender<String>,
    text: &str,
) {
    if text.trim().is_empty() {
        let _ = out_tx.send(ServerFrame::error("Message text must not be empty").to_json());
        return;
    }

    match state.messages.append(&session.principal, text).await {
        Ok(stored) => {
            state.registry.broadcast(&ServerFrame::message(&stored));
        }
        Err(e) => {
            tracing::error!(
                %e,
                connection_id = %session.connection_id,
                "failed to persist chat message"
            );
            let _ = out_tx.send(ServerFrame::error("Failed to store message").to_json());
        }
    }
}

/// Tear down a session exactly once. The registry removal gates the leave
/// broadcast, so duplicate close events cannot announce a second leave.
fn finish_session(state: &AppState, session: &ChatSession) {
    if state.registry.remove(&session.connection_id).is_some() {
        state.registry.broadcast(&ServerFrame::presence(
            PresenceEvent::Leave,
            &session.principal.email,
        ));

        tracing::info!(
            connection_id = %session.connection_id,
            user_id = %session.principal.user_id,
            "chat session ended"
        );
    }
}

/// Send a WebSocket close frame with a code and reason.
async fn send_close(
    ws_tx: &mut SplitSink<WebSocket, Message>,
    code: u16,
    reason: &str,
) -> Result<(), axum::Error> {
    let close_msg = Message::Close(Some(axum::extract::ws::CloseFrame {
        code,
        reason: reason.to_string().into(),
    }));
    ws_tx.send(close_msg).await
}
