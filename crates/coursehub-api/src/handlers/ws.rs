//! WebSocket upgrade handler for invalidation subscriptions.
//!
//! Clients connect with their access token and receive every event on
//! their user channel; passing a `course_id` additionally subscribes to
//! the (user, course) access channel. The stream is notification-only:
//! inbound frames other than close/ping are ignored.

use axum::extract::ws::{Message, WebSocket};
use axum::extract::{Query, State, WebSocketUpgrade};
use axum::response::Response;
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Query parameters for the WebSocket upgrade.
#[derive(Debug, Deserialize)]
pub struct WsQuery {
    /// JWT access token.
    pub token: String,
    /// Optional course whose access channel to watch as well.
    pub course_id: Option<Uuid>,
}

/// GET /ws?token={jwt}&course_id={uuid}
pub async fn ws_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
    Query(query): Query<WsQuery>,
) -> Result<Response, ApiError> {
    // Authenticate before upgrading.
    let claims = state.jwt_decoder.decode_access_token(&query.token)?;
    let user_id = claims.sub;

    Ok(ws.on_upgrade(move |socket| handle_connection(state, socket, user_id, query.course_id)))
}

async fn handle_connection(
    state: AppState,
    socket: WebSocket,
    user_id: Uuid,
    course_id: Option<Uuid>,
) {
    let (mut ws_tx, mut ws_rx) = socket.split();

    let mut user_rx = state.hub.subscribe_user(user_id).await;
    let mut access_rx = match course_id {
        Some(course_id) => Some(state.hub.subscribe_access(user_id, course_id).await),
        None => None,
    };

    info!(%user_id, ?course_id, "WebSocket connection established");

    loop {
        tokio::select! {
            event = user_rx.recv() => {
                match event {
                    Ok(msg) => {
                        if forward(&mut ws_tx, &msg).await.is_err() {
                            break;
                        }
                    }
                    // Lagged subscribers skip ahead; the client re-reads.
                    Err(RecvError::Lagged(skipped)) => {
                        warn!(%user_id, skipped, "WebSocket subscriber lagged");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
            event = recv_access(&mut access_rx) => {
                match event {
                    Some(Ok(msg)) => {
                        if forward(&mut ws_tx, &msg).await.is_err() {
                            break;
                        }
                    }
                    Some(Err(RecvError::Lagged(skipped))) => {
                        warn!(%user_id, skipped, "WebSocket subscriber lagged");
                    }
                    Some(Err(RecvError::Closed)) | None => break,
                }
            }
            frame = ws_rx.next() => {
                match frame {
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        warn!(%user_id, error = %e, "WebSocket error");
                        break;
                    }
                }
            }
        }
    }

    info!(%user_id, "WebSocket connection closed");
}

async fn recv_access(
    rx: &mut Option<tokio::sync::broadcast::Receiver<coursehub_realtime::OutboundMessage>>,
) -> Option<Result<coursehub_realtime::OutboundMessage, RecvError>> {
    match rx {
        Some(rx) => Some(rx.recv().await),
        None => std::future::pending().await,
    }
}

async fn forward(
    ws_tx: &mut (impl SinkExt<Message> + Unpin),
    msg: &coursehub_realtime::OutboundMessage,
) -> Result<(), ()> {
    let text = serde_json::to_string(msg).map_err(|_| ())?;
    ws_tx.send(Message::Text(text.into())).await.map_err(|_| ())
}
