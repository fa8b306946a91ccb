//! WebSocket Handler
//!
//! Upgrades the connection, then forwards every snapshot the ticker
//! publishes until either side goes away.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{stream::SplitSink, SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

use super::messages::{ClientMessage, ServerMessage};
use crate::api::AppState;
use crate::ticker::Ticker;

/// WebSocket upgrade handler
pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> Response {
    let ticker = Arc::clone(&state.ticker);
    ws.on_upgrade(move |socket| handle_socket(socket, ticker))
}

/// Reply to a client frame
pub fn respond(ticker: &Ticker, message: ClientMessage) -> ServerMessage {
    match message {
        ClientMessage::Ping => ServerMessage::Pong,
        ClientMessage::Refresh => {
            let snapshot = ticker.dashboard().snapshot(ticker.clock().now());
            ServerMessage::Snapshot { snapshot }
        }
    }
}

async fn send_message(
    sender: &mut SplitSink<WebSocket, Message>,
    message: &ServerMessage,
) -> bool {
    let text = match serde_json::to_string(message) {
        Ok(text) => text,
        Err(e) => {
            tracing::error!(error = %e, "Failed to serialize message");
            return true;
        }
    };
    sender.send(Message::Text(text)).await.is_ok()
}

/// Handle an established WebSocket connection
async fn handle_socket(socket: WebSocket, ticker: Arc<Ticker>) {
    let (mut sender, mut receiver) = socket.split();
    let connection_id = uuid::Uuid::new_v4().to_string();

    // Subscribe before the first send so no tick falls in between
    let mut snapshots = ticker.subscribe();

    let connected = ServerMessage::Connected {
        connection_id: connection_id.clone(),
    };
    if !send_message(&mut sender, &connected).await {
        tracing::debug!(connection_id = %connection_id, "Client left before handshake");
        return;
    }

    let initial = match ticker.latest().await {
        Some(snapshot) => ServerMessage::snapshot(&snapshot),
        None => respond(&ticker, ClientMessage::Refresh),
    };
    if !send_message(&mut sender, &initial).await {
        return;
    }

    tracing::info!(connection_id = %connection_id, "WebSocket client connected");

    // Replies to client frames
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    let conn_id_for_send = connection_id.clone();
    let mut send_task = tokio::spawn(async move {
        loop {
            let message = tokio::select! {
                reply = rx.recv() => match reply {
                    Some(reply) => reply,
                    None => break,
                },
                published = snapshots.recv() => match published {
                    Ok(snapshot) => ServerMessage::snapshot(&snapshot),
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::debug!(
                            connection_id = %conn_id_for_send,
                            skipped,
                            "Client lagging, skipped snapshots"
                        );
                        continue;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                },
            };

            if !send_message(&mut sender, &message).await {
                tracing::debug!(
                    connection_id = %conn_id_for_send,
                    "WebSocket send failed, closing connection"
                );
                break;
            }
        }
    });

    let ticker_for_recv = Arc::clone(&ticker);
    let conn_id_for_recv = connection_id.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            let message = match result {
                Ok(message) => message,
                Err(e) => {
                    tracing::debug!(
                        connection_id = %conn_id_for_recv,
                        error = %e,
                        "WebSocket receive error"
                    );
                    break;
                }
            };

            let reply = match message {
                Message::Text(text) => match serde_json::from_str::<ClientMessage>(&text) {
                    Ok(client_msg) => respond(&ticker_for_recv, client_msg),
                    Err(e) => ServerMessage::Error {
                        message: format!("Invalid message format: {}", e),
                    },
                },
                Message::Binary(_) => ServerMessage::Error {
                    message: "Binary messages not supported".to_string(),
                },
                // Axum answers pings itself
                Message::Ping(_) | Message::Pong(_) => continue,
                Message::Close(_) => {
                    tracing::debug!(connection_id = %conn_id_for_recv, "Client requested close");
                    break;
                }
            };

            if tx.send(reply).is_err() {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => {
            recv_task.abort();
        }
        _ = &mut recv_task => {
            send_task.abort();
        }
    }

    tracing::info!(connection_id = %connection_id, "WebSocket client disconnected");
}
