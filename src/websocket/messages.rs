//! WebSocket Message Types
//!
//! Client and server frames for the live dashboard stream.

use serde::{Deserialize, Serialize};

use crate::dashboard::DashboardSnapshot;

/// Messages sent from client to server
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Ping for keepalive
    Ping,
    /// Ask for a snapshot now instead of waiting for the next tick
    Refresh,
}

/// Messages sent from server to client
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Connection established
    Connected {
        /// Unique connection identifier
        connection_id: String,
    },
    /// Every card at one instant
    Snapshot { snapshot: DashboardSnapshot },
    /// Pong response to ping
    Pong,
    /// Error message
    Error {
        /// Error description
        message: String,
    },
}

impl ServerMessage {
    pub fn snapshot(snapshot: &DashboardSnapshot) -> Self {
        ServerMessage::Snapshot {
            snapshot: snapshot.clone(),
        }
    }
}
