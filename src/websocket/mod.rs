//! WebSocket Live Stream
//!
//! Pushes a fresh dashboard snapshot to every connected client on each tick.
//!
//! ## Protocol
//!
//! On connect the server sends `{"type":"connected","connection_id":...}`
//! followed by the latest snapshot. After that a `{"type":"snapshot",...}`
//! frame arrives once per tick. Clients may send:
//! - `{"type":"ping"}` - answered with `{"type":"pong"}`
//! - `{"type":"refresh"}` - answered with a snapshot computed immediately
//!
//! A client that falls behind skips the snapshots it missed.
//!
//! ## Example
//!
//! ```javascript
//! const ws = new WebSocket('ws://localhost:8086/ws');
//!
//! ws.onmessage = (event) => {
//!   const msg = JSON.parse(event.data);
//!   if (msg.type === 'snapshot') render(msg.snapshot.cards);
//! };
//! ```

mod handler;
mod messages;

pub use handler::{respond, websocket_handler};
pub use messages::{ClientMessage, ServerMessage};
