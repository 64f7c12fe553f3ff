//! WebSocket adapter for the game connection port.

mod client;
mod protocol;

pub use client::WebSocketGameConnection;
pub use protocol::parse_game_event;
