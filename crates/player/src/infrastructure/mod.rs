//! Adapters implementing the outbound ports.

pub mod http_client;
pub mod websocket;

pub use http_client::HttpCodeApi;
pub use websocket::WebSocketGameConnection;
