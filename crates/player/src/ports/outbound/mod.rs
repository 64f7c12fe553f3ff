//! Outbound ports: the external systems epics talk to.

mod code_api_port;
mod error;
mod game_connection_port;

pub use code_api_port::CodeApi;
pub use error::PortError;
pub use game_connection_port::{GameConnectionPort, GameEvent};

#[cfg(test)]
pub use code_api_port::MockCodeApi;
#[cfg(test)]
pub use game_connection_port::MockGameConnectionPort;
