//! Shared vocabulary for the AIMMO player.
//!
//! Everything here is plain data: identifiers, the world snapshot read model
//! and the parameters needed to reach a running game. State management lives
//! in `aimmo-store`, the features in `aimmo-player`.

pub mod connection;
pub mod error;
pub mod ids;
pub mod world;

pub use connection::ConnectionParameters;
pub use error::DomainError;
pub use ids::{AvatarId, GameId};
pub use world::{AvatarView, Cell, Direction, Location, PickupKind, WorldSnapshot};
