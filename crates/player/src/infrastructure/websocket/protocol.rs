//! Wire format of the game feed.
//!
//! Every text frame carries one JSON [`GameEvent`]. Other frame kinds carry
//! nothing the player needs.

use crate::ports::outbound::GameEvent;

pub fn parse_game_event(text: &str) -> Result<GameEvent, serde_json::Error> {
    serde_json::from_str(text)
}
