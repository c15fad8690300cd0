//! Domain types

mod player_state;
mod track;

pub use player_state::{PlayerSnapshot, PlayerState};
pub use track::Track;
