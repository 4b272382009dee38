//! Playback state machine and the drivers that feed it time.

mod controller;
mod player;

pub use controller::*;
pub use player::*;
