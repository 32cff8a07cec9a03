//! Common types shared by the hotline engine and its simulator.

pub mod api;
mod constants;
mod credits;
mod reel;
mod round;

pub use constants::*;
pub use credits::{Credits, Multiplier, SCALE};
pub use reel::{read_cards, CardType, Mode};
pub use round::{Event, HistoryEntry, Outcome, Phase, Snapshot};
