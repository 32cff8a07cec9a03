pub mod casino;
pub mod driver;

#[cfg(any(test, feature = "mocks"))]
pub mod mocks;

pub use casino::game::Game;
pub use casino::{GameError, GameRng};
pub use driver::{run_to_settlement, spin, Schedule};
