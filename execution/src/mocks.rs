use crate::casino::game::Game;
use crate::casino::GameError;
use hotline_types::{CardType, Outcome};

/// Seed shared by tests so rounds are reproducible.
pub const TEST_SEED: u64 = 0x686f_746c_696e_65;

/// Viewport wide enough for full-length reels.
pub const WIDE_VIEWPORT: u32 = 1_860;

/// Creates a table with wide reels.
pub fn create_game() -> Game {
    Game::new(TEST_SEED, WIDE_VIEWPORT)
}

/// Plays a round to settlement without waiting on a clock.
pub fn play_round(game: &mut Game, bet_type: CardType) -> Result<Outcome, GameError> {
    game.start_spin(bet_type)?;
    game.stop_first_reel()?;
    if game.mode().is_high_risk() {
        game.stop_second_reel()?;
    }
    game.settle()
}
