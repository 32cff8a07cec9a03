//! Hotline game execution.
//!
//! - `reel`: final card layouts
//! - `strip`: filler strips shown while a reel spins
//! - `settle`: payout computation
//! - `history`: settled rounds
//! - `game`: the round state machine

pub mod game;
pub mod history;
pub mod reel;
pub mod settle;
pub mod strip;

use commonware_cryptography::sha256::Sha256;
use commonware_cryptography::Hasher;
use hotline_types::Phase;
use thiserror::Error;

/// Deterministic random number generator for a single round.
///
/// Uses SHA256 hash chains keyed by the table seed and the round number, so
/// any round can be replayed from its seed.
#[derive(Clone)]
pub struct GameRng {
    state: [u8; 32],
    index: usize,
}

impl GameRng {
    /// Create a new RNG from a table seed and round number.
    pub fn new(seed: u64, round: u64) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(&seed.to_be_bytes());
        hasher.update(&round.to_be_bytes());
        Self {
            state: hasher.finalize().0,
            index: 0,
        }
    }

    fn next_byte(&mut self) -> u8 {
        if self.index >= 32 {
            let mut hasher = Sha256::new();
            hasher.update(&self.state);
            self.state = hasher.finalize().0;
            self.index = 0;
        }
        let result = self.state[self.index];
        self.index += 1;
        result
    }

    /// Get a random u8 value.
    pub fn next_u8(&mut self) -> u8 {
        self.next_byte()
    }

    /// Get a random value in range [0, max).
    pub fn next_bounded(&mut self, max: u8) -> u8 {
        if max == 0 {
            return 0;
        }
        // Rejection sampling keeps the distribution uniform
        let limit = u8::MAX - (u8::MAX % max);
        loop {
            let value = self.next_u8();
            if value < limit {
                return value % max;
            }
        }
    }

    /// Fair coin flip.
    pub fn next_bool(&mut self) -> bool {
        self.next_u8() & 1 == 1
    }
}

/// Error during game execution.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("a spin is already in progress")]
    SpinInProgress,
    #[error("invalid bet amount: {0}")]
    InvalidBet(u64),
    #[error("invalid phase: expected {expected:?}, found {found:?}")]
    InvalidPhase { expected: Phase, found: Phase },
    #[error("high risk round is missing its second reel")]
    MissingSecondReel,
    #[error("reel has no cards")]
    EmptyReel,
    #[error("game lock poisoned")]
    Poisoned,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::TEST_SEED;

    #[test]
    fn test_game_rng_deterministic() {
        let mut rng1 = GameRng::new(TEST_SEED, 1);
        let mut rng2 = GameRng::new(TEST_SEED, 1);

        for _ in 0..100 {
            assert_eq!(rng1.next_u8(), rng2.next_u8());
        }
    }

    #[test]
    fn test_game_rng_different_rounds() {
        let mut rng1 = GameRng::new(TEST_SEED, 1);
        let mut rng2 = GameRng::new(TEST_SEED, 2);

        let seq1: Vec<u8> = (0..10).map(|_| rng1.next_u8()).collect();
        let seq2: Vec<u8> = (0..10).map(|_| rng2.next_u8()).collect();
        assert_ne!(seq1, seq2);
    }

    #[test]
    fn test_game_rng_bounded() {
        let mut rng = GameRng::new(TEST_SEED, 1);

        // Long enough to cross several rehashes
        let mut seen = [false; 13];
        for _ in 0..1000 {
            let value = rng.next_bounded(13);
            assert!(value < 13);
            seen[value as usize] = true;
        }
        assert!(seen.iter().all(|hit| *hit));
        assert_eq!(rng.next_bounded(0), 0);
    }

    #[test]
    fn test_game_rng_bool_hits_both() {
        let mut rng = GameRng::new(TEST_SEED, 3);
        let heads = (0..200).filter(|_| rng.next_bool()).count();
        assert!(heads > 0 && heads < 200);
    }
}
