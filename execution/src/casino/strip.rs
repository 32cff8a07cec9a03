//! Filler strips shown while a reel spins.

use super::GameRng;
use hotline_types::{CardType, SLOT_PITCH, SPIN_STRIP_MULTIPLIER};

/// Scroll direction of a spinning reel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    /// First reel.
    Forward,
    /// Second (High Risk) reel.
    Backward,
}

/// A looping strip of red and black cards with a scroll offset.
#[derive(Clone, Debug)]
pub struct ReelStrip {
    cards: Vec<CardType>,
    direction: Direction,
    offset: u64,
}

impl ReelStrip {
    /// Build a strip for a reel showing `visible` cards. Fire never appears
    /// on a spinning strip.
    pub fn generate(rng: &mut GameRng, visible: usize, direction: Direction) -> Self {
        let cards = (0..visible * SPIN_STRIP_MULTIPLIER)
            .map(|_| {
                if rng.next_bool() {
                    CardType::Red
                } else {
                    CardType::Black
                }
            })
            .collect();
        Self {
            cards,
            direction,
            offset: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    fn span(&self) -> u64 {
        self.cards.len() as u64 * SLOT_PITCH
    }

    /// Scroll by `step` in the strip's direction, wrapping at the strip end.
    pub fn advance(&mut self, step: u64) {
        let span = self.span();
        if span == 0 {
            return;
        }
        let step = step % span;
        self.offset = match self.direction {
            Direction::Forward => (self.offset + step) % span,
            Direction::Backward => (self.offset + span - step) % span,
        };
    }

    /// Cards currently in view, left to right.
    pub fn window(&self, visible: usize) -> Vec<CardType> {
        if self.cards.is_empty() {
            return Vec::new();
        }
        let first = (self.offset / SLOT_PITCH) as usize;
        (0..visible)
            .map(|i| self.cards[(first + i) % self.cards.len()])
            .collect()
    }
}
