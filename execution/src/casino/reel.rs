//! Final card layouts.
//!
//! A reel alternates black and red. One position, drawn uniformly from
//! [FIRE_SLOTS], holds the fire card and the alternation flips after it, so
//! the fire card always sits between one red and one black card.

use super::{GameError, GameRng};
use hotline_types::{CardType, COMPACT_BREAKPOINT, COMPACT_CARD_COUNT, FIRE_SLOTS, WIDE_CARD_COUNT};

/// Reel length for a viewport `width` pixels wide. Always odd.
pub fn card_count_for_width(width: u32) -> usize {
    let count = if width > COMPACT_BREAKPOINT {
        WIDE_CARD_COUNT
    } else {
        COMPACT_CARD_COUNT
    };
    if count % 2 == 0 {
        count - 1
    } else {
        count
    }
}

/// Generate a reel of `count` cards.
pub fn generate_card_set(rng: &mut GameRng, count: usize) -> Vec<CardType> {
    let fire_at = rng.next_bounded(FIRE_SLOTS) as usize;
    let mut order = [CardType::Black, CardType::Red];
    let mut cards = Vec::with_capacity(count);
    for i in 0..count {
        if i == fire_at {
            cards.push(CardType::Fire);
            order.reverse();
        } else {
            cards.push(order[i % 2]);
        }
    }
    cards
}

/// Index of the card under the pointer.
pub fn center_index(count: usize) -> usize {
    count / 2
}

/// Card under the pointer.
pub fn center(cards: &[CardType]) -> Result<CardType, GameError> {
    cards
        .get(center_index(cards.len()))
        .copied()
        .ok_or(GameError::EmptyReel)
}
