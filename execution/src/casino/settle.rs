//! Payout computation.
//!
//! Standard: the first reel's center must match the bet (red/black x2, fire x32).
//! High Risk: both centers must match the bet (red/black x4.125, fire x1056).

use super::reel::center;
use super::GameError;
use hotline_types::{CardType, Credits, HistoryEntry, Mode, Multiplier, Outcome};

/// A wager fixed at spin start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Wager {
    pub round: u64,
    pub mode: Mode,
    pub bet_type: CardType,
    pub bet: u64,
}

/// Resolve `wager` against the stopped reels.
pub fn settle(
    wager: &Wager,
    first: &[CardType],
    second: Option<&[CardType]>,
) -> Result<Outcome, GameError> {
    let first_center = center(first)?;
    let (centers, hit) = match wager.mode {
        Mode::Standard => (
            HistoryEntry::Single(first_center),
            first_center == wager.bet_type,
        ),
        Mode::HighRisk => {
            let second = second.ok_or(GameError::MissingSecondReel)?;
            let second_center = center(second)?;
            (
                HistoryEntry::Pair(first_center, second_center),
                first_center == wager.bet_type && second_center == wager.bet_type,
            )
        }
    };
    let payout = if hit {
        Credits::payout(wager.bet, Multiplier::for_bet(wager.mode, wager.bet_type))
    } else {
        Credits::ZERO
    };
    Ok(Outcome {
        round: wager.round,
        mode: wager.mode,
        bet_type: wager.bet_type,
        bet: wager.bet,
        centers,
        payout,
    })
}
