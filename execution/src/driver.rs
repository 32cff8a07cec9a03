//! Timing sequence for a round.
//!
//! Standard: both stop and settlement happen `first_stop` after the spin starts.
//! High Risk: the first reel stops at `first_stop`, the second keeps spinning
//! for `second_stop_delay`, and settlement follows the second stop.

use crate::casino::game::Game;
use crate::casino::GameError;
use commonware_runtime::Clock;
use hotline_types::{CardType, Event, Mode, Outcome, Phase, FIRST_STOP, SECOND_STOP_DELAY};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, SystemTime};
use tracing::debug;

/// Reel stop delays.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Schedule {
    pub first_stop: Duration,
    pub second_stop_delay: Duration,
}

impl Default for Schedule {
    fn default() -> Self {
        Self {
            first_stop: FIRST_STOP,
            second_stop_delay: SECOND_STOP_DELAY,
        }
    }
}

impl Schedule {
    /// Time from spin start to settlement.
    pub fn settle_after(&self, mode: Mode) -> Duration {
        match mode {
            Mode::Standard => self.first_stop,
            Mode::HighRisk => self.first_stop + self.second_stop_delay,
        }
    }
}

fn lock(game: &Mutex<Game>) -> Result<MutexGuard<'_, Game>, GameError> {
    game.lock().map_err(|_| GameError::Poisoned)
}

/// Play out a round that has already been started, emitting each transition.
///
/// Stops are measured from `started_at`, the instant the round was started,
/// so a late first poll does not push them back. The game lock is only held
/// between sleeps.
pub async fn run_to_settlement<E, F>(
    context: &E,
    game: &Mutex<Game>,
    schedule: &Schedule,
    started_at: SystemTime,
    mut emit: F,
) -> Result<Outcome, GameError>
where
    E: Clock,
    F: FnMut(Event) + Send,
{
    context
        .sleep_until(started_at + schedule.first_stop)
        .await;
    let (event, second_pending) = {
        let mut game = lock(game)?;
        let event = game.stop_first_reel()?;
        (event, game.phase() == Phase::SecondReelSpinning)
    };
    emit(event);

    if second_pending {
        context
            .sleep_until(started_at + schedule.settle_after(Mode::HighRisk))
            .await;
        let event = lock(game)?.stop_second_reel()?;
        emit(event);
    }

    let outcome = lock(game)?.settle()?;
    debug!(round = outcome.round, "emitting settlement");
    emit(Event::Settled(outcome.clone()));
    Ok(outcome)
}

/// Start a round and play it out.
pub async fn spin<E, F>(
    context: &E,
    game: &Mutex<Game>,
    schedule: &Schedule,
    bet_type: CardType,
    mut emit: F,
) -> Result<Outcome, GameError>
where
    E: Clock,
    F: FnMut(Event) + Send,
{
    let started = lock(game)?.start_spin(bet_type)?;
    let started_at = context.current();
    emit(started);
    run_to_settlement(context, game, schedule, started_at, emit).await
}
