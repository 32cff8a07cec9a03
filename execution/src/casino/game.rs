//! Round state machine.
//!
//! A round moves `Idle -> Spinning -> [SecondReelSpinning ->] Stopped -> Idle`.
//! The second-reel phase only exists in High Risk Mode. While a round is in
//! flight every control is rejected, so exactly one wager is outstanding.

use super::history::History;
use super::reel::{card_count_for_width, generate_card_set};
use super::settle::{settle, Wager};
use super::strip::{Direction, ReelStrip};
use super::{GameError, GameRng};
use hotline_types::{CardType, Credits, Event, Mode, Outcome, Phase, Snapshot, MIN_BET};
use tracing::{debug, info};

/// A single table: one player, one reel pair.
#[derive(Clone, Debug)]
pub struct Game {
    seed: u64,
    nonce: u64,
    round: u64,
    bet: u64,
    mode: Mode,
    card_count: usize,
    first: Vec<CardType>,
    second: Option<Vec<CardType>>,
    first_strip: Option<ReelStrip>,
    second_strip: Option<ReelStrip>,
    phase: Phase,
    highlight: bool,
    win: Option<Credits>,
    wager: Option<Wager>,
    history: History,
}

impl Game {
    /// Create a table for a viewport `width` pixels wide.
    pub fn new(seed: u64, width: u32) -> Self {
        let card_count = card_count_for_width(width);
        let mut rng = GameRng::new(seed, 0);
        let first = generate_card_set(&mut rng, card_count);
        Self {
            seed,
            nonce: 0,
            round: 0,
            bet: MIN_BET,
            mode: Mode::Standard,
            card_count,
            first,
            second: None,
            first_strip: None,
            second_strip: None,
            phase: Phase::Idle,
            highlight: false,
            win: None,
            wager: None,
            history: History::default(),
        }
    }

    fn next_rng(&mut self) -> GameRng {
        self.nonce += 1;
        GameRng::new(self.seed, self.nonce)
    }

    fn ensure_idle(&self) -> Result<(), GameError> {
        if self.is_busy() {
            return Err(GameError::SpinInProgress);
        }
        Ok(())
    }

    fn expect_phase(&self, expected: Phase) -> Result<(), GameError> {
        if self.phase != expected {
            return Err(GameError::InvalidPhase {
                expected,
                found: self.phase,
            });
        }
        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.phase != Phase::Idle
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    pub fn card_count(&self) -> usize {
        self.card_count
    }

    pub fn highlight(&self) -> bool {
        self.highlight
    }

    pub fn win(&self) -> Option<Credits> {
        self.win
    }

    pub fn first(&self) -> &[CardType] {
        &self.first
    }

    pub fn second(&self) -> Option<&[CardType]> {
        self.second.as_deref()
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    /// Replace the wager.
    pub fn set_bet(&mut self, amount: u64) -> Result<u64, GameError> {
        self.ensure_idle()?;
        if amount < MIN_BET {
            return Err(GameError::InvalidBet(amount));
        }
        self.bet = amount;
        Ok(self.bet)
    }

    pub fn increase_bet(&mut self) -> Result<u64, GameError> {
        self.ensure_idle()?;
        self.bet = self.bet.saturating_add(1);
        Ok(self.bet)
    }

    pub fn decrease_bet(&mut self) -> Result<u64, GameError> {
        self.ensure_idle()?;
        self.bet = self.bet.saturating_sub(1).max(MIN_BET);
        Ok(self.bet)
    }

    /// Flip between Standard and High Risk. Entering High Risk deals a fresh
    /// second reel to display until the next spin.
    pub fn toggle_mode(&mut self) -> Result<Mode, GameError> {
        self.ensure_idle()?;
        self.mode = self.mode.toggled();
        self.second = match self.mode {
            Mode::HighRisk => {
                let mut rng = self.next_rng();
                Some(generate_card_set(&mut rng, self.card_count))
            }
            Mode::Standard => None,
        };
        debug!(mode = ?self.mode, "mode toggled");
        Ok(self.mode)
    }

    /// Resize for a new viewport. Takes effect on the next deal.
    pub fn set_viewport(&mut self, width: u32) -> usize {
        self.card_count = card_count_for_width(width);
        self.card_count
    }

    /// Deal the final reels for a new round and start them spinning.
    pub fn start_spin(&mut self, bet_type: CardType) -> Result<Event, GameError> {
        self.ensure_idle()?;
        self.round += 1;
        let mut rng = self.next_rng();
        let count = self.card_count;
        let high_risk = self.mode.is_high_risk();

        self.first = generate_card_set(&mut rng, count);
        self.second = high_risk.then(|| generate_card_set(&mut rng, count));
        self.first_strip = Some(ReelStrip::generate(&mut rng, count, Direction::Forward));
        self.second_strip =
            high_risk.then(|| ReelStrip::generate(&mut rng, count, Direction::Backward));

        self.win = None;
        self.highlight = false;
        self.phase = Phase::Spinning;
        self.wager = Some(Wager {
            round: self.round,
            mode: self.mode,
            bet_type,
            bet: self.bet,
        });
        info!(
            round = self.round,
            mode = ?self.mode,
            %bet_type,
            bet = self.bet,
            "spin started"
        );

        Ok(Event::SpinStarted {
            round: self.round,
            mode: self.mode,
            bet_type,
            bet: self.bet,
            first: self.first.clone(),
            second: self.second.clone(),
        })
    }

    /// Stop the first reel and mark centers for highlighting.
    pub fn stop_first_reel(&mut self) -> Result<Event, GameError> {
        self.expect_phase(Phase::Spinning)?;
        self.first_strip = None;
        self.highlight = true;
        self.phase = if self.second_strip.is_some() {
            Phase::SecondReelSpinning
        } else {
            Phase::Stopped
        };
        debug!(round = self.round, phase = ?self.phase, "first reel stopped");
        Ok(Event::FirstReelStopped { round: self.round })
    }

    /// Stop the delayed High Risk reel.
    pub fn stop_second_reel(&mut self) -> Result<Event, GameError> {
        self.expect_phase(Phase::SecondReelSpinning)?;
        self.second_strip = None;
        self.phase = Phase::Stopped;
        debug!(round = self.round, "second reel stopped");
        Ok(Event::SecondReelStopped { round: self.round })
    }

    /// Resolve the outstanding wager and return to idle.
    pub fn settle(&mut self) -> Result<Outcome, GameError> {
        self.expect_phase(Phase::Stopped)?;
        let wager = self.wager.take().ok_or(GameError::InvalidPhase {
            expected: Phase::Stopped,
            found: self.phase,
        })?;
        let result = settle(&wager, &self.first, self.second.as_deref());
        self.phase = Phase::Idle;
        let outcome = result?;

        self.win = Some(outcome.payout);
        self.history.push(outcome.centers);
        info!(
            round = outcome.round,
            centers = ?outcome.centers,
            payout = %outcome.payout,
            "round settled"
        );
        Ok(outcome)
    }

    /// Scroll spinning strips by `step`. Stopped reels do not move.
    pub fn tick(&mut self, step: u64) {
        if let Some(strip) = self.first_strip.as_mut() {
            strip.advance(step);
        }
        if let Some(strip) = self.second_strip.as_mut() {
            strip.advance(step);
        }
    }

    /// Cards shown on the first reel: the strip while spinning, else the deal.
    pub fn visible_first(&self) -> Vec<CardType> {
        match &self.first_strip {
            Some(strip) => strip.window(self.first.len()),
            None => self.first.clone(),
        }
    }

    /// Cards shown on the second reel, if there is one.
    pub fn visible_second(&self) -> Option<Vec<CardType>> {
        let second = self.second.as_ref()?;
        Some(match &self.second_strip {
            Some(strip) => strip.window(second.len()),
            None => second.clone(),
        })
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            round: self.round,
            bet: self.bet,
            mode: self.mode,
            phase: self.phase,
            highlight: self.highlight,
            win: self.win,
            card_count: self.card_count as u8,
            first: self.first.clone(),
            second: self.second.clone(),
            history: self.history.all(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::casino::reel::center;
    use crate::mocks::{create_game, play_round, TEST_SEED};
    use hotline_types::{HistoryEntry, Multiplier, HISTORY_LIMIT, REEL_SPEED};

    #[test]
    fn test_new_game() {
        let game = create_game();
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.mode(), Mode::Standard);
        assert_eq!(game.bet(), MIN_BET);
        assert_eq!(game.first().len(), 13);
        assert!(game.second().is_none());
        assert!(game.win().is_none());
        assert!(game.history().is_empty());

        let compact = Game::new(TEST_SEED, 400);
        assert_eq!(compact.first().len(), 9);
    }

    #[test]
    fn test_bet_controls() {
        let mut game = create_game();
        assert_eq!(game.decrease_bet(), Ok(1));
        assert_eq!(game.increase_bet(), Ok(2));
        assert_eq!(game.set_bet(50), Ok(50));
        assert_eq!(game.decrease_bet(), Ok(49));
        assert_eq!(game.set_bet(0), Err(GameError::InvalidBet(0)));
        assert_eq!(game.bet(), 49);
    }

    #[test]
    fn test_toggle_mode_deals_preview() {
        let mut game = create_game();
        assert_eq!(game.toggle_mode(), Ok(Mode::HighRisk));
        assert_eq!(game.second().map(|cards| cards.len()), Some(13));

        assert_eq!(game.toggle_mode(), Ok(Mode::Standard));
        assert!(game.second().is_none());
    }

    #[test]
    fn test_standard_sequence() {
        let mut game = create_game();
        game.set_bet(3).unwrap();

        let event = game.start_spin(CardType::Red).unwrap();
        let Event::SpinStarted {
            round,
            first,
            second,
            ..
        } = event
        else {
            panic!("expected SpinStarted");
        };
        assert_eq!(round, 1);
        assert_eq!(first, game.first());
        assert!(second.is_none());
        assert_eq!(game.phase(), Phase::Spinning);
        assert!(!game.highlight());
        assert!(game.win().is_none());

        game.stop_first_reel().unwrap();
        assert_eq!(game.phase(), Phase::Stopped);
        assert!(game.highlight());
        assert!(matches!(
            game.stop_second_reel(),
            Err(GameError::InvalidPhase { .. })
        ));

        let outcome = game.settle().unwrap();
        let center = center(&first).unwrap();
        assert_eq!(outcome.centers, HistoryEntry::Single(center));
        let expected = if center == CardType::Red {
            Credits::payout(3, Multiplier::STANDARD_COLOR)
        } else {
            Credits::ZERO
        };
        assert_eq!(outcome.payout, expected);
        assert_eq!(game.win(), Some(expected));
        assert_eq!(game.phase(), Phase::Idle);
        assert_eq!(game.history().all(), vec![HistoryEntry::Single(center)]);
    }

    #[test]
    fn test_high_risk_sequence() {
        let mut game = create_game();
        game.toggle_mode().unwrap();
        game.start_spin(CardType::Black).unwrap();
        let second = game.second().expect("high risk deals a second reel").to_vec();

        game.stop_first_reel().unwrap();
        assert_eq!(game.phase(), Phase::SecondReelSpinning);
        assert!(game.highlight());
        assert!(matches!(game.settle(), Err(GameError::InvalidPhase { .. })));

        game.stop_second_reel().unwrap();
        assert_eq!(game.phase(), Phase::Stopped);

        let outcome = game.settle().unwrap();
        let first_center = center(game.first()).unwrap();
        let second_center = center(&second).unwrap();
        assert_eq!(
            outcome.centers,
            HistoryEntry::Pair(first_center, second_center)
        );
        assert_eq!(
            outcome.is_win(),
            first_center == CardType::Black && second_center == CardType::Black
        );
    }

    #[test]
    fn test_controls_locked_while_in_flight() {
        let mut game = create_game();
        game.toggle_mode().unwrap();
        game.start_spin(CardType::Fire).unwrap();

        let assert_locked = |game: &mut Game| {
            assert_eq!(game.set_bet(5), Err(GameError::SpinInProgress));
            assert_eq!(game.increase_bet(), Err(GameError::SpinInProgress));
            assert_eq!(game.decrease_bet(), Err(GameError::SpinInProgress));
            assert_eq!(game.toggle_mode(), Err(GameError::SpinInProgress));
            assert!(matches!(
                game.start_spin(CardType::Red),
                Err(GameError::SpinInProgress)
            ));
        };
        assert_locked(&mut game);
        game.stop_first_reel().unwrap();
        assert_locked(&mut game);
        game.stop_second_reel().unwrap();
        // Locked through the second-reel delay until settlement
        assert_eq!(game.phase(), Phase::Stopped);
        assert_eq!(game.toggle_mode(), Err(GameError::SpinInProgress));

        game.settle().unwrap();
        assert_eq!(game.toggle_mode(), Ok(Mode::Standard));
    }

    #[test]
    fn test_wager_fixed_at_spin_start() {
        let mut game = create_game();
        game.set_bet(7).unwrap();
        game.start_spin(CardType::Red).unwrap();
        game.stop_first_reel().unwrap();
        let outcome = game.settle().unwrap();
        assert_eq!(outcome.bet, 7);
        assert_eq!(outcome.bet_type, CardType::Red);
        assert_eq!(outcome.mode, Mode::Standard);
    }

    #[test]
    fn test_viewport_applies_to_next_spin() {
        let mut game = create_game();
        assert_eq!(game.set_viewport(600), 9);
        assert_eq!(game.first().len(), 13);
        play_round(&mut game, CardType::Black).unwrap();
        assert_eq!(game.first().len(), 9);
    }

    #[test]
    fn test_rounds_are_replayable() {
        let mut game1 = create_game();
        let mut game2 = create_game();
        for _ in 0..5 {
            let outcome1 = play_round(&mut game1, CardType::Red).unwrap();
            let outcome2 = play_round(&mut game2, CardType::Red).unwrap();
            assert_eq!(outcome1, outcome2);
        }
        assert_eq!(game1.round(), 5);
    }

    #[test]
    fn test_history_capped() {
        let mut game = create_game();
        for _ in 0..HISTORY_LIMIT + 5 {
            play_round(&mut game, CardType::Black).unwrap();
        }
        assert_eq!(game.history().len(), HISTORY_LIMIT);
        assert_eq!(game.snapshot().history.len(), HISTORY_LIMIT);
    }

    #[test]
    fn test_strips_spin_until_reel_stops() {
        let mut game = create_game();
        game.toggle_mode().unwrap();
        game.start_spin(CardType::Red).unwrap();

        let visible = game.visible_first();
        assert_eq!(visible.len(), 13);
        assert!(visible.iter().all(|card| !card.is_fire()));

        game.tick(REEL_SPEED);
        game.stop_first_reel().unwrap();
        assert_eq!(game.visible_first(), game.first());

        // Second reel still shows its strip
        let second = game.second().unwrap().to_vec();
        game.tick(REEL_SPEED);
        assert!(game.visible_second().unwrap().iter().all(|c| !c.is_fire()));

        game.stop_second_reel().unwrap();
        assert_eq!(game.visible_second(), Some(second));
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let mut game = create_game();
        game.set_bet(4).unwrap();
        game.start_spin(CardType::Fire).unwrap();
        let snapshot = game.snapshot();
        assert_eq!(snapshot.round, 1);
        assert_eq!(snapshot.bet, 4);
        assert_eq!(snapshot.phase, Phase::Spinning);
        assert_eq!(snapshot.card_count, 13);
        assert_eq!(snapshot.first, game.first());
        assert!(snapshot.win.is_none());
    }
}
