use std::time::Duration;

/// Cards per reel on wide viewports.
pub const WIDE_CARD_COUNT: usize = 13;

/// Cards per reel on compact viewports.
pub const COMPACT_CARD_COUNT: usize = 9;

/// Viewports wider than this (in pixels) use the wide reel.
pub const COMPACT_BREAKPOINT: u32 = 768;

/// Number of positions the fire card is drawn from.
///
/// This is independent of the reel length: on compact reels a draw at or past
/// the reel end produces a reel with no fire card.
pub const FIRE_SLOTS: u8 = 13;

/// Upper bound on cards accepted when decoding a reel.
pub const MAX_CARDS: usize = 13;

/// Minimum wager, in whole units.
pub const MIN_BET: u64 = 1;

/// Rounds retained in history.
pub const HISTORY_LIMIT: usize = 20;

/// Rounds shown in the collapsed history view.
pub const RECENT_HISTORY: usize = 10;

/// Time from spin start until the first reel stops.
pub const FIRST_STOP: Duration = Duration::from_millis(2_500);

/// Additional time the second reel keeps spinning in High Risk Mode.
pub const SECOND_STOP_DELAY: Duration = Duration::from_millis(500);

/// Filler strip length, in multiples of the visible card count.
pub const SPIN_STRIP_MULTIPLIER: usize = 15;

/// Distance between the leading edges of two adjacent cards (card 60 + gap 8).
pub const SLOT_PITCH: u64 = 68;

/// Strip offset advanced per animation frame.
pub const REEL_SPEED: u64 = 300;
