use crate::{read_cards, CardType, Credits, Mode, HISTORY_LIMIT};
use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, ReadRangeExt, Write};

/// Center card(s) recorded for a finished round.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HistoryEntry {
    /// Standard round: center of the only reel.
    Single(CardType),
    /// High Risk round: centers of the first and second reel.
    Pair(CardType, CardType),
}

impl HistoryEntry {
    pub fn first(&self) -> CardType {
        match self {
            Self::Single(card) | Self::Pair(card, _) => *card,
        }
    }

    pub fn second(&self) -> Option<CardType> {
        match self {
            Self::Single(_) => None,
            Self::Pair(_, card) => Some(*card),
        }
    }
}

impl Write for HistoryEntry {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Single(card) => {
                0u8.write(writer);
                card.write(writer);
            }
            Self::Pair(first, second) => {
                1u8.write(writer);
                first.write(writer);
                second.write(writer);
            }
        }
    }
}

impl Read for HistoryEntry {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        match kind {
            0 => Ok(Self::Single(CardType::read(reader)?)),
            1 => Ok(Self::Pair(CardType::read(reader)?, CardType::read(reader)?)),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl EncodeSize for HistoryEntry {
    fn encode_size(&self) -> usize {
        match self {
            Self::Single(_) => 1 + CardType::SIZE,
            Self::Pair(_, _) => 1 + 2 * CardType::SIZE,
        }
    }
}

/// Settlement of a single round.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Outcome {
    pub round: u64,
    pub mode: Mode,
    pub bet_type: CardType,
    /// Wager in whole units, captured when the spin started.
    pub bet: u64,
    pub centers: HistoryEntry,
    pub payout: Credits,
}

impl Outcome {
    pub fn is_win(&self) -> bool {
        !self.payout.is_zero()
    }
}

impl Write for Outcome {
    fn write(&self, writer: &mut impl BufMut) {
        self.round.write(writer);
        self.mode.write(writer);
        self.bet_type.write(writer);
        self.bet.write(writer);
        self.centers.write(writer);
        self.payout.write(writer);
    }
}

impl Read for Outcome {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            round: u64::read(reader)?,
            mode: Mode::read(reader)?,
            bet_type: CardType::read(reader)?,
            bet: u64::read(reader)?,
            centers: HistoryEntry::read(reader)?,
            payout: Credits::read(reader)?,
        })
    }
}

impl EncodeSize for Outcome {
    fn encode_size(&self) -> usize {
        self.round.encode_size()
            + self.mode.encode_size()
            + self.bet_type.encode_size()
            + self.bet.encode_size()
            + self.centers.encode_size()
            + self.payout.encode_size()
    }
}

/// Where the current round is in its stop sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Phase {
    /// No spin in flight.
    #[default]
    Idle = 0,
    /// All reels spinning.
    Spinning = 1,
    /// First reel stopped; the second (High Risk) reel is still spinning.
    SecondReelSpinning = 2,
    /// Every reel stopped, awaiting settlement.
    Stopped = 3,
}

impl Write for Phase {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Phase {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Idle),
            1 => Ok(Self::Spinning),
            2 => Ok(Self::SecondReelSpinning),
            3 => Ok(Self::Stopped),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for Phase {
    const SIZE: usize = 1;
}

fn write_optional_cards(cards: &Option<Vec<CardType>>, writer: &mut impl BufMut) {
    match cards {
        Some(cards) => {
            true.write(writer);
            cards.write(writer);
        }
        None => false.write(writer),
    }
}

fn read_optional_cards(reader: &mut impl Buf) -> Result<Option<Vec<CardType>>, Error> {
    if bool::read(reader)? {
        Ok(Some(read_cards(reader)?))
    } else {
        Ok(None)
    }
}

fn optional_cards_size(cards: &Option<Vec<CardType>>) -> usize {
    1 + cards.as_ref().map_or(0, |cards| cards.encode_size())
}

/// Progress notifications emitted while a round plays out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    SpinStarted {
        round: u64,
        mode: Mode,
        bet_type: CardType,
        bet: u64,
        /// Final layout of the first reel.
        first: Vec<CardType>,
        /// Final layout of the second reel (High Risk only).
        second: Option<Vec<CardType>>,
    },
    FirstReelStopped {
        round: u64,
    },
    SecondReelStopped {
        round: u64,
    },
    Settled(Outcome),
}

impl Event {
    pub fn round(&self) -> u64 {
        match self {
            Self::SpinStarted { round, .. }
            | Self::FirstReelStopped { round }
            | Self::SecondReelStopped { round } => *round,
            Self::Settled(outcome) => outcome.round,
        }
    }
}

impl Write for Event {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::SpinStarted {
                round,
                mode,
                bet_type,
                bet,
                first,
                second,
            } => {
                0u8.write(writer);
                round.write(writer);
                mode.write(writer);
                bet_type.write(writer);
                bet.write(writer);
                first.write(writer);
                write_optional_cards(second, writer);
            }
            Self::FirstReelStopped { round } => {
                1u8.write(writer);
                round.write(writer);
            }
            Self::SecondReelStopped { round } => {
                2u8.write(writer);
                round.write(writer);
            }
            Self::Settled(outcome) => {
                3u8.write(writer);
                outcome.write(writer);
            }
        }
    }
}

impl Read for Event {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        match kind {
            0 => Ok(Self::SpinStarted {
                round: u64::read(reader)?,
                mode: Mode::read(reader)?,
                bet_type: CardType::read(reader)?,
                bet: u64::read(reader)?,
                first: read_cards(reader)?,
                second: read_optional_cards(reader)?,
            }),
            1 => Ok(Self::FirstReelStopped {
                round: u64::read(reader)?,
            }),
            2 => Ok(Self::SecondReelStopped {
                round: u64::read(reader)?,
            }),
            3 => Ok(Self::Settled(Outcome::read(reader)?)),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl EncodeSize for Event {
    fn encode_size(&self) -> usize {
        1 + match self {
            Self::SpinStarted {
                round,
                mode,
                bet_type,
                bet,
                first,
                second,
            } => {
                round.encode_size()
                    + mode.encode_size()
                    + bet_type.encode_size()
                    + bet.encode_size()
                    + first.encode_size()
                    + optional_cards_size(second)
            }
            Self::FirstReelStopped { round } | Self::SecondReelStopped { round } => {
                round.encode_size()
            }
            Self::Settled(outcome) => outcome.encode_size(),
        }
    }
}

/// Everything a client needs to render the table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    /// Last round started (0 before the first spin).
    pub round: u64,
    pub bet: u64,
    pub mode: Mode,
    pub phase: Phase,
    /// Whether stopped reels should mark their center card.
    pub highlight: bool,
    /// Payout of the last settled round; `None` before the first spin and
    /// while a spin is in flight.
    pub win: Option<Credits>,
    pub card_count: u8,
    pub first: Vec<CardType>,
    pub second: Option<Vec<CardType>>,
    /// Newest first.
    pub history: Vec<HistoryEntry>,
}

impl Write for Snapshot {
    fn write(&self, writer: &mut impl BufMut) {
        self.round.write(writer);
        self.bet.write(writer);
        self.mode.write(writer);
        self.phase.write(writer);
        self.highlight.write(writer);
        self.win.write(writer);
        self.card_count.write(writer);
        self.first.write(writer);
        write_optional_cards(&self.second, writer);
        self.history.write(writer);
    }
}

impl Read for Snapshot {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            round: u64::read(reader)?,
            bet: u64::read(reader)?,
            mode: Mode::read(reader)?,
            phase: Phase::read(reader)?,
            highlight: bool::read(reader)?,
            win: Option::<Credits>::read(reader)?,
            card_count: u8::read(reader)?,
            first: read_cards(reader)?,
            second: read_optional_cards(reader)?,
            history: Vec::<HistoryEntry>::read_range(reader, 0..=HISTORY_LIMIT)?,
        })
    }
}

impl EncodeSize for Snapshot {
    fn encode_size(&self) -> usize {
        self.round.encode_size()
            + self.bet.encode_size()
            + self.mode.encode_size()
            + self.phase.encode_size()
            + self.highlight.encode_size()
            + self.win.encode_size()
            + self.card_count.encode_size()
            + self.first.encode_size()
            + optional_cards_size(&self.second)
            + self.history.encode_size()
    }
}
