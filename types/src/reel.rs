use crate::MAX_CARDS;
use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, ReadRangeExt, Write};
use std::fmt;

/// A card on a reel. Also names the outcome a player bets on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CardType {
    Black = 0,
    Red = 1,
    Fire = 2,
}

impl CardType {
    pub fn is_fire(&self) -> bool {
        matches!(self, Self::Fire)
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Black => "black",
            Self::Red => "red",
            Self::Fire => "fire",
        };
        f.write_str(name)
    }
}

impl Write for CardType {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for CardType {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Black),
            1 => Ok(Self::Red),
            2 => Ok(Self::Fire),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for CardType {
    const SIZE: usize = 1;
}

/// Play mode. High Risk spins two reels and both centers must match the bet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Mode {
    #[default]
    Standard = 0,
    HighRisk = 1,
}

impl Mode {
    pub fn is_high_risk(&self) -> bool {
        matches!(self, Self::HighRisk)
    }

    pub fn toggled(&self) -> Self {
        match self {
            Self::Standard => Self::HighRisk,
            Self::HighRisk => Self::Standard,
        }
    }
}

impl Write for Mode {
    fn write(&self, writer: &mut impl BufMut) {
        (*self as u8).write(writer);
    }
}

impl Read for Mode {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let value = u8::read(reader)?;
        match value {
            0 => Ok(Self::Standard),
            1 => Ok(Self::HighRisk),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl FixedSize for Mode {
    const SIZE: usize = 1;
}

/// Reads a reel written as `Vec<CardType>`, bounded by [MAX_CARDS].
pub fn read_cards(reader: &mut impl Buf) -> Result<Vec<CardType>, Error> {
    Vec::<CardType>::read_range(reader, 0..=MAX_CARDS)
}
