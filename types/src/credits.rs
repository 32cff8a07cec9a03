use crate::{CardType, Mode};
use bytes::{Buf, BufMut};
use commonware_codec::{Error, FixedSize, Read, ReadExt, Write};
use std::fmt;

/// Fixed-point scale shared by [Multiplier] and [Credits] (thousandths).
pub const SCALE: u64 = 1_000;

/// Payout multiplier in thousandths (4125 = x4.125).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Multiplier(u64);

impl Multiplier {
    pub const STANDARD_COLOR: Self = Self(2 * SCALE);
    pub const STANDARD_FIRE: Self = Self(32 * SCALE);
    pub const HIGH_RISK_COLOR: Self = Self(4_125);
    pub const HIGH_RISK_FIRE: Self = Self(1_056 * SCALE);

    /// Multiplier paid when `bet_type` hits in `mode`.
    pub fn for_bet(mode: Mode, bet_type: CardType) -> Self {
        match (mode, bet_type) {
            (Mode::Standard, CardType::Fire) => Self::STANDARD_FIRE,
            (Mode::Standard, _) => Self::STANDARD_COLOR,
            (Mode::HighRisk, CardType::Fire) => Self::HIGH_RISK_FIRE,
            (Mode::HighRisk, _) => Self::HIGH_RISK_COLOR,
        }
    }

    pub fn thousandths(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for Multiplier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / SCALE;
        let frac = self.0 % SCALE;
        if frac == 0 {
            return write!(f, "x{whole}");
        }
        let digits = format!("{frac:03}");
        write!(f, "x{whole}.{}", digits.trim_end_matches('0'))
    }
}

/// Play credits in thousandths of a unit.
///
/// Bets are whole units, so every multiplier applied to a bet is exact.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Credits(u64);

impl Credits {
    pub const ZERO: Self = Self(0);

    pub fn from_units(units: u64) -> Self {
        Self(units.saturating_mul(SCALE))
    }

    pub fn from_thousandths(thousandths: u64) -> Self {
        Self(thousandths)
    }

    pub fn thousandths(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Returns `units * multiplier`, saturating on overflow.
    pub fn payout(units: u64, multiplier: Multiplier) -> Self {
        Self(units.saturating_mul(multiplier.0))
    }
}

impl fmt::Display for Credits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / SCALE, self.0 % SCALE)
    }
}

impl Write for Credits {
    fn write(&self, writer: &mut impl BufMut) {
        self.0.write(writer);
    }
}

impl Read for Credits {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self(u64::read(reader)?))
    }
}

impl FixedSize for Credits {
    const SIZE: usize = u64::SIZE;
}
