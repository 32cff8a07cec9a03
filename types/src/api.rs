//! Request bodies accepted by the simulator API.

use bytes::{Buf, BufMut};
use commonware_codec::{EncodeSize, Error, FixedSize, Read, ReadExt, Write};

/// Change to the wager.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BetAction {
    /// Replace the wager. Zero is rejected.
    Set(u64),
    /// Add one unit.
    Increase,
    /// Remove one unit, never going below the minimum bet.
    Decrease,
}

impl Write for BetAction {
    fn write(&self, writer: &mut impl BufMut) {
        match self {
            Self::Set(amount) => {
                0u8.write(writer);
                amount.write(writer);
            }
            Self::Increase => 1u8.write(writer),
            Self::Decrease => 2u8.write(writer),
        }
    }
}

impl Read for BetAction {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        let kind = u8::read(reader)?;
        match kind {
            0 => Ok(Self::Set(u64::read(reader)?)),
            1 => Ok(Self::Increase),
            2 => Ok(Self::Decrease),
            i => Err(Error::InvalidEnum(i)),
        }
    }
}

impl EncodeSize for BetAction {
    fn encode_size(&self) -> usize {
        match self {
            Self::Set(amount) => 1 + amount.encode_size(),
            Self::Increase | Self::Decrease => 1,
        }
    }
}

/// Client viewport width in pixels; selects the reel length.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
}

impl Write for Viewport {
    fn write(&self, writer: &mut impl BufMut) {
        self.width.write(writer);
    }
}

impl Read for Viewport {
    type Cfg = ();

    fn read_cfg(reader: &mut impl Buf, _: &Self::Cfg) -> Result<Self, Error> {
        Ok(Self {
            width: u32::read(reader)?,
        })
    }
}

impl FixedSize for Viewport {
    const SIZE: usize = u32::SIZE;
}
