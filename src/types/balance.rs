//! Left/right balance composites.
//!
//! The top bit flags the percentage as the right side's contribution. Every
//! bit pattern is a value: a raw `0xFF` is a 127% right contribution, not the
//! `uint8` invalid marker.

use alloc::vec::Vec;

use tartan_bitfield::bitfield;

use crate::{
    base::BaseType,
    codec::{Decoded, EncodeError, FieldCodec, FieldSlice, bits_to_bytes},
    resolution::Resolution,
    validity::DecodingStrategy,
};

bitfield! {
    struct Balance(u8) {
        [0..7] percent: u8,
        [7] right,
    }
}

bitfield! {
    struct Balance100(u16) {
        [0..14] hundredths: u16,
        [15] right,
    }
}

/// A percentage contribution, carried by `uint8` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LeftRightBalance {
    /// Percentage, between 0 and 127.
    pub percent: u8,
    /// Whether the percentage is the right side's contribution.
    pub right: bool,
}

impl LeftRightBalance {
    pub const MASK: u8 = 0x7F;
    pub const RIGHT: u8 = 0x80;
}

impl FieldCodec for LeftRightBalance {
    fn encode(&self, base: BaseType, _: Resolution) -> Result<Vec<u8>, EncodeError> {
        if !base.is_unsigned_of(1) {
            Err(EncodeError::Incompatible { base })?;
        }

        if self.percent > Self::MASK {
            Err(EncodeError::OutOfRange { base })?;
        }

        let bits = Balance(0)
            .with_percent(self.percent)
            .with_right(self.right);

        Ok(bits_to_bytes(bits.0.into(), base))
    }

    fn decode(slice: &FieldSlice<'_>, _: DecodingStrategy) -> Option<Decoded<Self>> {
        if !slice.base().is_unsigned_of(1) {
            return None;
        }

        let bits = Balance(slice.bits()? as u8);

        Some(Decoded::Valid(Self {
            percent: bits.percent(),
            right: bits.right(),
        }))
    }
}

/// A percentage contribution in hundredths, carried by `uint16` fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct LeftRightBalance100 {
    /// Percentage in hundredths, between 0 and 16383.
    pub hundredths: u16,
    /// Whether the percentage is the right side's contribution.
    pub right: bool,
}

impl LeftRightBalance100 {
    pub const MASK: u16 = 0x3FFF;
    pub const RIGHT: u16 = 0x8000;

    pub fn percent(&self) -> f64 {
        f64::from(self.hundredths) / 100.0
    }
}

impl FieldCodec for LeftRightBalance100 {
    fn encode(&self, base: BaseType, _: Resolution) -> Result<Vec<u8>, EncodeError> {
        if !base.is_unsigned_of(2) {
            Err(EncodeError::Incompatible { base })?;
        }

        if self.hundredths > Self::MASK {
            Err(EncodeError::OutOfRange { base })?;
        }

        let bits = Balance100(0)
            .with_hundredths(self.hundredths)
            .with_right(self.right);

        Ok(bits_to_bytes(bits.0.into(), base))
    }

    fn decode(slice: &FieldSlice<'_>, _: DecodingStrategy) -> Option<Decoded<Self>> {
        if !slice.base().is_unsigned_of(2) {
            return None;
        }

        let bits = Balance100(slice.bits()? as u16);

        Some(Decoded::Valid(Self {
            hundredths: bits.hundredths(),
            right: bits.right(),
        }))
    }
}
