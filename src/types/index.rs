//! Message and device index composites.

use alloc::vec::Vec;

use tartan_bitfield::bitfield;

use crate::{
    base::BaseType,
    codec::{Decoded, EncodeError, FieldCodec, FieldSlice, bits_to_bytes, decode_bits},
    resolution::Resolution,
    validity::DecodingStrategy,
};

bitfield! {
    struct Index(u16) {
        [0..12] index: u16,
        [12..15] reserved: u8,
        [15] selected,
    }
}

/// An index of another message in the same file, carried by `uint16` fields.
///
/// The raw value `0xFFFF` is invalid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MessageIndex {
    /// Index, between 0 and 4095.
    pub index: u16,
    /// Reserved bits, between 0 and 7.
    pub reserved: u8,
    pub selected: bool,
}

impl MessageIndex {
    pub const SELECTED: u16 = 0x8000;
    pub const RESERVED: u16 = 0x7000;
    pub const MASK: u16 = 0x0FFF;

    pub const fn new(index: u16) -> Self {
        Self {
            index,
            reserved: 0,
            selected: false,
        }
    }
}

impl FieldCodec for MessageIndex {
    fn encode(&self, base: BaseType, _: Resolution) -> Result<Vec<u8>, EncodeError> {
        if !base.is_unsigned_of(2) {
            Err(EncodeError::Incompatible { base })?;
        }

        if self.index > Self::MASK || u16::from(self.reserved) > Self::RESERVED >> 12 {
            Err(EncodeError::OutOfRange { base })?;
        }

        let bits = Index(0)
            .with_index(self.index)
            .with_reserved(self.reserved)
            .with_selected(self.selected);

        // Every field at its maximum packs to the invalid pattern.
        let bits = u64::from(bits.0);
        if !base.is_valid(bits) {
            Err(EncodeError::OutOfRange { base })?;
        }

        Ok(bits_to_bytes(bits, base))
    }

    fn decode(slice: &FieldSlice<'_>, strategy: DecodingStrategy) -> Option<Decoded<Self>> {
        let base = slice.base();

        if !base.is_unsigned_of(2) {
            return None;
        }

        decode_bits(slice, strategy, |bits| {
            let bits = Index(bits as u16);
            Some(Self {
                index: bits.index(),
                reserved: bits.reserved(),
                selected: bits.selected(),
            })
        })
    }
}

/// The device a value was recorded by, carried by `uint8` fields.
///
/// The raw value `0` is the recording device itself, and `255` is invalid.
/// Zero-invalid types cannot carry the creator, so are not accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceIndex {
    Creator,
    Peer(u8),
}

impl FieldCodec for DeviceIndex {
    fn encode(&self, base: BaseType, _: Resolution) -> Result<Vec<u8>, EncodeError> {
        if !is_device_base(base) {
            Err(EncodeError::Incompatible { base })?;
        }

        let raw = match *self {
            DeviceIndex::Creator => 0,
            DeviceIndex::Peer(n) => n,
        };

        if matches!(self, DeviceIndex::Peer(0)) || !base.is_valid(raw.into()) {
            Err(EncodeError::OutOfRange { base })?;
        }

        Ok(alloc::vec![raw])
    }

    fn decode(slice: &FieldSlice<'_>, strategy: DecodingStrategy) -> Option<Decoded<Self>> {
        if !is_device_base(slice.base()) {
            return None;
        }

        decode_bits(slice, strategy, |bits| match bits {
            0 => Some(DeviceIndex::Creator),
            n => u8::try_from(n).ok().map(DeviceIndex::Peer),
        })
    }
}

fn is_device_base(base: BaseType) -> bool {
    base.is_unsigned_of(1) && base.invalid() != 0
}
