//! The contract between domain types and the wire.
//!
//! Every value crossing the byte boundary implements [`FieldCodec`]: it
//! encodes itself into the bytes of a declared base type, and decodes itself
//! from a [`FieldSlice`] carrying the field's bytes, base type, resolution and
//! byte order. Decoding runs in a fixed order:
//!
//! 1. Correct the byte order of multi-byte base types.
//! 2. Reinterpret the bytes as raw bits of the base type's width.
//! 3. Classify the bits against the invalid pattern (see
//!    [`crate::validity`]).
//! 4. Apply the resolution, for scaled numeric targets only.
//! 5. Narrow the result into the target type, which may reject raw values it
//!    has no representation for.
//!
//! Implementations are provided for Rust's integer and floating point
//! primitives, [`bool`], [`String`], arrays as [`Vec<T>`], raw bits as
//! [`Raw`], and the schema-less [`value::Value`]. Integer targets receive raw
//! values; only `f32`, `f64` and [`value::Value`] apply a field's resolution.

pub mod value;

use alloc::{string::String, vec::Vec};

use thiserror::Error;

use crate::{
    base::BaseType,
    resolution::Resolution,
    validity::{DecodingStrategy, Outcome, classify},
};

/// Byte order of multi-byte values in a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

impl Endianness {
    /// Byte order from the architecture byte of a definition record.
    pub const fn from_architecture(architecture: u8) -> Self {
        if architecture == 0 {
            Endianness::Little
        } else {
            Endianness::Big
        }
    }

    pub const fn architecture(self) -> u8 {
        match self {
            Endianness::Little => 0,
            Endianness::Big => 1,
        }
    }

    /// Swap each value of `base` in `bytes` between little-endian and this
    /// byte order. Single-byte types are left untouched.
    pub fn apply(self, base: BaseType, bytes: &mut [u8]) {
        if self == Endianness::Big && base.is_multi_byte() {
            for value in bytes.chunks_exact_mut(base.width()) {
                value.reverse();
            }
        }
    }
}

/// The inputs to decoding a single field.
///
/// Constructed per field per message, and consumed immediately.
#[derive(Debug, Clone, Copy)]
pub struct FieldSlice<'a> {
    bytes: &'a [u8],
    base: BaseType,
    resolution: Resolution,
    endianness: Endianness,
}

impl<'a> FieldSlice<'a> {
    /// A little-endian slice of `base` values, without resolution.
    pub const fn new(bytes: &'a [u8], base: BaseType) -> Self {
        Self {
            bytes,
            base,
            resolution: Resolution::IDENTITY,
            endianness: Endianness::Little,
        }
    }

    pub const fn with_resolution(self, resolution: Resolution) -> Self {
        Self { resolution, ..self }
    }

    pub const fn with_endianness(self, endianness: Endianness) -> Self {
        Self { endianness, ..self }
    }

    pub const fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    pub const fn base(&self) -> BaseType {
        self.base
    }

    pub const fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub const fn endianness(&self) -> Endianness {
        self.endianness
    }

    /// Whether the slice is empty, or not a whole number of values.
    pub const fn is_malformed(&self) -> bool {
        self.bytes.is_empty() || self.bytes.len() % self.base.width() != 0
    }

    /// The number of whole values in the slice.
    pub const fn count(&self) -> usize {
        self.bytes.len() / self.base.width()
    }

    /// Slices of each value in the slice.
    pub fn elements(&self) -> impl Iterator<Item = FieldSlice<'a>> {
        let Self {
            base,
            resolution,
            endianness,
            ..
        } = *self;

        self.bytes
            .chunks_exact(base.width())
            .map(move |bytes| Self {
                bytes,
                base,
                resolution,
                endianness,
            })
    }

    /// The raw bits of a slice holding exactly one value, in native order.
    pub fn bits(&self) -> Option<u64> {
        let width = self.base.width();

        if self.bytes.len() != width {
            return None;
        }

        let mut bits = [0; 8];
        bits[..width].copy_from_slice(self.bytes);

        if self.endianness == Endianness::Big {
            bits[..width].reverse();
        }

        Some(u64::from_le_bytes(bits))
    }
}

/// A decoded value, flagged by whether the field held valid data.
///
/// [`Decoded::Sentinel`] is only produced under
/// [`DecodingStrategy::SubstituteSentinel`], and holds the target's
/// representation of its base type's invalid pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoded<T> {
    Valid(T),
    Sentinel(T),
}

impl<T> Decoded<T> {
    pub const fn is_valid(&self) -> bool {
        matches!(self, Decoded::Valid(_))
    }

    /// The value, if valid.
    pub fn valid(self) -> Option<T> {
        match self {
            Decoded::Valid(value) => Some(value),
            Decoded::Sentinel(_) => None,
        }
    }

    /// The value, discarding its validity.
    pub fn into_inner(self) -> T {
        match self {
            Decoded::Valid(value) | Decoded::Sentinel(value) => value,
        }
    }

    pub const fn as_ref(&self) -> Decoded<&T> {
        match self {
            Decoded::Valid(value) => Decoded::Valid(value),
            Decoded::Sentinel(value) => Decoded::Sentinel(value),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        match self {
            Decoded::Valid(value) => Decoded::Valid(f(value)),
            Decoded::Sentinel(value) => Decoded::Sentinel(f(value)),
        }
    }
}

/// An error encoding a value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The value has no representation in the base type.
    #[error("Value cannot be encoded as base type {base:?}.")]
    Incompatible { base: BaseType },
    /// The value, after applying the resolution, is out of the base type's
    /// range.
    #[error("Value is out of range for base type {base:?}.")]
    OutOfRange { base: BaseType },
    /// Arrays must hold at least one value.
    #[error("Cannot encode an empty array.")]
    Empty,
}

/// Encoding to and decoding from field bytes.
pub trait FieldCodec: Sized {
    /// Encode into little-endian bytes of `base`.
    ///
    /// Byte order is applied at serialization time; see [`encode_field`].
    fn encode(&self, base: BaseType, resolution: Resolution) -> Result<Vec<u8>, EncodeError>;

    /// Decode from a field slice.
    ///
    /// Returns [`None`] if the field is invalid and dropped, or if this type
    /// cannot represent the decoded value.
    fn decode(slice: &FieldSlice<'_>, strategy: DecodingStrategy) -> Option<Decoded<Self>>;
}

/// Encode a value into bytes of `base` with the given byte order.
///
/// # Panics
///
/// Panics if a resolution other than the identity is given for a
/// non-numeric base.
pub fn encode_field<T: FieldCodec>(
    value: &T,
    base: BaseType,
    resolution: Resolution,
    endianness: Endianness,
) -> Result<Vec<u8>, EncodeError> {
    assert_unscaled(base, resolution);

    let mut bytes = value.encode(base, resolution)?;
    endianness.apply(base, &mut bytes);
    Ok(bytes)
}

/// Only numeric bases carry a resolution.
#[track_caller]
pub(crate) fn assert_unscaled(base: BaseType, resolution: Resolution) {
    assert!(
        base.is_numeric() || resolution.is_identity(),
        "resolution applied to non-numeric base type {base:?}"
    );
}

/// Classify a single-value slice, narrowing its raw bits with `narrow`.
///
/// Narrowing runs after classification, so invalid values reach `narrow`
/// only as the base type's invalid pattern.
pub fn decode_bits<T>(
    slice: &FieldSlice<'_>,
    strategy: DecodingStrategy,
    narrow: impl FnOnce(u64) -> Option<T>,
) -> Option<Decoded<T>> {
    let bits = slice.bits()?;

    match classify(bits, slice.base(), strategy) {
        Outcome::Value(bits) => narrow(bits).map(Decoded::Valid),
        Outcome::Sentinel(bits) => narrow(bits).map(Decoded::Sentinel),
        Outcome::Dropped => None,
    }
}

/// Little-endian bytes of raw bits of `base`.
pub fn bits_to_bytes(bits: u64, base: BaseType) -> Vec<u8> {
    bits.to_le_bytes()[..base.width()].to_vec()
}

/// Encode an integer into an integer base type.
pub fn encode_integer(value: i128, base: BaseType) -> Result<Vec<u8>, EncodeError> {
    if !base.is_integer() {
        Err(EncodeError::Incompatible { base })?;
    }

    base.from_integer(value)
        .map(|bits| bits_to_bytes(bits, base))
        .ok_or(EncodeError::OutOfRange { base })
}

macro_rules! integer_codec {
    ($($t:ty),*) => {
        $(
            impl FieldCodec for $t {
                fn encode(&self, base: BaseType, resolution: Resolution) -> Result<Vec<u8>, EncodeError> {
                    assert_unscaled(base, resolution);
                    encode_integer(i128::from(*self), base)
                }

                fn decode(slice: &FieldSlice<'_>, strategy: DecodingStrategy) -> Option<Decoded<Self>> {
                    let base = slice.base();
                    decode_bits(slice, strategy, |bits| {
                        <$t>::try_from(base.integer(bits)?).ok()
                    })
                }
            }
        )*
    };
}

integer_codec!(u8, u16, u32, u64, i8, i16, i32, i64);

impl FieldCodec for bool {
    fn encode(&self, base: BaseType, resolution: Resolution) -> Result<Vec<u8>, EncodeError> {
        assert_unscaled(base, resolution);
        encode_integer(i128::from(*self), base)
    }

    fn decode(slice: &FieldSlice<'_>, strategy: DecodingStrategy) -> Option<Decoded<Self>> {
        let base = slice.base();
        decode_bits(slice, strategy, |bits| match base.integer(bits)? {
            0 => Some(false),
            1 => Some(true),
            _ => None,
        })
    }
}

impl FieldCodec for f64 {
    fn encode(&self, base: BaseType, resolution: Resolution) -> Result<Vec<u8>, EncodeError> {
        if !base.is_numeric() {
            Err(EncodeError::Incompatible { base })?;
        }

        resolution
            .apply(*self, base)
            .map(|bits| bits_to_bytes(bits, base))
    }

    fn decode(slice: &FieldSlice<'_>, strategy: DecodingStrategy) -> Option<Decoded<Self>> {
        let base = slice.base();

        if !base.is_numeric() {
            return None;
        }

        match classify(slice.bits()?, base, strategy) {
            Outcome::Value(bits) => Some(Decoded::Valid(slice.resolution().remove(bits, base))),
            Outcome::Sentinel(bits) => base.number_value(bits).map(Decoded::Sentinel),
            Outcome::Dropped => None,
        }
    }
}

impl FieldCodec for f32 {
    fn encode(&self, base: BaseType, resolution: Resolution) -> Result<Vec<u8>, EncodeError> {
        f64::from(*self).encode(base, resolution)
    }

    fn decode(slice: &FieldSlice<'_>, strategy: DecodingStrategy) -> Option<Decoded<Self>> {
        let base = slice.base();

        if !base.is_numeric() {
            return None;
        }

        match classify(slice.bits()?, base, strategy) {
            Outcome::Value(bits) => Some(Decoded::Valid(
                slice.resolution().remove(bits, base) as f32,
            )),
            // Keep the exact pattern rather than round-tripping through f64.
            Outcome::Sentinel(bits) if base == BaseType::Float32 => {
                Some(Decoded::Sentinel(f32::from_bits(bits as u32)))
            }
            Outcome::Sentinel(bits) => base
                .number_value(bits)
                .map(|v| Decoded::Sentinel(v as f32)),
            Outcome::Dropped => None,
        }
    }
}

/// Raw bits of a single value, without narrowing or resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Raw(pub u64);

impl FieldCodec for Raw {
    fn encode(&self, base: BaseType, resolution: Resolution) -> Result<Vec<u8>, EncodeError> {
        assert_unscaled(base, resolution);

        let width = base.width();

        if width < 8 && self.0 >> (width * 8) != 0 {
            Err(EncodeError::OutOfRange { base })?;
        }

        Ok(bits_to_bytes(self.0, base))
    }

    fn decode(slice: &FieldSlice<'_>, strategy: DecodingStrategy) -> Option<Decoded<Self>> {
        decode_bits(slice, strategy, |bits| Some(Raw(bits)))
    }
}

/// Null-terminated UTF-8 strings. A string whose first byte is the
/// terminator is invalid.
impl FieldCodec for String {
    fn encode(&self, base: BaseType, resolution: Resolution) -> Result<Vec<u8>, EncodeError> {
        assert_unscaled(base, resolution);

        if base != BaseType::String {
            Err(EncodeError::Incompatible { base })?;
        }

        let mut bytes = Vec::with_capacity(self.len() + 1);
        bytes.extend_from_slice(self.as_bytes());
        bytes.push(0);

        Ok(bytes)
    }

    fn decode(slice: &FieldSlice<'_>, strategy: DecodingStrategy) -> Option<Decoded<Self>> {
        let base = slice.base();

        if base != BaseType::String {
            return None;
        }

        let bytes = slice.bytes();
        let first = bytes.first().copied().unwrap_or(0);

        match classify(first.into(), base, strategy) {
            Outcome::Value(_) => {
                let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
                String::from_utf8(bytes[..end].to_vec())
                    .ok()
                    .map(Decoded::Valid)
            }
            Outcome::Sentinel(_) => Some(Decoded::Sentinel(String::new())),
            Outcome::Dropped => None,
        }
    }
}

/// Arrays of values. An array is invalid only if every element is invalid;
/// invalid elements of a valid array are kept as their sentinel.
impl<T: FieldCodec> FieldCodec for Vec<T> {
    fn encode(&self, base: BaseType, resolution: Resolution) -> Result<Vec<u8>, EncodeError> {
        if self.is_empty() {
            Err(EncodeError::Empty)?;
        }

        let mut bytes = Vec::with_capacity(self.len() * base.width());

        for value in self {
            bytes.extend(value.encode(base, resolution)?);
        }

        Ok(bytes)
    }

    fn decode(slice: &FieldSlice<'_>, strategy: DecodingStrategy) -> Option<Decoded<Self>> {
        if slice.is_malformed() {
            return None;
        }

        let mut valid = false;

        let values = slice
            .elements()
            .map(|element| {
                let value = T::decode(&element, DecodingStrategy::SubstituteSentinel)?;
                valid |= value.is_valid();
                Some(value.into_inner())
            })
            .collect::<Option<Vec<_>>>()?;

        match (valid, strategy) {
            (true, _) => Some(Decoded::Valid(values)),
            (false, DecodingStrategy::SubstituteSentinel) => Some(Decoded::Sentinel(values)),
            (false, DecodingStrategy::DropInvalid) => None,
        }
    }
}
