//! Classification of raw values against their type's invalid pattern.

use crate::base::BaseType;

/// Policy for fields holding their type's invalid pattern.
///
/// Chosen once per decoding session and passed explicitly to every decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DecodingStrategy {
    /// Invalid fields produce no value.
    #[default]
    DropInvalid,
    /// Invalid fields produce the invalid pattern itself, flagged as not
    /// valid.
    SubstituteSentinel,
}

/// The classification of a raw value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// A valid raw value.
    Value(u64),
    /// An invalid value, dropped.
    Dropped,
    /// An invalid value, replaced by the type's invalid pattern.
    Sentinel(u64),
}

/// Whether `bits` differs from the invalid pattern of `base`.
///
/// Values are compared for exact equality, not by range.
pub const fn is_valid(bits: u64, base: BaseType) -> bool {
    base.is_valid(bits)
}

/// Classify raw bits of `base` under a decoding strategy.
pub const fn classify(bits: u64, base: BaseType, strategy: DecodingStrategy) -> Outcome {
    if is_valid(bits, base) {
        Outcome::Value(bits)
    } else {
        match strategy {
            DecodingStrategy::DropInvalid => Outcome::Dropped,
            DecodingStrategy::SubstituteSentinel => Outcome::Sentinel(base.invalid()),
        }
    }
}
