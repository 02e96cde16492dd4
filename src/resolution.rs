//! Scale and offset transform between physical values and raw integers.

use crate::{base::BaseType, codec::EncodeError};

/// A field's scale and offset.
///
/// Encoding computes `raw = round(physical * scale) + offset`, and decoding
/// the inverse `physical = (raw - offset) / scale`. Resolutions are attached
/// to fields by a schema, and never inferred from data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    scale: f64,
    offset: f64,
}

impl Resolution {
    /// The resolution of a field without scale or offset.
    pub const IDENTITY: Resolution = Resolution {
        scale: 1.0,
        offset: 0.0,
    };

    /// Construct a resolution, if `scale` is finite and non-zero and `offset`
    /// is finite.
    pub fn new(scale: f64, offset: f64) -> Option<Self> {
        if scale != 0.0 && scale.is_finite() && offset.is_finite() {
            Some(Self { scale, offset })
        } else {
            None
        }
    }

    /// Construct a resolution declared by a schema.
    ///
    /// # Panics
    ///
    /// Panics if `scale` is zero or either component is not finite.
    pub fn scaled(scale: f64, offset: f64) -> Self {
        let Some(resolution) = Self::new(scale, offset) else {
            panic!("invalid resolution (scale {scale}, offset {offset})");
        };

        resolution
    }

    pub const fn scale(&self) -> f64 {
        self.scale
    }

    pub const fn offset(&self) -> f64 {
        self.offset
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }

    /// Convert a physical value to the raw bits of a numeric base type.
    ///
    /// Integer results are rounded half away from zero. Results that cannot
    /// be represented by `base` are returned as an error, never truncated.
    ///
    /// # Panics
    ///
    /// Panics if `base` is not numeric (`string`, `byte`, or unknown).
    pub fn apply(&self, physical: f64, base: BaseType) -> Result<u64, EncodeError> {
        assert!(
            base.is_numeric(),
            "resolution applied to non-numeric base type {base:?}"
        );

        let scaled = physical * self.scale;

        if !scaled.is_finite() {
            Err(EncodeError::OutOfRange { base })?;
        }

        match base {
            BaseType::Float32 => {
                let raw = (scaled + self.offset) as f32;
                if !raw.is_finite() {
                    Err(EncodeError::OutOfRange { base })?;
                }
                Ok(raw.to_bits() as u64)
            }
            BaseType::Float64 => Ok((scaled + self.offset).to_bits()),
            _ => {
                let raw = round(round(scaled) as f64 + self.offset);
                base.from_integer(raw)
                    .ok_or(EncodeError::OutOfRange { base })
            }
        }
    }

    /// Convert the raw bits of a numeric base type to a physical value.
    ///
    /// # Panics
    ///
    /// Panics if `base` is not numeric (`string`, `byte`, or unknown).
    pub fn remove(&self, bits: u64, base: BaseType) -> f64 {
        assert!(
            base.is_numeric(),
            "resolution removed from non-numeric base type {base:?}"
        );

        let raw = base.number_value(bits).unwrap_or(f64::NAN);

        (raw - self.offset) / self.scale
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Round half away from zero, saturating at the bounds of `i128`.
fn round(x: f64) -> i128 {
    let truncated = x as i128;
    let fraction = x - truncated as f64;

    if fraction >= 0.5 {
        truncated.saturating_add(1)
    } else if fraction <= -0.5 {
        truncated.saturating_sub(1)
    } else {
        truncated
    }
}
