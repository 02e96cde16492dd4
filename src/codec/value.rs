//! Schema-less field values.

use alloc::{string::String, vec::Vec};

use crate::{
    base::BaseType,
    resolution::Resolution,
    validity::DecodingStrategy,
};

use super::{Decoded, EncodeError, FieldCodec, FieldSlice, assert_unscaled, encode_integer};

/// A field value of any base type.
///
/// Integers are widened to 64 bits. Floating point fields, and integer fields
/// with a non-identity resolution, decode to [`Value::Float`] holding the
/// physical value. Fields whose size is not a whole number of values, and
/// fields of unknown base type, decode to [`Value::Bytes`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    Text(String),
    Bytes(Vec<u8>),
    Array(Vec<Value>),
}

impl Value {
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Signed(v) => Some(v),
            Value::Unsigned(v) => i64::try_from(v).ok(),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match *self {
            Value::Signed(v) => u64::try_from(v).ok(),
            Value::Unsigned(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Signed(v) => Some(v as f64),
            Value::Unsigned(v) => Some(v as f64),
            Value::Float(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(v) => Some(v),
            _ => None,
        }
    }
}

impl FieldCodec for Value {
    fn encode(&self, base: BaseType, resolution: Resolution) -> Result<Vec<u8>, EncodeError> {
        assert_unscaled(base, resolution);

        let scaled = base.is_float() || !resolution.is_identity();

        match self {
            Value::Signed(v) if scaled => (*v as f64).encode(base, resolution),
            Value::Signed(v) => encode_integer(i128::from(*v), base),
            Value::Unsigned(v) if scaled => (*v as f64).encode(base, resolution),
            Value::Unsigned(v) => encode_integer(i128::from(*v), base),
            Value::Float(v) => v.encode(base, resolution),
            Value::Text(v) => v.encode(base, resolution),
            Value::Bytes(v) if base == BaseType::Byte && !v.is_empty() => Ok(v.clone()),
            Value::Bytes(v) if v.is_empty() => Err(EncodeError::Empty),
            Value::Bytes(_) => Err(EncodeError::Incompatible { base }),
            Value::Array(v) => v.encode(base, resolution),
        }
    }

    fn decode(slice: &FieldSlice<'_>, strategy: DecodingStrategy) -> Option<Decoded<Self>> {
        let base = slice.base();

        if slice.is_malformed() || base == BaseType::Unknown {
            return Some(Decoded::Valid(Value::Bytes(slice.bytes().to_vec())));
        }

        match base {
            BaseType::String => String::decode(slice, strategy).map(|d| d.map(Value::Text)),
            BaseType::Byte => Vec::<u8>::decode(slice, strategy).map(|d| d.map(Value::Bytes)),
            _ if slice.count() > 1 => {
                Vec::<Value>::decode(slice, strategy).map(|d| d.map(Value::Array))
            }
            _ if base.is_float() || !slice.resolution().is_identity() => {
                f64::decode(slice, strategy).map(|d| d.map(Value::Float))
            }
            _ if base.is_signed() => i64::decode(slice, strategy).map(|d| d.map(Value::Signed)),
            _ => u64::decode(slice, strategy).map(|d| d.map(Value::Unsigned)),
        }
    }
}
