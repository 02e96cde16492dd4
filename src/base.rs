//! Registry of the protocol's primitive wire types.
//!
//! Every field in a definition record declares one of these base types. Each
//! type has a fixed byte width, and a reserved bit pattern marking the field
//! as holding no value. These attributes are pure functions of the type.

/// A primitive wire type.
///
/// Base type identifiers on the wire carry an endian-ability flag in bit 7
/// (`0x84` for `uint16`). Only the type number in bits 0 to 4 is significant
/// when parsing. Unrecognized numbers map to [`BaseType::Unknown`], which is
/// treated as an opaque single-byte type so decoding can continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseType {
    Enum,
    Sint8,
    Uint8,
    Sint16,
    Uint16,
    Sint32,
    Uint32,
    String,
    Float32,
    Float64,
    Uint8z,
    Uint16z,
    Uint32z,
    Byte,
    Sint64,
    Uint64,
    Uint64z,
    Unknown,
}

macro_rules! base_types {
    ($($t:ident => $number:literal, $width:literal, $invalid:expr;)*) => {
        impl BaseType {
            /// All recognized base types, ordered by type number.
            pub const ALL: [BaseType; 17] = [$(BaseType::$t),*];

            /// Look up a base type from its wire identifier.
            pub const fn from_id(id: u8) -> Self {
                match id & 0x1F {
                    $($number => BaseType::$t,)*
                    _ => BaseType::Unknown,
                }
            }

            /// The type number, without the endian-ability flag.
            pub const fn number(self) -> u8 {
                match self {
                    $(BaseType::$t => $number,)*
                    BaseType::Unknown => 0x1F,
                }
            }

            /// The size of a single value in bytes.
            pub const fn width(self) -> usize {
                match self {
                    $(BaseType::$t => $width,)*
                    BaseType::Unknown => 1,
                }
            }

            /// The bit pattern reserved to mark a value as invalid, zero
            /// extended to 64 bits.
            pub const fn invalid(self) -> u64 {
                match self {
                    $(BaseType::$t => $invalid,)*
                    BaseType::Unknown => 0xFF,
                }
            }
        }
    };
}

base_types! {
    Enum => 0x00, 1, 0xFF;
    Sint8 => 0x01, 1, 0x7F;
    Uint8 => 0x02, 1, 0xFF;
    Sint16 => 0x03, 2, 0x7FFF;
    Uint16 => 0x04, 2, 0xFFFF;
    Sint32 => 0x05, 4, 0x7FFF_FFFF;
    Uint32 => 0x06, 4, 0xFFFF_FFFF;
    String => 0x07, 1, 0x00;
    Float32 => 0x08, 4, 0xFFFF_FFFF;
    Float64 => 0x09, 8, u64::MAX;
    Uint8z => 0x0A, 1, 0x00;
    Uint16z => 0x0B, 2, 0x0000;
    Uint32z => 0x0C, 4, 0x0000_0000;
    Byte => 0x0D, 1, 0xFF;
    Sint64 => 0x0E, 8, 0x7FFF_FFFF_FFFF_FFFF;
    Uint64 => 0x0F, 8, u64::MAX;
    Uint64z => 0x10, 8, 0;
}

impl BaseType {
    /// The wire identifier, including the endian-ability flag for multi-byte
    /// types.
    pub const fn id(self) -> u8 {
        if self.is_multi_byte() {
            0x80 | self.number()
        } else {
            self.number()
        }
    }

    /// Whether values span more than one byte, and so depend on the
    /// architecture of their definition record.
    pub const fn is_multi_byte(self) -> bool {
        self.width() > 1
    }

    pub const fn is_signed(self) -> bool {
        matches!(
            self,
            BaseType::Sint8 | BaseType::Sint16 | BaseType::Sint32 | BaseType::Sint64
        )
    }

    pub const fn is_float(self) -> bool {
        matches!(self, BaseType::Float32 | BaseType::Float64)
    }

    /// Whether values are integers, including enumerations and bytes.
    pub const fn is_integer(self) -> bool {
        !matches!(
            self,
            BaseType::String | BaseType::Float32 | BaseType::Float64 | BaseType::Unknown
        )
    }

    /// Whether values are unsigned integers of exactly `width` bytes.
    ///
    /// Composites and flag sets are carried by these types.
    pub const fn is_unsigned_of(self, width: usize) -> bool {
        self.is_integer() && !self.is_signed() && self.width() == width
    }

    /// Whether values are numbers a resolution may be applied to.
    pub const fn is_numeric(self) -> bool {
        !matches!(self, BaseType::String | BaseType::Byte | BaseType::Unknown)
    }

    /// The inclusive range of integers representable by this type.
    pub const fn range(self) -> Option<(i128, i128)> {
        if !self.is_integer() {
            return None;
        }

        let bits = (self.width() * 8) as u32;

        Some(if self.is_signed() {
            (-(1 << (bits - 1)), (1 << (bits - 1)) - 1)
        } else {
            (0, (1 << bits) - 1)
        })
    }

    /// Interpret raw bits as an integer of this type.
    pub const fn integer(self, bits: u64) -> Option<i128> {
        if !self.is_integer() {
            return None;
        }

        let shift = 64 - (self.width() * 8) as u32;

        Some(if self.is_signed() {
            (((bits << shift) as i64) >> shift) as i128
        } else {
            ((bits << shift) >> shift) as i128
        })
    }

    /// Produce the raw bits of an integer, if representable by this type.
    pub const fn from_integer(self, value: i128) -> Option<u64> {
        let Some((min, max)) = self.range() else {
            return None;
        };

        if value < min || value > max {
            return None;
        }

        let mask = u64::MAX >> (64 - (self.width() * 8) as u32);

        Some(value as u64 & mask)
    }

    /// Interpret raw bits as a number of this type.
    pub fn number_value(self, bits: u64) -> Option<f64> {
        match self {
            BaseType::Float32 => Some(f32::from_bits(bits as u32) as f64),
            BaseType::Float64 => Some(f64::from_bits(bits)),
            _ if self.is_numeric() => self.integer(bits).map(|v| v as f64),
            _ => None,
        }
    }

    /// Whether raw bits differ from the reserved invalid pattern.
    pub const fn is_valid(self, bits: u64) -> bool {
        bits != self.invalid()
    }

    /// Little-endian bytes of the invalid pattern, repeated to fill `size`.
    pub fn invalid_bytes(self, size: usize) -> alloc::vec::Vec<u8> {
        let pattern = self.invalid().to_le_bytes();
        (0..size).map(|i| pattern[i % self.width()]).collect()
    }
}
