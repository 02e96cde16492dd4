//! Domain types implementing the field codec.
//!
//! Closed tag sets are declared with [`field_enum!`](crate::field_enum), and
//! bit-flag sets with [`flag_set!`](crate::flag_set). Composite fields, which
//! pack several values into one integer, are implemented by hand in the
//! [`balance`] and [`index`] modules. A sample of the protocol's profile
//! vocabularies is provided in [`profile`].

pub mod balance;
pub mod index;
pub mod profile;

/// Declare an enumeration decoded from raw integers.
///
/// The variant list is the single table mapping raw values to variants.
/// Decoding a raw value without a variant returns [`None`], independent of
/// the base type's invalid pattern.
///
/// ```
/// field_enum! {
///     /// Which side of the body a sensor is worn on.
///     pub enum Side: u8 {
///         Left = 0,
///         Right = 1,
///     }
/// }
/// ```
#[macro_export]
macro_rules! field_enum {
    (
        $(#[$attr:meta])*
        $vis:vis enum $name:ident: $repr:ident {
            $($(#[$variant_attr:meta])* $variant:ident = $value:literal,)*
        }
    ) => {
        $(#[$attr])*
        #[repr($repr)]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($(#[$variant_attr])* $variant = $value,)*
        }

        impl $name {
            /// Look up the variant for a raw value.
            pub const fn from_raw(raw: $repr) -> ::core::option::Option<Self> {
                match raw {
                    $($value => ::core::option::Option::Some($name::$variant),)*
                    _ => ::core::option::Option::None,
                }
            }

            pub const fn raw(self) -> $repr {
                self as $repr
            }
        }

        impl $crate::codec::FieldCodec for $name {
            fn encode(
                &self,
                base: $crate::BaseType,
                _: $crate::Resolution,
            ) -> ::core::result::Result<$crate::__private::Vec<u8>, $crate::codec::EncodeError> {
                $crate::codec::encode_integer(self.raw() as i128, base)
            }

            fn decode(
                slice: &$crate::FieldSlice<'_>,
                strategy: $crate::DecodingStrategy,
            ) -> ::core::option::Option<$crate::Decoded<Self>> {
                let base = slice.base();
                $crate::codec::decode_bits(slice, strategy, |bits| {
                    let raw = <$repr>::try_from(base.integer(bits)?).ok()?;
                    Self::from_raw(raw)
                })
            }
        }
    };
}

/// Declare a bit-flag set decoded from raw integers.
///
/// Flag sets are [`bitflags`] types, with the usual set operations. They are
/// only compatible with unsigned base types of the same width as their bits,
/// so encoding a 32-bit set into an 8-bit field fails.
#[macro_export]
macro_rules! flag_set {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident: $bits:ty {
            $($(#[$($flag_attr:tt)*])* const $flag:ident = $value:expr;)*
        }
    ) => {
        $crate::__private::bitflags::bitflags! {
            $(#[$attr])*
            #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
            $vis struct $name: $bits {
                $($(#[$($flag_attr)*])* const $flag = $value;)*
            }
        }

        impl $crate::codec::FieldCodec for $name {
            fn encode(
                &self,
                base: $crate::BaseType,
                _: $crate::Resolution,
            ) -> ::core::result::Result<$crate::__private::Vec<u8>, $crate::codec::EncodeError> {
                if !base.is_unsigned_of(::core::mem::size_of::<$bits>()) {
                    return ::core::result::Result::Err(
                        $crate::codec::EncodeError::Incompatible { base },
                    );
                }

                $crate::codec::encode_integer(self.bits() as i128, base)
            }

            fn decode(
                slice: &$crate::FieldSlice<'_>,
                strategy: $crate::DecodingStrategy,
            ) -> ::core::option::Option<$crate::Decoded<Self>> {
                if !slice.base().is_unsigned_of(::core::mem::size_of::<$bits>()) {
                    return ::core::option::Option::None;
                }

                $crate::codec::decode_bits(slice, strategy, |bits| {
                    let raw = <$bits>::try_from(bits).ok()?;
                    ::core::option::Option::Some(Self::from_bits_retain(raw))
                })
            }
        }
    };
}
