use cassette::{
    BaseType, Decoded, DecodingStrategy, Endianness, FieldCodec, FieldSlice, Resolution,
    codec::{EncodeError, Raw, encode_field, value::Value},
};
use proptest::prelude::*;

const DROP: DecodingStrategy = DecodingStrategy::DropInvalid;
const SUBSTITUTE: DecodingStrategy = DecodingStrategy::SubstituteSentinel;

fn decode<T: FieldCodec>(bytes: &[u8], base: BaseType) -> Option<Decoded<T>> {
    T::decode(&FieldSlice::new(bytes, base), DROP)
}

#[test]
fn uint16_example() {
    let le = FieldSlice::new(&[0x2C, 0x01], BaseType::Uint16);
    assert_eq!(u16::decode(&le, DROP), Some(Decoded::Valid(300)));

    let be = FieldSlice::new(&[0x01, 0x2C], BaseType::Uint16).with_endianness(Endianness::Big);
    assert_eq!(u16::decode(&be, DROP), Some(Decoded::Valid(300)));

    let swapped = FieldSlice::new(&[0x2C, 0x01], BaseType::Uint16).with_endianness(Endianness::Big);
    assert_eq!(u16::decode(&swapped, DROP), Some(Decoded::Valid(0x2C01)));
}

#[test]
fn invalid_sentinel_exactness() {
    for base in BaseType::ALL {
        let mut bytes = base.invalid_bytes(base.width());
        let slice = FieldSlice::new(&bytes, base);

        match base {
            BaseType::String => {
                assert_eq!(String::decode(&slice, DROP), None);
                assert_eq!(
                    String::decode(&slice, SUBSTITUTE),
                    Some(Decoded::Sentinel(String::new()))
                );
            }
            _ => {
                assert_eq!(Raw::decode(&slice, DROP), None, "{base:?}");
                assert_eq!(
                    Raw::decode(&slice, SUBSTITUTE),
                    Some(Decoded::Sentinel(Raw(base.invalid()))),
                    "{base:?}"
                );
            }
        }

        // The pattern is the same in either byte order.
        Endianness::Big.apply(base, &mut bytes);
        let slice = FieldSlice::new(&bytes, base).with_endianness(Endianness::Big);
        if base != BaseType::String {
            assert_eq!(Raw::decode(&slice, DROP), None, "{base:?}");
        }
    }
}

#[test]
fn typed_sentinels() {
    let slice = FieldSlice::new(&[0xFF, 0x7F], BaseType::Sint16);
    assert_eq!(i16::decode(&slice, DROP), None);
    assert_eq!(i16::decode(&slice, SUBSTITUTE), Some(Decoded::Sentinel(i16::MAX)));

    let slice = FieldSlice::new(&[0, 0, 0, 0], BaseType::Uint32z);
    assert_eq!(u32::decode(&slice, SUBSTITUTE), Some(Decoded::Sentinel(0)));

    let slice = FieldSlice::new(&[0xFF; 4], BaseType::Float32);
    let Some(Decoded::Sentinel(value)) = f32::decode(&slice, SUBSTITUTE) else {
        panic!("expected a sentinel");
    };
    assert_eq!(value.to_bits(), 0xFFFF_FFFF);
}

#[test]
fn scaled_sentinel_is_unscaled() {
    let slice = FieldSlice::new(&[0xFF, 0xFF], BaseType::Uint16)
        .with_resolution(Resolution::scaled(5.0, 500.0));

    assert_eq!(f64::decode(&slice, SUBSTITUTE), Some(Decoded::Sentinel(65535.0)));
    assert_eq!(f64::decode(&slice, DROP), None);
}

#[test]
fn resolution_decode() {
    // Altitude: scale 5, offset 500.
    let bytes = 3100u16.to_le_bytes();
    let slice =
        FieldSlice::new(&bytes, BaseType::Uint16).with_resolution(Resolution::scaled(5.0, 500.0));

    assert_eq!(f64::decode(&slice, DROP), Some(Decoded::Valid(520.0)));

    // Integer targets receive raw values.
    assert_eq!(u16::decode(&slice, DROP), Some(Decoded::Valid(3100)));
}

#[test]
fn resolution_encode() {
    let resolution = Resolution::scaled(5.0, 500.0);

    assert_eq!(
        520.0f64.encode(BaseType::Uint16, resolution),
        Ok(3100u16.to_le_bytes().to_vec())
    );

    // Rounds half away from zero.
    let resolution = Resolution::scaled(2.0, 0.0);
    assert_eq!(1.25f64.encode(BaseType::Sint8, resolution), Ok(vec![3]));
    assert_eq!((-1.25f64).encode(BaseType::Sint8, resolution), Ok(vec![0xFD]));
}

#[test]
fn out_of_range_encode() {
    let resolution = Resolution::scaled(100.0, 0.0);

    assert_eq!(
        1000.0f64.encode(BaseType::Uint16, resolution),
        Err(EncodeError::OutOfRange {
            base: BaseType::Uint16
        })
    );
    assert_eq!(
        (-1.0f64).encode(BaseType::Uint8, Resolution::IDENTITY),
        Err(EncodeError::OutOfRange {
            base: BaseType::Uint8
        })
    );
    assert_eq!(
        300u16.encode(BaseType::Uint8, Resolution::IDENTITY),
        Err(EncodeError::OutOfRange {
            base: BaseType::Uint8
        })
    );
}

#[test]
fn incompatible_encode() {
    assert_eq!(
        1u8.encode(BaseType::String, Resolution::IDENTITY),
        Err(EncodeError::Incompatible {
            base: BaseType::String
        })
    );
    assert_eq!(
        String::from("a").encode(BaseType::Uint8, Resolution::IDENTITY),
        Err(EncodeError::Incompatible {
            base: BaseType::Uint8
        })
    );
}

#[test]
#[should_panic]
fn resolution_on_string() {
    let _ = Resolution::scaled(2.0, 0.0).apply(1.0, BaseType::String);
}

#[test]
#[should_panic]
fn resolution_on_byte() {
    let _ = Resolution::scaled(2.0, 0.0).remove(1, BaseType::Byte);
}

#[test]
#[should_panic]
fn scaled_string_encode() {
    let _ = String::from("abc").encode(BaseType::String, Resolution::scaled(10.0, 0.0));
}

#[test]
#[should_panic]
fn scaled_byte_encode() {
    let _ = vec![1u8, 2].encode(BaseType::Byte, Resolution::scaled(10.0, 0.0));
}

#[test]
#[should_panic]
fn scaled_value_encode() {
    let _ = Value::Bytes(vec![1, 2]).encode(BaseType::Byte, Resolution::scaled(10.0, 0.0));
}

#[test]
#[should_panic]
fn zero_scale() {
    let _ = Resolution::scaled(0.0, 1.0);
}

#[test]
fn fallible_resolution() {
    assert_eq!(Resolution::new(0.0, 0.0), None);
    assert_eq!(Resolution::new(f64::NAN, 0.0), None);
    assert_eq!(Resolution::new(1.0, 0.0), Some(Resolution::IDENTITY));
    assert_eq!(Resolution::default(), Resolution::IDENTITY);
}

#[test]
fn strings() {
    assert_eq!(
        decode::<String>(b"abc\0\0\0", BaseType::String),
        Some(Decoded::Valid("abc".to_string()))
    );
    // No terminator.
    assert_eq!(
        decode::<String>(b"abc", BaseType::String),
        Some(Decoded::Valid("abc".to_string()))
    );
    assert_eq!(decode::<String>(&[0xC3, 0x28, 0], BaseType::String), None);
    assert_eq!(
        String::from("abc").encode(BaseType::String, Resolution::IDENTITY),
        Ok(b"abc\0".to_vec())
    );
}

#[test]
fn arrays() {
    let bytes = [0x01, 0x00, 0xFF, 0xFF, 0x03, 0x00];

    // Invalid elements of a valid array are kept.
    assert_eq!(
        decode::<Vec<u16>>(&bytes, BaseType::Uint16),
        Some(Decoded::Valid(vec![1, 0xFFFF, 3]))
    );

    let invalid = [0xFF; 4];
    assert_eq!(decode::<Vec<u16>>(&invalid, BaseType::Uint16), None);
    assert_eq!(
        Vec::<u16>::decode(&FieldSlice::new(&invalid, BaseType::Uint16), SUBSTITUTE),
        Some(Decoded::Sentinel(vec![0xFFFF, 0xFFFF]))
    );

    assert_eq!(decode::<Vec<u16>>(&[1, 2, 3], BaseType::Uint16), None);
    assert_eq!(
        Vec::<u16>::new().encode(BaseType::Uint16, Resolution::IDENTITY),
        Err(EncodeError::Empty)
    );
}

#[test]
fn booleans() {
    assert_eq!(decode::<bool>(&[1], BaseType::Enum), Some(Decoded::Valid(true)));
    assert_eq!(decode::<bool>(&[0], BaseType::Enum), Some(Decoded::Valid(false)));
    assert_eq!(decode::<bool>(&[2], BaseType::Enum), None);
    assert_eq!(decode::<bool>(&[0xFF], BaseType::Enum), None);
}

#[test]
fn malformed_slices() {
    let slice = FieldSlice::new(&[1, 2, 3], BaseType::Uint16);
    assert!(slice.is_malformed());
    assert_eq!(u16::decode(&slice, DROP), None);
    assert_eq!(
        Value::decode(&slice, DROP),
        Some(Decoded::Valid(Value::Bytes(vec![1, 2, 3])))
    );
}

#[test]
fn values() {
    assert_eq!(
        decode::<Value>(&[0xFE, 0xFF], BaseType::Sint16),
        Some(Decoded::Valid(Value::Signed(-2)))
    );
    assert_eq!(
        decode::<Value>(&[0x2C, 0x01], BaseType::Uint16),
        Some(Decoded::Valid(Value::Unsigned(300)))
    );
    assert_eq!(
        decode::<Value>(b"hi\0", BaseType::String),
        Some(Decoded::Valid(Value::Text("hi".to_string())))
    );
    assert_eq!(
        decode::<Value>(&[1, 2], BaseType::Byte),
        Some(Decoded::Valid(Value::Bytes(vec![1, 2])))
    );
    assert_eq!(
        decode::<Value>(&[1, 2], BaseType::Uint8),
        Some(Decoded::Valid(Value::Array(vec![
            Value::Unsigned(1),
            Value::Unsigned(2)
        ])))
    );

    let bytes = 3100u16.to_le_bytes();
    let slice =
        FieldSlice::new(&bytes, BaseType::Uint16).with_resolution(Resolution::scaled(5.0, 500.0));
    assert_eq!(
        Value::decode(&slice, DROP),
        Some(Decoded::Valid(Value::Float(520.0)))
    );

    assert_eq!(
        Value::Float(520.0).encode(BaseType::Uint16, Resolution::scaled(5.0, 500.0)),
        Ok(3100u16.to_le_bytes().to_vec())
    );
}

#[test]
fn field_encoding_applies_byte_order() {
    assert_eq!(
        encode_field(&300u16, BaseType::Uint16, Resolution::IDENTITY, Endianness::Big),
        Ok(vec![0x01, 0x2C])
    );
    assert_eq!(
        encode_field(&vec![1u16, 2], BaseType::Uint16, Resolution::IDENTITY, Endianness::Big),
        Ok(vec![0x00, 0x01, 0x00, 0x02])
    );
}

/// Single-value bases with their valid integer range.
fn integer_bases() -> impl Strategy<Value = (BaseType, i128)> {
    prop::sample::select(vec![
        BaseType::Enum,
        BaseType::Sint8,
        BaseType::Uint8,
        BaseType::Sint16,
        BaseType::Uint16,
        BaseType::Sint32,
        BaseType::Uint32,
        BaseType::Uint8z,
        BaseType::Uint16z,
        BaseType::Uint32z,
        BaseType::Byte,
        BaseType::Sint64,
        BaseType::Uint64,
        BaseType::Uint64z,
    ])
    .prop_flat_map(|base| {
        let (min, max) = base.range().unwrap();
        let max = max.min(i64::MAX as i128);
        (Just(base), (min as i64..=max as i64).prop_map(i128::from))
    })
    .prop_filter("invalid pattern", |(base, value)| {
        base.is_valid(base.from_integer(*value).unwrap())
    })
}

proptest! {
    #[test]
    fn integer_round_trip((base, value) in integer_bases()) {
        let bytes = (value as i64).encode(base, Resolution::IDENTITY).unwrap();
        prop_assert_eq!(bytes.len(), base.width());

        let decoded = i64::decode(&FieldSlice::new(&bytes, base), DROP);
        prop_assert_eq!(decoded, Some(Decoded::Valid(value as i64)));
    }

    #[test]
    fn float_round_trip(value in any::<f32>().prop_filter("finite", |v| v.is_finite())) {
        let bytes = value.encode(BaseType::Float32, Resolution::IDENTITY).unwrap();
        let decoded = f32::decode(&FieldSlice::new(&bytes, BaseType::Float32), DROP);
        prop_assert_eq!(decoded, Some(Decoded::Valid(value)));
    }

    #[test]
    fn unsigned_64_round_trip(
        base in prop::sample::select(vec![BaseType::Uint64, BaseType::Uint64z]),
        value in any::<u64>(),
    ) {
        prop_assume!(base.is_valid(value));

        let bytes = value.encode(base, Resolution::IDENTITY).unwrap();
        prop_assert_eq!(bytes.len(), 8);

        let decoded = u64::decode(&FieldSlice::new(&bytes, base), DROP);
        prop_assert_eq!(decoded, Some(Decoded::Valid(value)));
    }

    #[test]
    fn double_round_trip(value in any::<f64>().prop_filter("finite", |v| v.is_finite())) {
        let bytes = value.encode(BaseType::Float64, Resolution::IDENTITY).unwrap();
        prop_assert_eq!(bytes.len(), 8);

        let decoded = f64::decode(&FieldSlice::new(&bytes, BaseType::Float64), DROP);
        prop_assert_eq!(decoded, Some(Decoded::Valid(value)));
    }

    #[test]
    fn endianness_symmetry((base, value) in integer_bases()) {
        let bytes = base.from_integer(value).unwrap().to_le_bytes()[..base.width()].to_vec();
        let mut reversed = bytes.clone();
        reversed.reverse();

        let le = Raw::decode(&FieldSlice::new(&bytes, base), DROP);
        let be = Raw::decode(
            &FieldSlice::new(&reversed, base).with_endianness(Endianness::Big),
            DROP,
        );
        prop_assert_eq!(le, be);
    }

    #[test]
    fn resolution_inverse(
        raw in 0u32..60000,
        scale in prop_oneof![Just(1.0), Just(5.0), Just(10.0), Just(100.0), Just(1000.0)],
        offset in prop_oneof![Just(0.0), Just(500.0), Just(-100.0)],
    ) {
        let resolution = Resolution::scaled(scale, offset);
        let physical = (raw as f64 - offset) / scale;

        let bytes = physical.encode(BaseType::Uint32, resolution);
        prop_assume!(bytes.is_ok());
        let bytes = bytes.unwrap();

        let decoded = f64::decode(
            &FieldSlice::new(&bytes, BaseType::Uint32).with_resolution(resolution),
            DROP,
        );
        let Some(Decoded::Valid(decoded)) = decoded else {
            return Err(TestCaseError::fail("expected a valid value"));
        };

        prop_assert!((decoded - physical).abs() <= 1.0 / scale);
    }
}
