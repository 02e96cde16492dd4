//! Documents shared by the integration tests.

#![allow(dead_code)]

use cassette::{
    BaseType, Endianness, Resolution,
    avec::{WriteError, Writer},
    sans::definition::Definition,
};

pub const START: u32 = 1_000_000_000;

/// Timestamps of the records in [`activity`], in order.
pub const TIMESTAMPS: [u32; 4] = [START, START + 5, START + 8, START + 34];

/// Generic values of the messages in [`activity`], one row per message: the
/// global message number, then pairs of field number and value. Invalid
/// fields are absent.
pub const ACTIVITY: &str = "\
0,0,4,1,1,2,3121,3,3987654321,4,1000000000
20,253,1000000000,0,495280000,1,-1234567,2,3100,5,0,6,2500,13,21
20,253,1000000005,0,495280100,1,-1234467,5,1250,6,2600,13,-3
20,2,3105,5,2500
20,2,3110,5,3750
";

/// A short activity: a file identifier, two records with full timestamps,
/// and two with compressed timestamps, the last rolling over.
pub fn activity(endianness: Endianness) -> Vec<u8> {
    try_activity(endianness).unwrap()
}

fn try_activity(endianness: Endianness) -> Result<Vec<u8>, WriteError> {
    let mut writer = Writer::new();

    let file_id = Definition::new(0)
        .with_endianness(endianness)
        .with_field(0, 1, BaseType::Enum)
        .with_field(1, 2, BaseType::Uint16)
        .with_field(2, 2, BaseType::Uint16)
        .with_field(3, 4, BaseType::Uint32z)
        .with_field(4, 4, BaseType::Uint32);
    writer.define(0, file_id)?;

    writer
        .data(0)?
        .field(0, &4u8)?
        .field(1, &1u16)?
        .field(2, &3121u16)?
        .field(3, &3_987_654_321u32)?
        .field(4, &START)?
        .finish();

    let record = Definition::new(20)
        .with_endianness(endianness)
        .with_field(253, 4, BaseType::Uint32)
        .with_field(0, 4, BaseType::Sint32)
        .with_field(1, 4, BaseType::Sint32)
        .with_field(2, 2, BaseType::Uint16)
        .with_field(5, 4, BaseType::Uint32)
        .with_field(6, 2, BaseType::Uint16)
        .with_field(13, 1, BaseType::Sint8);
    writer.define(1, record)?;

    writer
        .data(1)?
        .field(253, &START)?
        .field(0, &495_280_000i32)?
        .field(1, &-1_234_567i32)?
        .scaled(2, &520.0f64, Resolution::scaled(5.0, 500.0))?
        .field(5, &0u32)?
        .field(6, &2500u16)?
        .field(13, &21i8)?
        .finish();

    // Altitude is left invalid.
    writer
        .data(1)?
        .field(253, &(START + 5))?
        .field(0, &495_280_100i32)?
        .field(1, &-1_234_467i32)?
        .scaled(5, &12.5f64, Resolution::scaled(100.0, 0.0))?
        .field(6, &2600u16)?
        .field(13, &-3i8)?
        .finish();

    let compressed = Definition::new(20)
        .with_endianness(endianness)
        .with_field(2, 2, BaseType::Uint16)
        .with_field(5, 4, BaseType::Uint32);
    writer.define(2, compressed)?;

    writer
        .compressed(2, 8)?
        .field(2, &3105u16)?
        .field(5, &2500u32)?
        .finish();

    writer
        .compressed(2, 2)?
        .field(2, &3110u16)?
        .field(5, &3750u32)?
        .finish();

    writer.finish()
}
