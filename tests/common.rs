#![cfg(feature = "std")]

mod support;

use cassette::{
    DecodingStrategy, Endianness, FieldCodec, FieldSlice,
    avec::{FieldSpec, FromMessage, FromMessages, Options},
    codec::value::Value,
};
use csv::ReaderBuilder;

#[test]
fn decode_slice_little_endian() {
    let data = support::activity(Endianness::Little);
    let mut validator = Validator::new(support::ACTIVITY);
    cassette::avec::decode_slice(&data, &mut validator, Options::default()).unwrap();
    validator.finish();
}

#[test]
fn decode_slice_big_endian() {
    let data = support::activity(Endianness::Big);
    let mut validator = Validator::new(support::ACTIVITY);
    cassette::avec::decode_slice(&data, &mut validator, Options::default()).unwrap();
    validator.finish();
}

#[test]
fn decode_reader_little_endian() {
    let data = support::activity(Endianness::Little);
    let mut validator = Validator::new(support::ACTIVITY);
    cassette::avec::decode_reader(&mut data.as_slice(), &mut validator, Options::default())
        .unwrap();
    validator.finish();
}

#[test]
fn decode_reader_big_endian() {
    let data = support::activity(Endianness::Big);
    let mut validator = Validator::new(support::ACTIVITY);
    let mut reader = std::io::Cursor::new(data);
    cassette::avec::decode_reader(&mut reader, &mut validator, Options::default()).unwrap();
    validator.finish();
}

/// Checks messages against a table of expected generic values.
struct Validator {
    row: Vec<String>,
    expected: Vec<Vec<String>>,
    timestamps: Vec<u32>,
}

impl Validator {
    fn new(table: &str) -> Self {
        let mut reader = ReaderBuilder::new()
            .flexible(true)
            .has_headers(false)
            .from_reader(table.as_bytes());

        let expected: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(|f| f.to_string()).collect())
            .collect();

        Self {
            row: vec![],
            expected,
            timestamps: vec![],
        }
    }

    fn finish(self) {
        assert!(self.row.is_empty(), "unreceived fields: {:?}", self.row);
        assert!(self.expected.is_empty(), "unreceived messages: {:?}", self.expected);
        assert_eq!(self.timestamps, support::TIMESTAMPS);
    }
}

impl FromMessages for Validator {
    fn add_message(&mut self, global: u16) -> Option<&mut dyn FromMessage> {
        assert!(self.row.is_empty(), "unreceived fields: {:?}", self.row);
        self.row = self.expected.remove(0);
        assert_eq!(self.row.remove(0), global.to_string());
        Some(self)
    }
}

impl FromMessage for Validator {
    fn add_timestamp(&mut self, timestamp: u32) {
        self.timestamps.push(timestamp);
    }

    fn field_spec(&self, _: u8) -> Option<FieldSpec> {
        Some(FieldSpec::new())
    }

    fn add_field(&mut self, field: u8, slice: &FieldSlice<'_>, strategy: DecodingStrategy) {
        let Some(value) = Value::decode(slice, strategy) else {
            return;
        };

        assert_eq!(self.row.remove(0), field.to_string());
        assert_eq!(self.row.remove(0), text(&value.into_inner()), "field {field}");
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::Signed(v) => v.to_string(),
        Value::Unsigned(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Text(v) => v.clone(),
        Value::Bytes(v) => format!("{v:02x?}"),
        Value::Array(v) => v.iter().map(text).collect::<Vec<_>>().join("|"),
    }
}
