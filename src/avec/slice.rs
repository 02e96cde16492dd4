//! Slice-based decoder implementation.

use either::Either::{Left, Right};
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::{
    base::BaseType,
    codec::{FieldCodec, FieldSlice, value::Value},
    sans::{
        accumulate::{Accumulator, TIMESTAMP_FIELD, Timeline},
        check::compute_crc,
        cursor::{Cursor, EndOfData},
        data::DataRecord,
        definition::{Definition, FieldDefinition},
        header::{DataHeader, DocumentHeader, DocumentHeaderError, record_header},
    },
    validity::DecodingStrategy,
};

use super::{
    FromMessage, FromMessages, Options,
    developer::{DescriptionRecord, Descriptions, FIELD_DESCRIPTION},
};

/// Errors occurring while decoding from a slice.
///
/// Each is terminal: no records after the error are decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Unexpectedly reached the end of the slice.
    #[error("Unexpectedly reached the end of the slice at offset {offset}.")]
    EndOfSlice { offset: usize },
    /// A data record referenced a local message type without a definition.
    #[error("Data record at offset {offset} references undefined local message {local}.")]
    UndefinedLocalMessage { local: u8, offset: usize },
    /// Calculated and found CRC values do not match.
    #[error("Calculated ({calculated}) and found ({found}) CRC values do not match.")]
    CyclicRedundancyCheck { found: u16, calculated: u16 },
    /// Incorrect file header.
    #[error("Incorrect file header: {0}.")]
    Header(#[from] DocumentHeaderError),
}

impl From<EndOfData> for Error {
    fn from(EndOfData { offset }: EndOfData) -> Self {
        Self::EndOfSlice { offset }
    }
}

/// Decode messages from a slice of a document, publishing to a receiver.
///
/// This method is also re-exported as `cassette::avec::decode_slice`.
pub fn decode(r: &[u8], o: &mut impl FromMessages, options: Options) -> Result<(), Error> {
    let mut cursor = Cursor::new(r);

    let mut header = DocumentHeader::decode(cursor.take()?)?;
    if header.is_extended() {
        header = header.with_crc(cursor.take()?);

        if options.check_crc && header.crc != 0 {
            let calculated = header.compute_crc();
            if header.crc != calculated {
                Err(Error::CyclicRedundancyCheck {
                    found: header.crc,
                    calculated,
                })?;
            }
        }
    }

    let start = cursor.offset();
    let end = start.saturating_add(header.data_size as usize);

    // Apply the cyclic redundancy check before continuing.
    if options.check_crc {
        let found = u16::from_le_bytes(Cursor::at(r, end).take()?);
        let calculated = compute_crc(0, &r[..end]);

        if found != calculated {
            Err(Error::CyclicRedundancyCheck { found, calculated })?;
        }
    }

    // Records stop at the declared end, or at the end of a truncated slice.
    let records = r.get(..end).unwrap_or(r);
    let mut cursor = Cursor::at(records, start);

    let mut engine = Engine::new(options.strategy);

    while cursor.offset() < end {
        engine.record(&mut cursor, o)?;
    }

    Ok(())
}

/// State of a decoding session, threaded between records.
#[derive(Debug)]
pub(crate) struct Engine {
    strategy: DecodingStrategy,
    definitions: [Option<Definition>; 16],
    timeline: Timeline,
    accumulator: Accumulator,
    descriptions: Descriptions,
}

impl Engine {
    pub(crate) fn new(strategy: DecodingStrategy) -> Self {
        Self {
            strategy,
            definitions: Default::default(),
            timeline: Timeline::default(),
            accumulator: Accumulator::default(),
            descriptions: Descriptions::default(),
        }
    }

    /// Decode a single record.
    pub(crate) fn record(
        &mut self,
        cursor: &mut Cursor<'_>,
        o: &mut impl FromMessages,
    ) -> Result<(), Error> {
        let offset = cursor.offset();
        let [r] = cursor.take()?;

        match record_header(r) {
            Left(header) => {
                let definition = Definition::decode(cursor, header.developer)?;

                trace!(
                    offset,
                    local = header.local,
                    global = definition.global,
                    fields = definition.fields.len(),
                    developer_fields = definition.developer_fields.len(),
                    "definition record"
                );

                let slot = &mut self.definitions[usize::from(header.local)];
                if let Some(previous) = slot.replace(definition) {
                    debug!(
                        local = header.local,
                        previous = previous.global,
                        "definition supersedes an earlier one"
                    );
                }
            }
            Right(header) => self.data(header, offset, cursor, o)?,
        }

        Ok(())
    }

    fn data(
        &mut self,
        header: DataHeader,
        offset: usize,
        cursor: &mut Cursor<'_>,
        o: &mut impl FromMessages,
    ) -> Result<(), Error> {
        let Self {
            strategy,
            definitions,
            timeline,
            accumulator,
            descriptions,
        } = self;
        let strategy = *strategy;

        let Some(definition) = &definitions[usize::from(header.local)] else {
            return Err(Error::UndefinedLocalMessage {
                local: header.local,
                offset,
            });
        };

        let record = DataRecord::decode(definition, cursor)?;
        let global = definition.global;

        // Timestamps are tracked whether or not the message is received.
        let timestamp = match header.time_offset {
            Some(time_offset) => timeline.resolve(time_offset),
            None => record
                .fields()
                .find(|(field, _)| field.number == TIMESTAMP_FIELD)
                .and_then(|(field, bytes)| {
                    let slice = FieldSlice::new(bytes, field.base)
                        .with_endianness(definition.endianness);
                    u32::decode(&slice, DecodingStrategy::DropInvalid)?.valid()
                })
                .inspect(|&timestamp| timeline.set(timestamp)),
        };

        if global == FIELD_DESCRIPTION {
            let mut description = DescriptionRecord::default();
            publish(
                &record,
                &mut description,
                DecodingStrategy::DropInvalid,
                accumulator,
            );

            if let Some(field) = description.into_field() {
                trace!(
                    developer_index = field.developer_index,
                    number = field.number,
                    base = ?field.base,
                    "developer field description"
                );
                descriptions.insert(field);
            }
        }

        if let Some(o) = o.add_message(global) {
            if let Some(time_offset) = header.time_offset {
                o.add_time_offset(time_offset);
            }

            if let Some(timestamp) = timestamp {
                o.add_timestamp(timestamp);
            }

            publish(&record, o, strategy, accumulator);
            publish_developer(&record, o, strategy, descriptions);
        }

        Ok(())
    }
}

/// Publish the fields of a data record to a message receiver.
fn publish(
    record: &DataRecord<'_>,
    o: &mut (impl FromMessage + ?Sized),
    strategy: DecodingStrategy,
    accumulator: &mut Accumulator,
) {
    let definition = record.definition();

    for (field, bytes) in record.fields() {
        let Some(spec) = o.field_spec(field.number) else {
            trace!(global = definition.global, field = field.number, "skipping unknown field");
            continue;
        };

        let base = field.base;

        if let Some(expected) = spec.base.filter(|&expected| expected != base) {
            debug!(
                global = definition.global,
                field = field.number,
                ?expected,
                found = ?base,
                "unexpected base type"
            );
        }

        if bytes.len() % base.width() != 0 || bytes.is_empty() {
            warn!(
                global = definition.global,
                field = field.number,
                size = bytes.len(),
                ?base,
                "malformed field size"
            );
            o.add_field(field.number, &FieldSlice::new(bytes, BaseType::Byte), strategy);
            continue;
        }

        if !spec.resolution.is_identity() && !base.is_numeric() {
            warn!(
                global = definition.global,
                field = field.number,
                ?base,
                "skipping resolution on non-numeric field"
            );
            continue;
        }

        let slice = FieldSlice::new(bytes, base)
            .with_resolution(spec.resolution)
            .with_endianness(definition.endianness);

        let accumulated = spec
            .accumulate
            .then(|| accumulate(definition.global, field, &slice, accumulator))
            .flatten();

        match accumulated {
            Some(value) => {
                let bytes = value.to_le_bytes();
                let slice =
                    FieldSlice::new(&bytes, BaseType::Uint64).with_resolution(spec.resolution);
                o.add_field(field.number, &slice, strategy);
            }
            None => o.add_field(field.number, &slice, strategy),
        }
    }
}

/// Thread a field through its rolling counter, if it holds a single valid
/// integer.
fn accumulate(
    global: u16,
    field: &FieldDefinition,
    slice: &FieldSlice<'_>,
    accumulator: &mut Accumulator,
) -> Option<u64> {
    let base = slice.base();

    let raw = slice.bits().filter(|&bits| base.is_valid(bits))?;
    let raw = u64::try_from(base.integer(raw)?).ok()?;
    let bits = (base.width() * 8) as u32;

    Some(accumulator.accumulate(global, field.number, raw, bits))
}

/// Publish the developer fields of a data record to a message receiver.
fn publish_developer(
    record: &DataRecord<'_>,
    o: &mut (impl FromMessage + ?Sized),
    strategy: DecodingStrategy,
    descriptions: &Descriptions,
) {
    let endianness = record.definition().endianness;

    for (field, bytes) in record.developer_fields() {
        let Some(description) = descriptions.get(field.developer_index, field.number) else {
            warn!(
                developer_index = field.developer_index,
                number = field.number,
                "skipping undescribed developer field"
            );
            continue;
        };

        let slice = FieldSlice::new(bytes, description.base)
            .with_resolution(description.resolution)
            .with_endianness(endianness);

        if let Some(value) = Value::decode(&slice, strategy) {
            o.add_developer_field(description, value);
        }
    }
}
