//! Document encoder.
//!
//! A [`Writer`] accumulates definition and data records, and frames them
//! into a complete document with an extended header and both checks.
//!
//! ```
//! let mut writer = Writer::new();
//!
//! let record = Definition::new(20)
//!     .with_field(253, 4, BaseType::Uint32)
//!     .with_field(2, 2, BaseType::Uint16);
//! writer.define(0, record)?;
//!
//! writer
//!     .data(0)?
//!     .field(253, &1_000_000_000u32)?
//!     .scaled(2, &120.5f64, Resolution::scaled(5.0, 500.0))?
//!     .finish();
//!
//! let document = writer.finish()?;
//! ```

use alloc::vec::Vec;

use thiserror::Error;

use crate::{
    base::BaseType,
    codec::{EncodeError, FieldCodec, encode_field},
    resolution::Resolution,
    sans::{
        check::compute_crc,
        definition::{Definition, TooManyFields},
        header::{DataHeader, DocumentHeader},
    },
};

/// An error writing a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WriteError {
    /// Local message types are between 0 and 15, or 0 and 3 for compressed
    /// headers.
    #[error("Invalid local message type {0}.")]
    InvalidLocalMessage(u8),
    /// Compressed time offsets are between 0 and 31.
    #[error("Invalid time offset {0}.")]
    InvalidTimeOffset(u8),
    /// No definition was written for the local message type.
    #[error("Local message type {0} is not defined.")]
    UndefinedLocalMessage(u8),
    /// The definition does not declare the field.
    #[error("Field {0} is not defined.")]
    UnknownField(u8),
    /// The encoded value does not fill the declared size.
    #[error("Field {field} has size {expected}, found {found} bytes.")]
    Size {
        field: u8,
        expected: usize,
        found: usize,
    },
    /// The definition lists too many fields.
    #[error("Cannot define message: {0}")]
    Definition(#[from] TooManyFields),
    /// The records exceed the size a document header can declare.
    #[error("Records of {0} bytes exceed the document size limit.")]
    DocumentTooLarge(usize),
    /// The value could not be encoded.
    #[error("Cannot encode value: {0}")]
    Encode(#[from] EncodeError),
}

/// An encoder of records into a document.
#[derive(Debug, Default)]
pub struct Writer {
    records: Vec<u8>,
    definitions: [Option<Definition>; 16],
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a definition record, replacing any earlier definition of the
    /// local message type.
    pub fn define(&mut self, local: u8, definition: Definition) -> Result<(), WriteError> {
        let slot = self
            .definitions
            .get_mut(usize::from(local))
            .ok_or(WriteError::InvalidLocalMessage(local))?;

        definition.encode(local, &mut self.records)?;
        *slot = Some(definition);

        Ok(())
    }

    /// Begin a data record with a normal header.
    pub fn data(&mut self, local: u8) -> Result<DataWriter<'_>, WriteError> {
        self.begin(DataHeader {
            local,
            time_offset: None,
        })
    }

    /// Begin a data record with a compressed timestamp header.
    pub fn compressed(&mut self, local: u8, time_offset: u8) -> Result<DataWriter<'_>, WriteError> {
        if local > 3 {
            Err(WriteError::InvalidLocalMessage(local))?;
        }

        if time_offset > 31 {
            Err(WriteError::InvalidTimeOffset(time_offset))?;
        }

        self.begin(DataHeader {
            local,
            time_offset: Some(time_offset),
        })
    }

    fn begin(&mut self, header: DataHeader) -> Result<DataWriter<'_>, WriteError> {
        let local = header.local;

        let definition = self
            .definitions
            .get(usize::from(local))
            .ok_or(WriteError::InvalidLocalMessage(local))?
            .as_ref()
            .ok_or(WriteError::UndefinedLocalMessage(local))?;

        Ok(DataWriter {
            records: &mut self.records,
            header: header.encode(),
            fields: alloc::vec![None; definition.fields.len()],
            developer_fields: alloc::vec![None; definition.developer_fields.len()],
            definition,
        })
    }

    /// The records written so far, without framing.
    pub fn records(&self) -> &[u8] {
        &self.records
    }

    /// Frame the records into a document.
    pub fn finish(self) -> Result<Vec<u8>, WriteError> {
        let size = u32::try_from(self.records.len())
            .map_err(|_| WriteError::DocumentTooLarge(self.records.len()))?;
        let header = DocumentHeader::new(size).encode();

        let mut document = Vec::with_capacity(header.len() + self.records.len() + 2);
        document.extend_from_slice(&header);
        document.extend_from_slice(&self.records);

        let crc = compute_crc(0, &document);
        document.extend_from_slice(&crc.to_le_bytes());

        Ok(document)
    }
}

/// An encoder of a single data record.
///
/// Fields not written hold their base type's invalid pattern.
#[derive(Debug)]
pub struct DataWriter<'a> {
    records: &'a mut Vec<u8>,
    definition: &'a Definition,
    header: u8,
    fields: Vec<Option<Vec<u8>>>,
    developer_fields: Vec<Option<Vec<u8>>>,
}

impl DataWriter<'_> {
    /// Write a field without resolution.
    pub fn field<T: FieldCodec>(self, number: u8, value: &T) -> Result<Self, WriteError> {
        self.scaled(number, value, Resolution::IDENTITY)
    }

    /// Write a field with a resolution.
    ///
    /// Strings shorter than the declared size are padded with zeros.
    pub fn scaled<T: FieldCodec>(
        mut self,
        number: u8,
        value: &T,
        resolution: Resolution,
    ) -> Result<Self, WriteError> {
        let (index, field) = self
            .definition
            .fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.number == number)
            .ok_or(WriteError::UnknownField(number))?;

        let bytes = encode_field(value, field.base, resolution, self.definition.endianness)?;
        let bytes = fit(number, bytes, usize::from(field.size), field.base)?;

        self.fields[index] = Some(bytes);
        Ok(self)
    }

    /// Write the bytes of a field as they appear on the wire.
    pub fn raw(mut self, number: u8, bytes: &[u8]) -> Result<Self, WriteError> {
        let (index, field) = self
            .definition
            .fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.number == number)
            .ok_or(WriteError::UnknownField(number))?;

        if bytes.len() != usize::from(field.size) {
            Err(WriteError::Size {
                field: number,
                expected: usize::from(field.size),
                found: bytes.len(),
            })?;
        }

        self.fields[index] = Some(bytes.to_vec());
        Ok(self)
    }

    /// Write a developer field of a described base type.
    pub fn developer_field<T: FieldCodec>(
        mut self,
        developer_index: u8,
        number: u8,
        value: &T,
        base: BaseType,
        resolution: Resolution,
    ) -> Result<Self, WriteError> {
        let (index, field) = self
            .definition
            .developer_fields
            .iter()
            .enumerate()
            .find(|(_, field)| field.developer_index == developer_index && field.number == number)
            .ok_or(WriteError::UnknownField(number))?;

        let bytes = encode_field(value, base, resolution, self.definition.endianness)?;
        let bytes = fit(number, bytes, usize::from(field.size), base)?;

        self.developer_fields[index] = Some(bytes);
        Ok(self)
    }

    /// Write the record.
    pub fn finish(self) {
        let Self {
            records,
            definition,
            header,
            fields,
            developer_fields,
        } = self;

        records.push(header);

        for (field, bytes) in definition.fields.iter().zip(fields) {
            let bytes = bytes.unwrap_or_else(|| {
                let mut bytes = field.base.invalid_bytes(usize::from(field.size));
                definition.endianness.apply(field.base, &mut bytes);
                bytes
            });
            records.extend(bytes);
        }

        for (field, bytes) in definition.developer_fields.iter().zip(developer_fields) {
            // Undescribed here, so unwritten developer fields are zeroed.
            let bytes = bytes.unwrap_or_else(|| alloc::vec![0; usize::from(field.size)]);
            records.extend(bytes);
        }
    }
}

/// Fit encoded bytes to a declared size, padding strings.
fn fit(number: u8, mut bytes: Vec<u8>, size: usize, base: BaseType) -> Result<Vec<u8>, WriteError> {
    if base == BaseType::String && bytes.len() < size {
        bytes.resize(size, 0);
    }

    if bytes.len() != size {
        Err(WriteError::Size {
            field: number,
            expected: size,
            found: bytes.len(),
        })?;
    }

    Ok(bytes)
}
