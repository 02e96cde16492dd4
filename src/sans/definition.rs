//! Definition records.
//!
//! A definition record declares the layout of the data records that follow
//! it with the same local message type: the global message number, the byte
//! order of multi-byte fields, and the number, size and base type of each
//! field. A later definition for the same local message type supersedes the
//! earlier one.

use alloc::vec::Vec;

use thiserror::Error;
use zerocopy::{FromBytes, Immutable, IntoBytes};

use crate::{base::BaseType, codec::Endianness};

use super::{
    cursor::{Cursor, EndOfData},
    header::DefinitionHeader,
};

/// A definition record lists at most 255 fields of each kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Definition declares {count} fields, more than a record can list.")]
pub struct TooManyFields {
    pub count: usize,
}

#[repr(C, packed)]
#[derive(Debug, FromBytes, IntoBytes, Immutable)]
struct DefinitionMessage {
    _reserved: u8,
    architecture: u8,
    global_message: [u8; 2],
    fields: u8,
}

#[repr(C, packed)]
#[derive(Debug, FromBytes, IntoBytes, Immutable)]
struct FieldHeader {
    number: u8,
    size: u8,
    third: u8,
}

/// A field declared by a definition record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDefinition {
    pub number: u8,
    /// Size in bytes, which may hold several values of the base type.
    pub size: u8,
    pub base: BaseType,
}

/// A developer field declared by a definition record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeveloperFieldDefinition {
    pub number: u8,
    pub size: u8,
    /// Index of the developer data the field is described by.
    pub developer_index: u8,
}

/// A decoded definition record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub global: u16,
    pub endianness: Endianness,
    pub fields: Vec<FieldDefinition>,
    pub developer_fields: Vec<DeveloperFieldDefinition>,
}

impl Definition {
    /// An empty little-endian definition of a global message.
    pub const fn new(global: u16) -> Self {
        Self {
            global,
            endianness: Endianness::Little,
            fields: Vec::new(),
            developer_fields: Vec::new(),
        }
    }

    pub fn with_endianness(self, endianness: Endianness) -> Self {
        Self { endianness, ..self }
    }

    pub fn with_field(mut self, number: u8, size: u8, base: BaseType) -> Self {
        self.fields.push(FieldDefinition { number, size, base });
        self
    }

    pub fn with_developer_field(mut self, number: u8, size: u8, developer_index: u8) -> Self {
        self.developer_fields.push(DeveloperFieldDefinition {
            number,
            size,
            developer_index,
        });
        self
    }

    /// Decode the content of a definition record, following its header.
    pub fn decode(cursor: &mut Cursor<'_>, developer: bool) -> Result<Self, EndOfData> {
        let DefinitionMessage {
            architecture,
            global_message,
            fields,
            ..
        } = zerocopy::transmute!(cursor.take::<5>()?);

        let endianness = Endianness::from_architecture(architecture);
        let global = match endianness {
            Endianness::Little => u16::from_le_bytes(global_message),
            Endianness::Big => u16::from_be_bytes(global_message),
        };

        let fields = (0..fields)
            .map(|_| -> Result<_, EndOfData> {
                let FieldHeader {
                    number,
                    size,
                    third,
                } = zerocopy::transmute!(cursor.take::<3>()?);

                Ok(FieldDefinition {
                    number,
                    size,
                    base: BaseType::from_id(third),
                })
            })
            .collect::<Result<Vec<_>, EndOfData>>()?;

        let developer_fields = if developer {
            let [count] = cursor.take::<1>()?;

            (0..count)
                .map(|_| -> Result<_, EndOfData> {
                    let FieldHeader {
                        number,
                        size,
                        third,
                    } = zerocopy::transmute!(cursor.take::<3>()?);

                    Ok(DeveloperFieldDefinition {
                        number,
                        size,
                        developer_index: third,
                    })
                })
                .collect::<Result<Vec<_>, EndOfData>>()?
        } else {
            Vec::new()
        };

        Ok(Self {
            global,
            endianness,
            fields,
            developer_fields,
        })
    }

    /// The size in bytes of the content of a data record of this definition.
    pub fn size(&self) -> usize {
        let fields = self.fields.iter().map(|f| usize::from(f.size));
        let developer = self.developer_fields.iter().map(|f| usize::from(f.size));

        fields.chain(developer).sum()
    }

    /// Encode a definition record, including its header.
    ///
    /// Nothing is written if either field list is too long to declare.
    pub fn encode(&self, local: u8, out: &mut Vec<u8>) -> Result<(), TooManyFields> {
        let count = |len: usize| u8::try_from(len).map_err(|_| TooManyFields { count: len });
        let fields = count(self.fields.len())?;
        let developer_fields = count(self.developer_fields.len())?;

        let developer = developer_fields > 0;

        out.push(DefinitionHeader { local, developer }.encode());

        let global_message = match self.endianness {
            Endianness::Little => self.global.to_le_bytes(),
            Endianness::Big => self.global.to_be_bytes(),
        };

        let message = DefinitionMessage {
            _reserved: 0,
            architecture: self.endianness.architecture(),
            global_message,
            fields,
        };
        out.extend_from_slice(message.as_bytes());

        for field in &self.fields {
            let header = FieldHeader {
                number: field.number,
                size: field.size,
                third: field.base.id(),
            };
            out.extend_from_slice(header.as_bytes());
        }

        if developer {
            out.push(developer_fields);

            for field in &self.developer_fields {
                let header = FieldHeader {
                    number: field.number,
                    size: field.size,
                    third: field.developer_index,
                };
                out.extend_from_slice(header.as_bytes());
            }
        }

        Ok(())
    }
}
