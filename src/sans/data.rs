//! Data records.

use super::{
    cursor::{Cursor, EndOfData},
    definition::{Definition, DeveloperFieldDefinition, FieldDefinition},
};

/// The content of a data record, split by its definition.
#[derive(Debug, Clone, Copy)]
pub struct DataRecord<'a> {
    definition: &'a Definition,
    bytes: &'a [u8],
}

impl<'a> DataRecord<'a> {
    /// Take the content of a data record of `definition`, following its
    /// header.
    ///
    /// The cursor advances by exactly the declared size of the record.
    pub fn decode<'c: 'a>(
        definition: &'a Definition,
        cursor: &mut Cursor<'c>,
    ) -> Result<Self, EndOfData> {
        let bytes = cursor.take_slice(definition.size())?;
        Ok(Self { definition, bytes })
    }

    pub const fn definition(&self) -> &'a Definition {
        self.definition
    }

    /// Each field with its bytes, in declared order.
    pub fn fields(&self) -> impl Iterator<Item = (&'a FieldDefinition, &'a [u8])> {
        let mut rest = self.bytes;

        self.definition.fields.iter().map(move |field| {
            let (bytes, tail) = rest.split_at(usize::from(field.size));
            rest = tail;
            (field, bytes)
        })
    }

    /// Each developer field with its bytes, in declared order.
    pub fn developer_fields(
        &self,
    ) -> impl Iterator<Item = (&'a DeveloperFieldDefinition, &'a [u8])> {
        let offset = self
            .definition
            .fields
            .iter()
            .map(|f| usize::from(f.size))
            .sum::<usize>();
        let mut rest = &self.bytes[offset..];

        self.definition.developer_fields.iter().map(move |field| {
            let (bytes, tail) = rest.split_at(usize::from(field.size));
            rest = tail;
            (field, bytes)
        })
    }
}
