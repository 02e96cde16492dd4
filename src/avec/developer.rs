//! Developer field descriptions.
//!
//! Developer fields are described in-band by `field_description` messages,
//! which give each (developer data index, field number) pair a base type, a
//! resolution and optional labels. Data records then carry developer fields
//! by size alone, and are decoded against the registered description.

use alloc::{collections::BTreeMap, string::String};

use tracing::warn;

use crate::{
    base::BaseType,
    codec::FieldSlice,
    resolution::Resolution,
    validity::DecodingStrategy,
};

use super::{FieldSpec, FromMessage, Slot};

/// The global message number of `field_description` messages.
pub const FIELD_DESCRIPTION: u16 = 206;

/// A described developer field.
#[derive(Debug, Clone, PartialEq)]
pub struct DeveloperField {
    pub developer_index: u8,
    pub number: u8,
    pub base: BaseType,
    pub resolution: Resolution,
    pub name: Option<String>,
    pub units: Option<String>,
}

/// Registered developer field descriptions, keyed by developer data index and
/// field number.
#[derive(Debug, Clone, Default)]
pub struct Descriptions {
    fields: BTreeMap<(u8, u8), DeveloperField>,
}

impl Descriptions {
    /// Register a description, replacing any earlier one for the same field.
    pub fn insert(&mut self, field: DeveloperField) {
        self.fields
            .insert((field.developer_index, field.number), field);
    }

    pub fn get(&self, developer_index: u8, number: u8) -> Option<&DeveloperField> {
        self.fields.get(&(developer_index, number))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// Receiver of the fields of a `field_description` message.
#[derive(Debug, Default)]
pub(crate) struct DescriptionRecord {
    developer_index: Option<u8>,
    number: Option<u8>,
    base_id: Option<u8>,
    name: Option<String>,
    scale: Option<u8>,
    offset: Option<i8>,
    units: Option<String>,
}

impl FromMessage for DescriptionRecord {
    fn field_spec(&self, field: u8) -> Option<FieldSpec> {
        matches!(field, 0..=3 | 6..=8).then(FieldSpec::new)
    }

    fn add_field(&mut self, field: u8, slice: &FieldSlice<'_>, strategy: DecodingStrategy) {
        match field {
            0 => self.developer_index.receive(slice, strategy),
            1 => self.number.receive(slice, strategy),
            2 => self.base_id.receive(slice, strategy),
            3 => self.name.receive(slice, strategy),
            6 => self.scale.receive(slice, strategy),
            7 => self.offset.receive(slice, strategy),
            8 => self.units.receive(slice, strategy),
            _ => {}
        }
    }
}

impl DescriptionRecord {
    /// The described field, if the message identifies one.
    pub(crate) fn into_field(self) -> Option<DeveloperField> {
        let (Some(developer_index), Some(number), Some(base_id)) =
            (self.developer_index, self.number, self.base_id)
        else {
            warn!("skipping incomplete field description");
            return None;
        };

        let base = BaseType::from_id(base_id);

        let scale = self.scale.map_or(1.0, f64::from);
        let offset = self.offset.map_or(0.0, f64::from);

        let resolution = if base.is_numeric() {
            Resolution::new(scale, offset).unwrap_or_else(|| {
                warn!(developer_index, number, scale, "ignoring invalid developer field resolution");
                Resolution::IDENTITY
            })
        } else {
            Resolution::IDENTITY
        };

        Some(DeveloperField {
            developer_index,
            number,
            base,
            resolution,
            name: self.name,
            units: self.units,
        })
    }
}
