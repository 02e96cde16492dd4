//! Schema-less message collection.

use alloc::vec::Vec;

use crate::{
    codec::{Decoded, FieldCodec, FieldSlice, value::Value},
    validity::DecodingStrategy,
};

use super::{
    FieldSpec, FromMessage, FromMessages, Options,
    developer::DeveloperField,
    slice::{self, Error},
};

/// A message with every field decoded as a [`Value`].
#[derive(Debug, Clone, PartialEq)]
pub struct Message {
    pub global: u16,
    /// The resolved timestamp, from either a compressed header or the
    /// timestamp field.
    pub timestamp: Option<u32>,
    /// Fields in declared order. Fields dropped under
    /// [`DecodingStrategy::DropInvalid`] are absent.
    pub fields: Vec<(u8, Decoded<Value>)>,
    pub developer_fields: Vec<(DeveloperField, Decoded<Value>)>,
}

impl Message {
    pub const fn new(global: u16) -> Self {
        Self {
            global,
            timestamp: None,
            fields: Vec::new(),
            developer_fields: Vec::new(),
        }
    }

    /// The last value of a field.
    pub fn field(&self, number: u8) -> Option<&Decoded<Value>> {
        self.fields
            .iter()
            .rev()
            .find_map(|(n, value)| (*n == number).then_some(value))
    }
}

impl FromMessage for Message {
    fn add_timestamp(&mut self, timestamp: u32) {
        self.timestamp = Some(timestamp);
    }

    fn field_spec(&self, _: u8) -> Option<FieldSpec> {
        Some(FieldSpec::new())
    }

    fn add_field(&mut self, field: u8, slice: &FieldSlice<'_>, strategy: DecodingStrategy) {
        if let Some(value) = Value::decode(slice, strategy) {
            self.fields.push((field, value));
        }
    }

    fn add_developer_field(&mut self, field: &DeveloperField, value: Decoded<Value>) {
        self.developer_fields.push((field.clone(), value));
    }
}

/// A receiver collecting every message of a document.
#[derive(Debug, Clone, Default)]
pub struct Messages(pub Vec<Message>);

impl FromMessages for Messages {
    fn add_message(&mut self, global: u16) -> Option<&mut dyn FromMessage> {
        self.0.push(Message::new(global));
        self.0.last_mut().map(|m| m as _)
    }
}

/// Decode every message of a document in a slice.
pub fn decode_messages(r: &[u8], options: Options) -> Result<Vec<Message>, Error> {
    let mut messages = Messages::default();
    slice::decode(r, &mut messages, options)?;
    Ok(messages.0)
}
