//! Convenience interfaces for common decoding patterns.
//!
//! The functions in this module are suited to decoding messages from files
//! and data slices, publishing to the [`FromMessages`] and [`FromMessage`]
//! traits. Messages can also be collected without a schema with
//! [`decode_messages`], and documents written with [`Writer`].
//!
//! In many cases (when messages are of a known shape), these traits can be
//! derived. See the [`FromMessages`](macro@FromMessages) and
//! [`FromMessage`](macro@FromMessage) macros for details.

pub mod developer;
pub mod message;
#[cfg(feature = "std")]
pub mod reader;
pub mod slice;
pub mod writer;

pub use message::{Message, decode_messages};
#[cfg(feature = "std")]
pub use reader::decode as decode_reader;
pub use slice::decode as decode_slice;
pub use writer::{DataWriter, WriteError, Writer};

use crate::{
    base::BaseType,
    codec::{Decoded, FieldCodec, FieldSlice, value::Value},
    resolution::Resolution,
    validity::DecodingStrategy,
};

use developer::DeveloperField;

/// Options for a decoding session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Options {
    /// Handling of fields holding their base type's invalid pattern.
    pub strategy: DecodingStrategy,
    /// Whether to verify the document's cyclic redundancy checks.
    pub check_crc: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            strategy: DecodingStrategy::DropInvalid,
            check_crc: true,
        }
    }
}

impl Options {
    pub const fn with_strategy(self, strategy: DecodingStrategy) -> Self {
        Self { strategy, ..self }
    }

    pub const fn with_check_crc(self, check_crc: bool) -> Self {
        Self { check_crc, ..self }
    }
}

/// Derive [`FromMessages`] for a struct holding a collection of messages.
///
/// _Requires Cargo feature `derive`._
///
/// # Example
///
/// To collect a single message, add the `message(N)` attribute to an
/// `Option<T>` struct field, where `N` is the global message number and `T`
/// is a type implementing [`FromMessage`] and [`Default`]. Additional messages
/// received for the same message number will overwrite earlier ones. To
/// collect multiple occurrences of a message, apply the attribute to a
/// `Vec<T>` instead.
///
/// ```
/// #[derive(Debug, Default, FromMessages)]
/// struct Activity {
///     #[message(0)]
///     file_id: Option<FileId>,
///     #[message(20)]
///     records: Vec<Record>,
/// }
/// ```
#[cfg(feature = "derive")]
pub use cassette_derive::FromMessages;

/// Produce message receivers for a document.
///
/// See the [`FromMessages`](macro@FromMessages) derive macro for an
/// automatic implementation of this trait.
pub trait FromMessages {
    /// Retrieve a receiver for a message, if one exists.
    fn add_message(&mut self, global: u16) -> Option<&mut dyn FromMessage>;
}

/// Derive [`FromMessage`] for a struct representing a single message.
///
/// _Requires Cargo feature `derive`._
///
/// # Examples
///
/// To receive a field, add the `field(N)` attribute to a struct field of a
/// type implementing [`Slot`], where `N` is the field number. This covers
/// `Option<T>` and `Option<Decoded<T>>` for any `T` implementing
/// [`FieldCodec`]. Additional values received for the same field replace
/// earlier ones.
///
/// Fields decoded into `f32` or `f64` take a resolution from `scale` and
/// `offset` arguments. Fields carrying a rolling counter are widened with
/// `accumulate`. The expected base type may be declared with `base`, and a
/// differing base type on the wire is logged.
///
/// To receive the time offset stored in compressed timestamp headers, supply
/// `time` in place of a field number. To receive the resolved timestamp of
/// the message, from either a compressed header or its timestamp field,
/// supply `timestamp`.
///
/// ```
/// #[derive(Debug, Default, FromMessage)]
/// struct Record {
///     #[field(timestamp)]
///     timestamp: Option<u32>,
///     #[field(0)]
///     position_lat: Option<i32>,
///     #[field(2, scale = 5, offset = 500, base = uint16)]
///     altitude: Option<f64>,
///     #[field(5, scale = 100, accumulate)]
///     distance: Option<f64>,
///     #[field(13)]
///     temperature: Option<Decoded<i8>>,
/// }
/// ```
///
/// To receive values into arbitrary types, supply a handler closure. Since
/// the decoded type cannot be inferred, the second argument must be typed.
///
/// ```
/// #[derive(Debug, Default, FromMessage)]
/// struct Course {
///     #[field(5, |v, name: String| v.push(name))]
///     names: Vec<String>,
/// }
/// ```
#[cfg(feature = "derive")]
pub use cassette_derive::FromMessage;

/// How to decode a field of a message.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    /// The base type the field is expected to have on the wire.
    pub base: Option<BaseType>,
    pub resolution: Resolution,
    /// Whether the field carries a rolling counter.
    pub accumulate: bool,
}

impl FieldSpec {
    pub const fn new() -> Self {
        Self {
            base: None,
            resolution: Resolution::IDENTITY,
            accumulate: false,
        }
    }

    pub const fn with_base(self, base: BaseType) -> Self {
        Self {
            base: Some(base),
            ..self
        }
    }

    /// # Panics
    ///
    /// Panics if `scale` is zero or either component is not finite.
    pub fn with_resolution(self, scale: f64, offset: f64) -> Self {
        Self {
            resolution: Resolution::scaled(scale, offset),
            ..self
        }
    }

    pub const fn accumulated(self) -> Self {
        Self {
            accumulate: true,
            ..self
        }
    }
}

impl Default for FieldSpec {
    fn default() -> Self {
        Self::new()
    }
}

/// Receive field values for a message.
///
/// Fields are only decoded if [`FromMessage::field_spec`] returns a
/// specification for their number. Others are skipped.
///
/// The default implementation of each method ignores received values.
///
/// See the [`FromMessage`](macro@FromMessage) derive macro for an automatic
/// implementation of this trait.
#[allow(unused_variables)]
pub trait FromMessage {
    /// Add the compressed time offset to the message.
    fn add_time_offset(&mut self, offset: u8) {}
    /// Add the resolved timestamp to the message.
    fn add_timestamp(&mut self, timestamp: u32) {}
    /// Specify how to decode a field, or [`None`] to skip it.
    fn field_spec(&self, field: u8) -> Option<FieldSpec> {
        None
    }
    /// Add a field to the message.
    ///
    /// The slice carries the resolution from the field's specification. Its
    /// base type is that declared on the wire.
    fn add_field(&mut self, field: u8, slice: &FieldSlice<'_>, strategy: DecodingStrategy) {}
    /// Add a described developer field to the message.
    fn add_developer_field(&mut self, field: &DeveloperField, value: Decoded<Value>) {}
}

/// A place to store a decoded field.
pub trait Slot {
    /// Decode a field into this slot, leaving it unchanged if the field is
    /// dropped or cannot be represented.
    fn receive(&mut self, slice: &FieldSlice<'_>, strategy: DecodingStrategy);
}

impl<T: FieldCodec> Slot for Option<T> {
    fn receive(&mut self, slice: &FieldSlice<'_>, strategy: DecodingStrategy) {
        if let Some(value) = T::decode(slice, strategy) {
            *self = Some(value.into_inner());
        }
    }
}

impl<T: FieldCodec> Slot for Option<Decoded<T>> {
    fn receive(&mut self, slice: &FieldSlice<'_>, strategy: DecodingStrategy) {
        if let Some(value) = T::decode(slice, strategy) {
            *self = Some(value);
        }
    }
}
