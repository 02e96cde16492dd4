#![no_std]

//! A codec for Garmin's Flexible and Interoperable Data Transfer protocol.
//!
//! Cassette is built around a small field codec: every value crossing the
//! byte boundary implements [`FieldCodec`], encoding itself into the bytes of
//! a declared [`BaseType`] and decoding itself from a [`FieldSlice`]. Invalid
//! values are classified against each base type's reserved pattern, and
//! handled according to a caller-supplied [`DecodingStrategy`].
//!
//! Most users should begin with the functions and derive macros in the [`avec`]
//! module, which walk whole documents and publish messages to receivers. If
//! these prove insufficient, the record machinery they are built on is exposed
//! in the [`sans`] module.
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `derive`: enable derive macros (default).
//! - `std`: enable reader-based decoder (default).

extern crate alloc;

pub mod avec;
pub mod base;
pub mod codec;
pub mod resolution;
pub mod sans;
pub mod types;
pub mod validity;

pub use base::BaseType;
pub use codec::{Decoded, Endianness, FieldCodec, FieldSlice};
pub use resolution::Resolution;
pub use validity::DecodingStrategy;

#[doc(hidden)]
pub mod __private {
    pub use alloc::vec::Vec;
    pub use bitflags;
}
