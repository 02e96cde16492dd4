//! Record machinery for implementing decoders and encoders.
//!
//! This module is intended for applications that need fine control over
//! document processing. See [`crate::avec`] for implementations covering
//! common decoding patterns.
//!
//! # Architecture
//!
//! A document is a [header](header::DocumentHeader), a sequence of records,
//! and a trailing [check](check). Each record opens with a one-byte header,
//! [classified](header::record_header) as either:
//!
//! - A [definition](definition::Definition), declaring the global message,
//!   byte order and field layout for a local message type.
//! - A [data record](data::DataRecord), holding the fields of a message laid
//!   out by the last definition of its local message type.
//!
//! Data record headers may be compressed, carrying a time offset in place of
//! a timestamp field. These are resolved with a [`accumulate::Timeline`].
//!
//! Some areas of the decoding process are not represented here, and must be
//! carefully written by implementers:
//!
//! - Keeping the last definition of each local message type, and rejecting
//!   data records of undefined ones.
//!
//! - Ending decoding once the specified number of document bytes have been
//!   read.
//!
//! - Applying cyclic redundancy checks.
//!
//! Implementers are recommended to begin by studying and modifying the
//! decoder in [`crate::avec::slice`].

pub mod accumulate;
pub mod check;
pub mod cursor;
pub mod data;
pub mod definition;
pub mod header;
