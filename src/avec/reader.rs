//! Reader-based decoder implementation.
//!
//! _Requires Cargo feature `std`._

use std::{io::Read, vec::Vec};

use thiserror::Error;

use crate::sans::header::{DocumentHeader, DocumentHeaderError};

use super::{FromMessages, Options, slice};

extern crate std;

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Incorrect file header.
    #[error("Incorrect file header: {0}.")]
    Header(#[from] DocumentHeaderError),
    /// An error decoding the document read.
    #[error(transparent)]
    Slice(#[from] slice::Error),
}

/// Decode messages from a reader of a document, publishing to a receiver.
///
/// The document is read to the end of its trailing check, and decoded with
/// [`slice::decode`]. A document cut short by the reader is reported by the
/// slice decoder, with the offset at which it ends.
///
/// This method is also re-exported as `cassette::avec::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode(r: &mut impl Read, o: &mut impl FromMessages, options: Options) -> Result<(), Error> {
    let mut base = [0; 12];
    r.read_exact(&mut base)?;

    let header = DocumentHeader::decode(base)?;

    let mut buf = Vec::from(base);

    // The rest of the header, the records, and the trailing check.
    let remaining = u64::from(header.header_size - 12) + u64::from(header.data_size) + 2;
    r.by_ref().take(remaining).read_to_end(&mut buf)?;

    slice::decode(&buf, o, options)?;

    Ok(())
}
