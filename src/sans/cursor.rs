//! Bounds-checked reading from a byte slice.

use thiserror::Error;

/// Reading would pass the end of the available data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unexpectedly reached the end of the data at offset {offset}.")]
pub struct EndOfData {
    /// Offset of the read that could not be completed.
    pub offset: usize,
}

/// A position in a byte slice.
///
/// Offsets are absolute, counted from the start of the slice, so they can be
/// reported as document offsets.
#[derive(Debug, Clone)]
pub struct Cursor<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub const fn new(bytes: &'a [u8]) -> Self {
        Self { bytes, offset: 0 }
    }

    /// A cursor positioned at `offset`.
    pub const fn at(bytes: &'a [u8], offset: usize) -> Self {
        Self { bytes, offset }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    pub const fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.offset)
    }

    pub const fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    /// Take an exact number of bytes, advancing the cursor.
    ///
    /// The cursor does not move on failure.
    pub fn take_slice(&mut self, n: usize) -> Result<&'a [u8], EndOfData> {
        let offset = self.offset;

        let bytes = offset
            .checked_add(n)
            .and_then(|end| self.bytes.get(offset..end))
            .ok_or(EndOfData { offset })?;

        self.offset += n;
        Ok(bytes)
    }

    /// Take an array of bytes, advancing the cursor.
    pub fn take<const N: usize>(&mut self) -> Result<[u8; N], EndOfData> {
        let mut r = [0; N];
        r.copy_from_slice(self.take_slice(N)?);
        Ok(r)
    }
}
