//! Document and record headers.

use either::Either::{self, Left, Right};
use tartan_bitfield::bitfield;
use thiserror::Error;
use zerocopy::{FromBytes, Immutable, IntoBytes};

use super::check::compute_crc;

/// An error decoding a document header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DocumentHeaderError {
    /// Incorrect filetype marker.
    #[error("Incorrect file type marker.")]
    NotFitData,
    /// Unknown header length.
    #[error("Unknown header length ({0}).")]
    UnknownHeaderLength(u8),
}

#[repr(C, packed)]
#[derive(FromBytes, IntoBytes, Immutable)]
struct FileHeader {
    header_size: u8,
    protocol_version: u8,
    profile_version: [u8; 2],
    data_size: [u8; 4],
    data_type: [u8; 4],
}

/// The header opening a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentHeader {
    /// Either 12 or 14 bytes.
    pub header_size: u8,
    pub protocol_version: u8,
    pub profile_version: u16,
    /// The number of record bytes following the header, excluding the
    /// trailing check.
    pub data_size: u32,
    /// Check over the first 12 bytes of an extended header. Zero if absent or
    /// not computed.
    pub crc: u16,
}

impl DocumentHeader {
    pub const PROTOCOL_VERSION: u8 = 0x20;
    pub const PROFILE_VERSION: u16 = 2132;

    /// An extended header for `data_size` bytes of records.
    pub const fn new(data_size: u32) -> Self {
        Self {
            header_size: 14,
            protocol_version: Self::PROTOCOL_VERSION,
            profile_version: Self::PROFILE_VERSION,
            data_size,
            crc: 0,
        }
    }

    /// Decode the first 12 bytes of a document header.
    ///
    /// For extended headers, the remaining two bytes hold the header check,
    /// and are added with [`DocumentHeader::with_crc`].
    pub fn decode(r: [u8; 12]) -> Result<Self, DocumentHeaderError> {
        let FileHeader {
            header_size,
            protocol_version,
            profile_version,
            data_size,
            data_type,
        } = zerocopy::transmute!(r);

        if &data_type != b".FIT" {
            Err(DocumentHeaderError::NotFitData)?;
        }

        if !matches!(header_size, 12 | 14) {
            Err(DocumentHeaderError::UnknownHeaderLength(header_size))?;
        }

        Ok(Self {
            header_size,
            protocol_version,
            profile_version: u16::from_le_bytes(profile_version),
            data_size: u32::from_le_bytes(data_size),
            crc: 0,
        })
    }

    pub const fn with_crc(self, r: [u8; 2]) -> Self {
        Self {
            crc: u16::from_le_bytes(r),
            ..self
        }
    }

    /// Whether the header carries a check after its first 12 bytes.
    pub const fn is_extended(&self) -> bool {
        self.header_size == 14
    }

    /// Encode the first 12 bytes of the header.
    fn encode_base(&self) -> [u8; 12] {
        let header = FileHeader {
            header_size: self.header_size,
            protocol_version: self.protocol_version,
            profile_version: self.profile_version.to_le_bytes(),
            data_size: self.data_size.to_le_bytes(),
            data_type: *b".FIT",
        };

        zerocopy::transmute!(header)
    }

    /// Compute the check over the first 12 bytes of the header.
    pub fn compute_crc(&self) -> u16 {
        compute_crc(0, &self.encode_base())
    }

    /// Encode an extended header, computing its check.
    pub fn encode(&self) -> [u8; 14] {
        let base = self.encode_base();

        let mut r = [0; 14];
        r[..12].copy_from_slice(&base);
        r[0] = 14;

        let crc = compute_crc(0, &r[..12]);
        r[12..].copy_from_slice(&crc.to_le_bytes());

        r
    }
}

/// The header of a definition record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinitionHeader {
    /// Local message type, between 0 and 15.
    pub local: u8,
    /// Whether the definition lists developer fields.
    pub developer: bool,
}

/// The header of a data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataHeader {
    /// Local message type, between 0 and 15, or 0 and 3 when compressed.
    pub local: u8,
    /// Offset in seconds from the last timestamp, for compressed headers.
    pub time_offset: Option<u8>,
}

bitfield! {
    struct NormalHeader(u8) {
        [0..4] local: u8,
        [5] is_developer,
        [6] is_definition,
        [7] is_compressed,
    }
}

bitfield! {
    struct CompressedHeader(u8) {
        [0..5] time_offset: u8,
        [5..7] local: u8,
        [7] is_compressed,
    }
}

/// Classify a record header byte.
pub fn record_header(r: u8) -> Either<DefinitionHeader, DataHeader> {
    let header = NormalHeader(r);

    if header.is_compressed() {
        let header = CompressedHeader(r);

        Right(DataHeader {
            local: header.local(),
            time_offset: Some(header.time_offset()),
        })
    } else if header.is_definition() {
        Left(DefinitionHeader {
            local: header.local(),
            developer: header.is_developer(),
        })
    } else {
        Right(DataHeader {
            local: header.local(),
            time_offset: None,
        })
    }
}

impl DefinitionHeader {
    pub fn encode(&self) -> u8 {
        NormalHeader(0)
            .with_local(self.local)
            .with_is_developer(self.developer)
            .with_is_definition(true)
            .0
    }
}

impl DataHeader {
    pub fn encode(&self) -> u8 {
        match self.time_offset {
            Some(time_offset) => {
                CompressedHeader(0)
                    .with_time_offset(time_offset)
                    .with_local(self.local)
                    .with_is_compressed(true)
                    .0
            }
            None => NormalHeader(0).with_local(self.local).0,
        }
    }
}
