use std::sync::Arc;

use thiserror::Error;

use crate::format::tiff::FieldType;
use crate::tags::{Directory, ValueKind};

/// Errors raised while scanning or re-emitting a JPEG container.
#[derive(Debug, Clone, Error)]
pub enum JpegError {
    /// Stream does not open with the SOI marker
    #[error("Not a JPEG: expected SOI marker 0xFFD8, got {0:02X?}")]
    NotAJpeg(Vec<u8>),

    /// Segment length field is smaller than the two length bytes themselves
    #[error("Invalid segment length {length} for marker 0x{marker:04X}")]
    InvalidSegmentLength { marker: u16, length: u16 },

    /// Segment claims more payload than the stream holds
    #[error("Truncated segment 0x{marker:04X}: expected {expected} payload bytes")]
    TruncatedSegment { marker: u16, expected: usize },

    /// Transformed payload cannot be described by a 16-bit length field
    #[error("Segment 0x{marker:04X} payload of {size} bytes exceeds the maximum of {max}")]
    SegmentTooLarge { marker: u16, size: usize, max: usize },

    /// Underlying reader or writer failed
    #[error("I/O error: {0}")]
    Io(Arc<std::io::Error>),
}

impl From<std::io::Error> for JpegError {
    fn from(err: std::io::Error) -> Self {
        JpegError::Io(Arc::new(err))
    }
}

/// Errors raised by the TIFF/EXIF directory codec.
#[derive(Debug, Clone, Error)]
pub enum ExifError {
    /// Segment does not start with "Exif\0\0"
    #[error("Invalid Exif header: expected \"Exif\\0\\0\", got {0:02X?}")]
    InvalidPreamble(Vec<u8>),

    /// Byte order marker is neither II nor MM
    #[error("Invalid byte order: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidByteOrder(u16),

    /// TIFF magic number is not 42
    #[error("Invalid TIFF marker: expected 0x002A, got 0x{0:04X}")]
    InvalidTiffMarker(u16),

    /// Directory entry uses a field type outside the TIFF/EXIF registry
    #[error("Unknown field type 0x{field_type:04X} for tag 0x{tag:04X} in {directory}")]
    UnknownFieldType {
        tag: u16,
        field_type: u16,
        directory: Directory,
    },

    /// A read ran past the end of the TIFF block
    #[error("Out of bounds: {len} bytes at offset {offset}, block is {size} bytes")]
    OutOfBounds { offset: u64, len: u64, size: usize },

    /// Too many directories visited, the IFD graph is cyclic or hostile
    #[error("Directory limit exceeded: visited more than {0} directories")]
    DirectoryLimitExceeded(usize),

    /// A stored value could not be encoded with its field type
    #[error("Cannot encode tag 0x{tag:04X} in {directory}: {source}")]
    Encode {
        tag: u16,
        directory: Directory,
        #[source]
        source: TagError,
    },

    /// The encoded block no longer fits in 32-bit TIFF offsets
    #[error("Encoded EXIF block too large: {0} bytes")]
    BlockTooLarge(usize),
}

/// Errors raised when storing or converting tag values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TagError {
    /// Value kind is not accepted by the tag's field type
    #[error("Tag 0x{tag:04X} ({field_type:?}) must be one of {expected:?}, given {actual:?}")]
    InvalidKind {
        tag: u16,
        field_type: FieldType,
        expected: &'static [ValueKind],
        actual: ValueKind,
    },

    /// Tag already holds values of a different field type
    #[error("Tag 0x{tag:04X} already stores {existing:?}, cannot add {requested:?}")]
    FieldTypeMismatch {
        tag: u16,
        existing: FieldType,
        requested: FieldType,
    },

    /// ASCII values are NUL terminated on disk and cannot contain NUL
    #[error("ASCII value for tag 0x{0:04X} contains a NUL byte")]
    InteriorNul(u16),

    /// No values were given
    #[error("No values given for tag 0x{0:04X}")]
    Empty(u16),

    /// A byte-family value holds no bytes; a zero-count entry cannot be read back
    #[error("Byte value for tag 0x{0:04X} is empty")]
    EmptyBytes(u16),

    /// Text could not be parsed into a value of the field type
    #[error("Cannot parse {input:?} as {field_type:?}: {message}")]
    Parse {
        field_type: FieldType,
        input: String,
        message: String,
    },

    /// Tag name is not present in the dictionary
    #[error("Unknown tag name: {0}")]
    UnknownName(String),
}

/// Top-level error returned by the read/update/write entry points.
#[derive(Debug, Clone, Error)]
pub enum Error {
    /// JPEG container error
    #[error("JPEG error: {0}")]
    Jpeg(#[from] JpegError),

    /// EXIF structure error
    #[error("EXIF error: {0}")]
    Exif(#[from] ExifError),

    /// Tag validation error
    #[error("Tag error: {0}")]
    Tag(#[from] TagError),

    /// File layer error
    #[error("I/O error: {0}")]
    Io(Arc<std::io::Error>),
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(Arc::new(err))
    }
}
