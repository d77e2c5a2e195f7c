//! TIFF/EXIF directory codec.
//!
//! An EXIF segment carries a small TIFF block: a header followed by a graph
//! of Image File Directories. This module reads that graph into a
//! [`TagTable`](crate::tags::TagTable) and writes a table back out.
//!
//! # Key Concepts
//!
//! - **Byte order**: declared once in the TIFF header (II = little-endian,
//!   MM = big-endian) and used for every multi-byte value in the block.
//!
//! - **Offsets**: always relative to the TIFF header, the byte right after
//!   the `Exif\0\0` preamble, never to the JPEG file.
//!
//! - **IFD graph**: IFD0 (Image) chains to IFD1 (Thumbnail) through its
//!   next-IFD offset; the Exif, GPS and Interoperability directories hang off
//!   pointer tags.
//!
//! - **Inline vs offset values**: values of up to 4 bytes live in the entry
//!   itself, larger ones in a blob area addressed by offset.

mod field_type;
mod header;
mod reader;
mod writer;

pub use field_type::FieldType;
pub use header::{
    has_exif_preamble, ByteOrder, TiffHeader, EXIF_PREAMBLE, IFD_ENTRY_SIZE, INLINE_VALUE_SIZE,
    TIFF_HEADER_SIZE, TIFF_MARKER,
};
pub use reader::{ExifReader, ReadOptions, DEFAULT_MAX_DIRECTORIES};
pub use writer::{ExifWriter, WriteOptions};
