//! EXIF preamble and TIFF header handling.
//!
//! # Segment Layout
//!
//! ```text
//! Bytes 0-5:  "Exif" 0x00 0x00 preamble
//! ---- TIFF block origin: every offset below is relative to this point ----
//! Bytes 0-1:  Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3:  TIFF marker (42 = 0x002A)
//! Bytes 4-7:  Offset to IFD0 (4 bytes)
//! ```
//!
//! The byte order is declared once and holds for the whole block.

use crate::error::ExifError;
use crate::io::{
    read_u16_be, read_u16_le, read_u32_be, read_u32_le, read_u64_be, read_u64_le, write_u16_be,
    write_u16_le, write_u32_be, write_u32_le, write_u64_be, write_u64_le, TiffCursor,
};

// =============================================================================
// Constants
// =============================================================================

/// Name at the start of every EXIF segment (compared case-insensitively).
pub const EXIF_NAME: &[u8; 4] = b"Exif";

/// Full 6-byte preamble written before the TIFF block.
pub const EXIF_PREAMBLE: &[u8; 6] = b"Exif\0\0";

/// Magic bytes indicating little-endian byte order ("II" for Intel)
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Magic bytes indicating big-endian byte order ("MM" for Motorola)
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// Fixed TIFF marker following the byte order
pub const TIFF_MARKER: u16 = 0x002A;

/// Size of the TIFF header in bytes
pub const TIFF_HEADER_SIZE: usize = 8;

/// Size of one IFD entry: 2 tag + 2 type + 4 count + 4 value/offset
pub const IFD_ENTRY_SIZE: usize = 12;

/// Values up to this many bytes live inside the entry itself
pub const INLINE_VALUE_SIZE: usize = 4;

/// Check whether a segment payload starts with the EXIF preamble.
pub fn has_exif_preamble(payload: &[u8]) -> bool {
    payload.len() >= EXIF_PREAMBLE.len()
        && payload[..4].eq_ignore_ascii_case(EXIF_NAME)
        && payload[4] == 0
        && payload[5] == 0
}

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of a TIFF block.
///
/// All multi-byte values in the block must be read and written respecting
/// this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    #[default]
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Decode a byte order marker.
    pub fn from_marker(marker: u16) -> Result<Self, ExifError> {
        match marker {
            BYTE_ORDER_LITTLE_ENDIAN => Ok(ByteOrder::LittleEndian),
            BYTE_ORDER_BIG_ENDIAN => Ok(ByteOrder::BigEndian),
            _ => Err(ExifError::InvalidByteOrder(marker)),
        }
    }

    /// The two-byte marker announcing this byte order.
    pub const fn marker(self) -> u16 {
        match self {
            ByteOrder::LittleEndian => BYTE_ORDER_LITTLE_ENDIAN,
            ByteOrder::BigEndian => BYTE_ORDER_BIG_ENDIAN,
        }
    }

    #[inline]
    pub fn read_u16(self, bytes: &[u8]) -> u16 {
        match self {
            ByteOrder::LittleEndian => read_u16_le(bytes),
            ByteOrder::BigEndian => read_u16_be(bytes),
        }
    }

    #[inline]
    pub fn read_u32(self, bytes: &[u8]) -> u32 {
        match self {
            ByteOrder::LittleEndian => read_u32_le(bytes),
            ByteOrder::BigEndian => read_u32_be(bytes),
        }
    }

    #[inline]
    pub fn read_u64(self, bytes: &[u8]) -> u64 {
        match self {
            ByteOrder::LittleEndian => read_u64_le(bytes),
            ByteOrder::BigEndian => read_u64_be(bytes),
        }
    }

    #[inline]
    pub fn write_u16(self, out: &mut Vec<u8>, value: u16) {
        match self {
            ByteOrder::LittleEndian => write_u16_le(out, value),
            ByteOrder::BigEndian => write_u16_be(out, value),
        }
    }

    #[inline]
    pub fn write_u32(self, out: &mut Vec<u8>, value: u32) {
        match self {
            ByteOrder::LittleEndian => write_u32_le(out, value),
            ByteOrder::BigEndian => write_u32_be(out, value),
        }
    }

    #[inline]
    pub fn write_u64(self, out: &mut Vec<u8>, value: u64) {
        match self {
            ByteOrder::LittleEndian => write_u64_le(out, value),
            ByteOrder::BigEndian => write_u64_be(out, value),
        }
    }
}

// =============================================================================
// TiffHeader
// =============================================================================

/// Parsed TIFF header of an EXIF block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiffHeader {
    /// Byte order for all multi-byte values in the block
    pub byte_order: ByteOrder,

    /// Offset of IFD0, relative to the TIFF origin
    pub first_ifd_offset: u32,
}

impl TiffHeader {
    /// Parse the header at the cursor's origin.
    ///
    /// On success the cursor's byte order is switched to the declared one and
    /// it is left positioned just after the header.
    ///
    /// # Errors
    /// - `InvalidByteOrder` if the first two bytes are not II or MM
    /// - `InvalidTiffMarker` if the magic is not 42
    /// - `OutOfBounds` if the block is shorter than 8 bytes
    pub fn parse(cursor: &mut TiffCursor) -> Result<Self, ExifError> {
        cursor.seek(0)?;

        // Byte order markers are palindromic, any order reads them correctly
        let byte_order = ByteOrder::from_marker(cursor.read_u16()?)?;
        cursor.set_byte_order(byte_order);

        let marker = cursor.read_u16()?;
        if marker != TIFF_MARKER {
            return Err(ExifError::InvalidTiffMarker(marker));
        }

        let first_ifd_offset = cursor.read_u32()?;

        Ok(TiffHeader {
            byte_order,
            first_ifd_offset,
        })
    }

    /// Append the 8-byte header to `out`.
    pub fn write(&self, out: &mut Vec<u8>) {
        self.byte_order.write_u16(out, self.byte_order.marker());
        self.byte_order.write_u16(out, TIFF_MARKER);
        self.byte_order.write_u32(out, self.first_ifd_offset);
    }
}

// =============================================================================
// Tests
// =============================================================================
