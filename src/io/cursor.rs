use bytes::Bytes;

use crate::error::ExifError;
use crate::format::tiff::ByteOrder;

/// Bounds-checked reader over a TIFF block.
///
/// Every offset is relative to the start of the block (the byte order
/// marker), which is how TIFF offsets are expressed inside an EXIF segment.
/// Reads never panic; running off the end yields [`ExifError::OutOfBounds`].
#[derive(Debug, Clone)]
pub struct TiffCursor {
    block: Bytes,
    pos: usize,
    byte_order: ByteOrder,
}

impl TiffCursor {
    /// Create a cursor positioned at the start of `block`.
    pub fn new(block: Bytes, byte_order: ByteOrder) -> Self {
        Self {
            block,
            pos: 0,
            byte_order,
        }
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Switch the byte order used by subsequent reads.
    #[inline]
    pub fn set_byte_order(&mut self, byte_order: ByteOrder) {
        self.byte_order = byte_order;
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total size of the TIFF block in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.block.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.block.is_empty()
    }

    /// Move to an absolute offset inside the block.
    pub fn seek(&mut self, offset: u32) -> Result<(), ExifError> {
        let offset = offset as usize;
        if offset > self.block.len() {
            return Err(ExifError::OutOfBounds {
                offset: offset as u64,
                len: 0,
                size: self.block.len(),
            });
        }
        self.pos = offset;
        Ok(())
    }

    /// Zero-copy view of `len` bytes at `offset`, without moving the cursor.
    pub fn slice_at(&self, offset: u64, len: u64) -> Result<Bytes, ExifError> {
        let end = offset.checked_add(len);
        match end {
            Some(end) if end <= self.block.len() as u64 => {
                Ok(self.block.slice(offset as usize..end as usize))
            }
            _ => Err(ExifError::OutOfBounds {
                offset,
                len,
                size: self.block.len(),
            }),
        }
    }

    /// Read `len` bytes at the current position and advance past them.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes, ExifError> {
        let bytes = self.slice_at(self.pos as u64, len as u64)?;
        self.pos += len;
        Ok(bytes)
    }

    pub fn read_u16(&mut self) -> Result<u16, ExifError> {
        let bytes = self.read_bytes(2)?;
        Ok(self.byte_order.read_u16(&bytes))
    }

    pub fn read_u32(&mut self) -> Result<u32, ExifError> {
        let bytes = self.read_bytes(4)?;
        Ok(self.byte_order.read_u32(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cursor(data: &[u8], byte_order: ByteOrder) -> TiffCursor {
        TiffCursor::new(Bytes::copy_from_slice(data), byte_order)
    }

    #[test]
    fn test_sequential_reads_advance() {
        let mut c = cursor(&[0x01, 0x00, 0x02, 0x00, 0x00, 0x00], ByteOrder::LittleEndian);
        assert_eq!(c.read_u16().unwrap(), 1);
        assert_eq!(c.read_u32().unwrap(), 2);
        assert_eq!(c.position(), 6);
    }

    #[test]
    fn test_byte_order_switch() {
        let mut c = cursor(&[0x00, 0x2A, 0x00, 0x2A], ByteOrder::BigEndian);
        assert_eq!(c.read_u16().unwrap(), 42);
        c.set_byte_order(ByteOrder::LittleEndian);
        assert_eq!(c.read_u16().unwrap(), 0x2A00);
    }

    #[test]
    fn test_read_past_end_is_error() {
        let mut c = cursor(&[0x01, 0x02, 0x03], ByteOrder::BigEndian);
        assert!(matches!(
            c.read_u32(),
            Err(ExifError::OutOfBounds {
                offset: 0,
                len: 4,
                size: 3
            })
        ));
        // Failed read leaves position untouched
        assert_eq!(c.position(), 0);
    }

    #[test]
    fn test_seek_bounds() {
        let mut c = cursor(&[0u8; 8], ByteOrder::BigEndian);
        assert!(c.seek(8).is_ok());
        assert!(c.seek(9).is_err());
    }

    #[test]
    fn test_slice_at_overflow() {
        let c = cursor(&[0u8; 8], ByteOrder::BigEndian);
        assert!(c.slice_at(u64::MAX, 2).is_err());
        assert_eq!(c.slice_at(2, 4).unwrap().len(), 4);
    }
}
