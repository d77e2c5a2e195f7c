//! Read, update and write EXIF metadata across a whole JPEG stream.
//!
//! The [`ExifEditor`] ties the segment scanner to the EXIF codec:
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                          ExifEditor                           │
//! │                                                               │
//! │  JPEG in ──► JpegScanner ──► APP1 "Exif\0\0"? ──► ExifReader  │
//! │                  │                 │                  │       │
//! │                  │            other segments      TagTable    │
//! │                  │            (copied as-is)          │       │
//! │                  │                 │              mutator     │
//! │                  ▼                 ▼                  ▼       │
//! │  JPEG out ◄──────────────── segment stream ◄──── ExifWriter   │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! The first APP1 segment carrying the `Exif\0\0` preamble is the one read and
//! rewritten. Other APP1 payloads such as XMP pass through untouched. When the
//! image has no APP1 segment at all, one is synthesized before the scan data.
//!
//! Byte-level entry points take `&[u8]` and return a new buffer; the `*_stream`
//! variants work on any `Read`/`Write` pair; the `*_file` variants replace
//! the file atomically.

use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::Path;

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::error::Error;
use crate::format::jpeg::{JpegScanner, Marker};
use crate::format::tiff::{has_exif_preamble, ExifReader, ExifWriter, ReadOptions, WriteOptions};
use crate::io::replace_atomically;
use crate::tags::TagTable;

// =============================================================================
// Options
// =============================================================================

/// Codec options used by an [`ExifEditor`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Options {
    pub read: ReadOptions,
    pub write: WriteOptions,
}

impl Options {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_read(mut self, read: ReadOptions) -> Self {
        self.read = read;
        self
    }

    pub fn with_write(mut self, write: WriteOptions) -> Self {
        self.write = write;
        self
    }
}

fn is_exif_payload(payload: &[u8]) -> bool {
    payload.is_empty() || has_exif_preamble(payload)
}

// =============================================================================
// ExifEditor
// =============================================================================

/// Reads and rewrites the EXIF segment of JPEG streams.
///
/// An editor holds no per-image state and can be reused and shared freely.
#[derive(Debug, Clone, Default)]
pub struct ExifEditor {
    reader: ExifReader,
    writer: ExifWriter,
}

impl ExifEditor {
    pub fn new(options: Options) -> Self {
        Self {
            reader: ExifReader::new(options.read),
            writer: ExifWriter::new(options.write),
        }
    }

    pub fn options(&self) -> Options {
        Options {
            read: *self.reader.options(),
            write: *self.writer.options(),
        }
    }

    // -------------------------------------------------------------------------
    // Read
    // -------------------------------------------------------------------------

    /// Decode the EXIF tags of a JPEG stream.
    ///
    /// A JPEG without EXIF yields an empty table.
    pub fn read_stream<R: Read>(&self, input: R) -> Result<TagTable, Error> {
        let mut found: Option<TagTable> = None;

        JpegScanner::new().process(input, io::sink(), |marker, payload: Bytes| {
            if marker == Marker::APP1 && found.is_none() && has_exif_preamble(&payload) {
                debug!(size = payload.len(), "Decoding EXIF segment");
                found = Some(self.reader.decode(payload.clone())?);
            }
            Ok::<_, Error>(payload)
        })?;

        Ok(found.unwrap_or_default())
    }

    pub fn read(&self, jpeg: &[u8]) -> Result<TagTable, Error> {
        self.read_stream(jpeg)
    }

    pub fn read_file(&self, path: &Path) -> Result<TagTable, Error> {
        self.read_stream(BufReader::new(File::open(path)?))
    }

    // -------------------------------------------------------------------------
    // Update
    // -------------------------------------------------------------------------

    /// Stream `input` to `output`, passing the EXIF tags through `mutator`.
    ///
    /// `mutator` receives the decoded tags (empty if the image had none) and
    /// returns the table to write back. Returning an empty table removes the
    /// EXIF segment. Every other segment and the scan data are copied
    /// byte for byte.
    ///
    /// # Errors
    /// Any JPEG or EXIF structural error, an error returned by `mutator`, or
    /// an I/O failure. Nothing is guaranteed about `output` on error.
    pub fn update_stream<R, W, F>(&self, input: R, output: W, mutator: F) -> Result<(), Error>
    where
        R: Read,
        W: Write,
        F: FnOnce(TagTable) -> Result<TagTable, Error>,
    {
        let mut mutator = Some(mutator);

        JpegScanner::new()
            .with_required(Marker::APP1)
            .process(input, output, |marker, payload: Bytes| {
                if marker != Marker::APP1 || !is_exif_payload(&payload) {
                    return Ok(payload);
                }
                let Some(mutator) = mutator.take() else {
                    debug!(size = payload.len(), "Keeping additional EXIF segment");
                    return Ok(payload);
                };

                let table = self.reader.decode(payload)?;
                debug!(tags = table.len(), "Applying EXIF update");
                let table = mutator(table)?;
                let encoded = self.writer.encode(&table)?;
                if encoded.is_empty() {
                    debug!("Removing EXIF segment");
                }
                Ok::<_, Error>(encoded)
            })?;

        if mutator.is_some() {
            warn!("No EXIF segment written: an APP1 segment without EXIF data already exists");
        }
        Ok(())
    }

    pub fn update<F>(&self, jpeg: &[u8], mutator: F) -> Result<Vec<u8>, Error>
    where
        F: FnOnce(TagTable) -> Result<TagTable, Error>,
    {
        let mut output = Vec::with_capacity(jpeg.len());
        self.update_stream(jpeg, &mut output, mutator)?;
        Ok(output)
    }

    /// Update `path` in place, atomically.
    ///
    /// The original file is left untouched if anything fails.
    pub fn update_file<F>(&self, path: &Path, mutator: F) -> Result<(), Error>
    where
        F: FnOnce(TagTable) -> Result<TagTable, Error>,
    {
        replace_atomically(path, |input, output| {
            self.update_stream(input, output, mutator)
        })?;
        info!(path = %path.display(), "Updated EXIF");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Write
    // -------------------------------------------------------------------------

    /// Replace all EXIF tags with `table`.
    pub fn write(&self, jpeg: &[u8], table: &TagTable) -> Result<Vec<u8>, Error> {
        self.update(jpeg, |_| Ok(table.clone()))
    }

    pub fn write_stream<R: Read, W: Write>(
        &self,
        input: R,
        output: W,
        table: &TagTable,
    ) -> Result<(), Error> {
        self.update_stream(input, output, |_| Ok(table.clone()))
    }

    pub fn write_file(&self, path: &Path, table: &TagTable) -> Result<(), Error> {
        self.update_file(path, |_| Ok(table.clone()))
    }

    // -------------------------------------------------------------------------
    // Strip / Copy
    // -------------------------------------------------------------------------

    /// Drop every EXIF segment, leaving other APP1 payloads in place.
    pub fn strip_stream<R: Read, W: Write>(&self, input: R, output: W) -> Result<(), Error> {
        JpegScanner::new().process(input, output, |marker, payload: Bytes| {
            if marker == Marker::APP1 && has_exif_preamble(&payload) {
                debug!(size = payload.len(), "Dropping EXIF segment");
                return Ok::<_, Error>(Bytes::new());
            }
            Ok(payload)
        })
    }

    pub fn strip(&self, jpeg: &[u8]) -> Result<Vec<u8>, Error> {
        let mut output = Vec::with_capacity(jpeg.len());
        self.strip_stream(jpeg, &mut output)?;
        Ok(output)
    }

    pub fn strip_file(&self, path: &Path) -> Result<(), Error> {
        replace_atomically(path, |input, output| self.strip_stream(input, output))?;
        info!(path = %path.display(), "Stripped EXIF");
        Ok(())
    }

    /// Re-emit `input` segment by segment without changing anything.
    ///
    /// Useful to normalize fill bytes and validate structure.
    pub fn copy<R: Read, W: Write>(&self, input: R, output: W) -> Result<(), Error> {
        JpegScanner::new().process(input, output, |_, payload: Bytes| Ok::<_, Error>(payload))
    }
}

// =============================================================================
// Free Functions
// =============================================================================

/// [`ExifEditor::read`] with default options.
pub fn read(jpeg: &[u8]) -> Result<TagTable, Error> {
    ExifEditor::default().read(jpeg)
}

/// [`ExifEditor::update`] with default options.
pub fn update<F>(jpeg: &[u8], mutator: F) -> Result<Vec<u8>, Error>
where
    F: FnOnce(TagTable) -> Result<TagTable, Error>,
{
    ExifEditor::default().update(jpeg, mutator)
}

/// [`ExifEditor::write`] with default options.
pub fn write(jpeg: &[u8], table: &TagTable) -> Result<Vec<u8>, Error> {
    ExifEditor::default().write(jpeg, table)
}

/// [`ExifEditor::strip`] with default options.
pub fn strip(jpeg: &[u8]) -> Result<Vec<u8>, Error> {
    ExifEditor::default().strip(jpeg)
}

/// [`ExifEditor::copy`] with default options.
pub fn copy<R: Read, W: Write>(input: R, output: W) -> Result<(), Error> {
    ExifEditor::default().copy(input, output)
}

pub fn read_file(path: impl AsRef<Path>) -> Result<TagTable, Error> {
    ExifEditor::default().read_file(path.as_ref())
}

pub fn update_file<F>(path: impl AsRef<Path>, mutator: F) -> Result<(), Error>
where
    F: FnOnce(TagTable) -> Result<TagTable, Error>,
{
    ExifEditor::default().update_file(path.as_ref(), mutator)
}

pub fn write_file(path: impl AsRef<Path>, table: &TagTable) -> Result<(), Error> {
    ExifEditor::default().write_file(path.as_ref(), table)
}

pub fn strip_file(path: impl AsRef<Path>) -> Result<(), Error> {
    ExifEditor::default().strip_file(path.as_ref())
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExifError, JpegError, TagError};
    use crate::format::tiff::ByteOrder;
    use crate::tags::{image, Rational};

    const SCAN: &[u8] = &[0xFF, 0xDA, 0x00, 0x02, 0x11, 0x22, 0xFF, 0x00, 0x33, 0xFF, 0xD9];

    fn segment(marker: Marker, payload: &[u8]) -> Vec<u8> {
        let mut out = marker.to_bytes().to_vec();
        out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
        out.extend_from_slice(payload);
        out
    }

    fn jpeg(segments: &[Vec<u8>]) -> Vec<u8> {
        let mut out = vec![0xFF, 0xD8];
        for s in segments {
            out.extend_from_slice(s);
        }
        out.extend_from_slice(SCAN);
        out
    }

    fn app0() -> Vec<u8> {
        segment(Marker::APP0, b"JFIF\0\x01\x01\0\0\x01\0\x01\0\0")
    }

    fn exif_segment(table: &TagTable) -> Vec<u8> {
        let payload = ExifWriter::default().encode(table).unwrap();
        segment(Marker::APP1, &payload)
    }

    fn camera_table() -> TagTable {
        let table = TagTable::new();
        table.set(image::MAKE, "Canon").unwrap();
        table.set(image::MODEL, "EOS 5D").unwrap();
        table.set(image::ORIENTATION, 1u16).unwrap();
        table
    }

    // -------------------------------------------------------------------------
    // Read Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_read_without_exif() {
        let table = read(&jpeg(&[app0()])).unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_read_exif() {
        let table = read(&jpeg(&[app0(), exif_segment(&camera_table())])).unwrap();
        assert_eq!(table, camera_table());
    }

    #[test]
    fn test_read_ignores_xmp() {
        let xmp = segment(Marker::APP1, b"http://ns.adobe.com/xap/1.0/\0<x/>");
        let table = read(&jpeg(&[xmp, exif_segment(&camera_table())])).unwrap();
        assert_eq!(table.make().as_deref(), Some("Canon"));
    }

    #[test]
    fn test_read_not_a_jpeg() {
        let err = read(b"GIF89a").unwrap_err();
        assert!(matches!(err, Error::Jpeg(JpegError::NotAJpeg(_))));
    }

    #[test]
    fn test_read_bad_tiff_header() {
        let bad = segment(Marker::APP1, b"Exif\0\0XX\0\x2a\0\0\0\x08");
        let err = read(&jpeg(&[bad])).unwrap_err();
        assert!(matches!(err, Error::Exif(ExifError::InvalidByteOrder(0x5858))));
    }

    // -------------------------------------------------------------------------
    // Update Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_noop_update_preserves_other_segments() {
        let input = jpeg(&[app0(), exif_segment(&camera_table())]);
        let output = update(&input, Ok).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_noop_update_without_exif_is_identity() {
        let input = jpeg(&[app0()]);
        let output = update(&input, Ok).unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_update_changes_make() {
        let input = jpeg(&[app0(), exif_segment(&camera_table())]);
        let output = update(&input, |table| {
            table.set_make("Acme")?;
            Ok(table)
        })
        .unwrap();

        assert_ne!(output.len(), input.len());
        let table = read(&output).unwrap();
        assert_eq!(table.make().as_deref(), Some("Acme"));
        assert_eq!(table.model().as_deref(), Some("EOS 5D"));
        assert!(output.ends_with(SCAN));
    }

    #[test]
    fn test_update_injects_app1_before_scan() {
        let input = jpeg(&[app0()]);
        let output = update(&input, |table| {
            table.set(image::X_RESOLUTION, Rational::new(2, 4))?;
            Ok(table)
        })
        .unwrap();

        let table = read(&output).unwrap();
        assert_eq!(
            table.get_first(image::X_RESOLUTION).and_then(|v| v.as_rational()),
            Some(Rational::new(2, 4))
        );

        // SOI, APP0, then the new APP1, then the untouched scan
        let app0 = app0();
        assert_eq!(&output[2..2 + app0.len()], app0.as_slice());
        assert_eq!(&output[2 + app0.len()..2 + app0.len() + 2], &[0xFF, 0xE1]);
        assert!(output.ends_with(SCAN));
    }

    #[test]
    fn test_update_keeps_xmp_and_skips_injection() {
        let xmp = segment(Marker::APP1, b"http://ns.adobe.com/xap/1.0/\0<x/>");
        let input = jpeg(&[xmp]);
        let output = update(&input, |table| {
            table.set_make("Acme")?;
            Ok(table)
        })
        .unwrap();
        assert_eq!(output, input);
    }

    #[test]
    fn test_update_mutator_error_propagates() {
        let input = jpeg(&[exif_segment(&camera_table())]);
        let err = update(&input, |_| Err(TagError::UnknownName("Nope".into()).into())).unwrap_err();
        assert!(matches!(err, Error::Tag(TagError::UnknownName(_))));
    }

    #[test]
    fn test_write_big_endian() {
        let editor = ExifEditor::new(
            Options::new().with_write(WriteOptions::new().with_byte_order(ByteOrder::BigEndian)),
        );
        let output = editor.write(&jpeg(&[app0()]), &camera_table()).unwrap();
        let start = output
            .windows(6)
            .position(|w| w == b"Exif\0\0")
            .unwrap();
        assert_eq!(&output[start + 6..start + 8], b"MM");
        assert_eq!(editor.read(&output).unwrap(), camera_table());
    }

    // -------------------------------------------------------------------------
    // Strip / Copy Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_write_empty_table_strips() {
        let input = jpeg(&[app0(), exif_segment(&camera_table())]);
        let output = write(&input, &TagTable::new()).unwrap();
        assert_eq!(output, jpeg(&[app0()]));
    }

    #[test]
    fn test_strip_keeps_xmp() {
        let xmp = segment(Marker::APP1, b"http://ns.adobe.com/xap/1.0/\0<x/>");
        let input = jpeg(&[exif_segment(&camera_table()), xmp.clone()]);
        assert_eq!(strip(&input).unwrap(), jpeg(&[xmp]));
    }

    #[test]
    fn test_copy_is_identity() {
        let input = jpeg(&[app0(), exif_segment(&camera_table())]);
        let mut output = Vec::new();
        copy(input.as_slice(), &mut output).unwrap();
        assert_eq!(output, input);
    }
}
