//! EXIF segment decoding.
//!
//! The reader walks the IFD graph with a work queue, starting at IFD0.
//! Each directory is read in full before its tags are committed, so a
//! structural failure part-way through never leaves half a directory in the
//! result.
//!
//! # IFD Entry Layout
//!
//! ```text
//! Bytes 0-1:  Tag ID
//! Bytes 2-3:  Field type
//! Bytes 4-7:  Element count
//! Bytes 8-11: Value (when it fits in 4 bytes) or offset to value
//! ```

use std::collections::VecDeque;

use bytes::Bytes;
use tracing::{debug, warn};

use crate::error::ExifError;
use crate::io::TiffCursor;
use crate::tags::{dictionary, thumbnail, Directory, TagRef, TagTable, TagValue};

use super::field_type::FieldType;
use super::header::{has_exif_preamble, ByteOrder, TiffHeader, EXIF_PREAMBLE, INLINE_VALUE_SIZE};

/// Default bound on directories visited while decoding one segment.
pub const DEFAULT_MAX_DIRECTORIES: usize = 16;

// =============================================================================
// ReadOptions
// =============================================================================

/// Options for [`ExifReader`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReadOptions {
    /// Directories visited before decoding fails with `DirectoryLimitExceeded`
    pub max_directories: usize,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            max_directories: DEFAULT_MAX_DIRECTORIES,
        }
    }
}

impl ReadOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_directories(mut self, max_directories: usize) -> Self {
        self.max_directories = max_directories;
        self
    }
}

// =============================================================================
// ExifReader
// =============================================================================

/// Decodes an APP1 EXIF payload into a [`TagTable`].
#[derive(Debug, Clone, Default)]
pub struct ExifReader {
    options: ReadOptions,
}

/// Entries of one directory, read but not yet committed.
struct RawDirectory {
    entries: Vec<(TagRef, Vec<TagValue>)>,
    next_offset: u32,
}

impl ExifReader {
    pub fn new(options: ReadOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ReadOptions {
        &self.options
    }

    /// Decode a segment payload, failing on any structural error.
    ///
    /// An empty payload decodes to an empty table. Individual entries whose
    /// values cannot be read are logged and skipped.
    ///
    /// # Errors
    /// - `InvalidPreamble` if the payload does not start with `Exif\0\0`
    /// - `InvalidByteOrder` / `InvalidTiffMarker` for a bad TIFF header
    /// - `UnknownFieldType` for an entry with a type outside the registry
    /// - `OutOfBounds` if a directory lies outside the block
    /// - `DirectoryLimitExceeded` when the IFD graph is too large or cyclic
    pub fn decode(&self, payload: Bytes) -> Result<TagTable, ExifError> {
        match self.decode_partial(payload) {
            (table, None) => Ok(table),
            (_, Some(err)) => Err(err),
        }
    }

    /// Decode as much as possible.
    ///
    /// Returns the tags of every directory completed before the first
    /// structural error, together with that error.
    pub fn decode_partial(&self, payload: Bytes) -> (TagTable, Option<ExifError>) {
        let table = TagTable::new();
        let err = self.decode_into(payload, &table).err();
        (table, err)
    }

    fn decode_into(&self, payload: Bytes, table: &TagTable) -> Result<(), ExifError> {
        if payload.is_empty() {
            debug!("Empty EXIF payload");
            return Ok(());
        }

        if !has_exif_preamble(&payload) {
            let shown = payload.len().min(EXIF_PREAMBLE.len());
            return Err(ExifError::InvalidPreamble(payload[..shown].to_vec()));
        }

        // Offsets are relative to the byte following the preamble
        let block = payload.slice(EXIF_PREAMBLE.len()..);
        let mut cursor = TiffCursor::new(block, ByteOrder::default());
        let header = TiffHeader::parse(&mut cursor)?;

        debug!(
            byte_order = ?header.byte_order,
            ifd0_offset = header.first_ifd_offset,
            block_size = cursor.len(),
            "Decoding EXIF block"
        );

        let mut queue = VecDeque::from([(Directory::Image, header.first_ifd_offset)]);
        let mut visited = 0usize;

        while let Some((directory, offset)) = queue.pop_front() {
            visited += 1;
            if visited > self.options.max_directories {
                return Err(ExifError::DirectoryLimitExceeded(self.options.max_directories));
            }

            let raw = read_directory(&mut cursor, directory, offset)?;
            debug!(
                directory = %directory,
                offset = offset,
                entries = raw.entries.len(),
                next = raw.next_offset,
                "Read directory"
            );

            if raw.next_offset != 0 {
                queue.push_back((chained_directory(directory), raw.next_offset));
            }

            commit_directory(&cursor, directory, raw.entries, table, &mut queue);
        }

        Ok(())
    }
}

/// Directory reached through a "next IFD" offset.
fn chained_directory(directory: Directory) -> Directory {
    match directory {
        Directory::Image => Directory::Thumbnail,
        other => other,
    }
}

/// Store the entries of a directory, diverting pointer and thumbnail tags.
fn commit_directory(
    cursor: &TiffCursor,
    directory: Directory,
    entries: Vec<(TagRef, Vec<TagValue>)>,
    table: &TagTable,
    queue: &mut VecDeque<(Directory, u32)>,
) {
    let mut thumbnail_offsets: Vec<u32> = Vec::new();
    let mut thumbnail_lengths: Vec<u32> = Vec::new();

    for (tag, values) in entries {
        if let Some(target) = dictionary::pointer_target(directory, tag.id) {
            match values.first().and_then(TagValue::as_u32) {
                Some(offset) if offset != 0 => queue.push_back((target, offset)),
                _ => warn!(
                    directory = %directory,
                    tag = tag.id,
                    "Ignoring unusable {} pointer",
                    target
                ),
            }
            continue;
        }

        if directory == Directory::Thumbnail {
            if tag == thumbnail::JPEG_INTERCHANGE_FORMAT {
                thumbnail_offsets = values.iter().filter_map(TagValue::as_u32).collect();
                continue;
            }
            if tag == thumbnail::JPEG_INTERCHANGE_FORMAT_LENGTH {
                thumbnail_lengths = values.iter().filter_map(TagValue::as_u32).collect();
                continue;
            }
        }

        if let Err(err) = table.add_all(tag, values) {
            warn!(tag = %tag, "Dropping tag: {}", err);
        }
    }

    if thumbnail_offsets.len() != thumbnail_lengths.len() {
        warn!(
            offsets = thumbnail_offsets.len(),
            lengths = thumbnail_lengths.len(),
            "Thumbnail offset and length tags disagree"
        );
    }
    // Offsets and lengths pair up; unmatched extras are dropped
    for (offset, length) in thumbnail_offsets.into_iter().zip(thumbnail_lengths) {
        match cursor.slice_at(offset as u64, length as u64) {
            Ok(data) => {
                debug!(offset = offset, length = length, "Extracted thumbnail");
                table.add_thumbnail(data);
            }
            Err(err) => warn!("Dropping thumbnail: {}", err),
        }
    }
}

/// Read the entry table of one directory and its trailing next-IFD offset.
fn read_directory(
    cursor: &mut TiffCursor,
    directory: Directory,
    offset: u32,
) -> Result<RawDirectory, ExifError> {
    cursor.seek(offset)?;
    let count = cursor.read_u16()?;

    let mut entries = Vec::with_capacity(count as usize);
    for _ in 0..count {
        if let Some(entry) = read_entry(cursor, directory)? {
            entries.push(entry);
        }
    }

    let next_offset = cursor.read_u32()?;
    Ok(RawDirectory {
        entries,
        next_offset,
    })
}

/// Read one 12-byte entry and decode its values.
///
/// Returns `Ok(None)` for entries that are skipped: values out of bounds or
/// a zero-length span.
fn read_entry(
    cursor: &mut TiffCursor,
    directory: Directory,
) -> Result<Option<(TagRef, Vec<TagValue>)>, ExifError> {
    let tag = cursor.read_u16()?;
    let field_type_raw = cursor.read_u16()?;
    let count = cursor.read_u32()?;
    let value_field = cursor.read_bytes(INLINE_VALUE_SIZE)?;

    let field_type = FieldType::from_u16(field_type_raw).ok_or(ExifError::UnknownFieldType {
        tag,
        field_type: field_type_raw,
        directory,
    })?;

    let byte_length = field_type.element_size() as u64 * count as u64;
    let span = if byte_length <= INLINE_VALUE_SIZE as u64 {
        value_field.slice(..byte_length as usize)
    } else {
        let value_offset = cursor.byte_order().read_u32(&value_field);
        match cursor.slice_at(value_offset as u64, byte_length) {
            Ok(span) => span,
            Err(err) => {
                warn!(
                    directory = %directory,
                    tag = tag,
                    "Dropping tag with unreadable value: {}",
                    err
                );
                return Ok(None);
            }
        }
    };

    let values = field_type.decode(&span, cursor.byte_order());
    if values.is_empty() {
        debug!(directory = %directory, tag = tag, "Skipping tag with no values");
        return Ok(None);
    }

    Ok(Some((TagRef::new(tag, directory, field_type), values)))
}

// =============================================================================
// Tests
// =============================================================================
