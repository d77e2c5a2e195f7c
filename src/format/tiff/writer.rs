//! EXIF segment encoding.
//!
//! Encoding happens in two passes. The first builds every directory's
//! entries and computes where each directory, blob and thumbnail will land;
//! the second serializes the block with those offsets patched in. Pointer
//! tags and thumbnail offset/length tags are always synthesized here, never
//! taken from the table.
//!
//! # Block Layout
//!
//! ```text
//! "Exif\0\0"
//! TIFF header (8 bytes, IFD0 at offset 8)
//! IFD0 (Image)            entries, next = IFD1 or 0, blobs
//! Exif IFD                entries (Interoperability pointer), next = 0, blobs
//! Interoperability IFD    entries, next = 0, blobs
//! GPS IFD                 entries, next = 0, blobs
//! IFD1 (Thumbnail)        entries, next = 0, blobs, thumbnail data
//! ```
//!
//! Absent directories are omitted; every offset is computed up front so the
//! output is deterministic for a given table.

use std::collections::BTreeMap;

use bytes::Bytes;
use tracing::debug;

use crate::error::ExifError;
use crate::tags::{dictionary, thumbnail, Directory, TagTable};

use super::field_type::FieldType;
use super::header::{
    ByteOrder, TiffHeader, EXIF_PREAMBLE, IFD_ENTRY_SIZE, INLINE_VALUE_SIZE, TIFF_HEADER_SIZE,
};

/// Directories reached through a pointer tag.
const POINTED_DIRECTORIES: [Directory; 3] = [
    Directory::Exif,
    Directory::Interoperability,
    Directory::GpsInfo,
];

// =============================================================================
// WriteOptions
// =============================================================================

/// Options for [`ExifWriter`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteOptions {
    /// Byte order of the emitted TIFF block
    pub byte_order: ByteOrder,
}

impl WriteOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }
}

// =============================================================================
// Directory Plan
// =============================================================================

/// One encoded IFD entry.
#[derive(Debug, Clone)]
struct PlannedEntry {
    id: u16,
    field_type: FieldType,
    count: u32,
    data: Vec<u8>,
}

impl PlannedEntry {
    fn longs(id: u16, values: &[u32], byte_order: ByteOrder) -> Self {
        let mut data = Vec::with_capacity(values.len() * 4);
        for &value in values {
            byte_order.write_u32(&mut data, value);
        }
        Self {
            id,
            field_type: FieldType::Long,
            count: values.len() as u32,
            data,
        }
    }

    #[inline]
    fn is_inline(&self) -> bool {
        self.data.len() <= INLINE_VALUE_SIZE
    }
}

/// Entries of one directory, sorted by tag id.
#[derive(Debug, Clone, Default)]
struct DirectoryPlan {
    entries: Vec<PlannedEntry>,
}

impl DirectoryPlan {
    /// Insert or replace an entry, keeping id order.
    fn upsert(&mut self, entry: PlannedEntry) {
        match self.entries.binary_search_by_key(&entry.id, |e| e.id) {
            Ok(index) => self.entries[index] = entry,
            Err(index) => self.entries.insert(index, entry),
        }
    }

    /// Entry count, entries and the next-IFD offset.
    fn table_size(&self) -> usize {
        2 + IFD_ENTRY_SIZE * self.entries.len() + 4
    }

    fn blob_size(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| !e.is_inline())
            .map(|e| e.data.len())
            .sum()
    }

    fn size(&self) -> usize {
        self.table_size() + self.blob_size()
    }

    /// Serialize the directory, assuming it starts at `start` in the block.
    fn write(
        &self,
        out: &mut Vec<u8>,
        start: usize,
        next_offset: u32,
        byte_order: ByteOrder,
    ) -> Result<(), ExifError> {
        let count = u16::try_from(self.entries.len())
            .map_err(|_| ExifError::BlockTooLarge(self.entries.len()))?;
        byte_order.write_u16(out, count);

        let mut blob_offset = start + self.table_size();
        for entry in &self.entries {
            byte_order.write_u16(out, entry.id);
            byte_order.write_u16(out, entry.field_type.id());
            byte_order.write_u32(out, entry.count);
            if entry.is_inline() {
                // Left-aligned, zero padded
                out.extend_from_slice(&entry.data);
                out.resize(out.len() + INLINE_VALUE_SIZE - entry.data.len(), 0);
            } else {
                byte_order.write_u32(out, blob_offset as u32);
                blob_offset += entry.data.len();
            }
        }
        byte_order.write_u32(out, next_offset);

        for entry in self.entries.iter().filter(|e| !e.is_inline()) {
            out.extend_from_slice(&entry.data);
        }
        Ok(())
    }
}

// =============================================================================
// ExifWriter
// =============================================================================

/// Encodes a [`TagTable`] into an APP1 EXIF payload.
#[derive(Debug, Clone, Default)]
pub struct ExifWriter {
    options: WriteOptions,
}

impl ExifWriter {
    pub fn new(options: WriteOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &WriteOptions {
        &self.options
    }

    /// Encode `table` into a complete segment payload, preamble included.
    ///
    /// A table with no tags and no thumbnails encodes to an empty payload.
    ///
    /// # Errors
    /// - `Encode` if a stored value cannot be written with its field type
    /// - `BlockTooLarge` if offsets or entry counts overflow their fields
    pub fn encode(&self, table: &TagTable) -> Result<Bytes, ExifError> {
        let byte_order = self.options.byte_order;
        let groups = table.entries_by_directory();
        let thumbnails = table.thumbnails();

        if groups.is_empty() && thumbnails.is_empty() {
            debug!("Nothing to encode, emitting empty EXIF payload");
            return Ok(Bytes::new());
        }

        // Pass 1a: encode user tags
        let mut plans: BTreeMap<Directory, DirectoryPlan> = BTreeMap::new();
        for (directory, tags) in groups {
            let plan = plans.entry(directory).or_default();
            for (tag, values) in tags {
                if is_structural(directory, tag.id) {
                    debug!(tag = %tag, "Skipping structural tag, it is synthesized");
                    continue;
                }
                let data = tag
                    .field_type
                    .encode(tag.id, &values, byte_order)
                    .map_err(|source| ExifError::Encode {
                        tag: tag.id,
                        directory,
                        source,
                    })?;
                let count = u32::try_from(tag.field_type.count_for(data.len()))
                    .map_err(|_| ExifError::BlockTooLarge(data.len()))?;
                plan.upsert(PlannedEntry {
                    id: tag.id,
                    field_type: tag.field_type,
                    count,
                    data,
                });
            }
        }

        // Pass 1b: decide which directories exist
        plans.retain(|&directory, plan| directory == Directory::Image || !plan.entries.is_empty());
        plans.entry(Directory::Image).or_default();
        if plans.contains_key(&Directory::Interoperability) {
            plans.entry(Directory::Exif).or_default();
        }
        if !thumbnails.is_empty() {
            plans.entry(Directory::Thumbnail).or_default();
        }

        // Pass 1c: placeholders for synthesized tags, so sizes are final
        for child in POINTED_DIRECTORIES {
            if !plans.contains_key(&child) {
                continue;
            }
            if let Some(pointer) = dictionary::pointer_to(child) {
                plans
                    .entry(pointer.directory)
                    .or_default()
                    .upsert(PlannedEntry::longs(pointer.id, &[0], byte_order));
            }
        }

        let mut thumbnail_lengths = Vec::with_capacity(thumbnails.len());
        for data in &thumbnails {
            thumbnail_lengths
                .push(u32::try_from(data.len()).map_err(|_| ExifError::BlockTooLarge(data.len()))?);
        }
        if let Some(plan) = plans.get_mut(&Directory::Thumbnail) {
            if !thumbnails.is_empty() {
                plan.upsert(PlannedEntry::longs(
                    thumbnail::JPEG_INTERCHANGE_FORMAT.id,
                    &vec![0; thumbnails.len()],
                    byte_order,
                ));
                plan.upsert(PlannedEntry::longs(
                    thumbnail::JPEG_INTERCHANGE_FORMAT_LENGTH.id,
                    &thumbnail_lengths,
                    byte_order,
                ));
            }
        }

        // Pass 1d: layout
        let mut starts: BTreeMap<Directory, usize> = BTreeMap::new();
        let mut offset = TIFF_HEADER_SIZE;
        let mut thumbnail_start = 0;
        for (&directory, plan) in &plans {
            starts.insert(directory, offset);
            offset += plan.size();
            if directory == Directory::Thumbnail {
                thumbnail_start = offset;
                offset += thumbnails.iter().map(Bytes::len).sum::<usize>();
            }
        }
        let block_size = offset;
        if u32::try_from(block_size).is_err() {
            return Err(ExifError::BlockTooLarge(block_size));
        }

        // Pass 1e: patch offsets now that the layout is fixed
        for child in POINTED_DIRECTORIES {
            let (Some(&start), Some(pointer)) = (starts.get(&child), dictionary::pointer_to(child))
            else {
                continue;
            };
            if let Some(plan) = plans.get_mut(&pointer.directory) {
                plan.upsert(PlannedEntry::longs(pointer.id, &[start as u32], byte_order));
            }
        }
        if let Some(plan) = plans.get_mut(&Directory::Thumbnail) {
            if !thumbnails.is_empty() {
                let mut offsets = Vec::with_capacity(thumbnails.len());
                let mut next = thumbnail_start;
                for data in &thumbnails {
                    offsets.push(next as u32);
                    next += data.len();
                }
                plan.upsert(PlannedEntry::longs(
                    thumbnail::JPEG_INTERCHANGE_FORMAT.id,
                    &offsets,
                    byte_order,
                ));
            }
        }

        // Pass 2: serialize
        let mut out = Vec::with_capacity(EXIF_PREAMBLE.len() + block_size);
        out.extend_from_slice(EXIF_PREAMBLE);
        let origin = out.len();

        TiffHeader {
            byte_order,
            first_ifd_offset: TIFF_HEADER_SIZE as u32,
        }
        .write(&mut out);

        for (&directory, plan) in &plans {
            let next_offset = match directory {
                Directory::Image => starts
                    .get(&Directory::Thumbnail)
                    .map_or(0, |&start| start as u32),
                _ => 0,
            };
            plan.write(&mut out, starts[&directory], next_offset, byte_order)?;
            if directory == Directory::Thumbnail {
                for data in &thumbnails {
                    out.extend_from_slice(data);
                }
            }
        }

        debug_assert_eq!(out.len() - origin, block_size);
        debug!(
            byte_order = ?byte_order,
            directories = plans.len(),
            thumbnails = thumbnails.len(),
            size = out.len(),
            "Encoded EXIF block"
        );

        Ok(Bytes::from(out))
    }
}

/// Tags whose values are derived from the layout and never copied from the table.
fn is_structural(directory: Directory, id: u16) -> bool {
    dictionary::pointer_target(directory, id).is_some()
        || (directory == Directory::Thumbnail
            && (id == thumbnail::JPEG_INTERCHANGE_FORMAT.id
                || id == thumbnail::JPEG_INTERCHANGE_FORMAT_LENGTH.id))
}

// =============================================================================
// Tests
// =============================================================================
