//! The in-memory tag store.

use std::collections::{btree_map, BTreeMap};
use std::fmt;
use std::sync::{Mutex, MutexGuard, PoisonError};

use bytes::Bytes;
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::TagError;
use crate::format::tiff::FieldType;

use super::directory::Directory;
use super::tag_ref::TagRef;
use super::value::{TagValue, TypedValue};

// =============================================================================
// TagTable
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Slot {
    field_type: FieldType,
    values: Vec<TagValue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
struct Inner {
    entries: BTreeMap<(Directory, u16), Slot>,
    thumbnails: Vec<Bytes>,
}

/// Type-checked multimap from tag reference to an ordered list of values.
///
/// Every stored value has been validated against the field type of its
/// reference, and a key only ever holds values of one field type. Iteration
/// is ordered by directory, then by tag id.
///
/// Mutation goes through a single coarse lock so accidental sharing across
/// threads stays sound; a table is still meant to be owned by one
/// read/modify/write call at a time.
#[derive(Default)]
pub struct TagTable {
    inner: Mutex<Inner>,
}

/// One tag with its values, as reported by [`TagTable::records`].
#[derive(Debug, Clone, PartialEq)]
pub struct TagRecord {
    pub directory: Directory,
    pub id: u16,
    pub name: Option<&'static str>,
    pub field_type: FieldType,
    pub values: Vec<TagValue>,
}

impl TagRecord {
    /// Values viewed through the record's field type.
    pub fn typed_values(&self) -> impl Iterator<Item = TypedValue<'_>> {
        self.values.iter().map(|value| value.typed(self.field_type))
    }
}

impl Serialize for TagRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let values: Vec<TypedValue<'_>> = self.typed_values().collect();
        let mut state = serializer.serialize_struct("TagRecord", 5)?;
        state.serialize_field("directory", &self.directory)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("name", &self.name)?;
        state.serialize_field("field_type", &self.field_type)?;
        state.serialize_field("values", &values)?;
        state.end()
    }
}

impl fmt::Display for TagRecord {
    /// `Directory.Name: v1,v2`, falling back to the hex id for unknown tags.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name {
            Some(name) => write!(f, "{}.{}: ", self.directory, name)?,
            None => write!(f, "{}.0x{:04X}: ", self.directory, self.id)?,
        }
        let mut first = true;
        for value in self.typed_values() {
            if !first {
                f.write_str(",")?;
            }
            first = false;
            write!(f, "{value}")?;
        }
        Ok(())
    }
}

impl TagTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Append one value to `tag`.
    ///
    /// # Errors
    /// - `InvalidKind`/`InteriorNul`/`EmptyBytes` if the value does not fit the field type
    /// - `FieldTypeMismatch` if the tag already holds another field type
    pub fn add(&self, tag: TagRef, value: impl Into<TagValue>) -> Result<(), TagError> {
        self.add_all(tag, [value.into()])
    }

    /// Append several values to `tag`. Nothing is stored unless all are valid.
    pub fn add_all(
        &self,
        tag: TagRef,
        values: impl IntoIterator<Item = TagValue>,
    ) -> Result<(), TagError> {
        let values = validated(tag, values)?;
        let mut inner = self.lock();
        match inner.entries.entry(tag.key()) {
            btree_map::Entry::Occupied(mut occupied) => {
                let slot = occupied.get_mut();
                if slot.field_type != tag.field_type {
                    return Err(TagError::FieldTypeMismatch {
                        tag: tag.id,
                        existing: slot.field_type,
                        requested: tag.field_type,
                    });
                }
                slot.values.extend(values);
            }
            btree_map::Entry::Vacant(vacant) => {
                vacant.insert(Slot {
                    field_type: tag.field_type,
                    values,
                });
            }
        }
        Ok(())
    }

    /// Replace every value of `tag` with `value`, adopting the reference's field type.
    pub fn set(&self, tag: TagRef, value: impl Into<TagValue>) -> Result<(), TagError> {
        self.set_all(tag, [value.into()])
    }

    /// Replace every value of `tag` with `values`.
    pub fn set_all(
        &self,
        tag: TagRef,
        values: impl IntoIterator<Item = TagValue>,
    ) -> Result<(), TagError> {
        let values = validated(tag, values)?;
        self.lock().entries.insert(
            tag.key(),
            Slot {
                field_type: tag.field_type,
                values,
            },
        );
        Ok(())
    }

    /// All values of `tag`, in insertion order.
    pub fn get(&self, tag: TagRef) -> Option<Vec<TagValue>> {
        self.lock()
            .entries
            .get(&tag.key())
            .map(|slot| slot.values.clone())
    }

    pub fn get_first(&self, tag: TagRef) -> Option<TagValue> {
        self.lock()
            .entries
            .get(&tag.key())
            .and_then(|entry| entry.values.first().cloned())
    }

    /// Field type the values of `tag` are stored with.
    pub fn field_type(&self, tag: TagRef) -> Option<FieldType> {
        self.lock()
            .entries
            .get(&tag.key())
            .map(|entry| entry.field_type)
    }

    /// Remove `tag`, returning the values it held.
    pub fn remove(&self, tag: TagRef) -> Option<Vec<TagValue>> {
        self.lock()
            .entries
            .remove(&tag.key())
            .map(|entry| entry.values)
    }

    pub fn contains(&self, tag: TagRef) -> bool {
        self.lock().entries.contains_key(&tag.key())
    }

    /// References of every stored tag, carrying their stored field types.
    pub fn keys(&self) -> Vec<TagRef> {
        self.lock()
            .entries
            .iter()
            .map(|(&(directory, id), entry)| TagRef::new(id, directory, entry.field_type))
            .collect()
    }

    /// Remove all tags and thumbnails.
    pub fn clear(&self) {
        let mut inner = self.lock();
        inner.entries.clear();
        inner.thumbnails.clear();
    }

    /// Stored tags grouped by directory, each group sorted by tag id.
    pub fn entries_by_directory(&self) -> BTreeMap<Directory, Vec<(TagRef, Vec<TagValue>)>> {
        let inner = self.lock();
        let mut grouped: BTreeMap<Directory, Vec<(TagRef, Vec<TagValue>)>> = BTreeMap::new();
        for (&(directory, id), entry) in &inner.entries {
            grouped.entry(directory).or_default().push((
                TagRef::new(id, directory, entry.field_type),
                entry.values.clone(),
            ));
        }
        grouped
    }

    /// Flat, named listing of every tag.
    pub fn records(&self) -> Vec<TagRecord> {
        self.lock()
            .entries
            .iter()
            .map(|(&(directory, id), entry)| TagRecord {
                directory,
                id,
                name: super::dictionary::lookup(directory, id).map(|def| def.name),
                field_type: entry.field_type,
                values: entry.values.clone(),
            })
            .collect()
    }

    /// Number of stored tags.
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    /// `true` when no tags are stored. Thumbnails are not counted.
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    // -------------------------------------------------------------------------
    // Thumbnails
    // -------------------------------------------------------------------------

    /// Embedded thumbnail images, in file order.
    pub fn thumbnails(&self) -> Vec<Bytes> {
        self.lock().thumbnails.clone()
    }

    pub fn add_thumbnail(&self, data: impl Into<Bytes>) {
        self.lock().thumbnails.push(data.into());
    }

    pub fn clear_thumbnails(&self) {
        self.lock().thumbnails.clear();
    }
}

fn validated(
    tag: TagRef,
    values: impl IntoIterator<Item = TagValue>,
) -> Result<Vec<TagValue>, TagError> {
    let values: Vec<TagValue> = values.into_iter().collect();
    if values.is_empty() {
        return Err(TagError::Empty(tag.id));
    }
    for value in &values {
        tag.field_type.validate(tag.id, value)?;
    }
    Ok(values)
}

impl Clone for TagTable {
    fn clone(&self) -> Self {
        Self {
            inner: Mutex::new(self.lock().clone()),
        }
    }
}

impl PartialEq for TagTable {
    fn eq(&self, other: &Self) -> bool {
        if std::ptr::eq(self, other) {
            return true;
        }
        *self.lock() == *other.lock()
    }
}

impl fmt::Debug for TagTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.lock();
        f.debug_struct("TagTable")
            .field("entries", &inner.entries)
            .field("thumbnails", &inner.thumbnails.len())
            .finish()
    }
}

impl fmt::Display for TagTable {
    /// One `Directory.Name: v1,v2` line per tag.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in self.records() {
            writeln!(f, "{record}")?;
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
