use std::fmt;
use std::hash::{Hash, Hasher};

use serde::Serialize;

use crate::format::tiff::FieldType;

use super::directory::Directory;

/// Identity of a tag inside an EXIF block.
///
/// Two references are equal when they name the same id in the same
/// directory. The field type travels along for validation and encoding but
/// does not take part in equality or hashing.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TagRef {
    pub id: u16,
    pub directory: Directory,
    pub field_type: FieldType,
}

impl TagRef {
    pub const fn new(id: u16, directory: Directory, field_type: FieldType) -> Self {
        Self {
            id,
            directory,
            field_type,
        }
    }

    /// The same tag with a different field type.
    pub const fn with_field_type(self, field_type: FieldType) -> Self {
        Self::new(self.id, self.directory, field_type)
    }

    /// `(directory, id)` pair used as the table key.
    #[inline]
    pub const fn key(&self) -> (Directory, u16) {
        (self.directory, self.id)
    }

    /// Dictionary name, if the tag is known.
    pub fn name(&self) -> Option<&'static str> {
        super::dictionary::lookup(self.directory, self.id).map(|def| def.name)
    }
}

impl PartialEq for TagRef {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for TagRef {}

impl Hash for TagRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Display for TagRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => write!(f, "{}.{}", self.directory, name),
            None => write!(f, "{}.0x{:04X}", self.directory, self.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_identity_ignores_field_type() {
        let a = TagRef::new(0x0100, Directory::Image, FieldType::Short);
        let b = TagRef::new(0x0100, Directory::Image, FieldType::Long);
        let c = TagRef::new(0x0100, Directory::Thumbnail, FieldType::Short);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<TagRef> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_display() {
        let make = TagRef::new(0x010F, Directory::Image, FieldType::Ascii);
        assert_eq!(make.to_string(), "Image.Make");
        let unknown = TagRef::new(0xC0DE, Directory::Exif, FieldType::Long);
        assert_eq!(unknown.to_string(), "Exif.0xC0DE");
    }
}
