use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical TIFF directories that can appear in an EXIF segment.
///
/// Ordering follows the layout used when encoding: IFD0 first, its
/// sub-directories next, the thumbnail directory (IFD1) last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Directory {
    /// IFD0, the primary image directory
    Image,
    /// Exif sub-IFD, pointed to from IFD0
    Exif,
    /// Interoperability sub-IFD, pointed to from the Exif IFD
    Interoperability,
    /// GPS sub-IFD, pointed to from IFD0
    GpsInfo,
    /// IFD1, chained after IFD0 and describing the embedded thumbnail
    Thumbnail,
}

impl Directory {
    pub const ALL: [Directory; 5] = [
        Directory::Image,
        Directory::Exif,
        Directory::Interoperability,
        Directory::GpsInfo,
        Directory::Thumbnail,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Directory::Image => "Image",
            Directory::Exif => "Exif",
            Directory::Interoperability => "Interoperability",
            Directory::GpsInfo => "GPSInfo",
            Directory::Thumbnail => "Thumbnail",
        }
    }

    /// Case-insensitive lookup by name, accepting the short forms `Iop` and `GPS`.
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        match lower.as_str() {
            "image" | "ifd0" => Some(Directory::Image),
            "exif" => Some(Directory::Exif),
            "interoperability" | "iop" => Some(Directory::Interoperability),
            "gpsinfo" | "gps" => Some(Directory::GpsInfo),
            "thumbnail" | "ifd1" => Some(Directory::Thumbnail),
            _ => None,
        }
    }

    /// The directory holding the pointer tag that leads here, if any.
    pub const fn parent(self) -> Option<Directory> {
        match self {
            Directory::Image | Directory::Thumbnail => None,
            Directory::Exif | Directory::GpsInfo => Some(Directory::Image),
            Directory::Interoperability => Some(Directory::Exif),
        }
    }
}

impl fmt::Display for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for dir in Directory::ALL {
            assert_eq!(Directory::from_name(dir.name()), Some(dir));
        }
        assert_eq!(Directory::from_name("iop"), Some(Directory::Interoperability));
        assert_eq!(Directory::from_name("GPS"), Some(Directory::GpsInfo));
        assert_eq!(Directory::from_name("MakerNote"), None);
    }

    #[test]
    fn test_parents() {
        assert_eq!(Directory::Image.parent(), None);
        assert_eq!(Directory::Exif.parent(), Some(Directory::Image));
        assert_eq!(Directory::GpsInfo.parent(), Some(Directory::Image));
        assert_eq!(
            Directory::Interoperability.parent(),
            Some(Directory::Exif)
        );
    }
}
