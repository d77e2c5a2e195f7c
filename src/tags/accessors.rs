//! Typed helpers for common IFD0 tags.

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::error::TagError;
use crate::format::tiff::FieldType;

use super::dictionary::image;
use super::rational::Rational;
use super::table::TagTable;
use super::value::TagValue;

/// Format of EXIF date/time strings.
pub const DATE_TIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

/// Value of the Orientation tag (0x0112).
///
/// Rotations are clockwise and describe what a viewer must do to display
/// the image upright.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum Orientation {
    Normal = 1,
    FlipHorizontal = 2,
    Rotate180 = 3,
    FlipVertical = 4,
    Transpose = 5,
    Rotate90 = 6,
    Transverse = 7,
    Rotate270 = 8,
}

impl Orientation {
    pub fn from_u16(value: u16) -> Option<Self> {
        Some(match value {
            1 => Orientation::Normal,
            2 => Orientation::FlipHorizontal,
            3 => Orientation::Rotate180,
            4 => Orientation::FlipVertical,
            5 => Orientation::Transpose,
            6 => Orientation::Rotate90,
            7 => Orientation::Transverse,
            8 => Orientation::Rotate270,
            _ => return None,
        })
    }

    pub const fn value(self) -> u16 {
        self as u16
    }
}

/// Value of the ResolutionUnit tag (0x0128).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum ResolutionUnit {
    None = 1,
    Inches = 2,
    Centimeters = 3,
}

impl ResolutionUnit {
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(ResolutionUnit::None),
            2 => Some(ResolutionUnit::Inches),
            3 => Some(ResolutionUnit::Centimeters),
            _ => None,
        }
    }

    pub const fn value(self) -> u16 {
        self as u16
    }
}

fn first_short(table: &TagTable, tag: super::TagRef) -> Option<u16> {
    match table.get_first(tag)? {
        TagValue::Short(v) => Some(v),
        _ => None,
    }
}

fn first_string(table: &TagTable, tag: super::TagRef) -> Option<String> {
    match table.get_first(tag)? {
        TagValue::Ascii(s) => Some(s),
        _ => None,
    }
}

impl TagTable {
    pub fn make(&self) -> Option<String> {
        first_string(self, image::MAKE)
    }

    pub fn set_make(&self, make: &str) -> Result<(), TagError> {
        self.set(image::MAKE, make)
    }

    pub fn model(&self) -> Option<String> {
        first_string(self, image::MODEL)
    }

    pub fn set_model(&self, model: &str) -> Result<(), TagError> {
        self.set(image::MODEL, model)
    }

    /// Orientation, if present and one of the eight defined values.
    pub fn orientation(&self) -> Option<Orientation> {
        first_short(self, image::ORIENTATION).and_then(Orientation::from_u16)
    }

    pub fn set_orientation(&self, orientation: Orientation) -> Result<(), TagError> {
        self.set(image::ORIENTATION, orientation.value())
    }

    /// X and Y resolution as stored.
    pub fn resolution(&self) -> Option<(Rational, Rational)> {
        let x = self.get_first(image::X_RESOLUTION)?.as_rational()?;
        let y = self.get_first(image::Y_RESOLUTION)?.as_rational()?;
        Some((x, y))
    }

    pub fn resolution_unit(&self) -> Option<ResolutionUnit> {
        first_short(self, image::RESOLUTION_UNIT).and_then(ResolutionUnit::from_u16)
    }

    /// Set XResolution, YResolution and ResolutionUnit together.
    pub fn set_resolution(
        &self,
        x: Rational,
        y: Rational,
        unit: ResolutionUnit,
    ) -> Result<(), TagError> {
        self.set(image::X_RESOLUTION, x)?;
        self.set(image::Y_RESOLUTION, y)?;
        self.set(image::RESOLUTION_UNIT, unit.value())
    }

    /// The DateTime tag parsed as `YYYY:MM:DD HH:MM:SS`.
    ///
    /// Returns `Ok(None)` when the tag is absent.
    pub fn date_time(&self) -> Result<Option<NaiveDateTime>, TagError> {
        let Some(text) = first_string(self, image::DATE_TIME) else {
            return Ok(None);
        };
        NaiveDateTime::parse_from_str(text.trim(), DATE_TIME_FORMAT)
            .map(Some)
            .map_err(|e| TagError::Parse {
                field_type: FieldType::Ascii,
                input: text,
                message: e.to_string(),
            })
    }

    pub fn set_date_time(&self, date_time: NaiveDateTime) -> Result<(), TagError> {
        self.set(
            image::DATE_TIME,
            date_time.format(DATE_TIME_FORMAT).to_string(),
        )
    }
}
