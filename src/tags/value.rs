//! In-memory tag values.
//!
//! Each [`FieldType`] accepts a fixed set of [`ValueKind`]s; the table checks
//! the kind of every value on insertion so that encoding never meets a value
//! its codec cannot write.

use std::fmt;

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::TagError;
use crate::format::tiff::FieldType;

use super::rational::Rational;

/// Discriminant of a [`TagValue`], used for insertion-time validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bytes,
    Ascii,
    Short,
    SShort,
    Long,
    SLong,
    Rational,
    Float,
    Double,
}

/// A single decoded tag value.
///
/// BYTE, SBYTE and UNDEFINED fields hold one opaque byte string per tag;
/// every other field type holds one value per element.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TagValue {
    Bytes(#[serde(serialize_with = "serialize_hex")] Vec<u8>),
    Ascii(String),
    Short(u16),
    SShort(i16),
    Long(u32),
    SLong(i32),
    Rational(Rational),
    Float(f32),
    Double(f64),
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&hex::encode(bytes))
}

impl TagValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            TagValue::Bytes(_) => ValueKind::Bytes,
            TagValue::Ascii(_) => ValueKind::Ascii,
            TagValue::Short(_) => ValueKind::Short,
            TagValue::SShort(_) => ValueKind::SShort,
            TagValue::Long(_) => ValueKind::Long,
            TagValue::SLong(_) => ValueKind::SLong,
            TagValue::Rational(_) => ValueKind::Rational,
            TagValue::Float(_) => ValueKind::Float,
            TagValue::Double(_) => ValueKind::Double,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            TagValue::Ascii(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            TagValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_rational(&self) -> Option<Rational> {
        match self {
            TagValue::Rational(r) => Some(*r),
            _ => None,
        }
    }

    /// Unsigned integer view of SHORT and LONG values.
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            TagValue::Short(v) => Some(*v as u32),
            TagValue::Long(v) => Some(*v),
            _ => None,
        }
    }

    /// View of this value as stored under `field_type`.
    pub fn typed(&self, field_type: FieldType) -> TypedValue<'_> {
        TypedValue {
            field_type,
            value: self,
        }
    }

    /// Parse user-supplied text into values for `field_type`.
    ///
    /// Numeric types take comma-separated lists, rationals use `n/d`, and the
    /// byte-family types take a hex string.
    pub fn parse(field_type: FieldType, text: &str) -> Result<Vec<TagValue>, TagError> {
        let fail = |message: String| TagError::Parse {
            field_type,
            input: text.to_string(),
            message,
        };

        match field_type {
            FieldType::Byte | FieldType::SByte | FieldType::Undefined => {
                let digits: String = text
                    .trim()
                    .trim_start_matches("0x")
                    .chars()
                    .filter(|c| !c.is_whitespace())
                    .collect();
                let bytes = hex::decode(digits).map_err(|e| fail(e.to_string()))?;
                Ok(vec![TagValue::Bytes(bytes)])
            }
            FieldType::Ascii => Ok(vec![TagValue::Ascii(text.to_string())]),
            _ => text
                .split(',')
                .map(|item| parse_element(field_type, item.trim()).map_err(&fail))
                .collect(),
        }
    }
}

fn parse_element(field_type: FieldType, item: &str) -> Result<TagValue, String> {
    let value = match field_type {
        FieldType::Short => TagValue::Short(item.parse().map_err(|e| format!("{e}"))?),
        FieldType::SShort => TagValue::SShort(item.parse().map_err(|e| format!("{e}"))?),
        FieldType::Long => TagValue::Long(item.parse().map_err(|e| format!("{e}"))?),
        FieldType::SLong => TagValue::SLong(item.parse().map_err(|e| format!("{e}"))?),
        FieldType::Rational => {
            let (n, d) = item.split_once('/').unwrap_or((item, "1"));
            let n: u32 = n.trim().parse().map_err(|e| format!("{e}"))?;
            let d: u32 = d.trim().parse().map_err(|e| format!("{e}"))?;
            TagValue::Rational(Rational::from_unsigned(n, d))
        }
        FieldType::SRational => TagValue::Rational(item.parse()?),
        FieldType::Float => TagValue::Float(item.parse().map_err(|e| format!("{e}"))?),
        FieldType::Double => TagValue::Double(item.parse().map_err(|e| format!("{e}"))?),
        FieldType::Byte | FieldType::SByte | FieldType::Undefined | FieldType::Ascii => {
            return Err("not a list type".to_string())
        }
    };
    Ok(value)
}

impl fmt::Display for TagValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagValue::Bytes(b) => f.write_str(&hex::encode(b)),
            TagValue::Ascii(s) => f.write_str(s),
            TagValue::Short(v) => write!(f, "{v}"),
            TagValue::SShort(v) => write!(f, "{v}"),
            TagValue::Long(v) => write!(f, "{v}"),
            TagValue::SLong(v) => write!(f, "{v}"),
            TagValue::Rational(r) => write!(f, "{r}"),
            TagValue::Float(v) => write!(f, "{v}"),
            TagValue::Double(v) => write!(f, "{v}"),
        }
    }
}

/// A value paired with the field type it is stored under.
///
/// RATIONAL keeps its `u32` parts as raw bits in [`Rational`]; rendering
/// through this view prints and serializes them unsigned, in the same
/// `n/d` form [`TagValue::parse`] accepts.
#[derive(Debug, Clone, Copy)]
pub struct TypedValue<'a> {
    pub field_type: FieldType,
    pub value: &'a TagValue,
}

impl TypedValue<'_> {
    fn unsigned_rational(&self) -> Option<(u32, u32)> {
        match (self.field_type, self.value) {
            (FieldType::Rational, TagValue::Rational(r)) => Some(r.unsigned_parts()),
            _ => None,
        }
    }
}

impl fmt::Display for TypedValue<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unsigned_rational() {
            Some((n, d)) => write!(f, "{n}/{d}"),
            None => write!(f, "{}", self.value),
        }
    }
}

impl Serialize for TypedValue<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.unsigned_rational() {
            Some((n, d)) => {
                let mut state = serializer.serialize_struct("Rational", 2)?;
                state.serialize_field("numerator", &n)?;
                state.serialize_field("denominator", &d)?;
                state.end()
            }
            None => self.value.serialize(serializer),
        }
    }
}

impl From<&str> for TagValue {
    fn from(value: &str) -> Self {
        TagValue::Ascii(value.to_string())
    }
}

impl From<String> for TagValue {
    fn from(value: String) -> Self {
        TagValue::Ascii(value)
    }
}

impl From<Vec<u8>> for TagValue {
    fn from(value: Vec<u8>) -> Self {
        TagValue::Bytes(value)
    }
}

impl From<&[u8]> for TagValue {
    fn from(value: &[u8]) -> Self {
        TagValue::Bytes(value.to_vec())
    }
}

impl From<u16> for TagValue {
    fn from(value: u16) -> Self {
        TagValue::Short(value)
    }
}

impl From<i16> for TagValue {
    fn from(value: i16) -> Self {
        TagValue::SShort(value)
    }
}

impl From<u32> for TagValue {
    fn from(value: u32) -> Self {
        TagValue::Long(value)
    }
}

impl From<i32> for TagValue {
    fn from(value: i32) -> Self {
        TagValue::SLong(value)
    }
}

impl From<Rational> for TagValue {
    fn from(value: Rational) -> Self {
        TagValue::Rational(value)
    }
}

impl From<f32> for TagValue {
    fn from(value: f32) -> Self {
        TagValue::Float(value)
    }
}

impl From<f64> for TagValue {
    fn from(value: f64) -> Self {
        TagValue::Double(value)
    }
}
