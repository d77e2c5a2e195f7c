//! TIFF/EXIF field types and their binary codecs.
//!
//! Each [`FieldType`] maps to one codec family. Signed variants share the
//! codec of their unsigned sibling and differ only in the value kind they
//! produce, so the dispatch table has seven rows for twelve types.

use serde::Serialize;

use crate::error::TagError;
use crate::tags::{Rational, TagValue, ValueKind};

use super::header::ByteOrder;

// =============================================================================
// FieldType
// =============================================================================

/// The twelve field types defined by TIFF 6.0 and EXIF 2.x.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer
    Byte = 1,

    /// NUL-terminated 7-bit ASCII
    Ascii = 2,

    /// Unsigned 16-bit integer
    Short = 3,

    /// Unsigned 32-bit integer
    Long = 4,

    /// Two unsigned 32-bit integers, numerator then denominator
    Rational = 5,

    /// Signed 8-bit integer
    SByte = 6,

    /// Opaque 8-bit data
    Undefined = 7,

    /// Signed 16-bit integer
    SShort = 8,

    /// Signed 32-bit integer
    SLong = 9,

    /// Two signed 32-bit integers
    SRational = 10,

    /// IEEE 754 single precision
    Float = 11,

    /// IEEE 754 double precision
    Double = 12,
}

impl FieldType {
    pub const ALL: [FieldType; 12] = [
        FieldType::Byte,
        FieldType::Ascii,
        FieldType::Short,
        FieldType::Long,
        FieldType::Rational,
        FieldType::SByte,
        FieldType::Undefined,
        FieldType::SShort,
        FieldType::SLong,
        FieldType::SRational,
        FieldType::Float,
        FieldType::Double,
    ];

    /// Look up a field type by its numeric id.
    ///
    /// Returns `None` for ids outside the registry.
    pub fn from_u16(value: u16) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.id() == value)
    }

    #[inline]
    pub const fn id(self) -> u16 {
        self as u16
    }

    /// Size of a single element in bytes.
    #[inline]
    pub const fn element_size(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
        }
    }

    /// Value kinds this field type stores.
    pub const fn accepted_kinds(self) -> &'static [ValueKind] {
        match self {
            FieldType::Byte | FieldType::SByte | FieldType::Undefined => &[ValueKind::Bytes],
            FieldType::Ascii => &[ValueKind::Ascii],
            FieldType::Short => &[ValueKind::Short],
            FieldType::SShort => &[ValueKind::SShort],
            FieldType::Long => &[ValueKind::Long],
            FieldType::SLong => &[ValueKind::SLong],
            FieldType::Rational | FieldType::SRational => &[ValueKind::Rational],
            FieldType::Float => &[ValueKind::Float],
            FieldType::Double => &[ValueKind::Double],
        }
    }

    #[inline]
    pub fn accepts(self, kind: ValueKind) -> bool {
        self.accepted_kinds().contains(&kind)
    }

    /// Check that `value` can be stored under `tag` with this field type.
    ///
    /// # Errors
    /// - `InvalidKind` if the value's kind is not accepted
    /// - `InteriorNul` for ASCII text containing a NUL byte
    /// - `EmptyBytes` for a byte-family value with no bytes
    pub fn validate(self, tag: u16, value: &TagValue) -> Result<(), TagError> {
        let kind = value.kind();
        if !self.accepts(kind) {
            return Err(TagError::InvalidKind {
                tag,
                field_type: self,
                expected: self.accepted_kinds(),
                actual: kind,
            });
        }
        match value {
            TagValue::Ascii(text) if text.contains('\0') => Err(TagError::InteriorNul(tag)),
            TagValue::Bytes(bytes) if bytes.is_empty() => Err(TagError::EmptyBytes(tag)),
            _ => Ok(()),
        }
    }

    /// Decode a span of bytes into values.
    ///
    /// Reads until the span is exhausted; a trailing partial element is
    /// ignored. An empty span yields no values.
    pub fn decode(self, bytes: &[u8], byte_order: ByteOrder) -> Vec<TagValue> {
        if bytes.is_empty() {
            return Vec::new();
        }
        (self.codec().decode)(self, bytes, byte_order)
    }

    /// Encode values into the bytes stored for an IFD entry.
    ///
    /// # Errors
    /// Returns the validation error of the first value this type cannot store.
    pub fn encode(
        self,
        tag: u16,
        values: &[TagValue],
        byte_order: ByteOrder,
    ) -> Result<Vec<u8>, TagError> {
        let mut out = Vec::with_capacity(self.size_in_bytes(values));
        let codec = self.codec();
        for value in values {
            self.validate(tag, value)?;
            (codec.encode)(value, byte_order, &mut out);
        }
        Ok(out)
    }

    /// Encoded size of `values`, ASCII terminators included.
    pub fn size_in_bytes(self, values: &[TagValue]) -> usize {
        let codec = self.codec();
        values.iter().map(|v| (codec.size)(self, v)).sum()
    }

    /// Element count written into the IFD entry for an encoded span.
    #[inline]
    pub fn count_for(self, byte_len: usize) -> usize {
        byte_len / self.element_size()
    }

    fn codec(self) -> &'static Codec {
        let family = match self {
            FieldType::Byte | FieldType::SByte | FieldType::Undefined => CodecFamily::Bytes,
            FieldType::Ascii => CodecFamily::Ascii,
            FieldType::Short | FieldType::SShort => CodecFamily::Int16,
            FieldType::Long | FieldType::SLong => CodecFamily::Int32,
            FieldType::Rational | FieldType::SRational => CodecFamily::Rational,
            FieldType::Float => CodecFamily::Float,
            FieldType::Double => CodecFamily::Double,
        };
        &CODECS[family as usize]
    }
}

// =============================================================================
// Codec Dispatch Table
// =============================================================================

#[derive(Clone, Copy)]
enum CodecFamily {
    Bytes = 0,
    Ascii = 1,
    Int16 = 2,
    Int32 = 3,
    Rational = 4,
    Float = 5,
    Double = 6,
}

/// Pure encode/decode/size functions for one codec family.
///
/// `encode` is only called with values that passed [`FieldType::validate`];
/// any other kind is skipped.
struct Codec {
    decode: fn(FieldType, &[u8], ByteOrder) -> Vec<TagValue>,
    encode: fn(&TagValue, ByteOrder, &mut Vec<u8>),
    size: fn(FieldType, &TagValue) -> usize,
}

static CODECS: [Codec; 7] = [
    Codec {
        decode: decode_bytes,
        encode: encode_bytes,
        size: size_bytes,
    },
    Codec {
        decode: decode_ascii,
        encode: encode_ascii,
        size: size_ascii,
    },
    Codec {
        decode: decode_int16,
        encode: encode_int16,
        size: size_fixed,
    },
    Codec {
        decode: decode_int32,
        encode: encode_int32,
        size: size_fixed,
    },
    Codec {
        decode: decode_rational,
        encode: encode_rational,
        size: size_fixed,
    },
    Codec {
        decode: decode_float,
        encode: encode_float,
        size: size_fixed,
    },
    Codec {
        decode: decode_double,
        encode: encode_double,
        size: size_fixed,
    },
];

fn size_fixed(field_type: FieldType, _value: &TagValue) -> usize {
    field_type.element_size()
}

// -----------------------------------------------------------------------------
// Byte, SByte, Undefined
// -----------------------------------------------------------------------------

fn decode_bytes(_: FieldType, bytes: &[u8], _: ByteOrder) -> Vec<TagValue> {
    vec![TagValue::Bytes(bytes.to_vec())]
}

fn encode_bytes(value: &TagValue, _: ByteOrder, out: &mut Vec<u8>) {
    if let TagValue::Bytes(b) = value {
        out.extend_from_slice(b);
    }
}

fn size_bytes(_: FieldType, value: &TagValue) -> usize {
    value.as_bytes().map_or(0, <[u8]>::len)
}

// -----------------------------------------------------------------------------
// Ascii
// -----------------------------------------------------------------------------

fn decode_ascii(_: FieldType, bytes: &[u8], _: ByteOrder) -> Vec<TagValue> {
    let mut values: Vec<TagValue> = bytes
        .split(|&b| b == 0)
        .filter(|run| !run.is_empty())
        .map(|run| TagValue::Ascii(String::from_utf8_lossy(run).into_owned()))
        .collect();
    if values.is_empty() {
        values.push(TagValue::Ascii(String::new()));
    }
    values
}

fn encode_ascii(value: &TagValue, _: ByteOrder, out: &mut Vec<u8>) {
    if let TagValue::Ascii(s) = value {
        out.extend_from_slice(s.as_bytes());
        out.push(0);
    }
}

fn size_ascii(_: FieldType, value: &TagValue) -> usize {
    value.as_str().map_or(0, |s| s.len() + 1)
}

// -----------------------------------------------------------------------------
// Short, SShort
// -----------------------------------------------------------------------------

fn decode_int16(field_type: FieldType, bytes: &[u8], byte_order: ByteOrder) -> Vec<TagValue> {
    bytes
        .chunks_exact(2)
        .map(|chunk| {
            let raw = byte_order.read_u16(chunk);
            match field_type {
                FieldType::SShort => TagValue::SShort(raw as i16),
                _ => TagValue::Short(raw),
            }
        })
        .collect()
}

fn encode_int16(value: &TagValue, byte_order: ByteOrder, out: &mut Vec<u8>) {
    match value {
        TagValue::Short(v) => byte_order.write_u16(out, *v),
        TagValue::SShort(v) => byte_order.write_u16(out, *v as u16),
        _ => {}
    }
}

// -----------------------------------------------------------------------------
// Long, SLong
// -----------------------------------------------------------------------------

fn decode_int32(field_type: FieldType, bytes: &[u8], byte_order: ByteOrder) -> Vec<TagValue> {
    bytes
        .chunks_exact(4)
        .map(|chunk| {
            let raw = byte_order.read_u32(chunk);
            match field_type {
                FieldType::SLong => TagValue::SLong(raw as i32),
                _ => TagValue::Long(raw),
            }
        })
        .collect()
}

fn encode_int32(value: &TagValue, byte_order: ByteOrder, out: &mut Vec<u8>) {
    match value {
        TagValue::Long(v) => byte_order.write_u32(out, *v),
        TagValue::SLong(v) => byte_order.write_u32(out, *v as u32),
        _ => {}
    }
}

// -----------------------------------------------------------------------------
// Rational, SRational
// -----------------------------------------------------------------------------

fn decode_rational(_: FieldType, bytes: &[u8], byte_order: ByteOrder) -> Vec<TagValue> {
    bytes
        .chunks_exact(8)
        .map(|chunk| {
            let numerator = byte_order.read_u32(&chunk[..4]);
            let denominator = byte_order.read_u32(&chunk[4..]);
            TagValue::Rational(Rational::from_unsigned(numerator, denominator))
        })
        .collect()
}

fn encode_rational(value: &TagValue, byte_order: ByteOrder, out: &mut Vec<u8>) {
    if let TagValue::Rational(r) = value {
        let (numerator, denominator) = r.unsigned_parts();
        byte_order.write_u32(out, numerator);
        byte_order.write_u32(out, denominator);
    }
}

// -----------------------------------------------------------------------------
// Float, Double
// -----------------------------------------------------------------------------

fn decode_float(_: FieldType, bytes: &[u8], byte_order: ByteOrder) -> Vec<TagValue> {
    bytes
        .chunks_exact(4)
        .map(|chunk| TagValue::Float(f32::from_bits(byte_order.read_u32(chunk))))
        .collect()
}

fn encode_float(value: &TagValue, byte_order: ByteOrder, out: &mut Vec<u8>) {
    if let TagValue::Float(v) = value {
        byte_order.write_u32(out, v.to_bits());
    }
}

fn decode_double(_: FieldType, bytes: &[u8], byte_order: ByteOrder) -> Vec<TagValue> {
    bytes
        .chunks_exact(8)
        .map(|chunk| TagValue::Double(f64::from_bits(byte_order.read_u64(chunk))))
        .collect()
}

fn encode_double(value: &TagValue, byte_order: ByteOrder, out: &mut Vec<u8>) {
    if let TagValue::Double(v) = value {
        byte_order.write_u64(out, v.to_bits());
    }
}

// =============================================================================
// Tests
// =============================================================================
