//! Test utilities for integration tests.
//!
//! Fixtures are real baseline JPEGs produced by the `image` crate's encoder,
//! with EXIF segments assembled byte by byte so the reader is exercised
//! against a layout it did not write itself.

use image::codecs::jpeg::JpegEncoder;
use image::{Rgb, RgbImage};

pub const APP1: u16 = 0xFFE1;
pub const SOS: u16 = 0xFFDA;

pub const XMP_PAYLOAD: &[u8] =
    b"http://ns.adobe.com/xap/1.0/\0<x:xmpmeta xmlns:x=\"adobe:ns:meta/\"/>";

// =============================================================================
// JPEG Fixtures
// =============================================================================

/// Create a test RGB JPEG image.
pub fn create_test_jpeg(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        let r = (x * 16 % 256) as u8;
        let g = (y * 16 % 256) as u8;
        let b = ((x + y) * 8 % 256) as u8;
        Rgb([r, g, b])
    });

    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, 85);
    encoder.encode_image(&img).unwrap();
    buf
}

/// A JPEG carrying the camera EXIF block as its first segment.
pub fn create_camera_jpeg() -> Vec<u8> {
    insert_segment(&create_test_jpeg(16, 16), APP1, &camera_exif_payload())
}

/// Insert a segment right after SOI.
pub fn insert_segment(jpeg: &[u8], marker: u16, payload: &[u8]) -> Vec<u8> {
    assert_eq!(&jpeg[..2], &[0xFF, 0xD8]);
    let mut out = jpeg[..2].to_vec();
    out.extend_from_slice(&marker.to_be_bytes());
    out.extend_from_slice(&((payload.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(&jpeg[2..]);
    out
}

/// Header segments up to SOS as `(marker, payload)` pairs.
pub fn segments(jpeg: &[u8]) -> Vec<(u16, Vec<u8>)> {
    let mut result = Vec::new();
    let mut pos = 2;
    loop {
        let marker = u16::from_be_bytes([jpeg[pos], jpeg[pos + 1]]);
        if marker == SOS {
            return result;
        }
        let length = u16::from_be_bytes([jpeg[pos + 2], jpeg[pos + 3]]) as usize;
        result.push((marker, jpeg[pos + 4..pos + 2 + length].to_vec()));
        pos += 2 + length;
    }
}

/// Header segments other than APP1.
pub fn non_app1_segments(jpeg: &[u8]) -> Vec<(u16, Vec<u8>)> {
    segments(jpeg)
        .into_iter()
        .filter(|(marker, _)| *marker != APP1)
        .collect()
}

/// Everything from the SOS marker to the end of the file.
pub fn scan_data(jpeg: &[u8]) -> &[u8] {
    let header: usize = segments(jpeg).iter().map(|(_, p)| p.len() + 4).sum();
    &jpeg[2 + header..]
}

pub fn app1_payloads(jpeg: &[u8]) -> Vec<Vec<u8>> {
    segments(jpeg)
        .into_iter()
        .filter(|(marker, _)| *marker == APP1)
        .map(|(_, payload)| payload)
        .collect()
}

// =============================================================================
// EXIF Fixtures
// =============================================================================

/// Offset of IFD0's next-IFD field inside the TIFF block.
pub const IFD0_NEXT_OFFSET: usize = 58;

/// Offset of the Orientation entry's field type inside the TIFF block.
pub const ORIENTATION_TYPE_OFFSET: usize = 36;

/// A big-endian EXIF payload as a camera would write it.
///
/// ```text
/// 0    MM 002A 00000008
/// 8    IFD0: Make "Canon", Model "PowerShot G7", Orientation 6, ExifIFD -> 82
/// 62   blobs: "Canon\0" "PowerShot G7\0" + pad
/// 82   Exif: ExposureTime 1/250, FNumber 28/10
/// 112  blobs: rationals
/// ```
pub fn camera_exif_payload() -> Vec<u8> {
    let mut tiff = Vec::new();
    let u16be = |v: &mut Vec<u8>, x: u16| v.extend_from_slice(&x.to_be_bytes());
    let u32be = |v: &mut Vec<u8>, x: u32| v.extend_from_slice(&x.to_be_bytes());

    tiff.extend_from_slice(b"MM");
    u16be(&mut tiff, 0x002A);
    u32be(&mut tiff, 8);

    // IFD0
    u16be(&mut tiff, 4);
    for (tag, field_type, count, value) in [
        (0x010F, 2, 6, 62),
        (0x0110, 2, 13, 68),
        (0x0112, 3, 1, 0x0006_0000),
        (0x8769, 4, 1, 82),
    ] {
        u16be(&mut tiff, tag);
        u16be(&mut tiff, field_type);
        u32be(&mut tiff, count);
        u32be(&mut tiff, value);
    }
    assert_eq!(tiff.len(), IFD0_NEXT_OFFSET);
    u32be(&mut tiff, 0);
    tiff.extend_from_slice(b"Canon\0");
    tiff.extend_from_slice(b"PowerShot G7\0");
    tiff.push(0);
    assert_eq!(tiff.len(), 82);

    // Exif IFD
    u16be(&mut tiff, 2);
    for (tag, offset) in [(0x829A, 112), (0x829D, 120)] {
        u16be(&mut tiff, tag);
        u16be(&mut tiff, 5);
        u32be(&mut tiff, 1);
        u32be(&mut tiff, offset);
    }
    u32be(&mut tiff, 0);
    assert_eq!(tiff.len(), 112);
    for x in [1, 250, 28, 10] {
        u32be(&mut tiff, x);
    }

    let mut payload = b"Exif\0\0".to_vec();
    payload.extend_from_slice(&tiff);
    payload
}

/// Patch a big-endian u16/u32 inside the TIFF block of an EXIF payload.
pub fn patch_tiff(payload: &mut [u8], offset: usize, bytes: &[u8]) {
    payload[6 + offset..6 + offset + bytes.len()].copy_from_slice(bytes);
}
