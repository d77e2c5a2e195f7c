//! Reading EXIF from JPEG streams.

use jpeg_exif::tags::{exif, gps, image};
use jpeg_exif::{Directory, Error, ExifError, JpegError, Orientation, Rational, TagValue};

use super::test_utils::*;

// =============================================================================
// Camera Fixture
// =============================================================================

#[test]
fn test_read_camera_tags() {
    let table = jpeg_exif::read(&create_camera_jpeg()).unwrap();

    assert_eq!(table.make().as_deref(), Some("Canon"));
    assert_eq!(table.model().as_deref(), Some("PowerShot G7"));
    assert_eq!(table.orientation(), Some(Orientation::Rotate90));
    assert_eq!(
        table.get(exif::EXPOSURE_TIME),
        Some(vec![TagValue::Rational(Rational::new(1, 250))])
    );
    assert_eq!(
        table.get(exif::F_NUMBER),
        Some(vec![TagValue::Rational(Rational::new(28, 10))])
    );
    assert_eq!(table.len(), 5);
}

#[test]
fn test_pointer_tags_not_visible() {
    let table = jpeg_exif::read(&create_camera_jpeg()).unwrap();
    assert!(!table.contains(image::EXIF_IFD_POINTER));
    assert!(!table.contains(image::GPS_IFD_POINTER));
}

#[test]
fn test_no_gps_directory() {
    let table = jpeg_exif::read(&create_camera_jpeg()).unwrap();
    let groups = table.entries_by_directory();
    assert!(!groups.contains_key(&Directory::GpsInfo));
    assert!(table.get(gps::GPS_LATITUDE).is_none());
    assert_eq!(
        groups.keys().copied().collect::<Vec<_>>(),
        vec![Directory::Image, Directory::Exif]
    );
}

#[test]
fn test_records_serialize_to_json() {
    let table = jpeg_exif::read(&create_camera_jpeg()).unwrap();
    let json = serde_json::to_value(table.records()).unwrap();
    let make = json
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["name"] == "Make")
        .unwrap();
    assert_eq!(make["directory"], "Image");
    assert_eq!(make["values"][0], "Canon");
}

#[test]
fn test_display_lists_tags() {
    let text = jpeg_exif::read(&create_camera_jpeg()).unwrap().to_string();
    assert!(text.contains("Image.Make: Canon"));
    assert!(text.contains("Exif.FNumber: 28/10"));
}

// =============================================================================
// Images Without EXIF
// =============================================================================

#[test]
fn test_read_plain_jpeg() {
    let table = jpeg_exif::read(&create_test_jpeg(8, 8)).unwrap();
    assert!(table.is_empty());
    assert!(table.thumbnails().is_empty());
}

#[test]
fn test_read_xmp_only() {
    let jpeg = insert_segment(&create_test_jpeg(8, 8), APP1, XMP_PAYLOAD);
    assert!(jpeg_exif::read(&jpeg).unwrap().is_empty());
}

#[test]
fn test_read_preamble_case_insensitive() {
    let mut payload = camera_exif_payload();
    payload[..4].copy_from_slice(b"EXIF");
    let jpeg = insert_segment(&create_test_jpeg(8, 8), APP1, &payload);
    let table = jpeg_exif::read(&jpeg).unwrap();
    assert_eq!(table.make().as_deref(), Some("Canon"));
}

// =============================================================================
// Structural Errors
// =============================================================================

#[test]
fn test_not_a_jpeg() {
    let err = jpeg_exif::read(b"\x89PNG\r\n\x1a\n").unwrap_err();
    assert!(matches!(err, Error::Jpeg(JpegError::NotAJpeg(_))));
}

#[test]
fn test_truncated_jpeg() {
    let jpeg = create_camera_jpeg();
    let err = jpeg_exif::read(&jpeg[..40]).unwrap_err();
    assert!(matches!(
        err,
        Error::Jpeg(JpegError::TruncatedSegment { marker: 0xFFE1, .. })
    ));
}

#[test]
fn test_unknown_field_type_is_fatal() {
    let mut payload = camera_exif_payload();
    patch_tiff(&mut payload, ORIENTATION_TYPE_OFFSET, &0x00EEu16.to_be_bytes());
    let jpeg = insert_segment(&create_test_jpeg(8, 8), APP1, &payload);

    let err = jpeg_exif::read(&jpeg).unwrap_err();
    assert!(matches!(
        err,
        Error::Exif(ExifError::UnknownFieldType {
            tag: 0x0112,
            field_type: 0x00EE,
            directory: Directory::Image,
        })
    ));
}

#[test]
fn test_cyclic_directories_are_bounded() {
    let mut payload = camera_exif_payload();
    // IFD0's next pointer loops back to IFD0
    patch_tiff(&mut payload, IFD0_NEXT_OFFSET, &8u32.to_be_bytes());
    let jpeg = insert_segment(&create_test_jpeg(8, 8), APP1, &payload);

    let err = jpeg_exif::read(&jpeg).unwrap_err();
    assert!(matches!(
        err,
        Error::Exif(ExifError::DirectoryLimitExceeded(16))
    ));
}

#[test]
fn test_invalid_tiff_marker() {
    let mut payload = camera_exif_payload();
    patch_tiff(&mut payload, 2, &0x002Bu16.to_be_bytes());
    let jpeg = insert_segment(&create_test_jpeg(8, 8), APP1, &payload);

    let err = jpeg_exif::read(&jpeg).unwrap_err();
    assert!(matches!(err, Error::Exif(ExifError::InvalidTiffMarker(0x002B))));
}
