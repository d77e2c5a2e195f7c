//! Updating, injecting and stripping EXIF segments.

use chrono::NaiveDate;
use jpeg_exif::tags::{exif, gps, image, interop, thumbnail};
use jpeg_exif::{
    ByteOrder, Error, ExifEditor, Options, Rational, TagError, TagTable, TagValue, WriteOptions,
};

use super::test_utils::*;

// =============================================================================
// JPEG Fidelity
// =============================================================================

#[test]
fn test_noop_update_keeps_other_segments() {
    let original = create_camera_jpeg();
    let updated = jpeg_exif::update(&original, Ok).unwrap();

    assert_eq!(non_app1_segments(&updated), non_app1_segments(&original));
    assert_eq!(scan_data(&updated), scan_data(&original));
    assert_eq!(
        jpeg_exif::read(&updated).unwrap(),
        jpeg_exif::read(&original).unwrap()
    );
}

#[test]
fn test_noop_update_is_stable() {
    let once = jpeg_exif::update(&create_camera_jpeg(), Ok).unwrap();
    let twice = jpeg_exif::update(&once, Ok).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn test_noop_update_without_exif_is_identity() {
    let original = create_test_jpeg(16, 8);
    assert_eq!(jpeg_exif::update(&original, Ok).unwrap(), original);
}

#[test]
fn test_copy_is_identity() {
    let original = create_camera_jpeg();
    let mut copied = Vec::new();
    jpeg_exif::copy(original.as_slice(), &mut copied).unwrap();
    assert_eq!(copied, original);
}

// =============================================================================
// Update
// =============================================================================

#[test]
fn test_replace_make() {
    let original = create_camera_jpeg();
    let updated = jpeg_exif::update(&original, |table| {
        table.set(image::MAKE, "Acme")?;
        Ok(table)
    })
    .unwrap();

    assert_ne!(updated.len(), original.len());

    let before = jpeg_exif::read(&original).unwrap();
    let after = jpeg_exif::read(&updated).unwrap();
    assert_eq!(after.get(image::MAKE), Some(vec![TagValue::from("Acme")]));
    for tag in before.keys() {
        if tag != image::MAKE {
            assert_eq!(after.get(tag), before.get(tag), "{tag} changed");
        }
    }
    assert_eq!(after.len(), before.len());
    assert_eq!(scan_data(&updated), scan_data(&original));
}

#[test]
fn test_inject_into_plain_jpeg() {
    let original = create_test_jpeg(16, 16);
    let updated = jpeg_exif::update(&original, |table| {
        table.set_make("Acme")?;
        table.set(gps::GPS_LATITUDE_REF, "N")?;
        Ok(table)
    })
    .unwrap();

    assert_eq!(app1_payloads(&updated).len(), 1);
    assert_eq!(non_app1_segments(&updated), non_app1_segments(&original));
    assert_eq!(scan_data(&updated), scan_data(&original));

    let table = jpeg_exif::read(&updated).unwrap();
    assert_eq!(table.make().as_deref(), Some("Acme"));
    assert_eq!(table.get_first(gps::GPS_LATITUDE_REF), Some(TagValue::from("N")));
}

#[test]
fn test_xmp_untouched_and_first_exif_wins() {
    let with_xmp = insert_segment(&create_camera_jpeg(), APP1, XMP_PAYLOAD);
    let updated = jpeg_exif::update(&with_xmp, |table| {
        table.set_model("Model X")?;
        Ok(table)
    })
    .unwrap();

    let payloads = app1_payloads(&updated);
    assert_eq!(payloads.len(), 2);
    assert_eq!(payloads[0], XMP_PAYLOAD);
    assert_eq!(
        jpeg_exif::read(&updated).unwrap().model().as_deref(),
        Some("Model X")
    );
}

#[test]
fn test_mutator_error_aborts() {
    let err = jpeg_exif::update(&create_camera_jpeg(), |table| {
        table.set(image::MAKE, 7u16)?;
        Ok(table)
    })
    .unwrap_err();
    assert!(matches!(err, Error::Tag(TagError::InvalidKind { tag: 0x010F, .. })));
}

// =============================================================================
// Type Guard
// =============================================================================

#[test]
fn test_wrong_kind_rejected_without_mutation() {
    let table = jpeg_exif::read(&create_camera_jpeg()).unwrap();
    let before = table.clone();

    assert!(table.set(image::MAKE, 5u32).is_err());
    assert!(table.add(image::ORIENTATION, "up").is_err());
    assert!(table
        .add_all(exif::F_NUMBER, [TagValue::from(Rational::new(1, 2)), TagValue::from(1.5f64)])
        .is_err());
    assert!(table.set(image::MODEL, "bad\0model").is_err());

    assert_eq!(table, before);
}

// =============================================================================
// Round-Trips
// =============================================================================

fn rich_table() -> TagTable {
    let table = TagTable::new();
    table.set(image::MAKE, "Acme").unwrap();
    table.set(image::IMAGE_WIDTH, 4000u32).unwrap();
    table.set(image::X_RESOLUTION, Rational::new(72, 1)).unwrap();
    table
        .set(exif::EXPOSURE_BIAS_VALUE, Rational::new(-1, 3))
        .unwrap();
    table.set(exif::EXIF_VERSION, b"0230".to_vec()).unwrap();
    table
        .set(exif::USER_COMMENT, b"ASCII\0\0\0hello world".to_vec())
        .unwrap();
    table.set(exif::PIXEL_X_DIMENSION, 4000u16).unwrap();
    table.set(gps::GPS_VERSION_ID, vec![2u8, 3, 0, 0]).unwrap();
    table.set(gps::GPS_LATITUDE_REF, "S").unwrap();
    table
        .set_all(
            gps::GPS_LATITUDE,
            [
                Rational::new(33, 1),
                Rational::new(51, 1),
                Rational::new(3156, 100),
            ]
            .map(TagValue::from),
        )
        .unwrap();
    table.set(interop::INTEROPERABILITY_INDEX, "R98").unwrap();
    table.set(thumbnail::COMPRESSION, 6u16).unwrap();
    table
        .set_date_time(
            NaiveDate::from_ymd_opt(2024, 2, 29)
                .unwrap()
                .and_hms_opt(13, 45, 0)
                .unwrap(),
        )
        .unwrap();
    table.add_thumbnail(create_test_jpeg(8, 8));
    table
}

#[test]
fn test_round_trip_all_directories() {
    let table = rich_table();
    let written = jpeg_exif::write(&create_test_jpeg(16, 16), &table).unwrap();
    let read = jpeg_exif::read(&written).unwrap();

    assert_eq!(read, table);
    assert_eq!(read.thumbnails(), table.thumbnails());
    assert_eq!(read.date_time().unwrap(), table.date_time().unwrap());
}

#[test]
fn test_round_trip_big_endian() {
    let editor = ExifEditor::new(
        Options::new().with_write(WriteOptions::new().with_byte_order(ByteOrder::BigEndian)),
    );
    let table = rich_table();
    let written = editor.write(&create_test_jpeg(16, 16), &table).unwrap();

    assert_eq!(&app1_payloads(&written)[0][6..8], b"MM");
    assert_eq!(editor.read(&written).unwrap(), table);
}

#[test]
fn test_rationals_are_not_reduced() {
    let table = TagTable::new();
    table.set(image::X_RESOLUTION, Rational::new(2, 4)).unwrap();
    table.set(image::Y_RESOLUTION, Rational::new(1, 2)).unwrap();
    assert_ne!(Rational::new(2, 4), Rational::new(1, 2));

    let read = jpeg_exif::read(&jpeg_exif::write(&create_test_jpeg(8, 8), &table).unwrap()).unwrap();
    let (x, y) = read.resolution().unwrap();
    assert_eq!((x.numerator, x.denominator), (2, 4));
    assert_eq!((y.numerator, y.denominator), (1, 2));
}

#[test]
fn test_unknown_tag_survives() {
    let table = TagTable::new();
    let private = jpeg_exif::TagRef::new(0xC0DE, jpeg_exif::Directory::Exif, jpeg_exif::FieldType::SLong);
    table.set_all(private, [TagValue::from(-5i32), TagValue::from(7i32)]).unwrap();

    let read = jpeg_exif::read(&jpeg_exif::write(&create_test_jpeg(8, 8), &table).unwrap()).unwrap();
    assert_eq!(
        read.get(private),
        Some(vec![TagValue::SLong(-5), TagValue::SLong(7)])
    );
    assert_eq!(private.to_string(), "Exif.0xC0DE");
}

// =============================================================================
// Strip
// =============================================================================

#[test]
fn test_write_empty_table_strips_exif() {
    let original = create_camera_jpeg();
    let stripped = jpeg_exif::write(&original, &TagTable::new()).unwrap();
    assert!(app1_payloads(&stripped).is_empty());
    assert_eq!(non_app1_segments(&stripped), non_app1_segments(&original));
    assert!(jpeg_exif::read(&stripped).unwrap().is_empty());
}

#[test]
fn test_strip_keeps_xmp() {
    let original = insert_segment(&create_camera_jpeg(), APP1, XMP_PAYLOAD);
    let stripped = jpeg_exif::strip(&original).unwrap();
    assert_eq!(app1_payloads(&stripped), vec![XMP_PAYLOAD.to_vec()]);
    assert_eq!(scan_data(&stripped), scan_data(&original));
}
