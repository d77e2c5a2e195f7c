//! Atomic in-place file updates.

use std::fs;

use jpeg_exif::tags::image;
use jpeg_exif::{Error, JpegError, Orientation, TagError, TagTable};

use super::test_utils::*;

fn write_fixture(dir: &tempfile::TempDir, name: &str, data: &[u8]) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, data).unwrap();
    path
}

fn file_count(dir: &tempfile::TempDir) -> usize {
    fs::read_dir(dir.path()).unwrap().count()
}

#[test]
fn test_read_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "camera.jpg", &create_camera_jpeg());

    let table = jpeg_exif::read_file(&path).unwrap();
    assert_eq!(table.make().as_deref(), Some("Canon"));
}

#[test]
fn test_read_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = jpeg_exif::read_file(dir.path().join("missing.jpg")).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_update_file_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let original = create_camera_jpeg();
    let path = write_fixture(&dir, "camera.jpg", &original);

    jpeg_exif::update_file(&path, |table| {
        table.set_orientation(Orientation::Normal)?;
        Ok(table)
    })
    .unwrap();

    let updated = fs::read(&path).unwrap();
    assert_eq!(scan_data(&updated), scan_data(&original));
    let table = jpeg_exif::read_file(&path).unwrap();
    assert_eq!(table.orientation(), Some(Orientation::Normal));
    assert_eq!(table.make().as_deref(), Some("Canon"));
    assert_eq!(file_count(&dir), 1);
}

#[test]
fn test_write_file_replaces_all_tags() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "camera.jpg", &create_camera_jpeg());

    let table = TagTable::new();
    table.set(image::SOFTWARE, "jpeg-exif").unwrap();
    jpeg_exif::write_file(&path, &table).unwrap();

    assert_eq!(jpeg_exif::read_file(&path).unwrap(), table);
}

#[test]
fn test_failed_update_leaves_original() {
    let dir = tempfile::tempdir().unwrap();
    let original = create_camera_jpeg();
    let path = write_fixture(&dir, "camera.jpg", &original);

    let err = jpeg_exif::update_file(&path, |_| {
        Err(TagError::UnknownName("Nonexistent".to_string()).into())
    })
    .unwrap_err();

    assert!(matches!(err, Error::Tag(TagError::UnknownName(_))));
    assert_eq!(fs::read(&path).unwrap(), original);
    assert_eq!(file_count(&dir), 1);
}

#[test]
fn test_update_non_jpeg_leaves_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "notes.txt", b"not an image");

    let err = jpeg_exif::update_file(&path, Ok).unwrap_err();
    assert!(matches!(err, Error::Jpeg(JpegError::NotAJpeg(_))));
    assert_eq!(fs::read(&path).unwrap(), b"not an image");
    assert_eq!(file_count(&dir), 1);
}

#[test]
fn test_strip_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_fixture(&dir, "camera.jpg", &create_camera_jpeg());

    jpeg_exif::strip_file(&path).unwrap();

    let stripped = fs::read(&path).unwrap();
    assert!(app1_payloads(&stripped).is_empty());
    assert!(jpeg_exif::read_file(&path).unwrap().is_empty());
}
