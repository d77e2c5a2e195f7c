//! Container formats.
//!
//! - [`jpeg`] walks and rewrites JPEG marker segments
//! - [`tiff`] decodes and encodes the TIFF block inside an EXIF APP1 segment

pub mod jpeg;
pub mod tiff;
