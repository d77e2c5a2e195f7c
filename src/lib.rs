//! # jpeg-exif
//!
//! Read and rewrite the EXIF metadata of JPEG files without touching the
//! compressed image data.
//!
//! ## Features
//!
//! - **Streaming**: a JPEG is rewritten one segment at a time; only the EXIF
//!   segment is decoded, everything else is copied byte for byte
//! - **Typed tags**: every value is checked against its TIFF field type when
//!   it is stored, so a table can always be encoded
//! - **Exact round-trips**: rationals keep their numerator and denominator,
//!   unknown tags survive a read/write cycle
//! - **Atomic file updates**: the `*_file` helpers write a temporary sibling
//!   and rename it over the original
//!
//! ## Architecture
//!
//! - [`mod@exif`] - read/update/write entry points over bytes, streams and files
//! - [`tags`] - tag references, values, the tag table and the tag dictionary
//! - [`mod@format`] - JPEG segment scanner and TIFF/EXIF directory codec
//! - [`io`] - byte-order helpers, bounds-checked cursor, atomic file replace
//! - [`config`] - CLI types for the `jpeg-exif` binary
//!
//! ## Example
//!
//! ```rust,no_run
//! use jpeg_exif::tags::image;
//!
//! # fn main() -> Result<(), jpeg_exif::Error> {
//! let jpeg = std::fs::read("photo.jpg")?;
//!
//! let tags = jpeg_exif::read(&jpeg)?;
//! println!("Camera: {:?}", tags.make());
//!
//! let updated = jpeg_exif::update(&jpeg, |tags| {
//!     tags.set(image::MAKE, "Acme")?;
//!     Ok(tags)
//! })?;
//! std::fs::write("photo.jpg", updated)?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod exif;
pub mod format;
pub mod io;
pub mod tags;

// Re-export commonly used types
pub use error::{Error, ExifError, JpegError, TagError};
pub use exif::{
    copy, read, read_file, strip, strip_file, update, update_file, write, write_file, ExifEditor,
    Options,
};
pub use format::jpeg::{JpegScanner, Marker};
pub use format::tiff::{
    ByteOrder, ExifReader, ExifWriter, FieldType, ReadOptions, WriteOptions,
    DEFAULT_MAX_DIRECTORIES,
};
pub use tags::{
    Directory, Orientation, Rational, ResolutionUnit, TagRecord, TagRef, TagTable, TagValue,
    TypedValue, ValueKind,
};
