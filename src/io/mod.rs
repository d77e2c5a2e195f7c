//! Byte-level I/O helpers shared by the JPEG and TIFF layers.
//!
//! - [`endian`] holds the fixed-width integer readers and writers
//! - [`TiffCursor`] is a bounds-checked reader over one TIFF block
//! - [`replace_atomically`] streams a file through a transform into a
//!   temporary sibling and renames it over the original; [`write_atomically`]
//!   does the same into a separate destination

mod cursor;
mod endian;
mod file;

pub use cursor::TiffCursor;
pub use endian::{
    read_u16_be, read_u16_le, read_u32_be, read_u32_le, read_u64_be, read_u64_le, write_u16_be,
    write_u16_le, write_u32_be, write_u32_le, write_u64_be, write_u64_le,
};
pub use file::{replace_atomically, write_atomically};
