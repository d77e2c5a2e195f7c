//! Tag model: identities, values and the typed tag store.
//!
//! - [`TagRef`] names a tag by `(id, directory)` and carries its field type
//! - [`TagValue`] is one decoded value, [`Rational`] the exact fraction type
//! - [`TagTable`] stores validated values per tag, plus thumbnail blobs
//! - [`dictionary`] maps ids to names; well-known tags are exposed as
//!   constants such as [`image::MAKE`]

mod accessors;
pub mod dictionary;
mod directory;
mod rational;
mod table;
mod tag_ref;
mod value;

pub use accessors::{Orientation, ResolutionUnit, DATE_TIME_FORMAT};
pub use dictionary::{exif, gps, image, interop, thumbnail, TagDef};
pub use directory::Directory;
pub use rational::Rational;
pub use table::{TagRecord, TagTable};
pub use tag_ref::TagRef;
pub use value::{TagValue, TypedValue, ValueKind};
