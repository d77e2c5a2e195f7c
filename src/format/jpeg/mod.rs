//! JPEG container layer.
//!
//! A JPEG file is a sequence of marker segments followed by entropy-coded
//! image data. This module finds segment boundaries and re-emits them, it
//! never decodes pixels.

mod marker;
mod scanner;

pub use marker::Marker;
pub use scanner::{JpegScanner, MAX_SEGMENT_PAYLOAD};
