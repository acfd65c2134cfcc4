//! PresentationML (`.pptx`) writing.
//!
//! Build a [`MutablePresentation`], add slides with text boxes, rectangles and
//! pictures, then serialize it with [`MutablePresentation::to_bytes`]. The
//! package carries one slide master, one blank layout and one theme; every
//! slide uses that layout and positions its shapes absolutely.

pub mod format;
pub mod template;
pub mod writer;

pub use format::{ImageFormat, TextAlign, TextFormat};
pub use writer::{MutablePresentation, MutableShape, MutableSlide};
