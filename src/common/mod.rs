//! Shared helpers used by the OOXML writers and the report builders.
//!
//! - [`unit`] converts between inches, points and EMUs (English Metric Units),
//!   the coordinate system of DrawingML.
//! - [`number`] prints numbers identically for cells and slide text.
//! - [`xml`] escapes text for XML attribute and element content.

pub mod number;
pub mod unit;
pub mod xml;

pub use number::{format_float, format_int};
pub use unit::{EMUS_PER_INCH, Emu, inches};
