//! SpreadsheetML (`.xlsx`) writing.
//!
//! [`writer::MutableWorkbookData`] holds worksheets and shared strings and
//! assembles them into an OPC package with [`writer::MutableWorkbookData::to_bytes`].

pub mod cell;
pub mod format;
pub mod writer;

pub use cell::CellValue;
pub use format::{CellFont, CellFormat};
pub use writer::{MutableSharedStrings, MutableWorkbookData, MutableWorksheet, StylesBuilder};
