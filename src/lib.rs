//! Location Report - filming-location metadata exported as spreadsheet and slide deck
//!
//! The crate turns a location record and a set of categorized photos into two
//! Office files built entirely in memory:
//!
//! - **Spreadsheet** (`location_data.xlsx`): one header row and one data row
//!   holding every form field in a fixed column order.
//! - **Slide deck** (`location_pictures.pptx`): a title slide with the
//!   thumbnail, a metadata slide, then image-grid slides per category.
//!
//! # Modules
//!
//! - [`location`]: records, image sessions, layout and the two exporters
//! - [`ooxml`]: the package, workbook and presentation writers they use
//! - [`common`]: unit conversion, number formatting and XML escaping
//!
//! # Example
//!
//! ```
//! use location_report::location::{LocationRecord, ReportConfig, Session};
//! use location_report::location::{assemble_deck, export_spreadsheet};
//!
//! # fn main() -> location_report::Result<()> {
//! let record = LocationRecord::from_yaml("name: 港倉庫\narea_m2: 80\n")?;
//!
//! let sheet = export_spreadsheet(&record)?;
//! assert_eq!(sheet.file_name, "location_data.xlsx");
//!
//! let deck = assemble_deck(&record, &Session::new(), &ReportConfig::default())?;
//! assert_eq!(deck.file_name, "location_pictures.pptx");
//! # Ok(())
//! # }
//! ```

pub mod common;
pub mod error;
pub mod location;
pub mod ooxml;

pub use error::{Error, Result};
