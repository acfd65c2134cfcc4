//! Filming-location reports.
//!
//! A report is built from two inputs: a [`LocationRecord`] (every scalar form
//! field, validated once when captured) and a [`Session`] (uploaded images per
//! [`Category`], with inclusion flags and preview pages). From those,
//! [`export_spreadsheet`] writes a one-row workbook and [`assemble_deck`]
//! writes the picture deck.
//!
//! ```no_run
//! use location_report::location::{Category, LocationRecord, ReportConfig, Session};
//! use location_report::location::{assemble_deck, export_spreadsheet};
//!
//! # fn main() -> location_report::Result<()> {
//! let record = LocationRecord::from_yaml("name: 旧山田邸\n")?;
//! let mut session = Session::new();
//! session.add_images(Category::Photos, [("front.jpg", std::fs::read("front.jpg")?)])?;
//!
//! let sheet = export_spreadsheet(&record)?;
//! let deck = assemble_deck(&record, &session, &ReportConfig::default())?;
//! std::fs::write(sheet.file_name, sheet.bytes)?;
//! std::fs::write(deck.file_name, deck.bytes)?;
//! # Ok(())
//! # }
//! ```

pub mod category;
pub mod config;
pub mod deck;
pub mod export;
pub mod image;
pub mod layout;
pub mod record;
pub mod spreadsheet;
pub mod store;
pub mod taxonomy;

pub use category::Category;
pub use config::ReportConfig;
pub use deck::{assemble_deck, build_presentation};
pub use export::{ExportArtifact, PPTX_MIME_TYPE, XLSX_MIME_TYPE};
pub use self::image::UploadedImage;
pub use layout::{GridShape, Placement, Rect, fit};
pub use record::{
    Availability, DETAIL_OPTION_NAMES, DetailOptions, FieldValue, LocationRecord, PaymentMethod,
    RecordInput,
};
pub use spreadsheet::{build_workbook, export_spreadsheet};
pub use store::{ImageEntry, Session};
