//! Pieces shared by the spreadsheet and presentation writers.

pub mod properties;

pub use properties::{APPLICATION_NAME, DocumentProperties, add_doc_props, app_properties_xml};
