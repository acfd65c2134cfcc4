//! Mutable worksheet and workbook writer components for XLSX.

pub mod sheet;
pub mod strings;
pub mod styles;
pub mod workbook;

// Re-export main types
pub use sheet::MutableWorksheet;
pub use strings::MutableSharedStrings;
pub use styles::StylesBuilder;
pub use workbook::MutableWorkbookData;
