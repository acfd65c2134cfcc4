//! Formatting types applied to written cells.

/// Cell format information.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellFormat {
    pub font: Option<CellFont>,
}

impl CellFormat {
    /// A format with only a font override.
    pub fn with_font(font: CellFont) -> Self {
        Self { font: Some(font) }
    }
}

/// Font properties for a cell.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CellFont {
    pub name: Option<String>,
    pub size: Option<f64>,
    pub bold: bool,
}

impl CellFont {
    /// The default font in bold.
    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }
}
