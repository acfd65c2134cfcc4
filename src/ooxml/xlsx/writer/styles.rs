//! Styles.xml generator for XLSX files.
//!
//! Collects the unique fonts and cell formats used by a workbook, assigns
//! indices to them and writes `styles.xml`. Fills and borders are fixed to
//! the two fills and one border Excel requires.

use std::collections::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::fmt::Write as FmtWrite;
use std::hash::{Hash, Hasher};

use crate::common::format_float;
use crate::common::xml::escape_xml;
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::xlsx::format::{CellFont, CellFormat};

const DEFAULT_FONT_NAME: &str = "Calibri";
const DEFAULT_FONT_SIZE: f64 = 11.0;

/// Builder for generating styles.xml content.
#[derive(Debug)]
pub struct StylesBuilder {
    /// Unique fonts (index -> font)
    fonts: Vec<CellFont>,
    /// Font lookup (font hash -> index)
    font_map: HashMap<u64, usize>,
    /// Cell formats (XF records), index -> font_id
    cell_formats: Vec<usize>,
    /// Cell format lookup (format hash -> index)
    cell_format_map: HashMap<u64, usize>,
}

impl StylesBuilder {
    /// Create a new StylesBuilder with default styles.
    pub fn new() -> Self {
        let mut builder = Self {
            fonts: Vec::new(),
            font_map: HashMap::new(),
            cell_formats: Vec::new(),
            cell_format_map: HashMap::new(),
        };

        // Font 0 and style 0 are the workbook defaults.
        builder.fonts.push(CellFont::default());
        builder
            .font_map
            .insert(Self::hash_font(&CellFont::default()), 0);
        builder.cell_formats.push(0);
        builder
            .cell_format_map
            .insert(Self::hash_cell_format(&CellFormat::default()), 0);

        builder
    }

    /// Add a cell format and return its style index.
    ///
    /// If the format has already been added, returns the existing index.
    pub fn add_cell_format(&mut self, format: &CellFormat) -> usize {
        let format_hash = Self::hash_cell_format(format);
        if let Some(&index) = self.cell_format_map.get(&format_hash) {
            return index;
        }

        let font_id = match format.font {
            Some(ref font) => self.add_font(font),
            None => 0,
        };

        let index = self.cell_formats.len();
        self.cell_formats.push(font_id);
        self.cell_format_map.insert(format_hash, index);
        index
    }

    fn add_font(&mut self, font: &CellFont) -> usize {
        let hash = Self::hash_font(font);
        if let Some(&index) = self.font_map.get(&hash) {
            return index;
        }

        let index = self.fonts.len();
        self.fonts.push(font.clone());
        self.font_map.insert(hash, index);
        index
    }

    pub fn font_count(&self) -> usize {
        self.fonts.len()
    }

    /// Generate the complete styles.xml content.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(1024);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(xml, r#"<styleSheet xmlns="{}">"#, namespace::SML_MAIN)?;

        write!(xml, r#"<fonts count="{}">"#, self.fonts.len())?;
        for font in &self.fonts {
            Self::write_font(&mut xml, font)?;
        }
        xml.push_str("</fonts>");

        xml.push_str(r#"<fills count="2"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill></fills>"#);
        xml.push_str(r#"<borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders>"#);
        xml.push_str(r#"<cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs>"#);

        write!(xml, r#"<cellXfs count="{}">"#, self.cell_formats.len())?;
        for font_id in &self.cell_formats {
            write!(
                xml,
                r#"<xf numFmtId="0" fontId="{}" fillId="0" borderId="0" xfId="0""#,
                font_id
            )?;
            if *font_id != 0 {
                xml.push_str(r#" applyFont="1""#);
            }
            xml.push_str("/>");
        }
        xml.push_str("</cellXfs>");

        xml.push_str(r#"<cellStyles count="1"><cellStyle name="Normal" xfId="0" builtinId="0"/></cellStyles>"#);
        xml.push_str("</styleSheet>");

        Ok(xml)
    }

    fn write_font(xml: &mut String, font: &CellFont) -> Result<()> {
        xml.push_str("<font>");
        if font.bold {
            xml.push_str("<b/>");
        }
        write!(
            xml,
            r#"<sz val="{}"/>"#,
            format_float(font.size.unwrap_or(DEFAULT_FONT_SIZE))
        )?;
        write!(
            xml,
            r#"<name val="{}"/>"#,
            escape_xml(font.name.as_deref().unwrap_or(DEFAULT_FONT_NAME))
        )?;
        xml.push_str("</font>");
        Ok(())
    }

    fn hash_font(font: &CellFont) -> u64 {
        let mut hasher = DefaultHasher::new();
        font.name.hash(&mut hasher);
        font.size.map(f64::to_bits).hash(&mut hasher);
        font.bold.hash(&mut hasher);
        hasher.finish()
    }

    fn hash_cell_format(format: &CellFormat) -> u64 {
        let mut hasher = DefaultHasher::new();
        format.font.as_ref().map(Self::hash_font).hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for StylesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
