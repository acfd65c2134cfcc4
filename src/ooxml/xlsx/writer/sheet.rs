//! Worksheet writer.
use std::collections::{BTreeMap, HashMap};
use std::fmt::Write as FmtWrite;

use crate::common::xml::escape_xml;
use crate::common::{format_float, format_int};
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::namespace;
use crate::ooxml::xlsx::cell::CellValue;
use crate::ooxml::xlsx::format::CellFormat;

use super::strings::MutableSharedStrings;

/// Freeze pane configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreezePanes {
    /// Number of rows to freeze (from top)
    pub freeze_rows: u32,
    /// Number of columns to freeze (from left)
    pub freeze_cols: u32,
}

/// A mutable worksheet for writing.
///
/// The public API is 1-based (row 1 is the first row, column 1 is column A);
/// storage is 0-based.
#[derive(Debug)]
pub struct MutableWorksheet {
    /// Worksheet name
    name: String,
    /// Sheet ID
    sheet_id: u32,
    /// Cell data (row, col) -> value, iterated in row-major order
    cells: BTreeMap<(u32, u32), CellValue>,
    /// Cell formatting
    cell_formats: HashMap<(u32, u32), CellFormat>,
    /// Column widths (col -> width in characters)
    column_widths: BTreeMap<u32, f64>,
    /// Freeze panes configuration
    freeze_panes: Option<FreezePanes>,
}

impl MutableWorksheet {
    /// Create a new empty worksheet.
    pub fn new(name: String, sheet_id: u32) -> Self {
        Self {
            name,
            sheet_id,
            cells: BTreeMap::new(),
            cell_formats: HashMap::new(),
            column_widths: BTreeMap::new(),
            freeze_panes: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sheet_id(&self) -> u32 {
        self.sheet_id
    }

    /// Set a cell value.
    ///
    /// # Arguments
    /// * `row` - 1-based row number (1 = first row)
    /// * `col` - 1-based column number (1 = column A)
    pub fn set_cell_value<V: Into<CellValue>>(&mut self, row: u32, col: u32, value: V) {
        self.cells.insert((row - 1, col - 1), value.into());
    }

    /// Set cell formatting.
    pub fn set_cell_format(&mut self, row: u32, col: u32, format: CellFormat) {
        self.cell_formats.insert((row - 1, col - 1), format);
    }

    /// Get a cell value by 1-based position.
    pub fn cell_value(&self, row: u32, col: u32) -> Option<&CellValue> {
        self.cells.get(&(row.checked_sub(1)?, col.checked_sub(1)?))
    }

    /// Set column width in characters (Excel default is 8.43).
    ///
    /// # Arguments
    /// * `col` - 1-based column number (1 = column A)
    pub fn set_column_width(&mut self, col: u32, width: f64) {
        self.column_widths.insert(col - 1, width);
    }

    /// Freeze panes at the specified position.
    pub fn freeze_panes(&mut self, freeze_rows: u32, freeze_cols: u32) {
        if freeze_rows > 0 || freeze_cols > 0 {
            self.freeze_panes = Some(FreezePanes {
                freeze_rows,
                freeze_cols,
            });
        }
    }

    /// 0-based (min_row, min_col, max_row, max_col) of all stored cells.
    pub fn used_range(&self) -> Option<(u32, u32, u32, u32)> {
        if self.cells.is_empty() {
            return None;
        }

        let mut min_row = u32::MAX;
        let mut max_row = 0;
        let mut min_col = u32::MAX;
        let mut max_col = 0;

        for &(row, col) in self.cells.keys() {
            min_row = min_row.min(row);
            max_row = max_row.max(row);
            min_col = min_col.min(col);
            max_col = max_col.max(col);
        }

        Some((min_row, min_col, max_row, max_col))
    }

    /// Get cell formats for all cells (used by workbook to build styles).
    pub fn cell_formats(&self) -> &HashMap<(u32, u32), CellFormat> {
        &self.cell_formats
    }

    /// Serialize the worksheet to XML.
    ///
    /// # Arguments
    /// * `shared_strings` - Shared strings table that string cells are added to
    /// * `style_indices` - Map of 0-based cell positions to style indices
    pub fn to_xml(
        &self,
        shared_strings: &mut MutableSharedStrings,
        style_indices: &HashMap<(u32, u32), usize>,
    ) -> Result<String> {
        let mut xml = String::with_capacity(2048);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(
            xml,
            r#"<worksheet xmlns="{}" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
            namespace::SML_MAIN
        )?;

        // NOTE: Excel uses 1-based row/column numbering in XML
        if let Some((min_row, min_col, max_row, max_col)) = self.used_range() {
            write!(
                xml,
                r#"<dimension ref="{}{}:{}{}"/>"#,
                Self::column_to_letters(min_col + 1),
                min_row + 1,
                Self::column_to_letters(max_col + 1),
                max_row + 1
            )?;
        } else {
            xml.push_str(r#"<dimension ref="A1"/>"#);
        }

        self.write_sheet_views(&mut xml)?;
        xml.push_str(r#"<sheetFormatPr defaultRowHeight="15"/>"#);
        self.write_cols(&mut xml)?;

        xml.push_str("<sheetData>");
        self.write_sheet_data(&mut xml, shared_strings, style_indices)?;
        xml.push_str("</sheetData>");

        xml.push_str(
            r#"<pageMargins left="0.7" right="0.7" top="0.75" bottom="0.75" header="0.3" footer="0.3"/>"#,
        );
        xml.push_str("</worksheet>");

        Ok(xml)
    }

    fn write_sheet_views(&self, xml: &mut String) -> Result<()> {
        xml.push_str(r#"<sheetViews><sheetView tabSelected="1" workbookViewId="0""#);

        let Some(freeze) = self.freeze_panes else {
            xml.push_str("/></sheetViews>");
            return Ok(());
        };

        let (x_split, y_split) = (freeze.freeze_cols, freeze.freeze_rows);
        let active_pane = match (x_split > 0, y_split > 0) {
            (true, true) => "bottomRight",
            (true, false) => "topRight",
            _ => "bottomLeft",
        };
        let top_left_cell = format!("{}{}", Self::column_to_letters(x_split + 1), y_split + 1);

        xml.push('>');
        write!(xml, "<pane")?;
        if x_split > 0 {
            write!(xml, r#" xSplit="{}""#, x_split)?;
        }
        if y_split > 0 {
            write!(xml, r#" ySplit="{}""#, y_split)?;
        }
        write!(
            xml,
            r#" topLeftCell="{}" activePane="{}" state="frozen"/>"#,
            top_left_cell, active_pane
        )?;
        write!(
            xml,
            r#"<selection pane="{}" activeCell="{}" sqref="{}"/>"#,
            active_pane, top_left_cell, top_left_cell
        )?;
        xml.push_str("</sheetView></sheetViews>");
        Ok(())
    }

    fn write_cols(&self, xml: &mut String) -> Result<()> {
        if self.column_widths.is_empty() {
            return Ok(());
        }

        xml.push_str("<cols>");
        for (&col, &width) in &self.column_widths {
            write!(
                xml,
                r#"<col min="{}" max="{}" width="{}" customWidth="1"/>"#,
                col + 1,
                col + 1,
                format_float(width)
            )?;
        }
        xml.push_str("</cols>");
        Ok(())
    }

    /// Write sheet data (rows and cells).
    fn write_sheet_data(
        &self,
        xml: &mut String,
        shared_strings: &mut MutableSharedStrings,
        style_indices: &HashMap<(u32, u32), usize>,
    ) -> Result<()> {
        let mut current_row: Option<u32> = None;

        for (&(row_num, col_num), value) in &self.cells {
            if current_row != Some(row_num) {
                if current_row.is_some() {
                    xml.push_str("</row>");
                }
                write!(xml, r#"<row r="{}">"#, row_num + 1)?;
                current_row = Some(row_num);
            }

            let cell_ref = format!("{}{}", Self::column_to_letters(col_num + 1), row_num + 1);
            let style_index = style_indices.get(&(row_num, col_num)).copied();
            Self::write_cell(xml, &cell_ref, value, shared_strings, style_index)?;
        }

        if current_row.is_some() {
            xml.push_str("</row>");
        }
        Ok(())
    }

    fn write_cell(
        xml: &mut String,
        cell_ref: &str,
        value: &CellValue,
        shared_strings: &mut MutableSharedStrings,
        style_index: Option<usize>,
    ) -> Result<()> {
        let style_attr = match style_index {
            Some(idx) if idx != 0 => format!(r#" s="{}""#, idx),
            _ => String::new(),
        };

        match value {
            CellValue::Empty => {
                write!(xml, r#"<c r="{}"{}/>"#, cell_ref, style_attr)?;
            },
            CellValue::String(s) => {
                let string_index = shared_strings.add_string(s);
                write!(
                    xml,
                    r#"<c r="{}"{} t="s"><v>{}</v></c>"#,
                    cell_ref, style_attr, string_index
                )?;
            },
            CellValue::Int(i) => {
                write!(
                    xml,
                    r#"<c r="{}"{}><v>{}</v></c>"#,
                    cell_ref,
                    style_attr,
                    format_int(*i)
                )?;
            },
            CellValue::Float(f) => {
                if f.is_finite() {
                    write!(
                        xml,
                        r#"<c r="{}"{}><v>{}</v></c>"#,
                        cell_ref,
                        style_attr,
                        format_float(*f)
                    )?;
                } else {
                    write!(xml, r#"<c r="{}"{}/>"#, cell_ref, style_attr)?;
                }
            },
            CellValue::Bool(b) => {
                write!(
                    xml,
                    r#"<c r="{}"{} t="b"><v>{}</v></c>"#,
                    cell_ref,
                    style_attr,
                    if *b { "1" } else { "0" }
                )?;
            },
        }

        Ok(())
    }

    /// Convert a 1-based column number to letters (1 -> A, 27 -> AA).
    pub fn column_to_letters(col: u32) -> String {
        let mut letters = String::new();
        let mut col = col;

        while col > 0 {
            col -= 1;
            let letter = ((col % 26) as u8 + b'A') as char;
            letters.insert(0, letter);
            col /= 26;
        }

        letters
    }

    /// Escaped sheet name for use in workbook.xml.
    pub(crate) fn escaped_name(&self) -> String {
        escape_xml(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_cell_value() {
        let mut ws = MutableWorksheet::new("ロケ地情報".to_string(), 1);
        ws.set_cell_value(1, 1, "ロケ地名");
        ws.set_cell_value(2, 1, "山田邸");
        ws.set_cell_value(2, 2, 42i64);

        assert_eq!(ws.cell_value(1, 1), Some(&CellValue::String("ロケ地名".to_string())));
        assert_eq!(
            ws.cell_value(2, 1),
            Some(&CellValue::String("山田邸".to_string()))
        );
        assert_eq!(ws.cell_value(0, 1), None);
        assert_eq!(ws.used_range(), Some((0, 0, 1, 1)));
    }

    #[test]
    fn test_column_to_letters() {
        assert_eq!(MutableWorksheet::column_to_letters(1), "A");
        assert_eq!(MutableWorksheet::column_to_letters(26), "Z");
        assert_eq!(MutableWorksheet::column_to_letters(27), "AA");
        assert_eq!(MutableWorksheet::column_to_letters(40), "AN");
    }

    #[test]
    fn test_to_xml_cells() {
        let mut ws = MutableWorksheet::new("Sheet1".to_string(), 1);
        ws.set_cell_value(1, 1, "名前");
        ws.set_cell_value(2, 1, 12.5);
        ws.set_cell_value(2, 2, true);
        ws.set_cell_value(2, 3, CellValue::Empty);

        let mut strings = MutableSharedStrings::new();
        let mut styles = HashMap::new();
        styles.insert((0, 0), 1usize);

        let xml = ws.to_xml(&mut strings, &styles).unwrap();
        assert!(xml.contains(r#"<dimension ref="A1:C2"/>"#));
        assert!(xml.contains(r#"<row r="1"><c r="A1" s="1" t="s"><v>0</v></c></row>"#));
        assert!(xml.contains(r#"<c r="A2"><v>12.5</v></c>"#));
        assert!(xml.contains(r#"<c r="B2" t="b"><v>1</v></c>"#));
        assert!(xml.contains(r#"<c r="C2"/>"#));
        assert_eq!(strings.count(), 1);
    }

    #[test]
    fn test_freeze_header_row() {
        let mut ws = MutableWorksheet::new("Sheet1".to_string(), 1);
        ws.freeze_panes(1, 0);
        ws.set_column_width(1, 24.0);

        let xml = ws
            .to_xml(&mut MutableSharedStrings::new(), &HashMap::new())
            .unwrap();
        assert!(xml.contains(
            r#"<pane ySplit="1" topLeftCell="A2" activePane="bottomLeft" state="frozen"/>"#
        ));
        assert!(xml.contains(r#"<col min="1" max="1" width="24" customWidth="1"/>"#));
    }
}
