//! Workbook data structure and package assembly for XLSX.
use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

use tracing::debug;

use crate::ooxml::common::{DocumentProperties, add_doc_props};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as ct, namespace, relationship_type as rt};
use crate::ooxml::opc::{BlobPart, OpcPackage, PackURI, PackageWriter, Part};

use super::sheet::MutableWorksheet;
use super::strings::MutableSharedStrings;
use super::styles::StylesBuilder;

/// Type alias for cell position to style index mapping.
type CellStyleMap = HashMap<(u32, u32), usize>;

/// Mutable workbook for writing.
#[derive(Debug, Default)]
pub struct MutableWorkbookData {
    /// Worksheets
    worksheets: Vec<MutableWorksheet>,
}

impl MutableWorkbookData {
    /// Create a new workbook with no worksheets.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a new worksheet.
    pub fn add_worksheet(&mut self, name: impl Into<String>) -> &mut MutableWorksheet {
        let sheet_id = (self.worksheets.len() + 1) as u32;
        let index = self.worksheets.len();
        self.worksheets
            .push(MutableWorksheet::new(name.into(), sheet_id));
        &mut self.worksheets[index]
    }

    /// Get a worksheet by index.
    pub fn worksheet(&self, index: usize) -> Option<&MutableWorksheet> {
        self.worksheets.get(index)
    }

    pub fn worksheet_count(&self) -> usize {
        self.worksheets.len()
    }

    /// Build styles from all worksheets.
    ///
    /// Returns the StylesBuilder and, per worksheet, the cell position to
    /// style index mapping.
    pub fn build_styles(&self) -> (StylesBuilder, Vec<CellStyleMap>) {
        let mut builder = StylesBuilder::new();
        let mut worksheet_style_indices = Vec::with_capacity(self.worksheets.len());

        for ws in &self.worksheets {
            let mut style_map = CellStyleMap::new();
            for (pos, format) in ws.cell_formats() {
                let style_index = builder.add_cell_format(format);
                style_map.insert(*pos, style_index);
            }
            worksheet_style_indices.push(style_map);
        }

        (builder, worksheet_style_indices)
    }

    /// Generate workbook.xml content with the given worksheet relationship IDs.
    fn generate_workbook_xml(&self, worksheet_rel_ids: &[String]) -> Result<String> {
        let mut xml = String::with_capacity(1024);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(
            xml,
            r#"<workbook xmlns="{}" xmlns:r="{}">"#,
            namespace::SML_MAIN,
            namespace::OFC_RELATIONSHIPS
        )?;
        xml.push_str(r#"<bookViews><workbookView activeTab="0"/></bookViews>"#);

        xml.push_str("<sheets>");
        for (ws, rel_id) in self.worksheets.iter().zip(worksheet_rel_ids) {
            write!(
                xml,
                r#"<sheet name="{}" sheetId="{}" r:id="{}"/>"#,
                ws.escaped_name(),
                ws.sheet_id(),
                rel_id
            )?;
        }
        xml.push_str("</sheets>");
        xml.push_str("</workbook>");

        Ok(xml)
    }

    /// Serialize the workbook into a complete `.xlsx` package.
    pub fn to_bytes(&self, properties: &DocumentProperties) -> Result<Vec<u8>> {
        if self.worksheets.is_empty() {
            return Err(OoxmlError::InvalidFormat(
                "a workbook needs at least one worksheet".to_string(),
            ));
        }

        let mut package = OpcPackage::new();
        let workbook_uri = uri("/xl/workbook.xml")?;
        let mut workbook_part = BlobPart::new(workbook_uri.clone(), ct::SML_SHEET_MAIN, Vec::new());

        let (styles, style_maps) = self.build_styles();
        let mut shared_strings = MutableSharedStrings::new();
        let mut worksheet_rel_ids = Vec::with_capacity(self.worksheets.len());

        // Worksheets first: serializing them fills the shared strings table.
        for (index, (ws, style_map)) in self.worksheets.iter().zip(&style_maps).enumerate() {
            let sheet_uri = uri(&format!("/xl/worksheets/sheet{}.xml", index + 1))?;
            let sheet_xml = ws.to_xml(&mut shared_strings, style_map)?;
            worksheet_rel_ids.push(workbook_part.relate_to(&sheet_uri, rt::WORKSHEET));
            package.add_part(Box::new(BlobPart::new(
                sheet_uri,
                ct::SML_WORKSHEET,
                sheet_xml.into_bytes(),
            )))?;
        }

        let styles_uri = uri("/xl/styles.xml")?;
        workbook_part.relate_to(&styles_uri, rt::STYLES);
        package.add_part(Box::new(BlobPart::new(
            styles_uri,
            ct::SML_STYLES,
            styles.to_xml()?.into_bytes(),
        )))?;

        let strings_uri = uri("/xl/sharedStrings.xml")?;
        workbook_part.relate_to(&strings_uri, rt::SHARED_STRINGS);
        package.add_part(Box::new(BlobPart::new(
            strings_uri,
            ct::SML_SHARED_STRINGS,
            shared_strings.to_xml()?.into_bytes(),
        )))?;

        workbook_part.set_blob(self.generate_workbook_xml(&worksheet_rel_ids)?.into_bytes());
        package.add_part(Box::new(workbook_part))?;
        package.relate_to(&workbook_uri, rt::OFFICE_DOCUMENT);

        add_doc_props(&mut package, properties)?;

        debug!(
            worksheets = self.worksheets.len(),
            shared_strings = shared_strings.count(),
            "serializing workbook package"
        );
        Ok(PackageWriter::to_bytes(&package)?)
    }
}

fn uri(partname: &str) -> Result<PackURI> {
    PackURI::new(partname).map_err(OoxmlError::InvalidFormat)
}
