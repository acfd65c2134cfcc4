//! Spreadsheet export: one header row and one data row.

use tracing::info;

use crate::error::Result;
use crate::location::export::{ExportArtifact, XLSX_MIME_TYPE};
use crate::location::record::LocationRecord;
use crate::ooxml::common::DocumentProperties;
use crate::ooxml::xlsx::{CellFont, CellFormat, CellValue, MutableWorkbookData};

pub const SHEET_NAME: &str = "ロケ地情報";
pub const FILE_NAME: &str = "location_data.xlsx";

const COLUMN_WIDTH: f64 = 18.0;

/// Lay the record out as a workbook without serializing it.
pub fn build_workbook(record: &LocationRecord) -> MutableWorkbookData {
    let mut workbook = MutableWorkbookData::new();
    let sheet = workbook.add_worksheet(SHEET_NAME);

    for (col, (label, value)) in (1u32..).zip(record.fields()) {
        sheet.set_cell_value(1, col, label);
        sheet.set_cell_format(1, col, CellFormat::with_font(CellFont::bold()));
        sheet.set_cell_value(2, col, CellValue::from(&value));
        sheet.set_column_width(col, COLUMN_WIDTH);
    }
    sheet.freeze_panes(1, 0);
    workbook
}

/// Export the record as `location_data.xlsx`.
pub fn export_spreadsheet(record: &LocationRecord) -> Result<ExportArtifact> {
    let properties = DocumentProperties::now().title(SHEET_NAME);
    let bytes = build_workbook(record).to_bytes(&properties)?;
    info!(file = FILE_NAME, size = bytes.len(), "exported spreadsheet");
    Ok(ExportArtifact {
        file_name: FILE_NAME,
        mime_type: XLSX_MIME_TYPE,
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::location::record::{Availability, RecordInput};
    use std::io::{Cursor, Read};

    fn sample_record() -> LocationRecord {
        let mut input = RecordInput {
            name: "港倉庫".into(),
            address: "横浜市中区1-1".into(),
            main_kind: "その他".into(),
            sub_kind: "屋上".into(),
            area_m2: 80.25,
            price_per_day: 120000,
            ..RecordInput::default()
        };
        input.details.set("駐車場の有無", Availability::Yes).unwrap();
        input.capture().unwrap()
    }

    #[test]
    fn test_header_and_single_data_row() {
        let record = sample_record();
        let workbook = build_workbook(&record);
        assert_eq!(workbook.worksheet_count(), 1);

        let sheet = workbook.worksheet(0).unwrap();
        assert_eq!(sheet.name(), SHEET_NAME);

        let fields = record.fields();
        assert_eq!(sheet.used_range(), Some((0, 0, 1, fields.len() as u32 - 1)));
        for (col, (label, value)) in (1u32..).zip(&fields) {
            assert_eq!(sheet.cell_value(1, col), Some(&CellValue::String(label.to_string())));
            assert_eq!(sheet.cell_value(2, col), Some(&CellValue::from(value)));
        }
        assert_eq!(sheet.cell_value(2, 7), Some(&CellValue::Float(80.25)));
        assert_eq!(sheet.cell_value(2, 12), Some(&CellValue::Int(120000)));
        assert_eq!(sheet.cell_value(2, 23), Some(&CellValue::String("あり".into())));
    }

    #[test]
    fn test_export_artifact() {
        let artifact = export_spreadsheet(&sample_record()).unwrap();
        assert_eq!(artifact.file_name, "location_data.xlsx");
        assert_eq!(artifact.mime_type, XLSX_MIME_TYPE);

        let mut archive = zip::ZipArchive::new(Cursor::new(artifact.bytes)).unwrap();
        let mut workbook_xml = String::new();
        archive
            .by_name("xl/workbook.xml")
            .unwrap()
            .read_to_string(&mut workbook_xml)
            .unwrap();
        assert!(workbook_xml.contains("name=\"ロケ地情報\""));

        let mut strings = String::new();
        archive
            .by_name("xl/sharedStrings.xml")
            .unwrap()
            .read_to_string(&mut strings)
            .unwrap();
        assert!(strings.contains("<t>港倉庫</t>"));
        assert!(strings.contains("<t>コーディネーター</t>"));

        let mut sheet = String::new();
        archive
            .by_name("xl/worksheets/sheet1.xml")
            .unwrap()
            .read_to_string(&mut sheet)
            .unwrap();
        assert!(sheet.contains("<v>80.25</v>"));
        assert!(sheet.contains("<v>120000</v>"));
        assert!(!sheet.contains("r=\"3\""));
    }

    #[test]
    fn test_control_characters_encoded_in_cells() {
        let record = RecordInput {
            name: "倉庫\u{0B}A棟".into(),
            transport: "駅から徒歩5分\u{1}".into(),
            ..RecordInput::default()
        }
        .capture()
        .unwrap();
        let artifact = export_spreadsheet(&record).unwrap();

        let mut archive = zip::ZipArchive::new(Cursor::new(artifact.bytes)).unwrap();
        let mut strings = String::new();
        archive
            .by_name("xl/sharedStrings.xml")
            .unwrap()
            .read_to_string(&mut strings)
            .unwrap();
        assert!(strings.contains("<t>倉庫_x000B_A棟</t>"));
        assert!(strings.contains("<t>駅から徒歩5分_x0001_</t>"));
        assert!(!strings.chars().any(|c| c < ' ' && !matches!(c, '\t' | '\n' | '\r')));
    }
}
