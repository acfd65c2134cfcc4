//! In-memory export results.

use crate::ooxml::opc::constants::content_type as ct;

/// MIME type of `.xlsx` workbooks.
pub const XLSX_MIME_TYPE: &str = ct::SML_SHEET;
/// MIME type of `.pptx` presentations.
pub const PPTX_MIME_TYPE: &str = ct::PML_PRESENTATION;

/// A finished file, ready to be offered for download or written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: &'static str,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}
