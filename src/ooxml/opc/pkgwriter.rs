//! Serializes an [`OpcPackage`] into archive bytes.
//!
//! Writes `[Content_Types].xml`, the package relationships and every part
//! together with its `.rels` item.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::{content_type as ct, namespace};
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::package::OpcPackage;
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use crate::ooxml::opc::phys_pkg::PhysPkgWriter;

/// Package writer that serializes an OPC package to a ZIP archive in memory.
pub struct PackageWriter;

impl PackageWriter {
    /// Serialize an OPC package to bytes.
    pub fn to_bytes(package: &OpcPackage) -> Result<Vec<u8>> {
        let mut phys_writer = PhysPkgWriter::new();

        Self::write_content_types(&mut phys_writer, package)?;
        Self::write_pkg_rels(&mut phys_writer, package)?;
        Self::write_parts(&mut phys_writer, package)?;

        phys_writer.finish()
    }

    fn write_content_types(phys_writer: &mut PhysPkgWriter, package: &OpcPackage) -> Result<()> {
        let cti = ContentTypesItem::from_package(package);
        let content_types_uri = PackURI::new(CONTENT_TYPES_URI).map_err(OpcError::InvalidPackUri)?;
        phys_writer.write(&content_types_uri, cti.to_xml().as_bytes())
    }

    fn write_pkg_rels(phys_writer: &mut PhysPkgWriter, package: &OpcPackage) -> Result<()> {
        let rels_uri = PackURI::new(PACKAGE_URI)
            .and_then(|uri| uri.rels_uri())
            .map_err(OpcError::InvalidPackUri)?;
        phys_writer.write(&rels_uri, package.rels().to_xml().as_bytes())
    }

    fn write_parts(phys_writer: &mut PhysPkgWriter, package: &OpcPackage) -> Result<()> {
        for part in package.iter_parts() {
            if is_precompressed(part.content_type()) {
                phys_writer.write_stored(part.partname(), part.blob())?;
            } else {
                phys_writer.write(part.partname(), part.blob())?;
            }

            if !part.rels().is_empty() {
                let rels_uri = part
                    .partname()
                    .rels_uri()
                    .map_err(OpcError::InvalidPackUri)?;
                phys_writer.write(&rels_uri, part.rels().to_xml().as_bytes())?;
            }
        }
        Ok(())
    }
}

#[inline]
fn is_precompressed(content_type: &str) -> bool {
    matches!(content_type, ct::PNG | ct::JPEG)
}

/// Builds `[Content_Types].xml`: Default elements by extension, Override
/// elements by partname.
struct ContentTypesItem {
    defaults: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
}

impl ContentTypesItem {
    fn new() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert("rels".to_string(), ct::OPC_RELATIONSHIPS.to_string());
        defaults.insert("xml".to_string(), ct::XML.to_string());
        Self {
            defaults,
            overrides: BTreeMap::new(),
        }
    }

    fn from_package(package: &OpcPackage) -> Self {
        let mut cti = Self::new();
        for part in package.iter_parts() {
            cti.add_content_type(part.partname(), part.content_type());
        }
        cti
    }

    fn add_content_type(&mut self, partname: &PackURI, content_type: &str) {
        let ext = partname.ext();
        if Self::is_default_content_type(ext, content_type) {
            self.defaults
                .insert(ext.to_string(), content_type.to_string());
        } else {
            self.overrides
                .insert(partname.to_string(), content_type.to_string());
        }
    }

    fn is_default_content_type(ext: &str, content_type: &str) -> bool {
        matches!(
            (ext, content_type),
            ("rels", ct::OPC_RELATIONSHIPS)
                | ("xml", ct::XML)
                | ("png", ct::PNG)
                | ("jpg", ct::JPEG)
                | ("jpeg", ct::JPEG)
        )
    }

    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(2048);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        let _ = write!(xml, r#"<Types xmlns="{}">"#, namespace::OPC_CONTENT_TYPES);

        for (ext, content_type) in &self.defaults {
            let _ = write!(
                xml,
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(content_type)
            );
        }
        for (partname, content_type) in &self.overrides {
            let _ = write!(
                xml,
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(partname),
                escape_xml(content_type)
            );
        }

        xml.push_str("</Types>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::part::BlobPart;
    use std::io::{Cursor, Read};

    #[test]
    fn test_content_types_xml() {
        let mut cti = ContentTypesItem::new();
        cti.add_content_type(&PackURI::new("/ppt/media/image1.png").unwrap(), ct::PNG);
        cti.add_content_type(
            &PackURI::new("/xl/workbook.xml").unwrap(),
            ct::SML_SHEET_MAIN,
        );

        let xml = cti.to_xml();
        assert!(xml.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(xml.contains(r#"<Override PartName="/xl/workbook.xml""#));
        assert!(!xml.contains(r#"PartName="/ppt/media/image1.png""#));
    }

    #[test]
    fn test_to_bytes_writes_parts_and_rels() {
        let mut pkg = OpcPackage::new();
        let partname = PackURI::new("/xl/workbook.xml").unwrap();
        pkg.add_part(Box::new(BlobPart::new(
            partname.clone(),
            ct::SML_SHEET_MAIN,
            b"<workbook/>".to_vec(),
        )))
        .unwrap();
        pkg.relate_to(
            &partname,
            crate::ooxml::opc::constants::relationship_type::OFFICE_DOCUMENT,
        );

        let bytes = PackageWriter::to_bytes(&pkg).unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        for name in ["[Content_Types].xml", "_rels/.rels", "xl/workbook.xml"] {
            assert!(archive.by_name(name).is_ok(), "missing {name}");
        }

        let mut body = String::new();
        archive
            .by_name("xl/workbook.xml")
            .unwrap()
            .read_to_string(&mut body)
            .unwrap();
        assert_eq!(body, "<workbook/>");
    }
}
