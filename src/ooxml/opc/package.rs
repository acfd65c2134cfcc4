//! In-memory model of an OPC package being written.

use std::collections::BTreeMap;

use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::part::Part;
use crate::ooxml::opc::rel::Relationships;

/// An OPC package under construction.
///
/// Parts are kept ordered by partname so two packages built from the same
/// input serialize to the same archive layout.
pub struct OpcPackage {
    /// Package-level relationships (`/_rels/.rels`)
    rels: Relationships,

    /// All parts in the package, indexed by partname
    parts: BTreeMap<String, Box<dyn Part>>,
}

impl OpcPackage {
    /// Create a new empty OPC package.
    pub fn new() -> Self {
        Self {
            rels: Relationships::new(PACKAGE_URI.to_string()),
            parts: BTreeMap::new(),
        }
    }

    /// Add a new part to the package.
    ///
    /// Partnames are unique within a package; adding a second part under the
    /// same name is an error.
    pub fn add_part(&mut self, part: Box<dyn Part>) -> Result<()> {
        let partname = part.partname().to_string();
        if self.parts.contains_key(&partname) {
            return Err(OpcError::DuplicatePart(partname));
        }
        self.parts.insert(partname, part);
        Ok(())
    }

    /// Iterate over all parts in partname order.
    pub fn iter_parts(&self) -> impl Iterator<Item = &dyn Part> {
        self.parts.values().map(|b| &**b as &dyn Part)
    }

    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    /// Get a reference to the package-level relationships.
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Relate the package to a part and return the rId.
    pub fn relate_to(&mut self, partname: &PackURI, reltype: &str) -> String {
        let target_ref = partname.relative_ref(PACKAGE_URI);
        self.rels.get_or_add(reltype, &target_ref).r_id().to_string()
    }

    /// Find the next free partname for a template with a `%d` placeholder.
    ///
    /// `next_partname("/ppt/media/image%d.png")` yields `/ppt/media/image1.png`,
    /// then `image2.png` once the first has been added, and so on.
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        for n in 1..=10_000u32 {
            let candidate = template.replace("%d", &n.to_string());
            if !self.parts.contains_key(&candidate) {
                return PackURI::new(candidate).map_err(OpcError::InvalidPackUri);
            }
        }
        Err(OpcError::PartnameExhausted(template.to_string()))
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::part::BlobPart;

    fn part(name: &str) -> Box<dyn Part> {
        Box::new(BlobPart::new(
            PackURI::new(name).unwrap(),
            "application/xml",
            b"<x/>".to_vec(),
        ))
    }

    #[test]
    fn test_next_partname() {
        let mut pkg = OpcPackage::new();
        let first = pkg.next_partname("/ppt/media/image%d.png").unwrap();
        assert_eq!(first.as_str(), "/ppt/media/image1.png");

        pkg.add_part(part(first.as_str())).unwrap();
        let second = pkg.next_partname("/ppt/media/image%d.png").unwrap();
        assert_eq!(second.as_str(), "/ppt/media/image2.png");
    }

    #[test]
    fn test_duplicate_part_rejected() {
        let mut pkg = OpcPackage::new();
        pkg.add_part(part("/xl/workbook.xml")).unwrap();
        assert!(matches!(
            pkg.add_part(part("/xl/workbook.xml")),
            Err(OpcError::DuplicatePart(_))
        ));
        assert_eq!(pkg.part_count(), 1);
    }

    #[test]
    fn test_package_relationship_target() {
        let mut pkg = OpcPackage::new();
        let r_id = pkg.relate_to(
            &PackURI::new("/ppt/presentation.xml").unwrap(),
            crate::ooxml::opc::constants::relationship_type::OFFICE_DOCUMENT,
        );
        assert_eq!(r_id, "rId1");
        assert!(pkg.rels().to_xml().contains(r#"Target="ppt/presentation.xml""#));
    }
}
