//! Relationships between parts of an OPC package.
//!
//! A relationship connects a source (a part, or the package itself) to a
//! target part and is referenced from the source's XML by its rId.

use crate::common::xml::escape_xml;
use std::collections::HashMap;

/// A single relationship from a source to a target part.
#[derive(Debug, Clone)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference, relative to the source's base URI
    target_ref: String,
}

impl Relationship {
    pub fn new(r_id: String, reltype: String, target_ref: String) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
        }
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }
}

/// Collection of relationships from a single source.
#[derive(Debug)]
pub struct Relationships {
    /// Base URI the target references are relative to
    base_uri: String,

    /// Map of relationship ID to Relationship
    rels: HashMap<String, Relationship>,
}

impl Relationships {
    pub fn new(base_uri: String) -> Self {
        Self {
            base_uri,
            rels: HashMap::new(),
        }
    }

    /// Base URI the target references are resolved against.
    #[inline]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Get or add a relationship to a target part.
    ///
    /// An existing relationship with the same type and target is reused;
    /// otherwise a new one is created with the next free rId.
    pub fn get_or_add(&mut self, reltype: &str, target_ref: &str) -> &Relationship {
        let existing = self
            .rels
            .values()
            .find(|rel| rel.reltype() == reltype && rel.target_ref() == target_ref)
            .map(|rel| rel.r_id().to_string());

        let r_id = existing.unwrap_or_else(|| {
            let r_id = self.next_r_id();
            self.rels.insert(
                r_id.clone(),
                Relationship::new(r_id.clone(), reltype.to_string(), target_ref.to_string()),
            );
            r_id
        });

        &self.rels[&r_id]
    }

    /// Next free relationship ID, filling gaps first ("rId1", "rId2", ...).
    fn next_r_id(&self) -> String {
        let mut used_numbers: Vec<u32> = self
            .rels
            .keys()
            .filter_map(|r_id| rid_number(r_id))
            .collect();
        used_numbers.sort_unstable();

        let mut next_num = 1u32;
        for &num in &used_numbers {
            match num.cmp(&next_num) {
                std::cmp::Ordering::Equal => next_num += 1,
                std::cmp::Ordering::Greater => break,
                std::cmp::Ordering::Less => {},
            }
        }

        format!("rId{}", next_num)
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.values()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Serialize to the XML of a `.rels` part, ordered by rId number.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        xml.push_str(
            r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
        );

        let mut rels: Vec<&Relationship> = self.rels.values().collect();
        rels.sort_by_key(|rel| (rid_number(rel.r_id()).unwrap_or(u32::MAX), rel.r_id()));

        for rel in rels {
            xml.push_str(&format!(
                r#"<Relationship Id="{}" Type="{}" Target="{}"/>"#,
                escape_xml(rel.r_id()),
                escape_xml(rel.reltype()),
                escape_xml(rel.target_ref()),
            ));
        }

        xml.push_str("</Relationships>");

        xml
    }
}

/// Numeric part of an "rIdN" identifier.
fn rid_number(r_id: &str) -> Option<u32> {
    r_id.strip_prefix("rId")
        .and_then(|digits| atoi_simd::parse::<u32, false, false>(digits.as_bytes()).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMAGE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    const LAYOUT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideLayout";

    #[test]
    fn test_sequential_ids_and_reuse() {
        let mut rels = Relationships::new("/ppt/slides".to_string());
        let layout = rels.get_or_add(LAYOUT, "../slideLayouts/slideLayout1.xml").r_id().to_string();
        let img1 = rels.get_or_add(IMAGE, "../media/image1.png").r_id().to_string();
        let again = rels.get_or_add(IMAGE, "../media/image1.png").r_id().to_string();

        assert_eq!(layout, "rId1");
        assert_eq!(img1, "rId2");
        assert_eq!(again, "rId2");
        assert_eq!(rels.len(), 2);
    }

    #[test]
    fn test_xml_is_numerically_ordered() {
        let mut rels = Relationships::new("/ppt/slides".to_string());
        for i in 1..=11 {
            rels.get_or_add(IMAGE, &format!("../media/image{}.png", i));
        }
        let xml = rels.to_xml();
        let pos2 = xml.find(r#"Id="rId2""#).unwrap();
        let pos10 = xml.find(r#"Id="rId10""#).unwrap();
        assert!(pos2 < pos10);
    }
}
