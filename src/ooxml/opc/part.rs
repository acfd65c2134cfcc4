//! Parts of an OPC package.
//!
//! A part is the unit of content in a package: a partname, a content type, a
//! blob, and the relationships from this part to other parts.

use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::Relationships;

/// Trait representing a part in an OPC package.
pub trait Part {
    /// Get the partname of this part.
    fn partname(&self) -> &PackURI;

    /// Get the content type of this part.
    fn content_type(&self) -> &str;

    /// Get the binary content of this part.
    fn blob(&self) -> &[u8];

    /// Get the relationships for this part.
    fn rels(&self) -> &Relationships;

    /// Get mutable access to the relationships for this part.
    fn rels_mut(&mut self) -> &mut Relationships;

    /// Add or get a relationship to another part and return its rId.
    ///
    /// The target is given as an absolute partname and stored relative to
    /// this part's directory, as the `.rels` format requires.
    fn relate_to(&mut self, target: &PackURI, reltype: &str) -> String {
        let target_ref = target.relative_ref(self.partname().base_uri());
        self.rels_mut()
            .get_or_add(reltype, &target_ref)
            .r_id()
            .to_string()
    }
}

/// A part holding its content as raw bytes.
///
/// Both generated XML and embedded media end up here; the writers build the
/// XML as a `String` and hand over its bytes.
#[derive(Debug)]
pub struct BlobPart {
    partname: PackURI,
    content_type: String,
    blob: Vec<u8>,
    rels: Relationships,
}

impl BlobPart {
    /// Create a new BlobPart.
    ///
    /// # Arguments
    /// * `partname` - The partname (URI) of this part
    /// * `content_type` - The content type of this part
    /// * `blob` - The binary content of this part
    pub fn new(partname: PackURI, content_type: impl Into<String>, blob: Vec<u8>) -> Self {
        let rels = Relationships::new(partname.base_uri().to_string());
        Self {
            partname,
            content_type: content_type.into(),
            blob,
            rels,
        }
    }

    /// Replace the content, keeping partname and relationships.
    ///
    /// Used when a part's XML can only be generated after its relationships
    /// have been assigned rIds.
    pub fn set_blob(&mut self, blob: Vec<u8>) {
        self.blob = blob;
    }
}

impl Part for BlobPart {
    fn partname(&self) -> &PackURI {
        &self.partname
    }

    fn content_type(&self) -> &str {
        &self.content_type
    }

    fn blob(&self) -> &[u8] {
        &self.blob
    }

    fn rels(&self) -> &Relationships {
        &self.rels
    }

    fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::relationship_type as rt;

    #[test]
    fn test_relate_to_stores_relative_target() {
        let mut slide = BlobPart::new(
            PackURI::new("/ppt/slides/slide1.xml").unwrap(),
            "application/xml",
            Vec::new(),
        );
        let media = PackURI::new("/ppt/media/image3.png").unwrap();
        let r_id = slide.relate_to(&media, rt::IMAGE);

        assert_eq!(r_id, "rId1");
        let xml = slide.rels().to_xml();
        assert!(xml.contains(r#"Id="rId1""#));
        assert!(xml.contains(r#"Target="../media/image3.png""#));
    }
}
