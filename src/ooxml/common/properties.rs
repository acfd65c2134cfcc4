//! Package metadata parts shared by the spreadsheet and the deck.
//!
//! Produces `docProps/core.xml` and `docProps/app.xml`.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
use crate::ooxml::opc::{BlobPart, OpcPackage, PackURI};

/// Application name written to `docProps/app.xml`.
pub const APPLICATION_NAME: &str = env!("CARGO_PKG_NAME");

/// Document core properties (metadata).
///
/// These properties are stored in the `docProps/core.xml` part.
#[derive(Debug, Clone, Default)]
pub struct DocumentProperties {
    /// Document title
    pub title: Option<String>,
    /// Creation date
    pub created: Option<DateTime<Utc>>,
    /// Last modification date
    pub modified: Option<DateTime<Utc>>,
}

impl DocumentProperties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Properties stamped with the current time as both created and modified.
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created: Some(now),
            modified: Some(now),
            ..Self::default()
        }
    }

    /// Set the document title.
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Generate core.xml content for this properties set.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(768);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(r#"<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">"#);

        if let Some(ref title) = self.title {
            xml.push_str("<dc:title>");
            xml.push_str(&escape_xml(title));
            xml.push_str("</dc:title>");
        }
        if let Some(ref created) = self.created {
            xml.push_str("<dcterms:created xsi:type=\"dcterms:W3CDTF\">");
            xml.push_str(&created.to_rfc3339_opts(SecondsFormat::Secs, true));
            xml.push_str("</dcterms:created>");
        }
        if let Some(ref modified) = self.modified {
            xml.push_str("<dcterms:modified xsi:type=\"dcterms:W3CDTF\">");
            xml.push_str(&modified.to_rfc3339_opts(SecondsFormat::Secs, true));
            xml.push_str("</dcterms:modified>");
        }

        xml.push_str("</cp:coreProperties>");
        xml
    }
}

/// Generate a minimal `docProps/app.xml` naming the producing application.
pub fn app_properties_xml(application: &str) -> String {
    let mut xml = String::with_capacity(320);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">"#);
    xml.push_str("<Application>");
    xml.push_str(&escape_xml(application));
    xml.push_str("</Application>");
    xml.push_str("</Properties>");
    xml
}

/// Add `docProps/core.xml` and `docProps/app.xml` to a package and relate
/// the package to both.
pub fn add_doc_props(package: &mut OpcPackage, properties: &DocumentProperties) -> Result<()> {
    let core_uri = PackURI::new("/docProps/core.xml").map_err(OoxmlError::InvalidFormat)?;
    package.add_part(Box::new(BlobPart::new(
        core_uri.clone(),
        ct::OPC_CORE_PROPERTIES,
        properties.to_xml().into_bytes(),
    )))?;
    package.relate_to(&core_uri, rt::CORE_PROPERTIES);

    let app_uri = PackURI::new("/docProps/app.xml").map_err(OoxmlError::InvalidFormat)?;
    package.add_part(Box::new(BlobPart::new(
        app_uri.clone(),
        ct::OFC_EXTENDED_PROPERTIES,
        app_properties_xml(APPLICATION_NAME).into_bytes(),
    )))?;
    package.relate_to(&app_uri, rt::EXTENDED_PROPERTIES);
    Ok(())
}
