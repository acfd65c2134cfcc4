//! Presentation writer for PPTX.
use std::fmt::Write as FmtWrite;

use tracing::debug;

use crate::common::unit::Emu;
use crate::ooxml::common::{DocumentProperties, add_doc_props};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::{content_type as ct, namespace, relationship_type as rt};
use crate::ooxml::opc::{BlobPart, OpcPackage, PackURI, PackageWriter, Part};
use crate::ooxml::pptx::template;

use super::slide::MutableSlide;

/// 13.333in, the 16:9 widescreen width.
pub const WIDESCREEN_WIDTH: Emu = 12_192_000;
/// 7.5in.
pub const WIDESCREEN_HEIGHT: Emu = 6_858_000;

/// A mutable PowerPoint presentation for writing.
#[derive(Debug)]
pub struct MutablePresentation {
    /// Slides in the presentation
    slides: Vec<MutableSlide>,
    /// Slide width in EMUs (English Metric Units, 914400 EMU = 1 inch)
    slide_width: Emu,
    /// Slide height in EMUs
    slide_height: Emu,
}

impl MutablePresentation {
    /// Create a new empty presentation.
    ///
    /// Default size is 13.333" x 7.5" (16:9 widescreen).
    pub fn new() -> Self {
        Self::with_size(WIDESCREEN_WIDTH, WIDESCREEN_HEIGHT)
    }

    /// Create a new empty presentation with the given slide size in EMUs.
    pub fn with_size(slide_width: Emu, slide_height: Emu) -> Self {
        Self {
            slides: Vec::new(),
            slide_width,
            slide_height,
        }
    }

    /// Add a new slide to the presentation.
    pub fn add_slide(&mut self) -> &mut MutableSlide {
        // Slide IDs start at 256 per ECMA-376.
        let slide_id = (self.slides.len() + 256) as u32;
        let index = self.slides.len();
        self.slides.push(MutableSlide::new(slide_id));
        &mut self.slides[index]
    }

    /// Get the number of slides.
    pub fn slide_count(&self) -> usize {
        self.slides.len()
    }

    pub fn slides(&self) -> &[MutableSlide] {
        &self.slides
    }

    /// Get the slide width in EMUs.
    pub fn slide_width(&self) -> Emu {
        self.slide_width
    }

    /// Get the slide height in EMUs.
    pub fn slide_height(&self) -> Emu {
        self.slide_height
    }

    /// Generate presentation.xml content with actual relationship IDs.
    fn generate_presentation_xml(&self, master_rel_id: &str, slide_rel_ids: &[String]) -> Result<String> {
        let mut xml = String::with_capacity(1024 + self.slides.len() * 48);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(
            xml,
            r#"<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">"#,
            namespace::DML_MAIN,
            namespace::OFC_RELATIONSHIPS,
            namespace::PML_MAIN
        )?;

        write!(
            xml,
            r#"<p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="{}"/></p:sldMasterIdLst>"#,
            master_rel_id
        )?;

        if !self.slides.is_empty() {
            xml.push_str("<p:sldIdLst>");
            for (slide, rel_id) in self.slides.iter().zip(slide_rel_ids) {
                write!(
                    xml,
                    r#"<p:sldId id="{}" r:id="{}"/>"#,
                    slide.slide_id(),
                    rel_id
                )?;
            }
            xml.push_str("</p:sldIdLst>");
        }

        write!(
            xml,
            r#"<p:sldSz cx="{}" cy="{}"/>"#,
            self.slide_width, self.slide_height
        )?;
        xml.push_str(r#"<p:notesSz cx="6858000" cy="9144000"/>"#);
        xml.push_str("</p:presentation>");

        Ok(xml)
    }

    /// Serialize the presentation into a complete `.pptx` package.
    ///
    /// Every picture becomes its own media part holding the original bytes.
    pub fn to_bytes(&self, properties: &DocumentProperties) -> Result<Vec<u8>> {
        let mut package = OpcPackage::new();

        let pres_uri = uri("/ppt/presentation.xml")?;
        let master_uri = uri("/ppt/slideMasters/slideMaster1.xml")?;
        let layout_uri = uri("/ppt/slideLayouts/slideLayout1.xml")?;
        let theme_uri = uri("/ppt/theme/theme1.xml")?;

        let mut pres_part = BlobPart::new(pres_uri.clone(), ct::PML_PRESENTATION_MAIN, Vec::new());
        let master_rel_id = pres_part.relate_to(&master_uri, rt::SLIDE_MASTER);

        // Master -> layout, theme
        let mut master_part = BlobPart::new(master_uri.clone(), ct::PML_SLIDE_MASTER, Vec::new());
        let layout_rel_id = master_part.relate_to(&layout_uri, rt::SLIDE_LAYOUT);
        master_part.relate_to(&theme_uri, rt::THEME);
        master_part.set_blob(template::slide_master_xml(&layout_rel_id).into_bytes());
        package.add_part(Box::new(master_part))?;

        // Layout -> master
        let mut layout_part = BlobPart::new(
            layout_uri.clone(),
            ct::PML_SLIDE_LAYOUT,
            template::SLIDE_LAYOUT_BLANK_XML.as_bytes().to_vec(),
        );
        layout_part.relate_to(&master_uri, rt::SLIDE_MASTER);
        package.add_part(Box::new(layout_part))?;

        package.add_part(Box::new(BlobPart::new(
            theme_uri.clone(),
            ct::OFC_THEME,
            template::THEME_XML.as_bytes().to_vec(),
        )))?;

        let mut slide_rel_ids = Vec::with_capacity(self.slides.len());
        let mut media_count = 0usize;
        for (index, slide) in self.slides.iter().enumerate() {
            let slide_uri = uri(&format!("/ppt/slides/slide{}.xml", index + 1))?;
            let mut slide_part = BlobPart::new(slide_uri.clone(), ct::PML_SLIDE, Vec::new());
            slide_part.relate_to(&layout_uri, rt::SLIDE_LAYOUT);

            let mut image_rel_ids = Vec::new();
            for (data, format) in slide.collect_images() {
                media_count += 1;
                let media_uri =
                    package.next_partname(&format!("/ppt/media/image%d.{}", format.extension()))?;
                image_rel_ids.push(slide_part.relate_to(&media_uri, rt::IMAGE));
                package.add_part(Box::new(BlobPart::new(
                    media_uri,
                    format.mime_type(),
                    data.to_vec(),
                )))?;
            }

            slide_part.set_blob(slide.to_xml(&image_rel_ids)?.into_bytes());
            package.add_part(Box::new(slide_part))?;
            slide_rel_ids.push(pres_part.relate_to(&slide_uri, rt::SLIDE));
        }

        pres_part.relate_to(&theme_uri, rt::THEME);
        pres_part.set_blob(
            self.generate_presentation_xml(&master_rel_id, &slide_rel_ids)?
                .into_bytes(),
        );
        package.add_part(Box::new(pres_part))?;
        package.relate_to(&pres_uri, rt::OFFICE_DOCUMENT);

        add_doc_props(&mut package, properties)?;

        debug!(
            slides = self.slides.len(),
            media = media_count,
            parts = package.part_count(),
            "serializing presentation package"
        );
        Ok(PackageWriter::to_bytes(&package)?)
    }
}

impl Default for MutablePresentation {
    fn default() -> Self {
        Self::new()
    }
}

fn uri(partname: &str) -> Result<PackURI> {
    PackURI::new(partname).map_err(OoxmlError::InvalidFormat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;
    use std::io::{Cursor, Read};

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn read_member(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut out = String::new();
        archive
            .by_name(name)
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        out
    }

    #[test]
    fn test_create_presentation() {
        let pres = MutablePresentation::new();
        assert_eq!(pres.slide_count(), 0);
        assert_eq!(pres.slide_width(), 12_192_000);
        assert_eq!(pres.slide_height(), 6_858_000);
    }

    #[test]
    fn test_add_slide() {
        let mut pres = MutablePresentation::new();
        pres.add_slide().add_text_box("Hello", 100, 100, 500, 200);
        assert_eq!(pres.slide_count(), 1);
        assert_eq!(pres.slides()[0].slide_id(), 256);
        assert_eq!(pres.slides()[0].shape_count(), 1);
    }

    #[test]
    fn test_package_layout() {
        let mut pres = MutablePresentation::new();
        pres.add_slide().add_text_box("表紙", 0, 0, 10, 10);
        let slide = pres.add_slide();
        slide
            .add_picture(Bytes::from_static(PNG_MAGIC), 0, 0, 10, 10, "a.png")
            .unwrap();

        let bytes = pres.to_bytes(&DocumentProperties::now()).unwrap();

        let presentation = read_member(&bytes, "ppt/presentation.xml");
        assert!(presentation.contains(r#"<p:sldSz cx="12192000" cy="6858000"/>"#));
        assert!(presentation.contains(r#"<p:sldId id="256""#));
        assert!(presentation.contains(r#"<p:sldId id="257""#));

        let slide_rels = read_member(&bytes, "ppt/slides/_rels/slide2.xml.rels");
        assert!(slide_rels.contains(r#"Target="../slideLayouts/slideLayout1.xml""#));
        assert!(slide_rels.contains(r#"Target="../media/image1.png""#));

        let slide_xml = read_member(&bytes, "ppt/slides/slide2.xml");
        assert!(slide_xml.contains(r#"r:embed="rId2""#));

        let content_types = read_member(&bytes, "[Content_Types].xml");
        assert!(content_types.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(content_types.contains(r#"PartName="/ppt/slides/slide1.xml""#));

        let master_rels = read_member(&bytes, "ppt/slideMasters/_rels/slideMaster1.xml.rels");
        assert!(master_rels.contains(r#"Target="../theme/theme1.xml""#));
    }
}
