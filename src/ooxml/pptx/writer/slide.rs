/// Slide types and implementation for PPTX presentations.
use std::fmt::Write as FmtWrite;

use bytes::Bytes;

use crate::common::unit::Emu;
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::namespace;

use super::super::format::ImageFormat;
use super::shape::MutableShape;

/// A mutable slide in a presentation.
#[derive(Debug, Clone)]
pub struct MutableSlide {
    /// Slide ID (unique identifier within the presentation)
    pub(crate) slide_id: u32,
    /// Shapes on the slide, in z-order
    pub(crate) shapes: Vec<MutableShape>,
}

impl MutableSlide {
    /// Create a new empty slide.
    pub(crate) fn new(slide_id: u32) -> Self {
        Self {
            slide_id,
            shapes: Vec::new(),
        }
    }

    /// Get the slide ID.
    pub fn slide_id(&self) -> u32 {
        self.slide_id
    }

    fn next_shape_id(&self) -> u32 {
        // ID 1 is the slide's shape tree.
        (self.shapes.len() + 2) as u32
    }

    fn push(&mut self, shape: MutableShape) -> &mut MutableShape {
        let index = self.shapes.len();
        self.shapes.push(shape);
        &mut self.shapes[index]
    }

    /// Add a text box to the slide.
    pub fn add_text_box(
        &mut self,
        text: &str,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
    ) -> &mut MutableShape {
        let shape = MutableShape::new_text_box(
            self.next_shape_id(),
            text.to_string(),
            x,
            y,
            width,
            height,
        );
        self.push(shape)
    }

    /// Add a rectangle without outline. `fill_color` is hex RGB.
    pub fn add_rectangle(
        &mut self,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
        fill_color: Option<&str>,
    ) -> &mut MutableShape {
        let shape = MutableShape::new_rectangle(
            self.next_shape_id(),
            x,
            y,
            width,
            height,
            fill_color.map(str::to_string),
        );
        self.push(shape)
    }

    /// Add a picture to the slide from encoded PNG or JPEG bytes.
    pub fn add_picture(
        &mut self,
        data: Bytes,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
        description: &str,
    ) -> Result<&mut MutableShape> {
        let format = ImageFormat::detect_from_bytes(&data)
            .ok_or_else(|| OoxmlError::InvalidFormat("Unknown image format".to_string()))?;

        let shape = MutableShape::new_picture(
            self.next_shape_id(),
            data,
            format,
            x,
            y,
            width,
            height,
            description.to_string(),
        );
        Ok(self.push(shape))
    }

    /// Get the number of shapes.
    pub fn shape_count(&self) -> usize {
        self.shapes.len()
    }

    pub fn shapes(&self) -> &[MutableShape] {
        &self.shapes
    }

    /// Texts of all text boxes, in z-order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.shapes.iter().filter_map(MutableShape::text)
    }

    /// Collect all images from this slide, in shape order.
    pub(crate) fn collect_images(&self) -> Vec<(&Bytes, ImageFormat)> {
        self.shapes
            .iter()
            .filter_map(MutableShape::image_data)
            .collect()
    }

    /// Generate slide XML content.
    ///
    /// # Arguments
    /// * `image_rel_ids` - Relationship IDs of the slide's pictures, in the
    ///   order returned by `collect_images`
    pub(crate) fn to_xml(&self, image_rel_ids: &[String]) -> Result<String> {
        let mut xml = String::with_capacity(1024 + self.shapes.len() * 640);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(
            xml,
            r#"<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">"#,
            namespace::DML_MAIN,
            namespace::OFC_RELATIONSHIPS,
            namespace::PML_MAIN
        )?;

        xml.push_str("<p:cSld><p:spTree>");
        xml.push_str(r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr>"#);
        xml.push_str(r#"<p:grpSpPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/><a:chOff x="0" y="0"/><a:chExt cx="0" cy="0"/></a:xfrm></p:grpSpPr>"#);

        let mut image_rel_ids = image_rel_ids.iter();
        for shape in &self.shapes {
            let rel_id = if shape.is_picture() {
                image_rel_ids.next().map(String::as_str)
            } else {
                None
            };
            shape.to_xml(&mut xml, rel_id)?;
        }

        xml.push_str("</p:spTree></p:cSld>");
        xml.push_str(r#"<p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>"#);
        xml.push_str("</p:sld>");

        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_shape_ids_are_sequential() {
        let mut slide = MutableSlide::new(256);
        slide.add_text_box("ロケ地情報", 0, 0, 100, 100);
        slide.add_rectangle(0, 0, 10, 10, Some("000000"));
        assert_eq!(slide.shapes()[0].shape_id(), 2);
        assert_eq!(slide.shapes()[1].shape_id(), 3);
        assert_eq!(slide.texts().collect::<Vec<_>>(), vec!["ロケ地情報"]);
    }

    #[test]
    fn test_add_picture_rejects_unknown_bytes() {
        let mut slide = MutableSlide::new(256);
        assert!(
            slide
                .add_picture(Bytes::from_static(b"GIF89a"), 0, 0, 1, 1, "x.gif")
                .is_err()
        );
        assert_eq!(slide.shape_count(), 0);
    }

    #[test]
    fn test_to_xml_assigns_image_rel_ids_in_order() {
        let mut slide = MutableSlide::new(256);
        slide
            .add_picture(Bytes::from_static(PNG_MAGIC), 0, 0, 1, 1, "a.png")
            .unwrap();
        slide.add_text_box("caption", 0, 0, 1, 1);
        slide
            .add_picture(Bytes::from_static(PNG_MAGIC), 0, 0, 1, 1, "b.png")
            .unwrap();

        assert_eq!(slide.collect_images().len(), 2);
        let xml = slide
            .to_xml(&["rId2".to_string(), "rId3".to_string()])
            .unwrap();
        let first = xml.find(r#"r:embed="rId2""#).unwrap();
        let second = xml.find(r#"r:embed="rId3""#).unwrap();
        assert!(first < second);
        assert!(xml.starts_with(r#"<?xml"#));
        assert!(xml.ends_with("</p:sld>"));
    }
}
