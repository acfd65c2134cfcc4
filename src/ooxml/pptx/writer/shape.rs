/// Shape types and implementation for PPTX presentations.
use std::fmt::Write as FmtWrite;

use bytes::Bytes;

use crate::common::unit::{Emu, pt_to_centipoints};
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};

pub use super::super::format::{ImageFormat, TextAlign, TextFormat};

/// A shape on a slide (text box, rectangle or picture).
#[derive(Debug, Clone)]
pub struct MutableShape {
    /// Shape ID
    pub(crate) shape_id: u32,
    /// Shape type
    pub(crate) shape_type: ShapeType,
}

#[derive(Debug, Clone)]
pub(crate) enum ShapeType {
    TextBox {
        text: String,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
        format: TextFormat,
    },
    Rectangle {
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
        fill_color: Option<String>,
    },
    Picture {
        data: Bytes,
        format: ImageFormat,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
        description: String,
    },
}

impl MutableShape {
    /// Create a new text box shape.
    pub(crate) fn new_text_box(
        shape_id: u32,
        text: String,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
    ) -> Self {
        Self {
            shape_id,
            shape_type: ShapeType::TextBox {
                text,
                x,
                y,
                width,
                height,
                format: TextFormat::default(),
            },
        }
    }

    /// Create a new rectangle shape with no outline.
    pub(crate) fn new_rectangle(
        shape_id: u32,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
        fill_color: Option<String>,
    ) -> Self {
        Self {
            shape_id,
            shape_type: ShapeType::Rectangle {
                x,
                y,
                width,
                height,
                fill_color,
            },
        }
    }

    /// Create a new picture shape.
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new_picture(
        shape_id: u32,
        data: Bytes,
        format: ImageFormat,
        x: Emu,
        y: Emu,
        width: Emu,
        height: Emu,
        description: String,
    ) -> Self {
        Self {
            shape_id,
            shape_type: ShapeType::Picture {
                data,
                format,
                x,
                y,
                width,
                height,
                description,
            },
        }
    }

    pub fn shape_id(&self) -> u32 {
        self.shape_id
    }

    /// Text of a text box, `None` for other shapes.
    pub fn text(&self) -> Option<&str> {
        match &self.shape_type {
            ShapeType::TextBox { text, .. } => Some(text),
            _ => None,
        }
    }

    /// Position and size as `(x, y, width, height)` in EMUs.
    pub fn bounds(&self) -> (Emu, Emu, Emu, Emu) {
        match self.shape_type {
            ShapeType::TextBox {
                x,
                y,
                width,
                height,
                ..
            }
            | ShapeType::Rectangle {
                x,
                y,
                width,
                height,
                ..
            }
            | ShapeType::Picture {
                x,
                y,
                width,
                height,
                ..
            } => (x, y, width, height),
        }
    }

    pub fn is_picture(&self) -> bool {
        matches!(self.shape_type, ShapeType::Picture { .. })
    }

    fn text_format_mut(&mut self) -> Option<&mut TextFormat> {
        match self.shape_type {
            ShapeType::TextBox { ref mut format, .. } => Some(format),
            _ => None,
        }
    }

    /// Set text formatting for this shape (only for text boxes).
    pub fn set_text_format(&mut self, format: TextFormat) -> &mut Self {
        if let Some(f) = self.text_format_mut() {
            *f = format;
        }
        self
    }

    /// Builder method: set font.
    pub fn font(&mut self, font: &str) -> &mut Self {
        if let Some(f) = self.text_format_mut() {
            f.font = Some(font.to_string());
        }
        self
    }

    /// Builder method: set font size in points.
    pub fn font_size(&mut self, size: f64) -> &mut Self {
        if let Some(f) = self.text_format_mut() {
            f.size = Some(size);
        }
        self
    }

    /// Builder method: set bold.
    pub fn bold(&mut self, bold: bool) -> &mut Self {
        if let Some(f) = self.text_format_mut() {
            f.bold = Some(bold);
        }
        self
    }

    /// Builder method: set paragraph alignment.
    pub fn align(&mut self, align: TextAlign) -> &mut Self {
        if let Some(f) = self.text_format_mut() {
            f.align = Some(align);
        }
        self
    }

    /// Get image data if this shape is a picture.
    pub(crate) fn image_data(&self) -> Option<(&Bytes, ImageFormat)> {
        match &self.shape_type {
            ShapeType::Picture { data, format, .. } => Some((data, *format)),
            _ => None,
        }
    }

    /// Generate XML for this shape.
    ///
    /// Pictures need `rel_id`, the slide relationship to their media part.
    pub(crate) fn to_xml(&self, xml: &mut String, rel_id: Option<&str>) -> Result<()> {
        match &self.shape_type {
            ShapeType::TextBox {
                text,
                x,
                y,
                width,
                height,
                format,
            } => {
                xml.push_str("<p:sp><p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="TextBox {}"/>"#,
                    self.shape_id, self.shape_id
                )?;
                xml.push_str(r#"<p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>"#);

                xml.push_str("<p:spPr>");
                write_xfrm(xml, *x, *y, *width, *height)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom><a:noFill/>"#);
                xml.push_str("</p:spPr>");

                xml.push_str("<p:txBody>");
                xml.push_str(r#"<a:bodyPr wrap="square" rtlCol="0"><a:noAutofit/></a:bodyPr>"#);
                xml.push_str("<a:lstStyle/><a:p>");
                if let Some(align) = format.align {
                    write!(xml, r#"<a:pPr algn="{}"/>"#, align.as_str())?;
                }
                xml.push_str("<a:r>");
                write_run_properties(xml, format)?;
                write!(xml, "<a:t>{}</a:t>", escape_xml(text))?;
                xml.push_str("</a:r></a:p></p:txBody>");

                xml.push_str("</p:sp>");
            },
            ShapeType::Rectangle {
                x,
                y,
                width,
                height,
                fill_color,
            } => {
                xml.push_str("<p:sp><p:nvSpPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Rectangle {}"/>"#,
                    self.shape_id, self.shape_id
                )?;
                xml.push_str("<p:cNvSpPr/><p:nvPr/></p:nvSpPr>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, *x, *y, *width, *height)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                match fill_color {
                    Some(color) => write!(
                        xml,
                        r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
                        escape_xml(color)
                    )?,
                    None => xml.push_str("<a:noFill/>"),
                }
                xml.push_str("<a:ln><a:noFill/></a:ln>");
                xml.push_str("</p:spPr>");
                xml.push_str("</p:sp>");
            },
            ShapeType::Picture {
                x,
                y,
                width,
                height,
                description,
                ..
            } => {
                let rel_id = rel_id.ok_or_else(|| {
                    OoxmlError::Xml(format!(
                        "picture {} has no media relationship",
                        self.shape_id
                    ))
                })?;

                xml.push_str("<p:pic><p:nvPicPr>");
                write!(
                    xml,
                    r#"<p:cNvPr id="{}" name="Picture {}" descr="{}"/>"#,
                    self.shape_id,
                    self.shape_id,
                    escape_xml(description)
                )?;
                xml.push_str(r#"<p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr>"#);

                xml.push_str("<p:blipFill>");
                write!(xml, r#"<a:blip r:embed="{}"/>"#, rel_id)?;
                xml.push_str("<a:stretch><a:fillRect/></a:stretch>");
                xml.push_str("</p:blipFill>");

                xml.push_str("<p:spPr>");
                write_xfrm(xml, *x, *y, *width, *height)?;
                xml.push_str(r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#);
                xml.push_str("</p:spPr>");
                xml.push_str("</p:pic>");
            },
        }

        Ok(())
    }
}

fn write_xfrm(xml: &mut String, x: Emu, y: Emu, width: Emu, height: Emu) -> Result<()> {
    write!(
        xml,
        r#"<a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm>"#,
        x, y, width, height
    )?;
    Ok(())
}

fn write_run_properties(xml: &mut String, format: &TextFormat) -> Result<()> {
    xml.push_str(r#"<a:rPr lang="ja-JP" altLang="en-US" dirty="0""#);
    if let Some(size) = format.size {
        write!(xml, r#" sz="{}""#, pt_to_centipoints(size))?;
    }
    if let Some(true) = format.bold {
        xml.push_str(r#" b="1""#);
    }
    xml.push('>');

    if let Some(ref color) = format.color {
        write!(
            xml,
            r#"<a:solidFill><a:srgbClr val="{}"/></a:solidFill>"#,
            escape_xml(color)
        )?;
    }
    if let Some(ref font) = format.font {
        let font = escape_xml(font);
        write!(
            xml,
            r#"<a:latin typeface="{0}"/><a:ea typeface="{0}"/>"#,
            font
        )?;
    }

    xml.push_str("</a:rPr>");
    Ok(())
}
