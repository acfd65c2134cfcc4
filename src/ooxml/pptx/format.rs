//! Format types for PPTX presentations.

/// Image format types embedded as media parts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageFormat {
    Png,
    Jpeg,
}

impl ImageFormat {
    /// Get the MIME type for this image format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Get the file extension for this image format.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
        }
    }

    /// Detect image format from bytes (magic number detection).
    pub fn detect_from_bytes(bytes: &[u8]) -> Option<Self> {
        // PNG: 89 50 4E 47
        if bytes.starts_with(&[0x89, 0x50, 0x4E, 0x47]) {
            return Some(Self::Png);
        }

        // JPEG: FF D8 FF
        if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            return Some(Self::Jpeg);
        }

        None
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

impl TextAlign {
    /// Value of the `algn` attribute on `a:pPr`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Left => "l",
            Self::Center => "ctr",
            Self::Right => "r",
        }
    }
}

/// Text formatting properties for shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextFormat {
    /// Font family, applied to both Latin and East Asian text
    pub font: Option<String>,
    /// Font size in points
    pub size: Option<f64>,
    /// Bold text
    pub bold: Option<bool>,
    /// Text color in hex RGB (e.g., "FF0000" for red)
    pub color: Option<String>,
    /// Paragraph alignment
    pub align: Option<TextAlign>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_bytes() {
        assert_eq!(
            ImageFormat::detect_from_bytes(&[0x89, b'P', b'N', b'G', 0x0D]),
            Some(ImageFormat::Png)
        );
        assert_eq!(
            ImageFormat::detect_from_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(ImageFormat::Jpeg)
        );
        assert_eq!(ImageFormat::detect_from_bytes(b"GIF89a"), None);
        assert_eq!(ImageFormat::detect_from_bytes(&[]), None);
    }

    #[test]
    fn test_align_values() {
        assert_eq!(TextAlign::Center.as_str(), "ctr");
        assert_eq!(TextAlign::default(), TextAlign::Left);
    }
}
