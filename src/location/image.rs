//! Decoding of uploaded image files.

use bytes::Bytes;
use image::ImageReader;
use std::io::Cursor;

use crate::error::{Error, Result};
use crate::ooxml::pptx::ImageFormat;

/// A decoded upload. The original file bytes are kept for embedding; only the
/// pixel dimensions are taken from the decoded image.
#[derive(Debug, Clone, PartialEq)]
pub struct UploadedImage {
    bytes: Bytes,
    format: ImageFormat,
    width: u32,
    height: u32,
}

impl UploadedImage {
    /// Decode `data` as PNG or JPEG.
    ///
    /// The whole image is decoded, so truncated or corrupt files fail here
    /// rather than at export time.
    pub fn decode(filename: &str, data: impl Into<Bytes>) -> Result<Self> {
        let bytes: Bytes = data.into();
        let format = ImageFormat::detect_from_bytes(&bytes).ok_or_else(|| {
            Error::UnsupportedImage {
                filename: filename.to_string(),
            }
        })?;

        let reader = ImageReader::with_format(Cursor::new(bytes.as_ref()), codec_format(format));
        let decoded = reader.decode().map_err(|source| Error::ImageDecode {
            filename: filename.to_string(),
            source,
        })?;

        Ok(Self {
            width: decoded.width(),
            height: decoded.height(),
            bytes,
            format,
        })
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn format(&self) -> ImageFormat {
        self.format
    }

    /// Pixel size as `(width, height)`.
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn codec_format(format: ImageFormat) -> image::ImageFormat {
    match format {
        ImageFormat::Png => image::ImageFormat::Png,
        ImageFormat::Jpeg => image::ImageFormat::Jpeg,
    }
}

/// Encode a solid image of the given size, for tests.
#[cfg(test)]
pub(crate) fn test_png(width: u32, height: u32) -> Vec<u8> {
    let buffer = image::RgbImage::from_pixel(width, height, image::Rgb([200, 120, 40]));
    let mut out = Cursor::new(Vec::new());
    buffer
        .write_to(&mut out, image::ImageFormat::Png)
        .expect("encode test png");
    out.into_inner()
}
