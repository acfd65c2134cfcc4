//! Report configuration, loaded from YAML.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::location::layout::GridShape;

/// Upper bound on images shown per preview page.
pub const MAX_PREVIEW_PAGE_SIZE: usize = 100;

/// Font sizes slides can carry, in points.
pub const FONT_SIZE_RANGE: RangeInclusive<f64> = 1.0..=4000.0;

/// Presentation and preview settings.
///
/// Every key is optional in YAML; missing keys take the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Images per grid slide: 6 (3×2) or 9 (3×3)
    pub images_per_slide: u32,
    pub preview_columns: u32,
    pub preview_rows: u32,
    /// Font family for every slide text
    pub font: String,
    pub heading_font_size: f64,
    pub title_font_size: f64,
    pub table_font_size: f64,
    /// Hex RGB fill drawn behind letterboxed images; `None` draws nothing
    pub letterbox_fill: Option<String>,
    /// Append per-category image counts to the metadata slide
    pub include_category_summary: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            images_per_slide: 6,
            preview_columns: 5,
            preview_rows: 2,
            font: "YuGothic".to_string(),
            heading_font_size: 20.0,
            title_font_size: 20.0,
            table_font_size: 10.0,
            letterbox_fill: Some("000000".to_string()),
            include_category_summary: false,
        }
    }
}

impl ReportConfig {
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: ReportConfig =
            serde_saphyr::from_str(text).map_err(|e| Error::Yaml(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check every value and return the grid shape of image slides.
    pub fn validate(&self) -> Result<GridShape> {
        let shape = GridShape::for_count(self.images_per_slide).ok_or_else(|| {
            Error::InvalidConfig(format!(
                "images_per_slide must be 6 or 9, got {}",
                self.images_per_slide
            ))
        })?;

        if self.preview_columns == 0 || self.preview_rows == 0 {
            return Err(Error::InvalidConfig(
                "preview_columns and preview_rows must be at least 1".to_string(),
            ));
        }
        let page = (self.preview_columns as usize).checked_mul(self.preview_rows as usize);
        if !matches!(page, Some(n) if n <= MAX_PREVIEW_PAGE_SIZE) {
            return Err(Error::InvalidConfig(format!(
                "preview page of {}×{} exceeds {} images",
                self.preview_columns, self.preview_rows, MAX_PREVIEW_PAGE_SIZE
            )));
        }

        let sizes = [
            ("heading_font_size", self.heading_font_size),
            ("title_font_size", self.title_font_size),
            ("table_font_size", self.table_font_size),
        ];
        for (name, size) in sizes {
            if !FONT_SIZE_RANGE.contains(&size) {
                return Err(Error::InvalidConfig(format!(
                    "{} must be between {} and {} pt, got {}",
                    name,
                    FONT_SIZE_RANGE.start(),
                    FONT_SIZE_RANGE.end(),
                    size
                )));
            }
        }

        if let Some(fill) = &self.letterbox_fill {
            if !(fill.len() == 6 && fill.bytes().all(|b| b.is_ascii_hexdigit())) {
                return Err(Error::InvalidConfig(format!(
                    "letterbox_fill must be six hex digits, got '{}'",
                    fill
                )));
            }
        }

        Ok(shape)
    }

    /// Images per preview page.
    pub fn preview_page_size(&self) -> usize {
        (self.preview_columns as usize).saturating_mul(self.preview_rows as usize)
    }
}
