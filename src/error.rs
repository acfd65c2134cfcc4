//! Error type for report building.
use thiserror::Error;

use crate::ooxml::error::OoxmlError;

/// Result type for report operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised while collecting input or exporting a report.
#[derive(Error, Debug)]
pub enum Error {
    /// An upload could not be decoded as an image
    #[error("image '{filename}' could not be decoded: {source}")]
    ImageDecode {
        filename: String,
        #[source]
        source: image::ImageError,
    },

    /// An upload decoded but is neither PNG nor JPEG
    #[error("image '{filename}' is not a PNG or JPEG file")]
    UnsupportedImage { filename: String },

    /// A single-image category already holds a different image
    #[error("{category} already holds '{existing}'; remove it before uploading '{filename}'")]
    SlotOccupied {
        category: &'static str,
        existing: String,
        filename: String,
    },

    /// More than one new file uploaded to a single-image category
    #[error("{category} accepts a single image, got {count}")]
    TooManyFiles { category: &'static str, count: usize },

    /// A record field failed validation
    #[error("invalid record: {0}")]
    InvalidRecord(String),

    /// Configuration value out of range
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// YAML input could not be parsed
    #[error("YAML error: {0}")]
    Yaml(String),

    /// Package writing failed
    #[error(transparent)]
    Ooxml(#[from] OoxmlError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
