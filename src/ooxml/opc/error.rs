//! Error types for OPC package operations

use thiserror::Error;

#[derive(Error, Debug)]
pub enum OpcError {
    #[error("Invalid pack URI: {0}")]
    InvalidPackUri(String),

    #[error("Duplicate part: {0}")]
    DuplicatePart(String),

    #[error("Too many parts for template: {0}")]
    PartnameExhausted(String),

    #[error("ZIP error: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, OpcError>;
