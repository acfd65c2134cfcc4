//! Office Open XML (OOXML) writing.
//!
//! # Architecture
//!
//! 1. **OPC Layer** (`opc`): package model, relationships, content types and
//!    the ZIP container
//! 2. **Shared Utilities** (`common`, `error`): document properties and the
//!    error type used by every writer
//! 3. **Format-Specific Modules**:
//!    - `xlsx`: Excel spreadsheets
//!    - `pptx`: PowerPoint presentations
//!
//! # Example: a one-slide presentation
//!
//! ```rust
//! use location_report::common::inches;
//! use location_report::ooxml::common::DocumentProperties;
//! use location_report::ooxml::pptx::{MutablePresentation, TextAlign};
//!
//! let mut pres = MutablePresentation::new();
//! pres.add_slide()
//!     .add_text_box("ロケ地情報", inches(1.0), inches(0.3), inches(11.333), inches(0.8))
//!     .font_size(20.0)
//!     .align(TextAlign::Center);
//!
//! let bytes = pres.to_bytes(&DocumentProperties::now())?;
//! assert_eq!(&bytes[..2], b"PK");
//! # Ok::<(), location_report::ooxml::error::OoxmlError>(())
//! ```
pub mod common;
pub mod error;
pub mod opc;
pub mod pptx;
pub mod xlsx;

pub use error::{OoxmlError, Result};
