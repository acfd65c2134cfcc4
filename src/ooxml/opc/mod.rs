//! Open Packaging Conventions (OPC) writer.
//!
//! Every OOXML document is a ZIP archive of parts. Each part has a partname
//! (`/ppt/slides/slide1.xml`), a content type and optional relationships to
//! other parts. This module holds the in-memory package model and serializes it:
//!
//! - [`OpcPackage`] collects parts and package-level relationships
//! - [`PackageWriter`] emits `[Content_Types].xml`, the `.rels` files and every
//!   part into a deflate-compressed archive

pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgwriter;
pub mod rel;

// Re-export commonly used types
pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::{BlobPart, Part};
pub use pkgwriter::PackageWriter;
pub use rel::{Relationship, Relationships};
