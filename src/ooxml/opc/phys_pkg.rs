//! Physical (ZIP) side of an OPC package.

use std::io::{Cursor, Write};

use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::ooxml::opc::error::Result;
use crate::ooxml::opc::packuri::PackURI;

/// Physical package writer for creating OPC packages.
///
/// Writes parts into an in-memory ZIP archive. Nothing is visible to callers
/// until [`PhysPkgWriter::finish`] returns the complete archive.
pub struct PhysPkgWriter {
    archive: ZipWriter<Cursor<Vec<u8>>>,
}

impl PhysPkgWriter {
    /// Create a new package writer that writes to memory.
    pub fn new() -> Self {
        Self {
            archive: ZipWriter::new(Cursor::new(Vec::new())),
        }
    }

    /// Write a part to the package with Deflate compression.
    pub fn write(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.write_with(pack_uri, blob, CompressionMethod::Deflated)
    }

    /// Write a part without compression.
    ///
    /// Used for media that is already compressed (PNG, JPEG).
    pub fn write_stored(&mut self, pack_uri: &PackURI, blob: &[u8]) -> Result<()> {
        self.write_with(pack_uri, blob, CompressionMethod::Stored)
    }

    fn write_with(
        &mut self,
        pack_uri: &PackURI,
        blob: &[u8],
        method: CompressionMethod,
    ) -> Result<()> {
        let options = SimpleFileOptions::default().compression_method(method);
        self.archive.start_file(pack_uri.membername(), options)?;
        self.archive.write_all(blob)?;
        Ok(())
    }

    /// Finish writing and return the package bytes.
    pub fn finish(self) -> Result<Vec<u8>> {
        let cursor = self.archive.finish()?;
        Ok(cursor.into_inner())
    }
}

impl Default for PhysPkgWriter {
    fn default() -> Self {
        Self::new()
    }
}
