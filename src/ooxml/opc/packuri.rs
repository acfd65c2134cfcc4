//! The PackURI value type.
//!
//! A PackURI is a partname within an OPC package. It always begins with a
//! forward slash and uses forward slashes as separators, e.g.
//! `/ppt/slides/slide1.xml`.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackURI {
    uri: String,
}

impl PackURI {
    /// Create a new PackURI. The URI must begin with a forward slash.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self, String> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(format!("PackURI must begin with slash, got '{}'", uri));
        }
        Ok(PackURI { uri })
    }

    /// Directory portion, e.g. `/ppt/slides` for `/ppt/slides/slide1.xml`.
    ///
    /// The package pseudo-partname `/` is its own base.
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// Filename portion, e.g. `slide1.xml`. Empty for `/`.
    pub fn filename(&self) -> &str {
        match self.uri.rfind('/') {
            Some(pos) => &self.uri[pos + 1..],
            None => "",
        }
    }

    /// Extension without the leading period, e.g. `xml`.
    pub fn ext(&self) -> &str {
        let filename = self.filename();
        match filename.rfind('.') {
            Some(pos) => &filename[pos + 1..],
            None => "",
        }
    }

    /// The URI with the leading slash stripped; this is the ZIP member name.
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Relative reference from `base_uri` to this PackURI.
    ///
    /// `/ppt/slideLayouts/slideLayout1.xml` seen from `/ppt/slides` is
    /// `../slideLayouts/slideLayout1.xml`.
    pub fn relative_ref(&self, base_uri: &str) -> String {
        if base_uri == "/" {
            return self.membername().to_string();
        }

        let from_parts: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        let to_parts: Vec<&str> = self.uri.split('/').filter(|s| !s.is_empty()).collect();

        let common = from_parts
            .iter()
            .zip(to_parts.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut result = String::new();
        for _ in common..from_parts.len() {
            result.push_str("../");
        }
        result.push_str(&to_parts[common..].join("/"));
        result
    }

    /// PackURI of the `.rels` part belonging to this part.
    ///
    /// `/ppt/_rels/presentation.xml.rels` for `/ppt/presentation.xml`, and
    /// `/_rels/.rels` for the package itself.
    pub fn rels_uri(&self) -> Result<PackURI, String> {
        let filename = self.filename();
        let base_uri = self.base_uri();

        let rels_uri_str = if base_uri == "/" {
            format!("/_rels/{}.rels", filename)
        } else {
            format!("{}/_rels/{}.rels", base_uri, filename)
        };

        Self::new(rels_uri_str)
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

impl fmt::Display for PackURI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}

/// The package pseudo-partname.
pub const PACKAGE_URI: &str = "/";

/// Partname of the content types item.
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_relative() {
        assert!(PackURI::new("ppt/presentation.xml").is_err());
    }

    #[test]
    fn test_components() {
        let uri = PackURI::new("/ppt/slides/slide12.xml").unwrap();
        assert_eq!(uri.base_uri(), "/ppt/slides");
        assert_eq!(uri.filename(), "slide12.xml");
        assert_eq!(uri.ext(), "xml");
        assert_eq!(uri.membername(), "ppt/slides/slide12.xml");
    }

    #[test]
    fn test_relative_ref() {
        let layout = PackURI::new("/ppt/slideLayouts/slideLayout1.xml").unwrap();
        assert_eq!(
            layout.relative_ref("/ppt/slides"),
            "../slideLayouts/slideLayout1.xml"
        );

        let slide = PackURI::new("/ppt/slides/slide1.xml").unwrap();
        assert_eq!(slide.relative_ref("/ppt"), "slides/slide1.xml");
        assert_eq!(slide.relative_ref("/"), "ppt/slides/slide1.xml");
    }

    #[test]
    fn test_rels_uri() {
        let pres = PackURI::new("/ppt/presentation.xml").unwrap();
        assert_eq!(
            pres.rels_uri().unwrap().as_str(),
            "/ppt/_rels/presentation.xml.rels"
        );

        let pkg = PackURI::new(PACKAGE_URI).unwrap();
        assert_eq!(pkg.rels_uri().unwrap().as_str(), "/_rels/.rels");
    }
}
