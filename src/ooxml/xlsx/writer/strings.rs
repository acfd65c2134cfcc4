//! Shared strings table for XLSX workbooks.
use std::collections::HashMap;
use std::fmt::Write as FmtWrite;

use crate::common::xml::escape_xml;
use crate::ooxml::error::Result;
use crate::ooxml::opc::constants::namespace;

/// Mutable shared strings table.
///
/// Excel stores strings in a shared table and cells refer to them by index.
/// This structure manages the collection of unique strings and their indices.
#[derive(Debug, Default)]
pub struct MutableSharedStrings {
    /// List of unique strings
    strings: Vec<String>,
    /// Map from string to index for fast lookup
    string_to_index: HashMap<String, usize>,
    /// Total number of references, including repeats
    references: usize,
}

impl MutableSharedStrings {
    /// Create a new empty shared strings table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a string to the shared strings table and return its index.
    ///
    /// If the string already exists, returns the existing index.
    pub fn add_string(&mut self, s: &str) -> usize {
        self.references += 1;
        if let Some(&index) = self.string_to_index.get(s) {
            index
        } else {
            let index = self.strings.len();
            self.strings.push(s.to_string());
            self.string_to_index.insert(s.to_string(), index);
            index
        }
    }

    /// Get the number of unique strings.
    pub fn count(&self) -> usize {
        self.strings.len()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    /// Serialize the shared strings table to XML.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(256 + self.strings.len() * 32);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(
            xml,
            r#"<sst xmlns="{}" count="{}" uniqueCount="{}">"#,
            namespace::SML_MAIN,
            self.references,
            self.strings.len()
        )?;

        for s in &self.strings {
            // Leading or trailing whitespace is dropped unless preserved.
            if s.starts_with(char::is_whitespace) || s.ends_with(char::is_whitespace) {
                write!(xml, r#"<si><t xml:space="preserve">{}</t></si>"#, escape_xml(s))?;
            } else {
                write!(xml, "<si><t>{}</t></si>", escape_xml(s))?;
            }
        }

        xml.push_str("</sst>");
        Ok(xml)
    }
}
