use std::fmt::Write as _;

use aho_corasick::AhoCorasick;
use once_cell::sync::Lazy;

// Built once, shared by every writer.
static XML_ESCAPER: Lazy<AhoCorasick> = Lazy::new(|| {
    AhoCorasick::builder()
        .build(["&", "<", ">", "\"", "'"])
        .expect("Failed to build XML escaper")
});

/// Characters XML 1.0 does not allow anywhere in a document.
#[inline]
fn is_forbidden(c: char) -> bool {
    matches!(c, '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}')
}

/// Whether `s` starts with an `_xHHHH_` escape sequence.
fn starts_with_hex_escape(s: &str) -> bool {
    let b = s.as_bytes();
    b.len() >= 7
        && b[0] == b'_'
        && b[1] == b'x'
        && b[2..6].iter().all(u8::is_ascii_hexdigit)
        && b[6] == b'_'
}

/// Escape XML special characters.
///
/// Characters XML 1.0 forbids are written as OOXML `_xHHHH_` escapes, and a
/// literal `_xHHHH_` in the input gets its underscore escaped as `_x005F_`,
/// so Office reads the original text back.
///
/// # Examples
///
/// ```
/// use location_report::common::xml::escape_xml;
/// assert_eq!(escape_xml("a & b"), "a &amp; b");
/// assert_eq!(escape_xml("<tag>\"hello\"</tag>"), "&lt;tag&gt;&quot;hello&quot;&lt;/tag&gt;");
/// assert_eq!(escape_xml("A\u{B}B"), "A_x000B_B");
/// assert_eq!(escape_xml("_x0041_"), "_x005F_x0041_");
/// ```
pub fn escape_xml(s: &str) -> String {
    let escaped = XML_ESCAPER.replace_all(s, &["&amp;", "&lt;", "&gt;", "&quot;", "&apos;"]);
    if !escaped.contains(|c: char| c == '_' || is_forbidden(c)) {
        return escaped;
    }

    let mut out = String::with_capacity(escaped.len() + 16);
    for (i, c) in escaped.char_indices() {
        if is_forbidden(c) {
            let _ = write!(out, "_x{:04X}_", c as u32);
        } else if c == '_' && starts_with_hex_escape(&escaped[i..]) {
            out.push_str("_x005F_");
        } else {
            out.push(c);
        }
    }
    out
}
