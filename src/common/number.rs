//! Number-to-text formatting shared by the cell writer and slide text.
//!
//! Both outputs must print the same digits for the same value, so they go
//! through these helpers instead of `Display`.

/// Format an integer with `itoa`.
#[inline]
pub fn format_int(value: i64) -> String {
    itoa::Buffer::new().format(value).to_string()
}

/// Format a float with the shortest round-tripping representation.
///
/// Integral values drop the trailing `.0` (`120.0` prints as `120`), which is
/// how spreadsheet applications display them. Non-finite values print as
/// empty text since no cell can hold them.
pub fn format_float(value: f64) -> String {
    if !value.is_finite() {
        return String::new();
    }
    let mut buf = ryu::Buffer::new();
    let text = buf.format_finite(value);
    text.strip_suffix(".0").unwrap_or(text).to_string()
}
