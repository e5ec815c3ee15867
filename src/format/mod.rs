//! Formatting of SNMP values for line-oriented output.
//!
//! [`render`] produces the text written for one value. It never contains a
//! line break, so one value always occupies exactly one output line.
//!
//! ```
//! use snmp_get::{Value, format::render};
//!
//! assert_eq!(render(&Value::from("Linux router 5.10")), "Linux router 5.10");
//! assert_eq!(render(&Value::from(&b"\x00\x1a\x2b"[..])), "0x001a2b");
//! assert_eq!(render(&Value::Counter32(42)), "42");
//! ```

pub mod hex;

use crate::value::Value;

/// Render `value` as a single line.
///
/// OCTET STRINGs that are not printable text are shown as `0x` followed by
/// lowercase hex. Every other type uses its `Display` form.
pub fn render(value: &Value) -> String {
    match value {
        Value::OctetString(data) => match printable(data) {
            Some(text) => text.to_owned(),
            None => format!("0x{}", hex::Bytes(data)),
        },
        other => other.to_string(),
    }
}

/// `data` as text, if it is UTF-8 without control characters (tab allowed).
fn printable(data: &[u8]) -> Option<&str> {
    let text = std::str::from_utf8(data).ok()?;
    text.chars()
        .all(|c| c == '\t' || !c.is_control())
        .then_some(text)
}
