//! Hexadecimal encoding for binary OCTET STRING values.

use std::fmt::{self, Write};

/// Encode bytes as a lowercase hex string.
///
/// ```
/// use snmp_get::format::hex::encode;
///
/// assert_eq!(encode(&[0x00, 0x1a, 0xff]), "001aff");
/// ```
pub fn encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    // Writing into a String cannot fail.
    let _ = write!(out, "{}", Bytes(bytes));
    out
}

/// Decode a hex string, ignoring ASCII whitespace between digits.
///
/// Test fixtures use this to spell out captured datagrams.
#[cfg(any(test, feature = "testing"))]
pub fn decode(s: &str) -> Result<Vec<u8>, DecodeError> {
    let digits: Vec<u8> = s
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .map(nibble)
        .collect::<Result<_, _>>()?;

    if !digits.len().is_multiple_of(2) {
        return Err(DecodeError::OddLength);
    }
    Ok(digits.chunks(2).map(|pair| (pair[0] << 4) | pair[1]).collect())
}

#[cfg(any(test, feature = "testing"))]
fn nibble(c: u8) -> Result<u8, DecodeError> {
    match c {
        b'0'..=b'9' => Ok(c - b'0'),
        b'a'..=b'f' => Ok(c - b'a' + 10),
        b'A'..=b'F' => Ok(c - b'A' + 10),
        _ => Err(DecodeError::InvalidChar(c as char)),
    }
}

/// Error type for hex decoding.
#[cfg(any(test, feature = "testing"))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Input has an odd number of digits
    OddLength,
    InvalidChar(char),
}

/// Lazy hex formatter for log fields and `Display` impls.
///
/// ```
/// use snmp_get::format::hex::Bytes;
///
/// assert_eq!(format!("{}", Bytes(&[0xde, 0xad])), "dead");
/// ```
pub struct Bytes<'a>(pub &'a [u8]);

impl fmt::Display for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Bytes<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}
