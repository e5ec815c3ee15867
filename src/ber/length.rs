//! BER length octets (X.690 8.1.3).
//!
//! Short form for 0..=127, long form with up to four length octets above
//! that. The indefinite form (0x80) never appears in SNMP and is rejected.

use crate::error::{DecodeErrorKind, Error, Result};

/// Largest content length the decoder accepts.
///
/// SNMP over UDP cannot exceed 65507 bytes, so anything past 2MB is garbage.
pub const MAX_LENGTH: usize = 0x20_0000;

/// Length octets for `len`, least significant byte first.
///
/// Returns the octets in reverse order (ready to be appended to a
/// reverse-written buffer) and how many of them are used.
pub fn encode_length(len: usize) -> ([u8; 5], usize) {
    let mut out = [0u8; 5];
    if len < 0x80 {
        out[0] = len as u8;
        return (out, 1);
    }

    let mut remaining = len;
    let mut count = 0;
    while remaining > 0 && count < 4 {
        out[count] = (remaining & 0xFF) as u8;
        remaining >>= 8;
        count += 1;
    }
    out[count] = 0x80 | count as u8;
    (out, count + 1)
}

/// Decode length octets at the start of `data`.
///
/// Returns `(length, octets consumed)`. `base_offset` is the position of
/// `data` within the whole message and is only used for error reporting.
/// Non-minimal long forms are accepted.
pub fn decode_length(data: &[u8], base_offset: usize) -> Result<(usize, usize)> {
    let Some(&first) = data.first() else {
        return Err(Error::decode(base_offset, DecodeErrorKind::TruncatedData));
    };

    if first & 0x80 == 0 {
        return Ok((first as usize, 1));
    }

    let octets = (first & 0x7F) as usize;
    match octets {
        0 => return Err(Error::decode(base_offset, DecodeErrorKind::IndefiniteLength)),
        1..=4 => {}
        _ => {
            return Err(Error::decode(
                base_offset,
                DecodeErrorKind::LengthTooLong { octets },
            ));
        }
    }

    let Some(body) = data.get(1..=octets) else {
        return Err(Error::decode(base_offset, DecodeErrorKind::TruncatedData));
    };
    let len = body.iter().fold(0usize, |acc, &b| (acc << 8) | b as usize);

    if len > MAX_LENGTH {
        return Err(Error::decode(
            base_offset,
            DecodeErrorKind::LengthExceedsMax {
                length: len,
                max: MAX_LENGTH,
            },
        ));
    }

    Ok((len, 1 + octets))
}
