//! BER encoding into a reverse-written buffer.
//!
//! Content is written back to front, so a constructed value's length is
//! known by the time its header is emitted. Callers therefore push the
//! members of a SEQUENCE in reverse order.

use super::length::encode_length;
use super::tag;
use crate::oid::Oid;
use bytes::Bytes;

/// Reverse-written BER output buffer.
pub struct EncodeBuf {
    buf: Vec<u8>,
}

impl EncodeBuf {
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Prepend `bytes`, keeping their order in the final output.
    pub fn push_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend(bytes.iter().rev());
    }

    pub fn push_length(&mut self, len: usize) {
        let (octets, count) = encode_length(len);
        self.buf.extend_from_slice(&octets[..count]);
    }

    pub fn push_tag(&mut self, tag: u8) {
        self.buf.push(tag);
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Write the contents produced by `f`, then wrap them in `tag` and a length.
    pub fn push_constructed<F>(&mut self, tag: u8, f: F)
    where
        F: FnOnce(&mut Self),
    {
        let mark = self.len();
        f(self);
        let content_len = self.len() - mark;
        self.push_length(content_len);
        self.push_tag(tag);
    }

    pub fn push_sequence<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Self),
    {
        self.push_constructed(tag::universal::SEQUENCE, f);
    }

    fn push_primitive(&mut self, tag: u8, content: &[u8]) {
        self.push_bytes(content);
        self.push_length(content.len());
        self.push_tag(tag);
    }

    /// INTEGER in minimal two's complement form.
    pub fn push_integer(&mut self, value: i32) {
        let bytes = value.to_be_bytes();
        self.push_primitive(tag::universal::INTEGER, minimal_signed(&bytes));
    }

    /// Unsigned 32-bit value under an application tag (Counter32, Gauge32, TimeTicks).
    pub fn push_unsigned32(&mut self, tag: u8, value: u32) {
        let mut bytes = [0u8; 5];
        bytes[1..].copy_from_slice(&value.to_be_bytes());
        self.push_primitive(tag, minimal_unsigned(&bytes));
    }

    /// Counter64.
    pub fn push_integer64(&mut self, value: u64) {
        let mut bytes = [0u8; 9];
        bytes[1..].copy_from_slice(&value.to_be_bytes());
        self.push_primitive(tag::application::COUNTER64, minimal_unsigned(&bytes));
    }

    pub fn push_octet_string(&mut self, data: &[u8]) {
        self.push_primitive(tag::universal::OCTET_STRING, data);
    }

    pub fn push_null(&mut self) {
        self.push_primitive(tag::universal::NULL, &[]);
    }

    pub fn push_oid(&mut self, oid: &Oid) {
        let content = oid.to_ber_smallvec();
        self.push_primitive(tag::universal::OBJECT_IDENTIFIER, &content);
    }

    pub fn push_ip_address(&mut self, addr: [u8; 4]) {
        self.push_primitive(tag::application::IP_ADDRESS, &addr);
    }

    /// Empty value under an arbitrary tag (the v2c exception values).
    pub fn push_empty(&mut self, tag: u8) {
        self.push_primitive(tag, &[]);
    }

    /// Consume the buffer, producing bytes in wire order.
    pub fn finish(mut self) -> Bytes {
        self.buf.reverse();
        Bytes::from(self.buf)
    }
}

impl Default for EncodeBuf {
    fn default() -> Self {
        Self::new()
    }
}

/// Strip redundant sign octets from a big-endian two's complement value.
fn minimal_signed(bytes: &[u8]) -> &[u8] {
    let mut start = 0;
    while start + 1 < bytes.len() {
        let (cur, next) = (bytes[start], bytes[start + 1]);
        let redundant = (cur == 0x00 && next & 0x80 == 0) || (cur == 0xFF && next & 0x80 != 0);
        if !redundant {
            break;
        }
        start += 1;
    }
    &bytes[start..]
}

/// Strip leading zeros from a big-endian value that carries one spare
/// leading zero octet, keeping a zero where the top bit would read as a sign.
fn minimal_unsigned(bytes: &[u8]) -> &[u8] {
    let mut start = 0;
    while start + 1 < bytes.len() && bytes[start] == 0 && bytes[start + 1] & 0x80 == 0 {
        start += 1;
    }
    &bytes[start..]
}
