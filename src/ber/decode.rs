//! BER decoding.
//!
//! Zero-copy: every sub-slice handed out is a `Bytes` view into the
//! received datagram. Parsing is permissive in the same places net-snmp
//! is (non-minimal integers and lengths, over-long integers truncated).

use super::length::decode_length;
use super::tag;
use crate::error::{DecodeErrorKind, Error, Result};
use crate::oid::Oid;
use bytes::Bytes;

/// Cursor over a BER-encoded buffer.
pub struct Decoder {
    data: Bytes,
    offset: usize,
    /// Position of `data` within the outermost buffer, for error offsets.
    base: usize,
}

impl Decoder {
    pub fn new(data: Bytes) -> Self {
        Self {
            data,
            offset: 0,
            base: 0,
        }
    }

    /// Create a decoder over a copy of `data`.
    pub fn from_slice(data: &[u8]) -> Self {
        Self::new(Bytes::copy_from_slice(data))
    }

    /// Absolute offset of the cursor.
    pub fn offset(&self) -> usize {
        self.base + self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.offset >= self.data.len()
    }

    fn fail<T>(&self, kind: DecodeErrorKind) -> Result<T> {
        tracing::debug!(target: "snmp_get::ber", { snmp.offset = self.offset(), %kind }, "decode failed");
        Err(Error::decode(self.offset(), kind))
    }

    pub fn read_byte(&mut self) -> Result<u8> {
        match self.data.get(self.offset) {
            Some(&b) => {
                self.offset += 1;
                Ok(b)
            }
            None => self.fail(DecodeErrorKind::TruncatedData),
        }
    }

    pub fn read_tag(&mut self) -> Result<u8> {
        self.read_byte()
    }

    pub fn read_length(&mut self) -> Result<usize> {
        let (len, consumed) = decode_length(&self.data[self.offset..], self.offset())?;
        self.offset += consumed;
        Ok(len)
    }

    /// Take `len` bytes without copying.
    pub fn read_bytes(&mut self, len: usize) -> Result<Bytes> {
        if len > self.remaining() {
            return self.fail(DecodeErrorKind::TlvOverflow);
        }
        let bytes = self.data.slice(self.offset..self.offset + len);
        self.offset += len;
        Ok(bytes)
    }

    /// Read a tag, fail unless it equals `expected`, and return the content length.
    pub fn expect_tag(&mut self, expected: u8) -> Result<usize> {
        let actual = self.read_tag()?;
        if actual != expected {
            self.offset -= 1;
            return self.fail(DecodeErrorKind::UnexpectedTag { expected, actual });
        }
        self.read_length()
    }

    pub fn read_integer(&mut self) -> Result<i32> {
        let len = self.expect_tag(tag::universal::INTEGER)?;
        self.read_integer_value(len)
    }

    /// Signed INTEGER content. Content past four octets is dropped.
    pub fn read_integer_value(&mut self, len: usize) -> Result<i32> {
        if len == 0 {
            return self.fail(DecodeErrorKind::ZeroLengthInteger);
        }
        if len > 4 {
            tracing::debug!(target: "snmp_get::ber", { snmp.offset = self.offset(), length = len }, "integer too long, truncating to 4 bytes");
        }
        let bytes = self.read_bytes(len)?;
        let seed: i32 = if bytes[0] & 0x80 != 0 { -1 } else { 0 };
        Ok(bytes
            .iter()
            .take(4)
            .fold(seed, |acc, &b| (acc << 8) | b as i32))
    }

    pub fn read_unsigned32(&mut self, expected_tag: u8) -> Result<u32> {
        let len = self.expect_tag(expected_tag)?;
        self.read_unsigned32_value(len)
    }

    /// Unsigned 32-bit content (Counter32, Gauge32, TimeTicks).
    pub fn read_unsigned32_value(&mut self, len: usize) -> Result<u32> {
        if len == 0 {
            return self.fail(DecodeErrorKind::ZeroLengthInteger);
        }
        if len > 5 {
            tracing::debug!(target: "snmp_get::ber", { snmp.offset = self.offset(), length = len }, "unsigned integer too long, truncating");
        }
        let bytes = self.read_bytes(len)?;
        Ok(bytes
            .iter()
            .take(5)
            .fold(0u64, |acc, &b| (acc << 8) | b as u64) as u32)
    }

    pub fn read_integer64(&mut self, expected_tag: u8) -> Result<u64> {
        let len = self.expect_tag(expected_tag)?;
        self.read_integer64_value(len)
    }

    /// Counter64 content: at most eight octets plus a leading zero.
    pub fn read_integer64_value(&mut self, len: usize) -> Result<u64> {
        if len == 0 {
            return self.fail(DecodeErrorKind::ZeroLengthInteger);
        }
        if len > 9 {
            return self.fail(DecodeErrorKind::Integer64TooLong { length: len });
        }
        let bytes = self.read_bytes(len)?;
        Ok(bytes.iter().fold(0u64, |acc, &b| (acc << 8) | b as u64))
    }

    pub fn read_octet_string(&mut self) -> Result<Bytes> {
        let len = self.expect_tag(tag::universal::OCTET_STRING)?;
        self.read_bytes(len)
    }

    pub fn read_null(&mut self) -> Result<()> {
        let len = self.expect_tag(tag::universal::NULL)?;
        if len != 0 {
            return self.fail(DecodeErrorKind::InvalidNull);
        }
        Ok(())
    }

    pub fn read_oid(&mut self) -> Result<Oid> {
        let len = self.expect_tag(tag::universal::OBJECT_IDENTIFIER)?;
        self.read_oid_value(len)
    }

    pub fn read_oid_value(&mut self, len: usize) -> Result<Oid> {
        let at = self.offset();
        let bytes = self.read_bytes(len)?;
        Oid::from_ber(&bytes).map_err(|e| match e {
            Error::Decode { offset, kind } => Error::decode(at + offset, kind),
            other => other,
        })
    }

    pub fn read_ip_address_value(&mut self, len: usize) -> Result<[u8; 4]> {
        if len != 4 {
            return self.fail(DecodeErrorKind::InvalidIpAddressLength { length: len });
        }
        let bytes = self.read_bytes(4)?;
        Ok([bytes[0], bytes[1], bytes[2], bytes[3]])
    }

    pub fn read_sequence(&mut self) -> Result<Decoder> {
        self.read_constructed(tag::universal::SEQUENCE)
    }

    /// Read a constructed value with `expected_tag`, returning a decoder over its contents.
    pub fn read_constructed(&mut self, expected_tag: u8) -> Result<Decoder> {
        let len = self.expect_tag(expected_tag)?;
        self.sub_decoder(len)
    }

    /// Split off the next `len` bytes as their own decoder.
    pub fn sub_decoder(&mut self, len: usize) -> Result<Decoder> {
        let base = self.offset();
        let data = self.read_bytes(len)?;
        Ok(Decoder {
            data,
            offset: 0,
            base,
        })
    }

    /// Skip over one complete TLV.
    pub fn skip_tlv(&mut self) -> Result<()> {
        self.read_tag()?;
        let len = self.read_length()?;
        self.read_bytes(len).map(|_| ())
    }
}
