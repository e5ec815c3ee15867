//! BER tag values used by SNMP v1/v2c messages.
//!
//! Bits 7-6 carry the class, bit 5 marks a constructed encoding and bits 4-0
//! the tag number (X.690 8.1.2). SNMP never needs the long tag form.

/// Constructed bit.
pub const CONSTRUCTED: u8 = 0x20;

const CONTEXT_SPECIFIC: u8 = 0x80;

/// Universal class.
pub mod universal {
    pub const INTEGER: u8 = 0x02;
    pub const OCTET_STRING: u8 = 0x04;
    /// Constructed OCTET STRING, rejected by the decoder.
    pub const OCTET_STRING_CONSTRUCTED: u8 = 0x24;
    pub const NULL: u8 = 0x05;
    pub const OBJECT_IDENTIFIER: u8 = 0x06;
    pub const SEQUENCE: u8 = 0x30;
}

/// Application class: the SMI types of RFC 2578.
pub mod application {
    pub const IP_ADDRESS: u8 = 0x40;
    pub const COUNTER32: u8 = 0x41;
    /// Gauge32, also used for Unsigned32.
    pub const GAUGE32: u8 = 0x42;
    pub const TIMETICKS: u8 = 0x43;
    pub const OPAQUE: u8 = 0x44;
    pub const COUNTER64: u8 = 0x46;
}

/// Context class, primitive: the v2c exception values.
pub mod context {
    pub const NO_SUCH_OBJECT: u8 = 0x80;
    pub const NO_SUCH_INSTANCE: u8 = 0x81;
    pub const END_OF_MIB_VIEW: u8 = 0x82;
}

/// Context class, constructed: PDU types.
pub mod pdu {
    use super::{CONSTRUCTED, CONTEXT_SPECIFIC};

    pub const GET_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED;
    pub const GET_NEXT_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x01;
    pub const RESPONSE: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x02;
    pub const SET_REQUEST: u8 = CONTEXT_SPECIFIC | CONSTRUCTED | 0x03;
}

/// Whether the tag has the constructed bit set.
#[inline]
pub const fn is_constructed(tag: u8) -> bool {
    tag & CONSTRUCTED != 0
}
