//! SNMP value types.
//!
//! [`Value`] covers the SMIv2 application types and the three v2c exception
//! values an agent can put in place of a result.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::format::hex;
use crate::oid::Oid;
use bytes::Bytes;

/// SNMP value.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Value {
    /// INTEGER (signed 32-bit)
    Integer(i32),

    /// OCTET STRING. The 65535-octet SMI limit is not enforced on decode.
    OctetString(Bytes),

    /// NULL, the placeholder a GET request carries.
    Null,

    ObjectIdentifier(Oid),

    /// IpAddress (4 bytes, network order)
    IpAddress([u8; 4]),

    Counter32(u32),

    /// Gauge32 / Unsigned32
    Gauge32(u32),

    /// TimeTicks, hundredths of a second.
    TimeTicks(u32),

    Opaque(Bytes),

    /// Counter64 (v2c only).
    Counter64(u64),

    /// The agent implements no object at this OID (v2c).
    NoSuchObject,

    /// The object exists but this instance does not (v2c).
    NoSuchInstance,

    /// Only produced by GETNEXT/GETBULK, but agents occasionally send it for GET.
    EndOfMibView,

    /// Unrecognized tag, kept as raw content.
    Unknown { tag: u8, data: Bytes },
}

impl Value {
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Integer(v) => Some(*v),
            _ => None,
        }
    }

    /// Unsigned 32-bit types (Counter32, Gauge32, TimeTicks).
    pub fn as_u32(&self) -> Option<u32> {
        match self {
            Value::Counter32(v) | Value::Gauge32(v) | Value::TimeTicks(v) => Some(*v),
            _ => None,
        }
    }

    /// Raw content of OctetString or Opaque.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::OctetString(data) | Value::Opaque(data) => Some(data),
            _ => None,
        }
    }

    /// OctetString content if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::OctetString(data) => std::str::from_utf8(data).ok(),
            _ => None,
        }
    }

    /// Whether this is one of the v2c exception values.
    ///
    /// ```
    /// use snmp_get::Value;
    ///
    /// assert!(Value::NoSuchInstance.is_exception());
    /// assert!(!Value::Null.is_exception());
    /// ```
    pub fn is_exception(&self) -> bool {
        matches!(
            self,
            Value::NoSuchObject | Value::NoSuchInstance | Value::EndOfMibView
        )
    }

    pub fn encode(&self, buf: &mut EncodeBuf) {
        match self {
            Value::Integer(v) => buf.push_integer(*v),
            Value::OctetString(data) => buf.push_octet_string(data),
            Value::Null => buf.push_null(),
            Value::ObjectIdentifier(oid) => buf.push_oid(oid),
            Value::IpAddress(addr) => buf.push_ip_address(*addr),
            Value::Counter32(v) => buf.push_unsigned32(tag::application::COUNTER32, *v),
            Value::Gauge32(v) => buf.push_unsigned32(tag::application::GAUGE32, *v),
            Value::TimeTicks(v) => buf.push_unsigned32(tag::application::TIMETICKS, *v),
            Value::Opaque(data) => {
                buf.push_bytes(data);
                buf.push_length(data.len());
                buf.push_tag(tag::application::OPAQUE);
            }
            Value::Counter64(v) => buf.push_integer64(*v),
            Value::NoSuchObject => buf.push_empty(tag::context::NO_SUCH_OBJECT),
            Value::NoSuchInstance => buf.push_empty(tag::context::NO_SUCH_INSTANCE),
            Value::EndOfMibView => buf.push_empty(tag::context::END_OF_MIB_VIEW),
            Value::Unknown { tag: t, data } => {
                buf.push_bytes(data);
                buf.push_length(data.len());
                buf.push_tag(*t);
            }
        }
    }

    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let at = decoder.offset();
        let tag = decoder.read_tag()?;
        let len = decoder.read_length()?;

        let value = match tag {
            tag::universal::INTEGER => Value::Integer(decoder.read_integer_value(len)?),
            tag::universal::OCTET_STRING => Value::OctetString(decoder.read_bytes(len)?),
            tag::universal::NULL => {
                if len != 0 {
                    return Err(Error::decode(at, DecodeErrorKind::InvalidNull));
                }
                Value::Null
            }
            tag::universal::OBJECT_IDENTIFIER => {
                Value::ObjectIdentifier(decoder.read_oid_value(len)?)
            }
            tag::application::IP_ADDRESS => Value::IpAddress(decoder.read_ip_address_value(len)?),
            tag::application::COUNTER32 => Value::Counter32(decoder.read_unsigned32_value(len)?),
            tag::application::GAUGE32 => Value::Gauge32(decoder.read_unsigned32_value(len)?),
            tag::application::TIMETICKS => Value::TimeTicks(decoder.read_unsigned32_value(len)?),
            tag::application::OPAQUE => Value::Opaque(decoder.read_bytes(len)?),
            tag::application::COUNTER64 => Value::Counter64(decoder.read_integer64_value(len)?),
            // Exception values should be empty; tolerate stray content.
            tag::context::NO_SUCH_OBJECT => {
                decoder.read_bytes(len)?;
                Value::NoSuchObject
            }
            tag::context::NO_SUCH_INSTANCE => {
                decoder.read_bytes(len)?;
                Value::NoSuchInstance
            }
            tag::context::END_OF_MIB_VIEW => {
                decoder.read_bytes(len)?;
                Value::EndOfMibView
            }
            tag::universal::OCTET_STRING_CONSTRUCTED => {
                return Err(Error::decode(at, DecodeErrorKind::ConstructedOctetString));
            }
            _ => Value::Unknown {
                tag,
                data: decoder.read_bytes(len)?,
            },
        };
        Ok(value)
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::OctetString(data) => match std::str::from_utf8(data) {
                Ok(s) => write!(f, "{}", s),
                Err(_) => write!(f, "0x{}", hex::Bytes(data)),
            },
            Value::Null => write!(f, "NULL"),
            Value::ObjectIdentifier(oid) => write!(f, "{}", oid),
            Value::IpAddress(addr) => {
                write!(f, "{}", std::net::Ipv4Addr::from(*addr))
            }
            Value::Counter32(v) | Value::Gauge32(v) => write!(f, "{}", v),
            Value::TimeTicks(v) => {
                let secs = v / 100;
                write!(
                    f,
                    "{}d {}h {}m {}s",
                    secs / 86400,
                    (secs % 86400) / 3600,
                    (secs % 3600) / 60,
                    secs % 60
                )
            }
            Value::Opaque(data) => write!(f, "Opaque(0x{})", hex::Bytes(data)),
            Value::Counter64(v) => write!(f, "{}", v),
            Value::NoSuchObject => write!(f, "noSuchObject"),
            Value::NoSuchInstance => write!(f, "noSuchInstance"),
            Value::EndOfMibView => write!(f, "endOfMibView"),
            Value::Unknown { tag, data } => {
                write!(f, "Unknown(tag=0x{:02X}, data=0x{})", tag, hex::Bytes(data))
            }
        }
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Integer(v)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::OctetString(Bytes::copy_from_slice(s.as_bytes()))
    }
}

impl From<&[u8]> for Value {
    fn from(data: &[u8]) -> Self {
        Value::OctetString(Bytes::copy_from_slice(data))
    }
}

impl From<Oid> for Value {
    fn from(oid: Oid) -> Self {
        Value::ObjectIdentifier(oid)
    }
}

impl From<std::net::Ipv4Addr> for Value {
    fn from(addr: std::net::Ipv4Addr) -> Self {
        Value::IpAddress(addr.octets())
    }
}
