//! Variable bindings.
//!
//! A GET carries one binding per requested OID, each with a NULL value;
//! the response carries the same OIDs with the agent's values filled in.

use crate::ber::{Decoder, EncodeBuf};
use crate::error::Result;
use crate::oid::Oid;
use crate::value::Value;

/// An OID paired with a value.
#[derive(Debug, Clone, PartialEq)]
pub struct VarBind {
    pub oid: Oid,
    pub value: Value,
}

impl VarBind {
    pub fn new(oid: Oid, value: Value) -> Self {
        Self { oid, value }
    }

    /// A request binding: `oid` with a NULL placeholder.
    pub fn null(oid: Oid) -> Self {
        Self {
            oid,
            value: Value::Null,
        }
    }

    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_sequence(|buf| {
            self.value.encode(buf);
            buf.push_oid(&self.oid);
        });
    }

    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let mut seq = decoder.read_sequence()?;
        let oid = seq.read_oid()?;
        let value = Value::decode(&mut seq)?;
        Ok(VarBind { oid, value })
    }
}

impl std::fmt::Display for VarBind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} = {}", self.oid, self.value)
    }
}

/// Encode `varbinds` as a VarBindList SEQUENCE.
pub fn encode_varbind_list(buf: &mut EncodeBuf, varbinds: &[VarBind]) {
    buf.push_sequence(|buf| {
        for vb in varbinds.iter().rev() {
            vb.encode(buf);
        }
    });
}

/// Decode a VarBindList SEQUENCE.
pub fn decode_varbind_list(decoder: &mut Decoder) -> Result<Vec<VarBind>> {
    let mut seq = decoder.read_sequence()?;
    let mut varbinds = Vec::new();
    while !seq.is_empty() {
        varbinds.push(VarBind::decode(&mut seq)?);
    }
    Ok(varbinds)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    fn list_bytes(varbinds: &[VarBind]) -> Vec<u8> {
        let mut buf = EncodeBuf::new();
        encode_varbind_list(&mut buf, varbinds);
        buf.finish().to_vec()
    }

    #[test]
    fn get_request_list_encoding() {
        let bytes = list_bytes(&[VarBind::null(oid!(1, 3, 6, 1))]);
        assert_eq!(
            bytes,
            [
                0x30, 0x09, // VarBindList
                0x30, 0x07, // VarBind
                0x06, 0x03, 0x2B, 0x06, 0x01, // OID
                0x05, 0x00, // NULL
            ]
        );
    }

    #[test]
    fn list_preserves_order() {
        let varbinds = vec![
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 1, 0), Value::from("router")),
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 3, 0), Value::TimeTicks(100)),
            VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 99, 0), Value::NoSuchObject),
        ];
        let bytes = list_bytes(&varbinds);
        let decoded = decode_varbind_list(&mut Decoder::from_slice(&bytes)).unwrap();
        assert_eq!(decoded, varbinds);
    }

    #[test]
    fn empty_list() {
        let bytes = list_bytes(&[]);
        assert_eq!(bytes, [0x30, 0x00]);
        assert!(decode_varbind_list(&mut Decoder::from_slice(&bytes))
            .unwrap()
            .is_empty());
    }

    #[test]
    fn truncated_binding_fails() {
        // VarBind with OID but no value
        let bytes = [0x30, 0x07, 0x30, 0x05, 0x06, 0x03, 0x2B, 0x06, 0x01];
        assert!(decode_varbind_list(&mut Decoder::from_slice(&bytes)).is_err());
    }

    #[test]
    fn display() {
        let vb = VarBind::new(oid!(1, 3, 6, 1, 2, 1, 1, 5, 0), Value::from("core-sw1"));
        assert_eq!(vb.to_string(), "1.3.6.1.2.1.1.5.0 = core-sw1");
    }
}
