//! Community-based message format (v1/v2c).

use crate::ber::{Decoder, EncodeBuf};
use crate::error::{DecodeErrorKind, Error, Result};
use crate::pdu::Pdu;
use crate::version::Version;
use bytes::Bytes;

/// A v1 or v2c message.
#[derive(Debug, Clone)]
pub struct CommunityMessage {
    pub version: Version,
    /// Community string, sent in clear.
    pub community: Bytes,
    pub pdu: Pdu,
}

impl CommunityMessage {
    pub fn new(version: Version, community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self {
            version,
            community: community.into(),
            pdu,
        }
    }

    pub fn v1(community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self::new(Version::V1, community, pdu)
    }

    pub fn v2c(community: impl Into<Bytes>, pdu: Pdu) -> Self {
        Self::new(Version::V2c, community, pdu)
    }

    pub fn encode(&self) -> Bytes {
        let mut buf = EncodeBuf::with_capacity(64 + self.community.len());
        buf.push_sequence(|buf| {
            self.pdu.encode(buf);
            buf.push_octet_string(&self.community);
            buf.push_integer(self.version.as_i32());
        });
        buf.finish()
    }

    /// Decode a complete datagram.
    ///
    /// Trailing bytes after the outer SEQUENCE are ignored, as net-snmp does.
    pub fn decode(data: Bytes) -> Result<Self> {
        if data.is_empty() {
            return Err(Error::decode(0, DecodeErrorKind::EmptyResponse));
        }
        let mut decoder = Decoder::new(data);
        let mut seq = decoder.read_sequence()?;

        let at = seq.offset();
        let raw_version = seq.read_integer()?;
        let version = Version::from_i32(raw_version).ok_or_else(|| {
            tracing::debug!(target: "snmp_get::ber", { snmp.offset = at, snmp.version = raw_version }, "unsupported message version");
            Error::decode(at, DecodeErrorKind::UnknownVersion(raw_version))
        })?;

        let community = seq.read_octet_string()?;
        let pdu = Pdu::decode(&mut seq)?;

        Ok(CommunityMessage {
            version,
            community,
            pdu,
        })
    }

    pub fn into_pdu(self) -> Pdu {
        self.pdu
    }
}
