//! SNMP Protocol Data Units.
//!
//! Only the request/response PDU shape is modelled (RFC 3416 Section 3):
//! `request-id`, `error-status`, `error-index`, `variable-bindings`.

use crate::ber::{Decoder, EncodeBuf, tag};
use crate::error::{DecodeErrorKind, Error, ErrorStatus, Result};
use crate::oid::Oid;
use crate::varbind::{VarBind, decode_varbind_list, encode_varbind_list};

/// PDU type tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PduType {
    GetRequest = tag::pdu::GET_REQUEST,
    GetNextRequest = tag::pdu::GET_NEXT_REQUEST,
    Response = tag::pdu::RESPONSE,
    SetRequest = tag::pdu::SET_REQUEST,
}

impl PduType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            tag::pdu::GET_REQUEST => Some(Self::GetRequest),
            tag::pdu::GET_NEXT_REQUEST => Some(Self::GetNextRequest),
            tag::pdu::RESPONSE => Some(Self::Response),
            tag::pdu::SET_REQUEST => Some(Self::SetRequest),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }
}

impl std::fmt::Display for PduType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::GetRequest => write!(f, "GetRequest"),
            Self::GetNextRequest => write!(f, "GetNextRequest"),
            Self::Response => write!(f, "Response"),
            Self::SetRequest => write!(f, "SetRequest"),
        }
    }
}

/// Request or response PDU.
#[derive(Debug, Clone)]
pub struct Pdu {
    pub pdu_type: PduType,
    /// Correlates a response with its request.
    pub request_id: i32,
    /// Zero in requests.
    pub error_status: i32,
    /// 1-based index of the offending varbind, zero when not applicable.
    pub error_index: i32,
    pub varbinds: Vec<VarBind>,
}

impl Pdu {
    /// GET request for `oids`, each bound to NULL.
    pub fn get_request(request_id: i32, oids: &[Oid]) -> Self {
        Self::with_varbinds(
            request_id,
            oids.iter().map(|oid| VarBind::null(oid.clone())).collect(),
        )
    }

    /// GET request from prepared bindings.
    pub fn with_varbinds(request_id: i32, varbinds: Vec<VarBind>) -> Self {
        Self {
            pdu_type: PduType::GetRequest,
            request_id,
            error_status: 0,
            error_index: 0,
            varbinds,
        }
    }

    pub fn encode(&self, buf: &mut EncodeBuf) {
        buf.push_constructed(self.pdu_type.tag(), |buf| {
            encode_varbind_list(buf, &self.varbinds);
            buf.push_integer(self.error_index);
            buf.push_integer(self.error_status);
            buf.push_integer(self.request_id);
        });
    }

    pub fn decode(decoder: &mut Decoder) -> Result<Self> {
        let at = decoder.offset();
        let tag = decoder.read_tag()?;
        let pdu_type = PduType::from_tag(tag)
            .ok_or_else(|| Error::decode(at, DecodeErrorKind::UnknownPduType(tag)))?;

        let len = decoder.read_length()?;
        let mut body = decoder.sub_decoder(len)?;

        let request_id = body.read_integer()?;
        let error_status = body.read_integer()?;
        let error_index = body.read_integer()?;
        let varbinds = decode_varbind_list(&mut body)?;

        Ok(Pdu {
            pdu_type,
            request_id,
            error_status,
            error_index,
            varbinds,
        })
    }

    pub fn is_error(&self) -> bool {
        self.error_status != 0
    }

    pub fn error_status_enum(&self) -> ErrorStatus {
        ErrorStatus::from_i32(self.error_status)
    }

    /// The Response that answers this PDU, echoing its bindings.
    pub fn to_response(&self) -> Self {
        Self {
            pdu_type: PduType::Response,
            request_id: self.request_id,
            error_status: 0,
            error_index: 0,
            varbinds: self.varbinds.clone(),
        }
    }

    /// An error Response for this PDU.
    pub fn to_error_response(&self, error_status: ErrorStatus, error_index: i32) -> Self {
        Self {
            error_status: error_status.as_i32(),
            error_index,
            ..self.to_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;
    use crate::value::Value;

    fn encoded(pdu: &Pdu) -> Vec<u8> {
        let mut buf = EncodeBuf::new();
        pdu.encode(&mut buf);
        buf.finish().to_vec()
    }

    #[test]
    fn get_request_wire_format() {
        let pdu = Pdu::get_request(1, &[oid!(1, 3, 6, 1)]);
        assert_eq!(
            encoded(&pdu),
            [
                0xA0, 0x14, // GetRequest
                0x02, 0x01, 0x01, // request-id
                0x02, 0x01, 0x00, // error-status
                0x02, 0x01, 0x00, // error-index
                0x30, 0x09, 0x30, 0x07, 0x06, 0x03, 0x2B, 0x06, 0x01, 0x05, 0x00,
            ]
        );
    }

    #[test]
    fn decode_error_response() {
        let request = Pdu::get_request(77, &[oid!(1, 3, 6, 1, 2, 1, 1, 99, 0)]);
        let response = request.to_error_response(ErrorStatus::NoSuchName, 1);
        let bytes = encoded(&response);

        let decoded = Pdu::decode(&mut Decoder::from_slice(&bytes)).unwrap();
        assert_eq!(decoded.pdu_type, PduType::Response);
        assert_eq!(decoded.request_id, 77);
        assert!(decoded.is_error());
        assert_eq!(decoded.error_status_enum(), ErrorStatus::NoSuchName);
        assert_eq!(decoded.error_index, 1);
        assert_eq!(decoded.varbinds[0].value, Value::Null);
    }

    #[test]
    fn unknown_pdu_type_rejected() {
        // v2 trap tag
        let bytes = [0xA7, 0x0B, 0x02, 0x01, 0x01, 0x02, 0x01, 0x00, 0x02, 0x01, 0x00, 0x30, 0x00];
        assert!(matches!(
            Pdu::decode(&mut Decoder::from_slice(&bytes)),
            Err(Error::Decode {
                offset: 0,
                kind: DecodeErrorKind::UnknownPduType(0xA7)
            })
        ));
    }
}
