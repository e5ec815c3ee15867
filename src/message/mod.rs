//! SNMP message wrappers.
//!
//! v1 and v2c share one layout, `SEQUENCE { version, community, pdu }`,
//! handled by [`CommunityMessage`].

mod community;

pub use community::CommunityMessage;
