//! Authentication configuration types for the SNMP client.
//!
//! Only community authentication exists: the community string travels in
//! clear in every message and the version picks the message format.

use crate::version::Version;

/// SNMP version for community-based authentication.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CommunityVersion {
    /// SNMPv1
    #[default]
    V1,
    /// SNMPv2c
    V2c,
}

impl From<CommunityVersion> for Version {
    fn from(version: CommunityVersion) -> Self {
        match version {
            CommunityVersion::V1 => Version::V1,
            CommunityVersion::V2c => Version::V2c,
        }
    }
}

/// Authentication configuration for SNMP clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Auth {
    /// Community string authentication (SNMPv1 or v2c).
    Community {
        /// SNMP version (V1 or V2c)
        version: CommunityVersion,
        /// Community string
        community: String,
    },
}

impl Default for Auth {
    fn default() -> Self {
        Auth::v1("public")
    }
}

impl Auth {
    /// SNMPv1 community authentication.
    ///
    /// ```rust
    /// use snmp_get::Auth;
    ///
    /// let auth = Auth::v1("private");
    /// assert_eq!(auth.community(), "private");
    /// ```
    pub fn v1(community: impl Into<String>) -> Self {
        Auth::Community {
            version: CommunityVersion::V1,
            community: community.into(),
        }
    }

    /// SNMPv2c community authentication.
    ///
    /// Same message layout as v1, but agents answer a missing object with
    /// an exception value instead of a `noSuchName` error status.
    pub fn v2c(community: impl Into<String>) -> Self {
        Auth::Community {
            version: CommunityVersion::V2c,
            community: community.into(),
        }
    }

    /// Message version this configuration sends.
    pub fn version(&self) -> Version {
        match self {
            Auth::Community { version, .. } => (*version).into(),
        }
    }

    pub fn community(&self) -> &str {
        match self {
            Auth::Community { community, .. } => community,
        }
    }
}

impl From<Version> for CommunityVersion {
    fn from(version: Version) -> Self {
        match version {
            Version::V1 => CommunityVersion::V1,
            Version::V2c => CommunityVersion::V2c,
        }
    }
}
