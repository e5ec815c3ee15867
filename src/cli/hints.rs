//! OID argument parsing with well-known names.
//!
//! This is NOT MIB support - just a small hardcoded table so that the common
//! system and interface objects can be named on the command line.

use crate::Oid;
use crate::error::{Error, OidErrorKind, Result};

/// Well-known object names and their OIDs, without instance suffix.
static WELL_KNOWN_OIDS: &[(&str, &[u32])] = &[
    // SNMPv2-MIB::system
    ("sysDescr", &[1, 3, 6, 1, 2, 1, 1, 1]),
    ("sysObjectID", &[1, 3, 6, 1, 2, 1, 1, 2]),
    ("sysUpTime", &[1, 3, 6, 1, 2, 1, 1, 3]),
    ("sysContact", &[1, 3, 6, 1, 2, 1, 1, 4]),
    ("sysName", &[1, 3, 6, 1, 2, 1, 1, 5]),
    ("sysLocation", &[1, 3, 6, 1, 2, 1, 1, 6]),
    ("sysServices", &[1, 3, 6, 1, 2, 1, 1, 7]),
    // IF-MIB::interfaces
    ("ifNumber", &[1, 3, 6, 1, 2, 1, 2, 1]),
    ("ifIndex", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 1]),
    ("ifDescr", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 2]),
    ("ifType", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 3]),
    ("ifMtu", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 4]),
    ("ifSpeed", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 5]),
    ("ifPhysAddress", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 6]),
    ("ifAdminStatus", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 7]),
    ("ifOperStatus", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 8]),
    ("ifInOctets", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 10]),
    ("ifOutOctets", &[1, 3, 6, 1, 2, 1, 2, 2, 1, 16]),
];

/// Look up the OID of a well-known name (case-insensitive).
pub fn lookup(name: &str) -> Option<Oid> {
    WELL_KNOWN_OIDS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name))
        .map(|(_, arcs)| Oid::from_slice(arcs))
}

/// Convert a command-line OID argument into a validated [`Oid`].
///
/// Accepts:
/// - Dotted notation: `1.3.6.1.2.1.1.1.0` or `.1.3.6.1.2.1.1.1.0`
/// - Well-known names with instance: `sysDescr.0`, `ifDescr.3`
/// - The same with a module prefix: `SNMPv2-MIB::sysUpTime.0`
///
/// ```
/// use snmp_get::{cli::hints::parse_oid, oid};
///
/// assert_eq!(parse_oid("sysName.0").unwrap(), oid!(1, 3, 6, 1, 2, 1, 1, 5, 0));
/// assert!(parse_oid("1.3.six").is_err());
/// ```
pub fn parse_oid(s: &str) -> Result<Oid> {
    let oid = if s.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        Oid::parse(s)?
    } else {
        parse_named(s)?
    };

    match oid.validate_all() {
        Err(Error::InvalidOid { kind, .. }) => Err(Error::invalid_oid_with_input(kind, s)),
        Err(e) => Err(e),
        Ok(()) => Ok(oid),
    }
}

fn parse_named(s: &str) -> Result<Oid> {
    let unqualified = s.rsplit_once("::").map_or(s, |(_, name)| name);
    let (name, instance) = unqualified
        .split_once('.')
        .map_or((unqualified, None), |(name, rest)| (name, Some(rest)));

    let base = lookup(name)
        .ok_or_else(|| Error::invalid_oid_with_input(OidErrorKind::UnknownName, s))?;

    match instance {
        None => Ok(base),
        Some(rest) => {
            let suffix = Oid::parse(rest)
                .map_err(|_| Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s))?;
            Ok(base.join(suffix.arcs()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oid;

    #[test]
    fn test_parse_dotted() {
        assert_eq!(
            parse_oid("1.3.6.1.2.1.1.1.0").unwrap(),
            oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
        );
        assert_eq!(
            parse_oid(".1.3.6.1.2.1.1.1.0").unwrap(),
            oid!(1, 3, 6, 1, 2, 1, 1, 1, 0)
        );
    }

    #[test]
    fn test_parse_well_known() {
        assert_eq!(parse_oid("sysDescr.0").unwrap(), oid!(1, 3, 6, 1, 2, 1, 1, 1, 0));
        assert_eq!(parse_oid("SYSUPTIME.0").unwrap(), oid!(1, 3, 6, 1, 2, 1, 1, 3, 0));
        assert_eq!(
            parse_oid("IF-MIB::ifDescr.3").unwrap(),
            oid!(1, 3, 6, 1, 2, 1, 2, 2, 1, 2, 3)
        );
        assert_eq!(parse_oid("sysName").unwrap(), oid!(1, 3, 6, 1, 2, 1, 1, 5));
    }

    #[test]
    fn test_unknown_name() {
        let err = parse_oid("sysFoo.0").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidOid {
                kind: OidErrorKind::UnknownName,
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_malformed() {
        for bad in ["", "1.3.six", "sysDescr.x", "sysDescr.", "1", "3.1.2", "1.40.2", "1.3..6"] {
            assert!(parse_oid(bad).is_err(), "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_error_keeps_input() {
        match parse_oid("1.3.x") {
            Err(Error::InvalidOid { input, .. }) => assert_eq!(input.as_deref(), Some("1.3.x")),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_lookup() {
        assert_eq!(lookup("ifNumber"), Some(oid!(1, 3, 6, 1, 2, 1, 2, 1)));
        assert_eq!(lookup("nope"), None);
    }
}
