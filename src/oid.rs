//! Object Identifier (OID) type.
//!
//! Arcs are kept in a `SmallVec<[u32; 16]>`; every OID a GET names in
//! practice fits inline.

use crate::error::{DecodeErrorKind, Error, OidErrorKind, Result};
use smallvec::SmallVec;
use std::fmt;

/// Maximum number of arcs in an OID (RFC 2578 Section 3.5).
pub const MAX_OID_LEN: usize = 128;

/// Object Identifier.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Oid {
    arcs: SmallVec<[u32; 16]>,
}

impl Oid {
    pub fn empty() -> Self {
        Self {
            arcs: SmallVec::new(),
        }
    }

    /// Create an OID from arc values.
    ///
    /// ```
    /// use snmp_get::oid::Oid;
    ///
    /// let oid = Oid::new([1, 3, 6, 1, 2, 1]);
    /// assert_eq!(oid.arcs(), &[1, 3, 6, 1, 2, 1]);
    /// ```
    pub fn new(arcs: impl IntoIterator<Item = u32>) -> Self {
        Self {
            arcs: arcs.into_iter().collect(),
        }
    }

    pub fn from_slice(arcs: &[u32]) -> Self {
        Self {
            arcs: SmallVec::from_slice(arcs),
        }
    }

    /// Parse dotted notation such as `1.3.6.1.2.1.1.1.0`.
    ///
    /// A single leading `.` (the absolute form used by net-snmp tools) is
    /// accepted. Empty arcs, trailing dots and non-decimal arcs are errors.
    /// Arc constraints are not checked here; see [`validate_all`](Self::validate_all).
    ///
    /// ```
    /// use snmp_get::oid::Oid;
    ///
    /// assert_eq!(Oid::parse(".1.3.6.1").unwrap(), Oid::parse("1.3.6.1").unwrap());
    /// assert!(Oid::parse("1..3").is_err());
    /// assert!(Oid::parse("").is_err());
    /// ```
    pub fn parse(s: &str) -> Result<Self> {
        let body = s.strip_prefix('.').unwrap_or(s);
        if body.is_empty() {
            return Err(Error::invalid_oid_with_input(OidErrorKind::Empty, s));
        }

        let mut arcs = SmallVec::new();
        for part in body.split('.') {
            // u32::from_str accepts a leading '+', which is not an arc
            if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
                return Err(Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s));
            }
            let arc: u32 = part
                .parse()
                .map_err(|_| Error::invalid_oid_with_input(OidErrorKind::InvalidArc, s))?;
            arcs.push(arc);
        }

        Ok(Self { arcs })
    }

    pub fn arcs(&self) -> &[u32] {
        &self.arcs
    }

    pub fn len(&self) -> usize {
        self.arcs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arcs.is_empty()
    }

    /// Whether `self` begins with every arc of `prefix`.
    pub fn starts_with(&self, prefix: &Oid) -> bool {
        self.arcs.starts_with(&prefix.arcs)
    }

    /// A new OID with `suffix` appended.
    pub fn join(&self, suffix: &[u32]) -> Oid {
        let mut arcs = self.arcs.clone();
        arcs.extend_from_slice(suffix);
        Oid { arcs }
    }

    /// Check the first two arcs against X.690 8.19.4.
    ///
    /// The first arc must be 0, 1 or 2; below 2 the second arc must be at most 39.
    pub fn validate(&self) -> Result<()> {
        let Some(&first) = self.arcs.first() else {
            return Ok(());
        };
        if first > 2 {
            return Err(Error::invalid_oid(OidErrorKind::InvalidFirstArc(first)));
        }
        if let Some(&second) = self.arcs.get(1)
            && first < 2
            && second >= 40
        {
            return Err(Error::invalid_oid(OidErrorKind::InvalidSecondArc {
                first,
                second,
            }));
        }
        // first * 40 + second must fit the first subidentifier
        if let Some(&second) = self.arcs.get(1)
            && first == 2
            && second > u32::MAX - 80
        {
            return Err(Error::invalid_oid(OidErrorKind::InvalidArc));
        }
        Ok(())
    }

    pub fn validate_length(&self) -> Result<()> {
        if self.arcs.len() > MAX_OID_LEN {
            return Err(Error::invalid_oid(OidErrorKind::TooManyArcs {
                count: self.arcs.len(),
                max: MAX_OID_LEN,
            }));
        }
        Ok(())
    }

    /// Arc constraints, length limit, and the two-arc minimum a request OID needs.
    pub fn validate_all(&self) -> Result<()> {
        if self.arcs.len() < 2 {
            return Err(Error::invalid_oid(OidErrorKind::TooShort));
        }
        self.validate()?;
        self.validate_length()
    }

    /// BER content octets (X.690 8.19).
    ///
    /// The first two arcs share one subidentifier, `first * 40 + second`.
    /// The OID should have passed [`validate`](Self::validate) beforehand.
    pub fn to_ber_smallvec(&self) -> SmallVec<[u8; 64]> {
        let mut out = SmallVec::new();
        let (head, rest) = match self.arcs.as_slice() {
            [] => return out,
            [first] => (first.saturating_mul(40), &[][..]),
            [first, second, rest @ ..] => {
                (first.saturating_mul(40).saturating_add(*second), rest)
            }
        };
        push_subidentifier(&mut out, head);
        for &arc in rest {
            push_subidentifier(&mut out, arc);
        }
        out
    }

    pub fn to_ber(&self) -> Vec<u8> {
        self.to_ber_smallvec().to_vec()
    }

    /// Decode BER content octets, enforcing [`MAX_OID_LEN`].
    ///
    /// Non-minimal subidentifiers (leading `0x80` octets) are accepted.
    pub fn from_ber(data: &[u8]) -> Result<Self> {
        if data.is_empty() {
            return Ok(Self::empty());
        }

        let mut arcs: SmallVec<[u32; 16]> = SmallVec::new();
        let (head, mut pos) = read_subidentifier(data, 0)?;
        match head {
            0..40 => arcs.extend_from_slice(&[0, head]),
            40..80 => arcs.extend_from_slice(&[1, head - 40]),
            _ => arcs.extend_from_slice(&[2, head - 80]),
        }

        while pos < data.len() {
            let (arc, next) = read_subidentifier(data, pos)?;
            arcs.push(arc);
            pos = next;
            if arcs.len() > MAX_OID_LEN {
                return Err(Error::decode(
                    pos,
                    DecodeErrorKind::OidTooLong {
                        count: arcs.len(),
                        max: MAX_OID_LEN,
                    },
                ));
            }
        }

        Ok(Self { arcs })
    }
}

fn push_subidentifier(out: &mut SmallVec<[u8; 64]>, value: u32) {
    let groups = (32 - value.leading_zeros()).div_ceil(7).max(1);
    for i in (0..groups).rev() {
        let septet = ((value >> (i * 7)) & 0x7F) as u8;
        out.push(if i > 0 { septet | 0x80 } else { septet });
    }
}

/// Read one base-128 subidentifier starting at `pos`; returns (value, next position).
fn read_subidentifier(data: &[u8], mut pos: usize) -> Result<(u32, usize)> {
    let mut value: u32 = 0;
    loop {
        let Some(&byte) = data.get(pos) else {
            return Err(Error::decode(pos, DecodeErrorKind::TruncatedData));
        };
        pos += 1;
        if value > (u32::MAX >> 7) {
            return Err(Error::decode(pos, DecodeErrorKind::IntegerOverflow));
        }
        value = (value << 7) | (byte & 0x7F) as u32;
        if byte & 0x80 == 0 {
            return Ok((value, pos));
        }
    }
}

impl fmt::Debug for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Oid({})", self)
    }
}

impl fmt::Display for Oid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut arcs = self.arcs.iter();
        if let Some(first) = arcs.next() {
            write!(f, "{}", first)?;
            for arc in arcs {
                write!(f, ".{}", arc)?;
            }
        }
        Ok(())
    }
}

impl std::str::FromStr for Oid {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl From<&[u32]> for Oid {
    fn from(arcs: &[u32]) -> Self {
        Self::from_slice(arcs)
    }
}

impl<const N: usize> From<[u32; N]> for Oid {
    fn from(arcs: [u32; N]) -> Self {
        Self::new(arcs)
    }
}

impl PartialOrd for Oid {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Oid {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.arcs.cmp(&other.arcs)
    }
}

/// Build an [`Oid`] from literal arcs.
///
/// ```
/// use snmp_get::oid;
///
/// let sys_descr = oid!(1, 3, 6, 1, 2, 1, 1, 1, 0);
/// assert_eq!(sys_descr.to_string(), "1.3.6.1.2.1.1.1.0");
/// ```
#[macro_export]
macro_rules! oid {
    ($($arc:expr),* $(,)?) => {
        $crate::oid::Oid::from_slice(&[$($arc),*])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_dotted() {
        let oid = Oid::parse("1.3.6.1.2.1.1.1.0").unwrap();
        assert_eq!(oid.arcs(), &[1, 3, 6, 1, 2, 1, 1, 1, 0]);
        assert_eq!(oid.to_string(), "1.3.6.1.2.1.1.1.0");
    }

    #[test]
    fn parse_leading_dot() {
        assert_eq!(Oid::parse(".1.3.6.1").unwrap(), oid!(1, 3, 6, 1));
    }

    #[test]
    fn parse_rejects_malformed() {
        for bad in ["", ".", "1..3", "1.3.", "1.3.abc", "1.3.-6", "1.+3", " 1.3", "1.3.99999999999"] {
            assert!(
                matches!(Oid::parse(bad), Err(Error::InvalidOid { .. })),
                "{bad:?} should not parse"
            );
        }
    }

    #[test]
    fn validate_arc_rules() {
        assert!(oid!(1, 3, 6, 1).validate().is_ok());
        assert!(oid!(3, 0).validate().is_err());
        assert!(oid!(0, 40).validate().is_err());
        assert!(oid!(1, 39).validate().is_ok());
        assert!(oid!(2, 999).validate().is_ok());
    }

    #[test]
    fn validate_all_requires_two_arcs() {
        assert!(matches!(
            oid!(1).validate_all(),
            Err(Error::InvalidOid {
                kind: OidErrorKind::TooShort,
                ..
            })
        ));
        let long = Oid::new(std::iter::repeat_n(1, MAX_OID_LEN + 1));
        assert!(long.validate_all().is_err());
        assert!(Oid::new(std::iter::repeat_n(1, MAX_OID_LEN)).validate_all().is_ok());
    }

    #[test]
    fn ber_encoding() {
        assert_eq!(oid!(1, 3, 6, 1).to_ber(), [0x2B, 0x06, 0x01]);
        assert_eq!(oid!(2, 999, 3).to_ber(), [0x88, 0x37, 0x03]);
        assert_eq!(oid!(2, 48).to_ber(), [0x81, 0x00]);
        assert_eq!(oid!(1, 3, 0).to_ber(), [0x2B, 0x00]);
        assert_eq!(oid!(1, 3, 128).to_ber(), [0x2B, 0x81, 0x00]);
    }

    #[test]
    fn ber_decoding() {
        assert_eq!(Oid::from_ber(&[0x2B, 0x06, 0x01]).unwrap(), oid!(1, 3, 6, 1));
        assert_eq!(Oid::from_ber(&[0x88, 0x37, 0x03]).unwrap(), oid!(2, 999, 3));
        // non-minimal subidentifier
        assert_eq!(Oid::from_ber(&[0x2B, 0x80, 0x01]).unwrap(), oid!(1, 3, 1));
        assert!(Oid::from_ber(&[0x2B, 0x81]).is_err());
    }

    #[test]
    fn ber_decoding_enforces_max_len() {
        let mut at_limit = vec![0x2B];
        at_limit.extend(std::iter::repeat_n(0x01, MAX_OID_LEN - 2));
        assert_eq!(Oid::from_ber(&at_limit).unwrap().len(), MAX_OID_LEN);

        at_limit.push(0x01);
        assert!(matches!(
            Oid::from_ber(&at_limit),
            Err(Error::Decode {
                kind: DecodeErrorKind::OidTooLong { .. },
                ..
            })
        ));
    }

    #[test]
    fn join_and_prefix() {
        let system = oid!(1, 3, 6, 1, 2, 1, 1);
        let descr = system.join(&[1, 0]);
        assert_eq!(descr, oid!(1, 3, 6, 1, 2, 1, 1, 1, 0));
        assert!(descr.starts_with(&system));
        assert!(!system.starts_with(&descr));
    }
}
