//! IPv4 dotted-quad parsing and the reserved address table
//!
//! Lookups are only meaningful for public unicast addresses, so every
//! candidate passes through [`parse_ipv4`] and [`reserved_range`] before any
//! outbound request is made.

use std::net::Ipv4Addr;
use std::ops::RangeInclusive;

/// One row of the reserved address table
///
/// A row matches when the first octet is inside `first`, the second octet is
/// inside `second` (if set) and the third octet equals `third` (if set).
#[derive(Debug)]
pub struct ReservedRange {
    pub name: &'static str,
    first: RangeInclusive<u8>,
    second: Option<RangeInclusive<u8>>,
    third: Option<u8>,
}

impl ReservedRange {
    const fn new(
        name: &'static str,
        first: RangeInclusive<u8>,
        second: Option<RangeInclusive<u8>>,
        third: Option<u8>,
    ) -> Self {
        Self {
            name,
            first,
            second,
            third,
        }
    }

    pub fn contains(&self, addr: Ipv4Addr) -> bool {
        let [a, b, c, _] = addr.octets();
        self.first.contains(&a)
            && self.second.as_ref().is_none_or(|r| r.contains(&b))
            && self.third.is_none_or(|t| t == c)
    }
}

/// Ranges excluded from lookup, evaluated top to bottom
pub static RESERVED_RANGES: &[ReservedRange] = &[
    ReservedRange::new("private-use 10.0.0.0/8", 10..=10, None, None),
    ReservedRange::new("private-use 172.16.0.0/12", 172..=172, Some(16..=31), None),
    ReservedRange::new("private-use 192.168.0.0/16", 192..=192, Some(168..=168), None),
    ReservedRange::new("link-local 169.254.0.0/16", 169..=169, Some(254..=254), None),
    ReservedRange::new("loopback 127.0.0.0/8", 127..=127, None, None),
    ReservedRange::new("this-network 0.0.0.0/8", 0..=0, None, None),
    ReservedRange::new("carrier-grade NAT 100.64.0.0/10", 100..=100, Some(64..=127), None),
    ReservedRange::new("IETF protocol 192.0.0.0/24", 192..=192, Some(0..=0), Some(0)),
    ReservedRange::new("TEST-NET-1 192.0.2.0/24", 192..=192, Some(0..=0), Some(2)),
    ReservedRange::new("TEST-NET-2 198.51.100.0/24", 198..=198, Some(51..=51), Some(100)),
    ReservedRange::new("TEST-NET-3 203.0.113.0/24", 203..=203, Some(0..=0), Some(113)),
    ReservedRange::new("multicast 224.0.0.0/4", 224..=239, None, None),
    ReservedRange::new("reserved 240.0.0.0/4", 240..=255, None, None),
];

/// Parse a strict dotted quad: four fields of 1-3 ASCII digits, each 0-255
///
/// Leading zeros are accepted (`010` reads as 10). Anything else, including
/// surrounding whitespace, returns `None`.
pub fn parse_ipv4(candidate: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut fields = candidate.split('.');

    for slot in &mut octets {
        let field = fields.next()?;
        if field.is_empty() || field.len() > 3 || !field.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        *slot = field.parse().ok()?;
    }

    if fields.next().is_some() {
        return None;
    }
    Some(Ipv4Addr::from(octets))
}

/// First reserved range containing `addr`, if any
pub fn reserved_range(addr: Ipv4Addr) -> Option<&'static ReservedRange> {
    RESERVED_RANGES.iter().find(|range| range.contains(addr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(parse_ipv4("8.8.8.8"), Some(Ipv4Addr::new(8, 8, 8, 8)));
        assert_eq!(parse_ipv4("0.0.0.0"), Some(Ipv4Addr::UNSPECIFIED));
        assert_eq!(parse_ipv4("255.255.255.255"), Some(Ipv4Addr::BROADCAST));
        assert_eq!(parse_ipv4("001.002.003.004"), Some(Ipv4Addr::new(1, 2, 3, 4)));
    }

    #[test]
    fn test_parse_rejects_malformed() {
        for bad in [
            "",
            "1.2.3",
            "1.2.3.4.5",
            "1.2.3.",
            ".1.2.3",
            "1..2.3",
            "256.1.1.1",
            "1.2.3.999",
            "0001.2.3.4",
            " 1.2.3.4",
            "1.2.3.4 ",
            "+1.2.3.4",
            "-1.2.3.4",
            "a.b.c.d",
            "1.2.3.4/24",
            "::1",
            "1.2.3.٣",
        ] {
            assert_eq!(parse_ipv4(bad), None, "expected {bad:?} to be rejected");
        }
    }

    fn reserved(s: &str) -> Option<&'static str> {
        reserved_range(parse_ipv4(s).unwrap()).map(|r| r.name)
    }

    #[test]
    fn test_reserved_examples() {
        for addr in [
            "10.1.2.3",
            "172.20.0.1",
            "192.168.1.1",
            "169.254.10.10",
            "127.0.0.1",
            "0.1.2.3",
            "100.70.0.1",
            "192.0.0.8",
            "192.0.2.55",
            "198.51.100.7",
            "203.0.113.9",
            "224.0.0.1",
            "239.255.255.255",
            "240.0.0.1",
            "255.255.255.255",
        ] {
            assert!(reserved(addr).is_some(), "expected {addr} to be reserved");
        }
    }

    #[test]
    fn test_range_boundaries() {
        assert_eq!(reserved("172.15.255.255"), None);
        assert!(reserved("172.16.0.0").is_some());
        assert!(reserved("172.31.255.255").is_some());
        assert_eq!(reserved("172.32.0.0"), None);

        assert_eq!(reserved("100.63.255.255"), None);
        assert!(reserved("100.64.0.0").is_some());
        assert!(reserved("100.127.255.255").is_some());
        assert_eq!(reserved("100.128.0.0"), None);

        assert_eq!(reserved("223.255.255.255"), None);
        assert!(reserved("224.0.0.0").is_some());

        assert_eq!(reserved("192.0.1.1"), None);
        assert_eq!(reserved("198.51.101.1"), None);
        assert_eq!(reserved("203.0.112.1"), None);
        assert_eq!(reserved("169.253.1.1"), None);
    }

    #[test]
    fn test_public_addresses_pass() {
        for addr in ["8.8.8.8", "1.1.1.1", "114.114.114.114", "223.5.5.5", "11.0.0.1"] {
            assert_eq!(reserved(addr), None, "expected {addr} to be public");
        }
    }

    #[test]
    fn test_range_names() {
        assert_eq!(reserved("10.0.0.1"), Some("private-use 10.0.0.0/8"));
        assert_eq!(reserved("255.255.255.255"), Some("reserved 240.0.0.0/4"));
    }
}
