//! IPv4 arithmetic used to complete a site's address plan.
//!
//! Everything here is pure: functions take addresses and return addresses.
//! Writing results back into a [`FieldMap`] is the builder's job.

pub mod table;

pub use table::{parse_ip_table, IpTableRow};

use std::fmt;
use std::net::Ipv4Addr;

use crate::error::GenError;
use crate::models::FieldMap;

/// Maximum IPv4 prefix length.
pub const MAX_PREFIX: u8 = 32;

const BLOCK_MASK: u32 = 0xFFFF_FF00;
const BLOCK_SIZE: u32 = 1 << 8;

/// Site numbering scheme: index `n` lives at last octet `97 + 4 * (n - 2)`.
pub const FIRST_INDEX_OCTET: u8 = 97;
pub const LAST_INDEX_OCTET: u8 = 253;
pub const INDEX_STEP: u8 = 4;
pub const MIN_INDEX: u8 = 2;
pub const MAX_INDEX: u8 = 41;

/// Whether a field must, or must not, carry a `/prefix`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskRule {
    Forbidden,
    Required,
}

/// A validated IPv4 address with an optional prefix length.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRecord {
    pub addr: Ipv4Addr,
    pub prefix: Option<u8>,
}

impl AddressRecord {
    /// Parse `a.b.c.d`, `a.b.c.d/nn` or `a.b.c.d/255.255.255.0`.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (ip, prefix) = match raw.split_once('/') {
            Some((ip, prefix)) => (ip, Some(parse_prefix(prefix)?)),
            None => (raw, None),
        };
        let addr = ip.trim().parse::<Ipv4Addr>().ok()?;
        Some(Self { addr, prefix })
    }

}

impl fmt::Display for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix {
            Some(prefix) => write!(f, "{}/{}", self.addr, prefix),
            None => write!(f, "{}", self.addr),
        }
    }
}

/// Parse a prefix length (`24`) or a contiguous dotted netmask (`255.255.255.0`).
pub fn parse_prefix(raw: &str) -> Option<u8> {
    let raw = raw.trim();
    if raw.contains('.') {
        let mask = u32::from(raw.parse::<Ipv4Addr>().ok()?);
        // contiguous masks have all their ones at the top
        if mask.count_ones() == mask.leading_ones() {
            return Some(mask.leading_ones() as u8);
        }
        return None;
    }
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    raw.parse::<u8>().ok().filter(|p| *p <= MAX_PREFIX)
}

/// Dotted netmask for a prefix length (clamped to 32).
pub fn netmask(prefix: u8) -> Ipv4Addr {
    let prefix = prefix.min(MAX_PREFIX);
    if prefix == 0 {
        return Ipv4Addr::UNSPECIFIED;
    }
    Ipv4Addr::from(u32::MAX << (MAX_PREFIX - prefix))
}

pub fn network_address(addr: Ipv4Addr, prefix: u8) -> Ipv4Addr {
    Ipv4Addr::from(u32::from(addr) & u32::from(netmask(prefix)))
}

/// Check one field of the map against a mask rule and parse it.
///
/// The mask-presence check runs before parsing. A blank or missing field is
/// `InvalidAddress`.
pub fn validate(fields: &FieldMap, field: &str, rule: MaskRule) -> Result<AddressRecord, GenError> {
    let value = fields
        .present(field)
        .ok_or_else(|| GenError::invalid_address(field, ""))?;

    let has_mask = value.contains('/');
    match rule {
        MaskRule::Forbidden if has_mask => {
            return Err(GenError::UnexpectedMask { field: field.to_string() });
        }
        MaskRule::Required if !has_mask => {
            return Err(GenError::MissingMask { field: field.to_string() });
        }
        _ => {}
    }

    AddressRecord::parse(value).ok_or_else(|| GenError::invalid_address(field, value))
}

/// Like [`validate`] with [`MaskRule::Forbidden`], but a missing field is fine.
pub fn validate_if_present(fields: &FieldMap, field: &str) -> Result<Option<AddressRecord>, GenError> {
    if fields.present(field).is_none() {
        return Ok(None);
    }
    validate(fields, field, MaskRule::Forbidden).map(Some)
}

/// `+1`, `+2` and `-1` of a base address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Neighbors {
    pub p1: Option<Ipv4Addr>,
    pub p2: Option<Ipv4Addr>,
    pub m1: Option<Ipv4Addr>,
}

/// Neighbours over the whole 32-bit space: `10.0.0.255 + 1` is `10.0.1.0`.
/// A neighbour that would leave IPv4 space is `None`; the others are still set.
pub fn neighbors(addr: Ipv4Addr) -> Neighbors {
    let base = u32::from(addr);
    Neighbors {
        p1: base.checked_add(1).map(Ipv4Addr::from),
        p2: base.checked_add(2).map(Ipv4Addr::from),
        m1: base.checked_sub(1).map(Ipv4Addr::from),
    }
}

/// Usable address, dotted mask and prefix of an interface address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkAndMask {
    pub ip: Ipv4Addr,
    pub netmask: Ipv4Addr,
    pub prefix: u8,
}

impl NetworkAndMask {
    /// `ip/prefix`
    pub fn barred(&self) -> String {
        format!("{}/{}", self.ip, self.prefix)
    }
}

/// With `keep_host` the original host address is kept, otherwise it is
/// replaced by the network address.
pub fn network_and_mask(addr: Ipv4Addr, prefix: u8, keep_host: bool) -> NetworkAndMask {
    let prefix = prefix.min(MAX_PREFIX);
    let ip = if keep_host { addr } else { network_address(addr, prefix) };
    NetworkAndMask {
        ip,
        netmask: netmask(prefix),
        prefix,
    }
}

/// Site index encoded in the last octet of an issued address.
pub fn infer_sequence_index(addr: Ipv4Addr) -> Result<u8, GenError> {
    let octet = addr.octets()[3];
    if !(FIRST_INDEX_OCTET..=LAST_INDEX_OCTET).contains(&octet) {
        return Err(GenError::OutOfRange(format!(
            "last octet {} of {} is outside {}..={}",
            octet, addr, FIRST_INDEX_OCTET, LAST_INDEX_OCTET
        )));
    }

    let delta = octet - FIRST_INDEX_OCTET;
    if delta % INDEX_STEP != 0 {
        return Err(GenError::OutOfRange(format!(
            "last octet {} of {} is not a site address (expected {} + {}k)",
            octet, addr, FIRST_INDEX_OCTET, INDEX_STEP
        )));
    }

    let index = delta / INDEX_STEP + MIN_INDEX;
    if !(MIN_INDEX..=MAX_INDEX).contains(&index) {
        return Err(GenError::OutOfRange(format!(
            "inferred index {} is outside {}..={}",
            index, MIN_INDEX, MAX_INDEX
        )));
    }
    Ok(index)
}

/// The two tunnel endpoints that share a host index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairedEndpoints {
    /// Host in the address's own /24.
    pub current: Ipv4Addr,
    /// Same host in the next /24.
    pub next: Ipv4Addr,
}

pub fn paired_endpoints(addr: Ipv4Addr, host: u8) -> Result<PairedEndpoints, GenError> {
    let base = u32::from(addr);
    let next_block = base
        .checked_add(BLOCK_SIZE)
        .ok_or_else(|| GenError::OutOfRange(format!("{} has no next /24 block", addr)))?;

    Ok(PairedEndpoints {
        current: Ipv4Addr::from((base & BLOCK_MASK) | u32::from(host)),
        next: Ipv4Addr::from((next_block & BLOCK_MASK) | u32::from(host)),
    })
}

/// Paired endpoints whose host is the index inferred from `addr` itself.
pub fn paired_endpoints_by_index(addr: Ipv4Addr) -> Result<(u8, PairedEndpoints), GenError> {
    let index = infer_sequence_index(addr)?;
    Ok((index, paired_endpoints(addr, index)?))
}

pub fn paired_endpoints_fixed_host1(addr: Ipv4Addr) -> Result<PairedEndpoints, GenError> {
    paired_endpoints(addr, 1)
}
