//! Derivation steps that read one field of a [`FieldMap`] and write the
//! addresses computed from it back into the map.
//!
//! Steps that return `()` are best-effort: if the input cannot be used they log
//! a warning and write nothing. Steps that return `Result` abort the build.

use std::net::Ipv4Addr;

use crate::addressing::{self, AddressRecord};
use crate::error::GenError;
use crate::models::FieldMap;

/// Fallbacks for the prefix of an address given without `/prefix`.
#[derive(Debug, Clone, Copy, Default)]
pub struct MaskFallback<'a> {
    /// Field holding a dotted mask (`255.255.255.0`) or a bare prefix length.
    pub dotted_field: Option<&'a str>,
    /// Prefix used when nothing else is available.
    pub default_prefix: Option<u8>,
}

/// Output field names of one normalisation step.
#[derive(Debug, Clone, Copy)]
pub struct MaskTargets<'a> {
    pub mask_field: &'a str,
    pub barred_field: &'a str,
}

/// Split `a.b.c.d/p` into the bare address text and the suffix after `/`.
fn split_suffix(raw: &str) -> (&str, Option<&str>) {
    match raw.split_once('/') {
        Some((ip, suffix)) => (ip.trim(), Some(suffix.trim()).filter(|s| !s.is_empty())),
        None => (raw.trim(), None),
    }
}

/// Normalise `source` into a usable address, dotted mask and `ip/prefix`.
///
/// The prefix comes from `source` itself, then from `fallback`. Without any
/// prefix only the bare address is rewritten and a warning is logged.
pub fn normalize_with_mask(
    fields: &mut FieldMap,
    source: &str,
    targets: MaskTargets<'_>,
    fallback: MaskFallback<'_>,
    keep_host: bool,
) {
    let Some(raw) = fields.present(source).map(str::to_owned) else {
        return;
    };
    let Some(record) = AddressRecord::parse(&raw) else {
        tracing::warn!("Invalid IP in {}: {:?}", source, raw);
        return;
    };

    let prefix = record
        .prefix
        .or_else(|| {
            fallback
                .dotted_field
                .and_then(|f| fields.present(f))
                .and_then(addressing::parse_prefix)
        })
        .or(fallback.default_prefix);

    match prefix {
        Some(prefix) => {
            let derived = addressing::network_and_mask(record.addr, prefix, keep_host);
            fields.set_derived(source, derived.ip.to_string());
            fields.set_derived(targets.mask_field, derived.netmask.to_string());
            fields.set_derived(targets.barred_field, derived.barred());
        }
        None => {
            fields.set_derived(source, record.addr.to_string());
            tracing::warn!(
                "No mask available for {}; {} and {} not derived",
                source,
                targets.mask_field,
                targets.barred_field
            );
        }
    }
}

/// Write `<prefix>_P1`, `<prefix>_P2` and `<prefix>_M1` for the address in
/// `source`. With `keep_suffix` a `/prefix` on the source is re-attached.
pub fn derive_neighbors(fields: &mut FieldMap, source: &str, out_prefix: &str, keep_suffix: bool) {
    let Some(raw) = fields.present(source).map(str::to_owned) else {
        return;
    };
    let (ip, suffix) = split_suffix(&raw);
    let suffix = match suffix {
        Some(s) if keep_suffix => format!("/{}", s),
        _ => String::new(),
    };

    let Ok(base) = ip.parse::<Ipv4Addr>() else {
        tracing::warn!("Invalid IP for neighbour derivation in {}: {:?}", source, raw);
        return;
    };
    let n = addressing::neighbors(base);
    for (tag, neighbor) in [("P1", n.p1), ("P2", n.p2), ("M1", n.m1)] {
        let key = format!("{}_{}", out_prefix, tag);
        match neighbor {
            Some(addr) => fields.set_derived(key, format!("{}{}", addr, suffix)),
            None => tracing::warn!("{} of {} in {} leaves IPv4 space; {} not derived", tag, base, source, key),
        }
    }
}

fn bare_address(fields: &FieldMap, source: &str) -> Result<Option<Ipv4Addr>, GenError> {
    let Some(raw) = fields.present(source) else {
        return Ok(None);
    };
    let (ip, _) = split_suffix(raw);
    ip.parse::<Ipv4Addr>()
        .map(Some)
        .map_err(|_| GenError::invalid_address(source, raw))
}

/// Tunnel endpoints whose host is the site index inferred from `source`:
/// `<prefix>_GARY` (same /24), `<prefix>_PLANKTON` (next /24) and the index
/// itself as `<prefix>_N`.
pub fn derive_paired_by_index(fields: &mut FieldMap, source: &str, out_prefix: &str) -> Result<(), GenError> {
    let Some(addr) = bare_address(fields, source)? else {
        return Ok(());
    };

    let (index, pair) = addressing::paired_endpoints_by_index(addr).map_err(|e| {
        tracing::warn!("Paired endpoint derivation from {} failed: {}", source, e);
        e
    })?;

    fields.set_derived(format!("{}_GARY", out_prefix), pair.current.to_string());
    fields.set_derived(format!("{}_PLANKTON", out_prefix), pair.next.to_string());
    fields.set_derived(format!("{}_N", out_prefix), index.to_string());
    Ok(())
}

/// Tunnel endpoints with host `.1`: `<prefix>_GARY_FINAL1` and
/// `<prefix>_PLANKTON_FINAL1`.
pub fn derive_paired_fixed_host1(fields: &mut FieldMap, source: &str, out_prefix: &str) -> Result<(), GenError> {
    let Some(addr) = bare_address(fields, source)? else {
        return Ok(());
    };

    let pair = addressing::paired_endpoints_fixed_host1(addr).map_err(|e| {
        tracing::warn!("Fixed-host endpoint derivation from {} failed: {}", source, e);
        e
    })?;

    fields.set_derived(format!("{}_GARY_FINAL1", out_prefix), pair.current.to_string());
    fields.set_derived(format!("{}_PLANKTON_FINAL1", out_prefix), pair.next.to_string());
    Ok(())
}
