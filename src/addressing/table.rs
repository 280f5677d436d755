use serde::Serialize;
use std::net::Ipv4Addr;

use super::infer_sequence_index;

/// One row of the address-allocation table: the site's /32, its /30 transit
/// block and its ASN.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IpTableRow {
    pub p32: String,
    pub bloco30: String,
    pub asn: String,
    /// Site index the /32 maps to, when it is on the numbering grid.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub index: Option<u8>,
}

/// Parse the allocation table. Blank lines, the `P /32 ...` header and rows
/// that do not have exactly three columns are skipped.
pub fn parse_ip_table(text: &str) -> Vec<IpTableRow> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !line.to_lowercase().starts_with("p /32"))
        .filter_map(|line| {
            let cols: Vec<&str> = line.split_whitespace().collect();
            let [p32, bloco30, asn] = cols.as_slice() else {
                return None;
            };
            let index = p32
                .split('/')
                .next()
                .and_then(|ip| ip.parse::<Ipv4Addr>().ok())
                .and_then(|ip| infer_sequence_index(ip).ok());
            Some(IpTableRow {
                p32: p32.to_string(),
                bloco30: bloco30.to_string(),
                asn: asn.to_string(),
                index,
            })
        })
        .collect()
}
