/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ipmeta contributors
 */

use std::collections::HashMap;
use std::io::{self, BufRead, BufReader};
use std::net::Ipv4Addr;
use std::str::FromStr;

use anyhow::anyhow;
use ip_network::Ipv4Network;
use ip_network_table::IpNetworkTable;
use log::warn;

use ipmeta_types::{AsOrgInfo, OrgInfo};

/// The as-org2info file holds two pipe-delimited tables, each introduced by
/// one of these literal header lines.
const ORG_TO_COUNTRY_HEADER: &str = "# format:org_id|changed|org_name|country|source";
const AS_TO_ORG_HEADER: &str = "# format:aut|changed|aut_name|org_id|opaque_id|source";

#[derive(Clone, Copy, PartialEq, Eq)]
enum OrgFileSection {
    Preamble,
    OrgToCountry,
    AsToOrg,
}

/// Parse the org-to-country table of an as-org2info file.
///
/// Returns a map from org id to its registered name and country code.
/// Either table header missing from the stream is a hard error.
pub fn parse_org_country_map<R: io::Read>(stream: R) -> anyhow::Result<HashMap<String, OrgInfo>> {
    let mut map = HashMap::new();
    let mut section = OrgFileSection::Preamble;
    let mut seen_org_header = false;
    let mut seen_as_header = false;

    let reader = BufReader::new(stream);
    for (i, line) in reader.split(b'\n').enumerate() {
        let line = line.map_err(|e| anyhow!("failed to read line #{i}: {e}"))?;
        let line = std::str::from_utf8(&line).map_err(|e| anyhow!("invalid line #{i}: {e}"))?;

        match line {
            ORG_TO_COUNTRY_HEADER => {
                seen_org_header = true;
                // a late header A must not reopen the org table
                if section == OrgFileSection::Preamble {
                    section = OrgFileSection::OrgToCountry;
                }
                continue;
            }
            AS_TO_ORG_HEADER => {
                section = OrgFileSection::AsToOrg;
                seen_as_header = true;
                continue;
            }
            _ => {}
        }
        if section != OrgFileSection::OrgToCountry || line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('|').collect();
        let &[org_id, _changed, org_name, country, _source] = fields.as_slice() else {
            return Err(anyhow!(
                "invalid org line #{i}: expected 5 fields, got {}",
                fields.len()
            ));
        };
        map.insert(
            org_id.to_string(),
            OrgInfo {
                name: org_name.to_string(),
                country: country.to_string(),
            },
        );
    }

    if !seen_org_header {
        return Err(anyhow!("no {ORG_TO_COUNTRY_HEADER:?} header line found"));
    }
    if !seen_as_header {
        return Err(anyhow!("no {AS_TO_ORG_HEADER:?} header line found"));
    }
    Ok(map)
}

/// Parse the aut-to-org table of an as-org2info file, joining each row's
/// org id against `org_country_map`.
///
/// An org id missing from the join is logged and yields an entry with
/// absent name and country. A non-numeric ASN column is a hard error.
pub fn parse_as_to_org_map<R: io::Read>(
    stream: R,
    org_country_map: &HashMap<String, OrgInfo>,
) -> anyhow::Result<HashMap<u32, AsOrgInfo>> {
    let mut map = HashMap::new();
    let mut section = OrgFileSection::Preamble;

    let reader = BufReader::new(stream);
    for (i, line) in reader.split(b'\n').enumerate() {
        let line = line.map_err(|e| anyhow!("failed to read line #{i}: {e}"))?;
        let line = std::str::from_utf8(&line).map_err(|e| anyhow!("invalid line #{i}: {e}"))?;

        if line == AS_TO_ORG_HEADER {
            section = OrgFileSection::AsToOrg;
            continue;
        }
        if section != OrgFileSection::AsToOrg || line.is_empty() {
            continue;
        }

        let fields: Vec<&str> = line.split('|').collect();
        let &[asn, _changed, asn_name, org_id, _opaque_id, _source] = fields.as_slice() else {
            return Err(anyhow!(
                "invalid aut line #{i}: expected 6 fields, got {}",
                fields.len()
            ));
        };
        let asn = u32::from_str(asn).map_err(|e| anyhow!("invalid as number in line #{i}: {e}"))?;

        let info = match org_country_map.get(org_id) {
            Some(org) => AsOrgInfo::new(
                asn_name.to_string(),
                Some(org.name.clone()),
                Some(org.country.clone()),
            ),
            None => {
                warn!("missing org country info for as{asn} org {org_id}");
                AsOrgInfo::new(asn_name.to_string(), None, None)
            }
        };
        map.insert(asn, info);
    }

    if section != OrgFileSection::AsToOrg {
        return Err(anyhow!("no {AS_TO_ORG_HEADER:?} header line found"));
    }
    Ok(map)
}

/// Parse an as2types file into a map from ASN to network type label.
///
/// Lines starting with `#` are comments. Data lines are strictly
/// `asn|source|type`.
pub fn parse_as_to_type_map<R: io::Read>(stream: R) -> anyhow::Result<HashMap<u32, String>> {
    let mut map = HashMap::new();

    let reader = BufReader::new(stream);
    for (i, line) in reader.split(b'\n').enumerate() {
        let line = line.map_err(|e| anyhow!("failed to read line #{i}: {e}"))?;

        if line.is_empty() {
            continue;
        }
        if line[0] == b'#' {
            continue;
        }
        let line = std::str::from_utf8(&line).map_err(|e| anyhow!("invalid line #{i}: {e}"))?;

        let fields: Vec<&str> = line.split('|').collect();
        let &[asn, _source, net_type] = fields.as_slice() else {
            return Err(anyhow!(
                "invalid type line #{i}: expected 3 fields, got {}",
                fields.len()
            ));
        };
        let asn = u32::from_str(asn).map_err(|e| anyhow!("invalid as number in line #{i}: {e}"))?;
        map.insert(asn, net_type.to_string());
    }

    Ok(map)
}

/// Parse a routeview pfx2as file into a longest-prefix-match table from
/// announced IPv4 network to announcing ASN.
///
/// Lines are tab-delimited `network prefix-length asn`. Any malformed line
/// aborts the build; entries are never silently dropped.
pub fn parse_routeview<R: io::Read>(stream: R) -> anyhow::Result<IpNetworkTable<u32>> {
    let mut table = IpNetworkTable::new();

    let reader = BufReader::new(stream);
    for (i, line) in reader.split(b'\n').enumerate() {
        let line = line.map_err(|e| anyhow!("failed to read line #{i}: {e}"))?;

        if line.is_empty() {
            continue;
        }
        let line = std::str::from_utf8(&line).map_err(|e| anyhow!("invalid line #{i}: {e}"))?;

        let fields: Vec<&str> = line.split('\t').collect();
        let &[addr, prefix_len, asn] = fields.as_slice() else {
            return Err(anyhow!(
                "invalid routeview line #{i}: expected 3 fields, got {}",
                fields.len()
            ));
        };

        let addr = Ipv4Addr::from_str(addr)
            .map_err(|e| anyhow!("invalid network address in line #{i}: {e}"))?;
        let mask =
            u8::from_str(prefix_len).map_err(|e| anyhow!("invalid network mask in line #{i}: {e}"))?;
        let network = Ipv4Network::new(addr, mask)
            .map_err(|e| anyhow!("invalid network in line #{i}: {e}"))?;
        let asn = u32::from_str(asn).map_err(|_| anyhow!("invalid as number {asn} in line #{i}"))?;

        table.insert(network, asn);
    }

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::IpAddr;

    const ORG_FILE: &str = "\
# CAIDA AS Organizations
# notes: test fixture
# format:org_id|changed|org_name|country|source
LVLT-ARIN|20120130|Level 3 Communications, Inc.|US|ARIN
8X8INC-ARIN|20110428|8x8, Inc.|US|ARIN
# format:aut|changed|aut_name|org_id|opaque_id|source
1|20120224|LVLT-1|LVLT-ARIN|e5e3b9c13678dfc483fb1f819d70883c_ARIN|ARIN
715|20180129|8X8INC|8X8INC-ARIN|6e2ffb8d130f0ce3d59b2b12a4e4e8f2_ARIN|ARIN
";

    #[test]
    fn org_country_basic() {
        let map = parse_org_country_map(ORG_FILE.as_bytes()).unwrap();
        assert_eq!(map.len(), 2);
        let org = map.get("8X8INC-ARIN").unwrap();
        assert_eq!(org.name, "8x8, Inc.");
        assert_eq!(org.country, "US");
    }

    #[test]
    fn org_country_idempotent() {
        let a = parse_org_country_map(ORG_FILE.as_bytes()).unwrap();
        let b = parse_org_country_map(ORG_FILE.as_bytes()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn org_country_duplicate_last_wins() {
        let text = "\
# format:org_id|changed|org_name|country|source
DUP-ORG|20120130|First Name|US|ARIN
DUP-ORG|20150130|Second Name|DE|RIPE
# format:aut|changed|aut_name|org_id|opaque_id|source
";
        let map = parse_org_country_map(text.as_bytes()).unwrap();
        assert_eq!(map.len(), 1);
        let org = map.get("DUP-ORG").unwrap();
        assert_eq!(org.name, "Second Name");
        assert_eq!(org.country, "DE");
    }

    #[test]
    fn org_country_missing_headers() {
        assert!(parse_org_country_map("A|B|C|D|E\n".as_bytes()).is_err());

        // header B alone is still malformed
        let text = "# format:aut|changed|aut_name|org_id|opaque_id|source\n";
        assert!(parse_org_country_map(text.as_bytes()).is_err());

        // header A alone is still malformed
        let text = "# format:org_id|changed|org_name|country|source\n";
        assert!(parse_org_country_map(text.as_bytes()).is_err());
    }

    #[test]
    fn org_country_headers_out_of_order() {
        // both headers present but reversed: no org rows, and the aut
        // rows must not be parsed as 5-column org rows
        let text = "\
# format:aut|changed|aut_name|org_id|opaque_id|source
1|20120224|LVLT-1|LVLT-ARIN|opaque|ARIN
# format:org_id|changed|org_name|country|source
715|20180129|8X8INC|8X8INC-ARIN|opaque|ARIN
";
        let map = parse_org_country_map(text.as_bytes()).unwrap();
        assert!(map.is_empty());
    }

    #[test]
    fn org_country_bad_field_count() {
        let text = "\
# format:org_id|changed|org_name|country|source
ONLY|TWO
# format:aut|changed|aut_name|org_id|opaque_id|source
";
        assert!(parse_org_country_map(text.as_bytes()).is_err());
    }

    #[test]
    fn as_to_org_joined() {
        let orgs = parse_org_country_map(ORG_FILE.as_bytes()).unwrap();
        let map = parse_as_to_org_map(ORG_FILE.as_bytes(), &orgs).unwrap();
        assert_eq!(map.len(), 2);

        let info = map.get(&1).unwrap();
        assert_eq!(info.asn_name(), "LVLT-1");
        assert_eq!(info.org_name(), Some("Level 3 Communications, Inc."));
        assert_eq!(info.country(), Some("US"));
    }

    #[test]
    fn as_to_org_missing_org() {
        let text = "\
# format:org_id|changed|org_name|country|source
# format:aut|changed|aut_name|org_id|opaque_id|source
64512|20120224|TEST-AS|NO-SUCH-ORG|opaque|ARIN
";
        let orgs = HashMap::new();
        let mut map = HashMap::new();
        let warnings = crate::test_log::capture_warnings(|| {
            map = parse_as_to_org_map(text.as_bytes(), &orgs).unwrap();
        });
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("NO-SUCH-ORG"));

        let info = map.get(&64512).unwrap();
        assert_eq!(info.asn_name(), "TEST-AS");
        assert_eq!(info.org_name(), None);
        assert_eq!(info.country(), None);
    }

    #[test]
    fn as_to_org_bad_asn() {
        let text = "\
# format:aut|changed|aut_name|org_id|opaque_id|source
not-a-number|20120224|TEST-AS|SOME-ORG|opaque|ARIN
";
        assert!(parse_as_to_org_map(text.as_bytes(), &HashMap::new()).is_err());
    }

    #[test]
    fn as_to_org_missing_header() {
        let text = "1|20120224|LVLT-1|LVLT-ARIN|opaque|ARIN\n";
        assert!(parse_as_to_org_map(text.as_bytes(), &HashMap::new()).is_err());
    }

    #[test]
    fn as_to_type_basic() {
        let text = "\
# format: as|source|type
1|CAIDA_class|Transit/Access
13335|CAIDA_class|Content
398243|CAIDA_class|Enterprise
";
        let map = parse_as_to_type_map(text.as_bytes()).unwrap();
        assert_eq!(map.len(), 3);
        assert_eq!(map.get(&13335).map(String::as_str), Some("Content"));
        assert_eq!(map.get(&1).map(String::as_str), Some("Transit/Access"));
    }

    #[test]
    fn as_to_type_bad_field_count() {
        let text = "13335|Content\n";
        assert!(parse_as_to_type_map(text.as_bytes()).is_err());
    }

    #[test]
    fn routeview_lookup() {
        let text = "1.0.0.0\t24\t13335\n8.8.8.0\t24\t15169\n";
        let table = parse_routeview(text.as_bytes()).unwrap();

        let ip: IpAddr = "1.1.1.1".parse().unwrap();
        assert!(table.longest_match(ip).is_none());

        let ip: IpAddr = "1.0.0.1".parse().unwrap();
        let (network, asn) = table.longest_match(ip).unwrap();
        assert_eq!(network.to_string(), "1.0.0.0/24");
        assert_eq!(*asn, 13335);

        let ip: IpAddr = "8.8.8.8".parse().unwrap();
        let (network, asn) = table.longest_match(ip).unwrap();
        assert_eq!(network.to_string(), "8.8.8.0/24");
        assert_eq!(*asn, 15169);
    }

    #[test]
    fn routeview_most_specific_wins() {
        let text = "10.0.0.0\t8\t64512\n10.1.0.0\t16\t64513\n";
        let table = parse_routeview(text.as_bytes()).unwrap();

        let ip: IpAddr = "10.1.2.3".parse().unwrap();
        let (network, asn) = table.longest_match(ip).unwrap();
        assert_eq!(network.to_string(), "10.1.0.0/16");
        assert_eq!(*asn, 64513);

        let ip: IpAddr = "10.2.0.1".parse().unwrap();
        let (network, asn) = table.longest_match(ip).unwrap();
        assert_eq!(network.to_string(), "10.0.0.0/8");
        assert_eq!(*asn, 64512);
    }

    #[test]
    fn routeview_malformed_line() {
        assert!(parse_routeview("1.0.0.0\t24\n".as_bytes()).is_err());
        assert!(parse_routeview("1.0.0.0 24 13335\n".as_bytes()).is_err());
        assert!(parse_routeview("bogus\t24\t13335\n".as_bytes()).is_err());
    }

    #[test]
    fn blank_trailing_lines_ignored() {
        let text = "1.0.0.0\t24\t13335\n\n\n";
        let table = parse_routeview(text.as_bytes()).unwrap();
        let ip: IpAddr = "1.0.0.1".parse().unwrap();
        assert!(table.longest_match(ip).is_some());
    }
}
