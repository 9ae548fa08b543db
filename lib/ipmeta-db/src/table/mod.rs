/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ipmeta contributors
 */

use std::collections::HashMap;
use std::io::{self, Read};
use std::net::{IpAddr, Ipv4Addr};

use anyhow::{Context, anyhow};
use chrono::NaiveDate;
use ip_network_table::IpNetworkTable;
use log::warn;

use ipmeta_types::{AsOrgInfo, IpMetadata};

use crate::file;
use crate::{MissingAsnError, SnapshotConfig, SnapshotSource};

/// An immutable lookup table joining announced netblocks with AS
/// organization and type reference data for one snapshot date.
///
/// Built once per run via [`load`](Self::load); after that all state is
/// read-only and [`lookup`](Self::lookup) may be called from any number of
/// threads.
pub struct IpMetadataTable {
    as_org: HashMap<u32, AsOrgInfo>,
    as_type: HashMap<u32, String>,
    prefix_index: IpNetworkTable<u32>,
    date: NaiveDate,
}

impl IpMetadataTable {
    /// Build a table for `date` by reading all reference snapshots from
    /// `source`.
    ///
    /// The organization and type files come from the fixed paths in
    /// `config` regardless of `date`; only the routeview file is
    /// date-selected. When the requested day's routeview file is absent
    /// and `allow_previous_day` is set, the previous day's file is used
    /// instead and becomes the table's effective date. This helps when
    /// processing very recent data where the newest file may not exist yet.
    pub fn load<S>(
        source: &S,
        config: &SnapshotConfig,
        date: NaiveDate,
        allow_previous_day: bool,
    ) -> anyhow::Result<Self>
    where
        S: SnapshotSource + ?Sized,
    {
        let stream = open_reference(source, config.org_file())?;
        let org_country = file::parse_org_country_map(stream)
            .context(format!("malformed organizations file {}", config.org_file()))?;

        // the aut table lives in the same file, scanned a second time
        let stream = open_reference(source, config.org_file())?;
        let as_org = file::parse_as_to_org_map(stream, &org_country)
            .context(format!("malformed organizations file {}", config.org_file()))?;

        let stream = open_reference(source, config.type_file())?;
        let as_type = file::parse_as_to_type_map(stream)
            .context(format!("malformed classifications file {}", config.type_file()))?;

        let (prefix_index, date) = load_prefix_index(source, config, date, allow_previous_day)?;

        Ok(IpMetadataTable {
            as_org,
            as_type,
            prefix_index,
            date,
        })
    }

    /// The snapshot date the prefix index was actually built from. Differs
    /// from the requested date by one day when the previous-day fallback
    /// was taken.
    pub fn effective_date(&self) -> NaiveDate {
        self.date
    }

    /// Resolve `ip` to its announced netblock, ASN, and organization
    /// metadata.
    ///
    /// Fails only when no announced prefix covers `ip`. Missing entries in
    /// the organization or type reference maps are logged and degrade to
    /// absent fields.
    pub fn lookup(&self, ip: Ipv4Addr) -> Result<IpMetadata<'_>, MissingAsnError> {
        let Some((netblock, asn)) = self.prefix_index.longest_match(IpAddr::V4(ip)) else {
            return Err(MissingAsnError {
                ip,
                date: self.date,
            });
        };
        let asn = *asn;

        let org = self.as_org.get(&asn);
        if org.is_none() {
            warn!("missing as{asn} in org name map");
        }
        let as_type = self.as_type.get(&asn);
        if as_type.is_none() {
            warn!("missing as{asn} in type map");
        }

        Ok(IpMetadata {
            netblock,
            asn,
            as_name: org.map(|o| o.asn_name()),
            as_full_name: org.and_then(|o| o.org_name()),
            as_type: as_type.map(String::as_str),
            country: org.and_then(|o| o.country()),
        })
    }
}

fn open_reference<S>(source: &S, path: &str) -> anyhow::Result<Box<dyn Read>>
where
    S: SnapshotSource + ?Sized,
{
    source
        .open(path)
        .map_err(|e| anyhow!("failed to open reference file {path}: {e}"))
}

fn load_prefix_index<S>(
    source: &S,
    config: &SnapshotConfig,
    date: NaiveDate,
    allow_previous_day: bool,
) -> anyhow::Result<(IpNetworkTable<u32>, NaiveDate)>
where
    S: SnapshotSource + ?Sized,
{
    match open_routeview(source, config, date) {
        Ok(stream) => {
            let index = file::parse_routeview(stream)
                .context(format!("malformed routeview file for {date}"))?;
            Ok((index, date))
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound && allow_previous_day => {
            let prev = date
                .pred_opt()
                .ok_or_else(|| anyhow!("no day before {date}"))?;
            let stream = open_routeview(source, config, prev)
                .map_err(|e2| anyhow!("routeview snapshot not found: {e}, retried: {e2}"))?;
            let index = file::parse_routeview(stream)
                .context(format!("malformed routeview file for {prev}"))?;
            Ok((index, prev))
        }
        Err(e) => Err(anyhow!("failed to load routeview snapshot: {e}")),
    }
}

fn open_routeview<S>(
    source: &S,
    config: &SnapshotConfig,
    date: NaiveDate,
) -> io::Result<Box<dyn Read>>
where
    S: SnapshotSource + ?Sized,
{
    let pattern = config.routeview_pattern(date);
    let matched = match source.glob(&pattern) {
        Ok(matched) => matched,
        // a missing routeview directory is the same as no matching file
        Err(e) if e.kind() == io::ErrorKind::NotFound => Vec::new(),
        Err(e) => return Err(e),
    };
    match matched.as_slice() {
        [] => Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("no file matches {pattern}"),
        )),
        [path] => source.open(path),
        _ => Err(io::Error::other(format!(
            "{} files match {pattern}, expected exactly one",
            matched.len()
        ))),
    }
}
