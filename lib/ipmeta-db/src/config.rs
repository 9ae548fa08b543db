/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ipmeta contributors
 */

use chrono::NaiveDate;

const DEFAULT_ORG_FILE: &str = "as-organizations/20200701.as-org2info.txt.gz";
const DEFAULT_TYPE_FILE: &str = "as-classifications/20200801.as2types.txt.gz";
const DEFAULT_ROUTEVIEW_DIR: &str = "routeviews";

/// Locations of the reference snapshots, relative to a [`SnapshotSource`]
/// root.
///
/// The organization and type files are pinned snapshots and do not follow
/// the date passed to [`IpMetadataTable::load`]; only the routeview file is
/// selected by date.
///
/// [`SnapshotSource`]: crate::SnapshotSource
/// [`IpMetadataTable::load`]: crate::IpMetadataTable::load
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SnapshotConfig {
    org_file: String,
    type_file: String,
    routeview_dir: String,
}

impl Default for SnapshotConfig {
    fn default() -> Self {
        SnapshotConfig {
            org_file: DEFAULT_ORG_FILE.to_string(),
            type_file: DEFAULT_TYPE_FILE.to_string(),
            routeview_dir: DEFAULT_ROUTEVIEW_DIR.to_string(),
        }
    }
}

impl SnapshotConfig {
    pub fn set_org_file(&mut self, path: String) {
        self.org_file = path;
    }

    pub fn set_type_file(&mut self, path: String) {
        self.type_file = path;
    }

    pub fn set_routeview_dir(&mut self, dir: String) {
        self.routeview_dir = dir;
    }

    pub fn org_file(&self) -> &str {
        &self.org_file
    }

    pub fn type_file(&self) -> &str {
        &self.type_file
    }

    pub fn routeview_dir(&self) -> &str {
        &self.routeview_dir
    }

    pub(crate) fn routeview_pattern(&self, date: NaiveDate) -> String {
        format!(
            "{}/routeviews-rv2-{}*.pfx2as.gz",
            self.routeview_dir,
            date.format("%Y%m%d")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routeview_pattern() {
        let config = SnapshotConfig::default();
        let date = NaiveDate::from_ymd_opt(2020, 8, 1).unwrap();
        assert_eq!(
            config.routeview_pattern(date),
            "routeviews/routeviews-rv2-20200801*.pfx2as.gz"
        );
    }
}
