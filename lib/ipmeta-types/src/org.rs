/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ipmeta contributors
 */

/// Organization info as registered with an RIR, keyed by org id in the
/// org-to-country reference table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrgInfo {
    pub name: String,
    pub country: String,
}

/// Organization info joined onto an AS number.
///
/// The readable name and country come from a cross-reference into the
/// org-to-country table and are absent when that org id is unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsOrgInfo {
    asn_name: String,
    org_name: Option<String>,
    country: Option<String>,
}

impl AsOrgInfo {
    pub fn new(asn_name: String, org_name: Option<String>, country: Option<String>) -> Self {
        AsOrgInfo {
            asn_name,
            org_name,
            country,
        }
    }

    pub fn asn_name(&self) -> &str {
        &self.asn_name
    }

    pub fn org_name(&self) -> Option<&str> {
        self.org_name.as_deref()
    }

    pub fn country(&self) -> Option<&str> {
        self.country.as_deref()
    }
}
