/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ipmeta contributors
 */

use ip_network::IpNetwork;

/// Network ownership metadata for a single IP, borrowed from the lookup
/// table that resolved it.
///
/// Only `netblock` and `asn` are guaranteed. The other fields degrade to
/// `None` when the announcing AS is missing from a reference table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IpMetadata<'a> {
    pub netblock: IpNetwork,
    pub asn: u32,
    pub as_name: Option<&'a str>,
    pub as_full_name: Option<&'a str>,
    pub as_type: Option<&'a str>,
    pub country: Option<&'a str>,
}
