/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ipmeta contributors
 */

use std::net::Ipv4Addr;

use chrono::NaiveDate;
use thiserror::Error;

/// The queried IP is not covered by any announced prefix in the routeview
/// snapshot the table was built from.
///
/// Raised per lookup call; the table itself stays valid and the caller may
/// skip the offending record and continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no announced prefix covers {ip} in routeview snapshot for {date}")]
pub struct MissingAsnError {
    pub ip: Ipv4Addr,
    pub date: NaiveDate,
}
