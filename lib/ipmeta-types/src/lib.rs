/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ipmeta contributors
 */

mod org;
pub use org::{AsOrgInfo, OrgInfo};

mod metadata;
pub use metadata::IpMetadata;
