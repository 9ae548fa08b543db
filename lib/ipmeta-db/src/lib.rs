/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ipmeta contributors
 */

mod config;
pub use config::SnapshotConfig;

mod error;
pub use error::MissingAsnError;

pub mod file;

mod source;
pub use source::{DirSource, SnapshotSource};

mod table;
pub use table::IpMetadataTable;

#[cfg(test)]
mod test_log;
