/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ipmeta contributors
 */

use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::PathBuf;

use flate2::bufread::GzDecoder;

/// Access to a snapshot mirror, local or remote.
///
/// Paths are relative to the source root and use `/` separators. The table
/// builder only needs these two operations; object-storage backends plug in
/// here.
pub trait SnapshotSource {
    /// Open `path` as a decompressed byte stream.
    ///
    /// Returns an error of kind [`io::ErrorKind::NotFound`] when the path
    /// does not resolve.
    fn open(&self, path: &str) -> io::Result<Box<dyn Read>>;

    /// Return the paths matching `pattern`, which contains at most one `*`
    /// wildcard in its final path component.
    fn glob(&self, pattern: &str) -> io::Result<Vec<String>>;
}

/// A snapshot mirror in a local directory tree.
///
/// Files with a `.gz` extension are decompressed transparently.
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirSource { root: root.into() }
    }
}

impl SnapshotSource for DirSource {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read>> {
        let full = self.root.join(path);
        let f = File::open(&full)?;
        match full.extension().and_then(|ext| ext.to_str()) {
            Some("gz") => Ok(Box::new(GzDecoder::new(BufReader::new(f)))),
            _ => Ok(Box::new(f)),
        }
    }

    fn glob(&self, pattern: &str) -> io::Result<Vec<String>> {
        let (dir, file_pattern) = match pattern.rsplit_once('/') {
            Some((dir, file)) => (dir, file),
            None => ("", pattern),
        };
        let Some((prefix, suffix)) = file_pattern.split_once('*') else {
            // no wildcard, degenerate exact match
            let full = self.root.join(pattern);
            return if full.is_file() {
                Ok(vec![pattern.to_string()])
            } else {
                Ok(Vec::new())
            };
        };
        if suffix.contains('*') {
            return Err(io::Error::other(format!(
                "multiple wildcards in pattern {pattern}"
            )));
        }

        let dir_path = if dir.is_empty() {
            self.root.clone()
        } else {
            self.root.join(dir)
        };
        let mut matched = Vec::new();
        for entry in std::fs::read_dir(&dir_path)? {
            let entry = entry?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.len() >= prefix.len() + suffix.len()
                && name.starts_with(prefix)
                && name.ends_with(suffix)
            {
                if dir.is_empty() {
                    matched.push(name.to_string());
                } else {
                    matched.push(format!("{dir}/{name}"));
                }
            }
        }
        matched.sort();
        Ok(matched)
    }
}
