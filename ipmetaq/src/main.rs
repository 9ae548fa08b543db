/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2026 ipmeta contributors
 */

use std::net::Ipv4Addr;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::anyhow;
use chrono::NaiveDate;
use clap::{Arg, ArgAction, Command, ValueHint, value_parser};

use ipmeta_db::{DirSource, IpMetadataTable, SnapshotConfig};
use ipmeta_types::IpMetadata;

const ARG_DIR: &str = "dir";
const ARG_DATE: &str = "date";
const ARG_ALLOW_PREVIOUS_DAY: &str = "allow-previous-day";
const ARG_ORG_FILE: &str = "org-file";
const ARG_TYPE_FILE: &str = "type-file";
const ARG_ROUTEVIEW_DIR: &str = "routeview-dir";
const ARG_IP: &str = "ip";

fn build_cli_args() -> Command {
    Command::new("ipmetaq")
        .about("query network ownership metadata for IPs")
        .arg(
            Arg::new(ARG_DIR)
                .help("Root directory of the local snapshot mirror")
                .long(ARG_DIR)
                .short('d')
                .required(true)
                .num_args(1)
                .value_parser(value_parser!(PathBuf))
                .value_hint(ValueHint::DirPath),
        )
        .arg(
            Arg::new(ARG_DATE)
                .help("Routeview snapshot date (YYYYMMDD)")
                .long(ARG_DATE)
                .required(true)
                .num_args(1),
        )
        .arg(
            Arg::new(ARG_ALLOW_PREVIOUS_DAY)
                .help("Use the previous day's routeview file if the requested one is absent")
                .long(ARG_ALLOW_PREVIOUS_DAY)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new(ARG_ORG_FILE)
                .help("Override the as-organizations file path")
                .long(ARG_ORG_FILE)
                .num_args(1),
        )
        .arg(
            Arg::new(ARG_TYPE_FILE)
                .help("Override the as-classifications file path")
                .long(ARG_TYPE_FILE)
                .num_args(1),
        )
        .arg(
            Arg::new(ARG_ROUTEVIEW_DIR)
                .help("Override the routeviews directory")
                .long(ARG_ROUTEVIEW_DIR)
                .num_args(1),
        )
        .arg(
            Arg::new(ARG_IP)
                .help("IPv4 addresses to look up")
                .required(true)
                .num_args(1..)
                .value_parser(value_parser!(Ipv4Addr)),
        )
}

fn format_field(v: Option<&str>) -> &str {
    v.unwrap_or("-")
}

fn print_metadata(ip: Ipv4Addr, meta: &IpMetadata<'_>) {
    println!(
        "{ip}\t{}\t{}\t{}\t{}\t{}\t{}",
        meta.netblock,
        meta.asn,
        format_field(meta.as_name),
        format_field(meta.as_full_name),
        format_field(meta.as_type),
        format_field(meta.country),
    );
}

fn main() -> anyhow::Result<ExitCode> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = build_cli_args().get_matches();

    let dir = args
        .get_one::<PathBuf>(ARG_DIR)
        .ok_or_else(|| anyhow!("no mirror directory set"))?;
    let date = args
        .get_one::<String>(ARG_DATE)
        .ok_or_else(|| anyhow!("no snapshot date set"))?;
    let date = NaiveDate::parse_from_str(date, "%Y%m%d")
        .map_err(|e| anyhow!("invalid snapshot date {date}: {e}"))?;

    let mut config = SnapshotConfig::default();
    if let Some(path) = args.get_one::<String>(ARG_ORG_FILE) {
        config.set_org_file(path.clone());
    }
    if let Some(path) = args.get_one::<String>(ARG_TYPE_FILE) {
        config.set_type_file(path.clone());
    }
    if let Some(dir) = args.get_one::<String>(ARG_ROUTEVIEW_DIR) {
        config.set_routeview_dir(dir.clone());
    }

    let source = DirSource::new(dir);
    let table = IpMetadataTable::load(
        &source,
        &config,
        date,
        args.get_flag(ARG_ALLOW_PREVIOUS_DAY),
    )?;

    let mut all_resolved = true;
    for ip in args.get_many::<Ipv4Addr>(ARG_IP).into_iter().flatten() {
        match table.lookup(*ip) {
            Ok(meta) => print_metadata(*ip, &meta),
            Err(e) => {
                eprintln!("{e}");
                all_resolved = false;
            }
        }
    }

    if all_resolved {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
