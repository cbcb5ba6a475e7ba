//! コマンドライン引数の解釈

use crate::commands::OutputFormat;
use crate::{Cli, Commands};
use chrono::NaiveDate;
use clap::Parser;
use std::path::PathBuf;

#[test]
fn test_compute_defaults() {
    let cli = Cli::try_parse_from(["dashboard_stats", "compute", "orders.json"]).unwrap();
    let Commands::Compute(args) = cli.command else {
        panic!("expected compute");
    };

    assert_eq!(args.input, PathBuf::from("orders.json"));
    assert_eq!(args.preset, None);
    assert_eq!(args.field, None);
    assert_eq!(args.window_days, None);
    assert_eq!(args.from, None);
    assert_eq!(args.now, None);
    assert_eq!(args.format, OutputFormat::Json);
}

#[test]
fn test_compute_all_options() {
    let cli = Cli::try_parse_from([
        "dashboard_stats",
        "compute",
        "orders.json",
        "--preset",
        "med_orders",
        "--field",
        "order.createdAt",
        "--window-days",
        "14",
        "--from",
        "2024-01-01",
        "--to",
        "2024-01-10",
        "--now",
        "2024-01-15T10:00:00Z",
        "--clamp-max-percent",
        "100",
        "--utc-offset",
        "+09:00",
        "--format",
        "text",
    ])
    .unwrap();
    let Commands::Compute(args) = cli.command else {
        panic!("expected compute");
    };

    assert_eq!(args.preset.as_deref(), Some("med_orders"));
    assert_eq!(args.field.as_deref(), Some("order.createdAt"));
    assert_eq!(args.window_days, Some(14));
    assert_eq!(args.from, NaiveDate::from_ymd_opt(2024, 1, 1));
    assert_eq!(args.to, NaiveDate::from_ymd_opt(2024, 1, 10));
    assert_eq!(
        args.now.map(|n| n.to_rfc3339()),
        Some("2024-01-15T10:00:00+00:00".to_string())
    );
    assert_eq!(args.clamp_max_percent, Some(100.0));
    assert_eq!(args.utc_offset.as_deref(), Some("+09:00"));
    assert_eq!(args.format, OutputFormat::Text);
}

#[test]
fn test_compute_rejects_bad_dates() {
    for bad in [
        ["--from", "2024/01/01"],
        ["--to", "yesterday"],
        ["--now", "noon"],
    ] {
        let mut argv = vec!["dashboard_stats", "compute", "orders.json"];
        argv.extend(bad);
        assert!(Cli::try_parse_from(argv).is_err(), "args={bad:?}");
    }
}

#[test]
fn test_presets_command() {
    let cli = Cli::try_parse_from(["dashboard_stats", "presets", "--format", "json"]).unwrap();
    let Commands::Presets(args) = cli.command else {
        panic!("expected presets");
    };
    assert_eq!(args.format, OutputFormat::Json);
}
