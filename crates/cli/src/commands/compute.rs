use crate::commands::OutputFormat;
use crate::errors::InputError;
use anyhow::{Context, Result};
use chrono::{DateTime, FixedOffset, Local, NaiveDate, TimeZone, Utc};
use clap::Args;
use common::config;
use common::types::Preset;
use logging::*;
use serde_json::Value;
use stats::{StatsInput, StatsOptions, StatsSummary};
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(Debug, Args)]
pub struct ComputeArgs {
    /// 入力 JSON（レコード配列、`data` 配列を持つオブジェクト、または集計済みレスポンス）
    pub input: PathBuf,

    /// ページ別プリセット（med_orders, activities, users）
    #[arg(long)]
    pub preset: Option<String>,

    /// 日時フィールドのパス（`.` 区切り）
    #[arg(long)]
    pub field: Option<String>,

    /// 集計日数
    #[arg(long)]
    pub window_days: Option<u32>,

    /// 期間の開始日 (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<NaiveDate>,

    /// 期間の終了日 (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub to: Option<NaiveDate>,

    /// 現在時刻の上書き (RFC 3339 または YYYY-MM-DD)
    #[arg(long, value_parser = parse_now)]
    pub now: Option<DateTime<Utc>>,

    /// 平均変化率の上限
    #[arg(long)]
    pub clamp_max_percent: Option<f64>,

    /// 日付の区切りに使うオフセット（例: +09:00）。未指定なら設定値、それも無ければローカル
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,
}

pub async fn run(args: ComputeArgs) -> Result<()> {
    let log = DEFAULT.new(o!("function" => "commands::compute::run"));

    let value = load_json(&args.input).await?;
    let output = match resolve_offset(&args)? {
        Some(offset) => render(&summarize(&args, &value, offset)?, args.format)?,
        None => render(&summarize(&args, &value, Local)?, args.format)?,
    };

    info!(log, "success"; "input" => %args.input.display());
    println!("{output}");
    Ok(())
}

async fn load_json(path: &Path) -> Result<Value> {
    let content = fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse input file: {}", path.display()))
}

fn resolve_offset(args: &ComputeArgs) -> Result<Option<FixedOffset>> {
    match &args.utc_offset {
        Some(value) => Ok(Some(config::parse_utc_offset(value)?)),
        None => config::stats_utc_offset(),
    }
}

/// 入力の経路をここで一度だけ決めて計算する
pub fn summarize<Tz: TimeZone>(args: &ComputeArgs, value: &Value, tz: Tz) -> Result<StatsSummary> {
    let log = DEFAULT.new(o!("function" => "commands::compute::summarize"));

    let preset = args.preset.as_deref().map(config::preset).transpose()?;
    let field = args
        .field
        .clone()
        .or_else(|| preset.as_ref().map(|p| p.date_field.clone()))
        .unwrap_or_else(config::stats_date_field);

    let input = StatsInput::from_api_response(value, &field, &tz)
        .ok_or_else(|| InputError::UnsupportedShape(args.input.clone()))?;
    info!(log, "input detected";
        "source" => %input.source(),
        "field" => &field,
        "preset" => ?args.preset
    );

    let options = build_options(args, preset.as_ref(), tz);
    Ok(stats::compute(&input, &options))
}

fn build_options<Tz: TimeZone>(
    args: &ComputeArgs,
    preset: Option<&Preset>,
    tz: Tz,
) -> StatsOptions<Tz> {
    let base = match preset {
        Some(preset) => StatsOptions::from_preset(preset, tz),
        None => StatsOptions::new(tz).with_window_days(config::stats_window_days()),
    };
    let window_days = args.window_days.unwrap_or(base.window_days);
    let clamp = args.clamp_max_percent.or(base.clamp_max_percent);

    let options = base
        .with_window_days(window_days)
        .with_range(args.from, args.to)
        .with_clamp_max_percent(clamp);
    match args.now {
        Some(now) => options.with_now(now),
        None => options,
    }
}

pub fn render(summary: &StatsSummary, format: OutputFormat) -> Result<String> {
    Ok(match format {
        OutputFormat::Json => serde_json::to_string_pretty(summary)?,
        OutputFormat::Text => summary.to_string(),
    })
}

fn parse_date(s: &str) -> std::result::Result<NaiveDate, InputError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| InputError::InvalidDate(s.into()))
}

/// 日付のみの場合はその日の UTC 正午
fn parse_now(s: &str) -> std::result::Result<DateTime<Utc>, InputError> {
    let s = s.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| InputError::InvalidTimestamp(s.into()))
}
