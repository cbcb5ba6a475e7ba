use crate::Result;
use crate::types::Preset;
use anyhow::anyhow;
use chrono::FixedOffset;
use once_cell::sync::Lazy;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use thiserror::Error;

// TOML configuration structure
#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub stats: StatsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize)]
pub struct StatsConfig {
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    /// 空文字列ならシステムのローカルタイムゾーン
    #[serde(default)]
    pub utc_offset: String,
    #[serde(default = "default_date_field")]
    pub date_field: String,
    #[serde(default)]
    pub presets: HashMap<String, PresetConfig>,
}

/// `[stats.presets.<name>]` の上書き値。未指定の項目は組み込み値のまま。
#[derive(Debug, Deserialize, Clone, Default, PartialEq)]
pub struct PresetConfig {
    pub date_field: Option<String>,
    pub window_days: Option<u32>,
    pub clamp_max_percent: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_rust_log_format")]
    pub rust_log_format: String,
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid UTC offset: {0}")]
    InvalidUtcOffset(String),
    #[error("Unknown stats preset: {0}")]
    UnknownPreset(String),
}

// Default values
fn default_window_days() -> u32 {
    30
}
fn default_date_field() -> String {
    "createdAt".to_string()
}
fn default_rust_log_format() -> String {
    "json".to_string()
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            utc_offset: String::new(),
            date_field: default_date_field(),
            presets: HashMap::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            rust_log_format: default_rust_log_format(),
        }
    }
}

static CONFIG: Lazy<Config> = Lazy::new(|| {
    load_config().unwrap_or_else(|e| {
        eprintln!(
            "Warning: Failed to load config files: {}. Using defaults.",
            e
        );
        Config::default()
    })
});

static CONFIG_STORE: Lazy<Arc<Mutex<HashMap<String, String>>>> =
    Lazy::new(|| Arc::new(Mutex::new(HashMap::new())));

pub fn get(name: &str) -> Result<String> {
    // Priority 1: CONFIG_STORE (runtime overrides)
    if let Some(value) = get_from_store(name) {
        if value.is_empty() {
            return Err(anyhow!("{} is empty", name));
        }
        return Ok(value);
    }

    // Priority 2: Environment variables
    if let Ok(val) = std::env::var(name)
        && !val.is_empty()
    {
        return Ok(val);
    }

    // Priority 3: TOML config
    let toml_value = match name {
        "STATS_WINDOW_DAYS" => Some(CONFIG.stats.window_days.to_string()),
        "STATS_UTC_OFFSET" => Some(CONFIG.stats.utc_offset.clone()),
        "STATS_DATE_FIELD" => Some(CONFIG.stats.date_field.clone()),
        "RUST_LOG_FORMAT" => Some(CONFIG.logging.rust_log_format.clone()),
        _ => None,
    };

    if let Some(value) = toml_value
        && !value.is_empty()
    {
        return Ok(value);
    }

    Err(anyhow!("Configuration key not found: {}", name))
}

/// 集計ウィンドウの日数。解釈できない値はデフォルトの 30 日。
pub fn stats_window_days() -> u32 {
    get("STATS_WINDOW_DAYS")
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or_else(default_window_days)
}

/// 日付の区切りに使うオフセット。未設定なら `None`（ローカルタイムゾーン）。
pub fn stats_utc_offset() -> Result<Option<FixedOffset>> {
    match get("STATS_UTC_OFFSET") {
        Ok(value) => Ok(Some(parse_utc_offset(&value)?)),
        Err(_) => Ok(None),
    }
}

pub fn stats_date_field() -> String {
    get("STATS_DATE_FIELD").unwrap_or_else(|_| default_date_field())
}

/// 組み込みプリセットに TOML の上書きを適用したものを返す
pub fn preset(name: &str) -> Result<Preset> {
    let builtin = Preset::builtin(name).ok_or_else(|| ConfigError::UnknownPreset(name.into()))?;
    Ok(match CONFIG.stats.presets.get(name) {
        Some(over) => builtin.with_overrides(over),
        None => builtin,
    })
}

pub fn presets() -> Vec<Preset> {
    Preset::BUILTIN_NAMES
        .iter()
        .filter_map(|name| preset(name).ok())
        .collect()
}

/// `+09:00`, `-0530`, `Z`, `UTC` 形式のオフセットを解釈する
pub fn parse_utc_offset(value: &str) -> std::result::Result<FixedOffset, ConfigError> {
    let invalid = || ConfigError::InvalidUtcOffset(value.to_string());
    let s = value.trim();
    if s.eq_ignore_ascii_case("z") || s.eq_ignore_ascii_case("utc") {
        return FixedOffset::east_opt(0).ok_or_else(invalid);
    }

    let (sign, rest) = match s.chars().next() {
        Some('+') => (1, &s[1..]),
        Some('-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };
    let digits: String = rest.chars().filter(|c| *c != ':').collect();
    if digits.len() != 4 || !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid());
    }
    let hours: i32 = digits[..2].parse().map_err(|_| invalid())?;
    let minutes: i32 = digits[2..].parse().map_err(|_| invalid())?;
    if hours > 23 || minutes > 59 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

/// テスト用: 設定値を上書きする
///
/// 注: `#[cfg(test)]` にすると他クレート(stats, cli)のテストから参照できないため
/// `#[doc(hidden)]` で公開している
#[doc(hidden)]
pub fn set(name: &str, value: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.insert(name.to_string(), value.to_string());
    }
}

/// テスト用: 設定値を CONFIG_STORE から削除する
#[doc(hidden)]
pub fn remove(name: &str) {
    if let Ok(mut store) = CONFIG_STORE.lock() {
        store.remove(name);
    }
}

/// テスト用: CONFIG_STORE に値をセットし、Drop 時に自動で元に戻す RAII ガード。
///
/// テストが途中で panic しても確実にクリーンアップされる。
#[doc(hidden)]
pub struct ConfigGuard {
    key: String,
    previous: Option<String>,
}

impl ConfigGuard {
    pub fn new(key: &str, value: &str) -> Self {
        let previous = get_from_store(key);
        set(key, value);
        Self {
            key: key.to_string(),
            previous,
        }
    }
}

impl Drop for ConfigGuard {
    fn drop(&mut self) {
        match &self.previous {
            Some(prev) => set(&self.key, prev),
            None => remove(&self.key),
        }
    }
}

fn get_from_store(name: &str) -> Option<String> {
    if let Ok(store) = CONFIG_STORE.lock() {
        store.get(name).cloned()
    } else {
        None
    }
}

/// Load configuration from TOML files with priority:
/// 1. config/config.local.toml (git-ignored, for local overrides)
/// 2. config/config.toml (git-managed template)
/// 3. Default values
fn load_config() -> Result<Config> {
    let mut config = Config::default();

    let base_path = "config/config.toml";
    if Path::new(base_path).exists() {
        let content = fs::read_to_string(base_path)?;
        config = toml::from_str(&content)?;
    }

    let local_path = "config/config.local.toml";
    if Path::new(local_path).exists() {
        let content = fs::read_to_string(local_path)?;
        let local_config: Config = toml::from_str(&content)?;
        merge_config(&mut config, local_config);
    }

    Ok(config)
}

/// Merge local config into base config (local values override base values)
fn merge_config(base: &mut Config, local: Config) {
    // Stats
    if local.stats.window_days != default_window_days() {
        base.stats.window_days = local.stats.window_days;
    }
    if !local.stats.utc_offset.is_empty() {
        base.stats.utc_offset = local.stats.utc_offset;
    }
    if local.stats.date_field != default_date_field() {
        base.stats.date_field = local.stats.date_field;
    }
    // プリセットはエントリ単位で置き換え
    base.stats.presets.extend(local.stats.presets);

    // Logging
    if local.logging.rust_log_format != default_rust_log_format() {
        base.logging.rust_log_format = local.logging.rust_log_format;
    }
}

/// Get TOML-based configuration
pub fn config() -> &'static Config {
    &CONFIG
}

#[cfg(test)]
mod tests;
