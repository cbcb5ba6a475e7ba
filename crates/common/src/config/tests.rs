use super::*;
use serial_test::serial;

fn clear(key: &str) {
    unsafe {
        std::env::remove_var(key);
    }
    remove(key);
}

#[test]
#[serial]
fn test_config_store_priority() {
    // CONFIG_STOREの値が最優先
    const TEST_KEY: &str = "RUST_LOG_FORMAT";
    unsafe {
        std::env::set_var(TEST_KEY, "env-value");
    }
    set(TEST_KEY, "store-value");
    let result = get(TEST_KEY).unwrap();
    assert_eq!(result, "store-value");

    clear(TEST_KEY);
}

#[test]
#[serial]
fn test_priority_order() {
    // CONFIG_STORE > 環境変数 > TOML > デフォルト
    const TEST_KEY: &str = "STATS_WINDOW_DAYS";
    clear(TEST_KEY);
    assert_eq!(get(TEST_KEY).unwrap(), "30");

    unsafe {
        std::env::set_var(TEST_KEY, "14");
    }
    assert_eq!(get(TEST_KEY).unwrap(), "14");

    set(TEST_KEY, "7");
    assert_eq!(get(TEST_KEY).unwrap(), "7");

    clear(TEST_KEY);
}

#[test]
#[serial]
fn test_empty_store_value_is_error() {
    let _guard = ConfigGuard::new("STATS_DATE_FIELD", "");
    assert!(get("STATS_DATE_FIELD").is_err());
}

#[test]
#[serial]
fn test_unknown_key() {
    assert!(get("NO_SUCH_DASHBOARD_KEY").is_err());
}

#[test]
#[serial]
fn test_config_guard_restores_previous() {
    const TEST_KEY: &str = "STATS_DATE_FIELD";
    clear(TEST_KEY);
    set(TEST_KEY, "updatedAt");
    {
        let _guard = ConfigGuard::new(TEST_KEY, "booking.date");
        assert_eq!(stats_date_field(), "booking.date");
    }
    assert_eq!(stats_date_field(), "updatedAt");

    clear(TEST_KEY);
    {
        let _guard = ConfigGuard::new(TEST_KEY, "booking.date");
    }
    assert_eq!(stats_date_field(), "createdAt");
}

#[test]
#[serial]
fn test_stats_window_days_fallback() {
    clear("STATS_WINDOW_DAYS");
    let _guard = ConfigGuard::new("STATS_WINDOW_DAYS", "not-a-number");
    assert_eq!(stats_window_days(), 30);
}

#[test]
#[serial]
fn test_stats_utc_offset() {
    clear("STATS_UTC_OFFSET");
    assert_eq!(stats_utc_offset().unwrap(), None);

    let _guard = ConfigGuard::new("STATS_UTC_OFFSET", "+09:00");
    assert_eq!(
        stats_utc_offset().unwrap(),
        Some(FixedOffset::east_opt(9 * 3600).unwrap())
    );
}

#[test]
#[serial]
fn test_stats_utc_offset_invalid() {
    let _guard = ConfigGuard::new("STATS_UTC_OFFSET", "Tokyo");
    assert!(stats_utc_offset().is_err());
}

#[test]
fn test_parse_utc_offset() {
    assert_eq!(
        parse_utc_offset("-05:30").unwrap(),
        FixedOffset::west_opt(5 * 3600 + 30 * 60).unwrap()
    );
    assert_eq!(
        parse_utc_offset("+0100").unwrap(),
        FixedOffset::east_opt(3600).unwrap()
    );
    assert_eq!(parse_utc_offset("Z").unwrap(), FixedOffset::east_opt(0).unwrap());
    assert_eq!(parse_utc_offset("utc").unwrap(), FixedOffset::east_opt(0).unwrap());

    for bad in ["", "09:00", "+9", "+24:00", "+12:60", "+ab:cd"] {
        assert_eq!(
            parse_utc_offset(bad),
            Err(ConfigError::InvalidUtcOffset(bad.to_string())),
            "input={bad}"
        );
    }
}

#[test]
fn test_parse_toml() {
    let config: Config = toml::from_str(
        r#"
        [stats]
        window_days = 14
        utc_offset = "+09:00"

        [stats.presets.med_orders]
        clamp_max_percent = 50.0

        [logging]
        rust_log_format = "term"
        "#,
    )
    .unwrap();

    assert_eq!(config.stats.window_days, 14);
    assert_eq!(config.stats.utc_offset, "+09:00");
    assert_eq!(config.stats.date_field, "createdAt");
    assert_eq!(
        config.stats.presets.get("med_orders"),
        Some(&PresetConfig {
            clamp_max_percent: Some(50.0),
            ..PresetConfig::default()
        })
    );
    assert_eq!(config.logging.rust_log_format, "term");
}

#[test]
fn test_merge_config() {
    let mut base: Config = toml::from_str(
        r#"
        [stats]
        window_days = 14
        date_field = "created_at"

        [stats.presets.users]
        window_days = 7
        "#,
    )
    .unwrap();
    let local: Config = toml::from_str(
        r#"
        [stats]
        utc_offset = "Z"

        [stats.presets.activities]
        date_field = "startDate"
        "#,
    )
    .unwrap();

    merge_config(&mut base, local);

    // デフォルト値のままのローカル設定は上書きしない
    assert_eq!(base.stats.window_days, 14);
    assert_eq!(base.stats.date_field, "created_at");
    assert_eq!(base.stats.utc_offset, "Z");
    assert_eq!(base.stats.presets.len(), 2);
    assert_eq!(base.logging.rust_log_format, "json");
}

#[test]
#[serial]
fn test_preset_lookup() {
    let med = preset("med_orders").unwrap();
    assert_eq!(med.name, "med_orders");

    let err = preset("partners").unwrap_err();
    assert_eq!(
        err.downcast_ref::<ConfigError>(),
        Some(&ConfigError::UnknownPreset("partners".to_string()))
    );

    assert_eq!(presets().len(), Preset::BUILTIN_NAMES.len());
}
