use super::*;
use serde_json::json;

#[test]
fn test_parse_percent() {
    assert_eq!(parse_percent(&json!("12.5%")), 12.5);
    assert_eq!(parse_percent(&json!(" 12.5 % ")), 12.5);
    assert_eq!(parse_percent(&json!("-3")), -3.0);
    assert_eq!(parse_percent(&json!(7.25)), 7.25);
    assert_eq!(parse_percent(&json!("abc")), 0.0);
    assert_eq!(parse_percent(&json!("%")), 0.0);
    assert_eq!(parse_percent(&json!("NaN%")), 0.0);
    assert_eq!(parse_percent(&json!(null)), 0.0);
}

#[test]
fn test_parse_count() {
    assert_eq!(parse_count(&json!(12)), 12);
    assert_eq!(parse_count(&json!("12")), 12);
    assert_eq!(parse_count(&json!(2.6)), 3);
    assert_eq!(parse_count(&json!(-4)), 0);
    assert_eq!(parse_count(&json!("many")), 0);
}

#[test]
fn test_from_api_fields() {
    let response = json!({
        "yesterdayCount": 4,
        "avgDailyGrowthCount": "-1.5",
        "avgDailyGrowthPercent": "12.34%",
    });
    assert_eq!(
        ServerAggregate::from_api_fields(&response),
        Some(ServerAggregate {
            yesterday_count: 4,
            avg_daily_growth_count: -1.5,
            avg_daily_growth_percent: 12.34,
        })
    );
}

#[test]
fn test_from_api_fields_requires_all_fields() {
    let partial = json!({
        "yesterdayCount": 4,
        "avgDailyGrowthCount": 2,
    });
    assert_eq!(ServerAggregate::from_api_fields(&partial), None);
    assert_eq!(ServerAggregate::from_api_fields(&json!([])), None);
}

#[test]
fn test_from_api_fields_unparseable_values() {
    let response = json!({
        "yesterdayCount": null,
        "avgDailyGrowthCount": "n/a",
        "avgDailyGrowthPercent": "up",
    });
    assert_eq!(
        ServerAggregate::from_api_fields(&response),
        Some(ServerAggregate {
            yesterday_count: 0,
            avg_daily_growth_count: 0.0,
            avg_daily_growth_percent: 0.0,
        })
    );
}
