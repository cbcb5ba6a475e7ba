use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const YESTERDAY_COUNT_FIELD: &str = "yesterdayCount";
pub const AVG_DAILY_GROWTH_COUNT_FIELD: &str = "avgDailyGrowthCount";
pub const AVG_DAILY_GROWTH_PERCENT_FIELD: &str = "avgDailyGrowthPercent";

/// バックエンドが集計済みの統計値
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerAggregate {
    pub yesterday_count: u64,
    pub avg_daily_growth_count: f64,
    pub avg_daily_growth_percent: f64,
}

impl ServerAggregate {
    /// 3 つのフィールドが全て揃っている場合のみ `Some`。
    /// 値が解釈できないフィールドは 0 として扱う。
    pub fn from_api_fields(value: &Value) -> Option<Self> {
        let yesterday = value.get(YESTERDAY_COUNT_FIELD)?;
        let count = value.get(AVG_DAILY_GROWTH_COUNT_FIELD)?;
        let percent = value.get(AVG_DAILY_GROWTH_PERCENT_FIELD)?;

        Some(Self {
            yesterday_count: parse_count(yesterday),
            avg_daily_growth_count: parse_number(count),
            avg_daily_growth_percent: parse_percent(percent),
        })
    }
}

/// 件数フィールド。負数や小数は 0 以上の整数に丸める。
pub fn parse_count(value: &Value) -> u64 {
    if let Some(n) = value.as_u64() {
        return n;
    }
    let n = parse_number(value);
    if n > 0.0 { n.round() as u64 } else { 0 }
}

/// `"12.5%"`, `"12.5"`, `12.5` のいずれも受け付ける。それ以外は 0。
pub fn parse_percent(value: &Value) -> f64 {
    match value {
        Value::String(s) => {
            let s = s.trim();
            parse_f64(s.strip_suffix('%').unwrap_or(s))
        }
        _ => parse_number(value),
    }
}

fn parse_number(value: &Value) -> f64 {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).unwrap_or(0.0),
        Value::String(s) => parse_f64(s),
        _ => 0.0,
    }
}

fn parse_f64(s: &str) -> f64 {
    s.trim()
        .parse::<f64>()
        .ok()
        .filter(|f| f.is_finite())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests;
