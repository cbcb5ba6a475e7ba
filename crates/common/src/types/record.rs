use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// 集計対象の最小単位。日時を解釈できなかったレコードは `timestamp: None` で保持し、
/// 集計時に除外する。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimestampedRecord {
    pub timestamp: Option<DateTime<Utc>>,
}

impl TimestampedRecord {
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp: Some(timestamp),
        }
    }

    pub fn invalid() -> Self {
        Self { timestamp: None }
    }

    /// API オブジェクトの `field`（`.` 区切りでネスト可）から日時を取り出す。
    /// タイムゾーン無しの日時は `tz` のローカル時刻として扱う。
    pub fn from_json<Tz: TimeZone>(value: &Value, field: &str, tz: &Tz) -> Self {
        Self {
            timestamp: lookup_field(value, field).and_then(|v| parse_timestamp(v, tz)),
        }
    }

    pub fn from_json_list<Tz: TimeZone>(values: &[Value], field: &str, tz: &Tz) -> Vec<Self> {
        values
            .iter()
            .map(|v| Self::from_json(v, field, tz))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.timestamp.is_some()
    }
}

impl From<DateTime<Utc>> for TimestampedRecord {
    fn from(value: DateTime<Utc>) -> Self {
        Self::new(value)
    }
}

pub fn lookup_field<'a>(value: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(value, |v, key| v.get(key))
}

/// 日時らしき値を解釈する。
///
/// - RFC 3339 文字列
/// - オフセット無しの `YYYY-MM-DDTHH:MM:SS[.fff]` / `YYYY-MM-DD HH:MM:SS`、`YYYY-MM-DD`
/// - 数値（エポックミリ秒）
/// - `{ "$date": ... }` / `{ "$numberLong": "..." }` ラッパー
pub fn parse_timestamp<Tz: TimeZone>(value: &Value, tz: &Tz) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_timestamp_str(s, tz),
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis),
        Value::Object(map) => {
            if let Some(inner) = map.get("$date") {
                parse_timestamp(inner, tz)
            } else if let Some(Value::String(ms)) = map.get("$numberLong") {
                ms.trim()
                    .parse::<i64>()
                    .ok()
                    .and_then(DateTime::<Utc>::from_timestamp_millis)
            } else {
                None
            }
        }
        _ => None,
    }
}

fn parse_timestamp_str<Tz: TimeZone>(s: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return local_to_utc(&naive, tz);
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return local_to_utc(&date.and_hms_opt(0, 0, 0)?, tz);
    }

    s.parse::<i64>()
        .ok()
        .and_then(DateTime::<Utc>::from_timestamp_millis)
}

fn local_to_utc<Tz: TimeZone>(naive: &NaiveDateTime, tz: &Tz) -> Option<DateTime<Utc>> {
    // 夏時間の切り替わりで存在しない時刻は None
    tz.from_local_datetime(naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
