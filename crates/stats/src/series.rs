use crate::window::DateWindow;
use chrono::{NaiveDate, TimeZone};
use common::types::TimestampedRecord;

/// 期間内の日毎の件数。レコードの無い日も 0 として含む。
/// 日付はレコードの時刻を `tz` に変換したカレンダー日で判定する。
pub fn daily_counts<Tz: TimeZone>(
    records: &[TimestampedRecord],
    window: &DateWindow,
    tz: &Tz,
) -> Vec<u64> {
    let mut counts = vec![0; window.day_count()];
    for date in local_dates(records, tz) {
        if let Some(count) = window.index_of(date).and_then(|i| counts.get_mut(i)) {
            *count += 1;
        }
    }
    counts
}

pub fn count_on<Tz: TimeZone>(records: &[TimestampedRecord], date: NaiveDate, tz: &Tz) -> u64 {
    local_dates(records, tz).filter(|d| *d == date).count() as u64
}

fn local_dates<'a, Tz: TimeZone>(
    records: &'a [TimestampedRecord],
    tz: &'a Tz,
) -> impl Iterator<Item = NaiveDate> + 'a {
    records
        .iter()
        .filter_map(|r| r.timestamp)
        .map(move |ts| ts.with_timezone(tz).date_naive())
}

/// 前日比の変化率 (%)。前日が 0 の場合は当日が正なら 100、そうでなければ 0。
pub fn day_over_day_percent(series: &[u64]) -> Vec<f64> {
    series
        .windows(2)
        .map(|pair| {
            let (prev, curr) = (pair[0] as f64, pair[1] as f64);
            if pair[0] == 0 {
                if pair[1] > 0 { 100.0 } else { 0.0 }
            } else {
                (curr - prev) / prev * 100.0
            }
        })
        .collect()
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// 系列を前半と後半に分け、後半の平均が前半以上なら true。
/// 奇数長のときは後半が 1 つ多い。2 点未満は false。
pub fn is_increasing(values: &[f64]) -> bool {
    if values.len() < 2 {
        return false;
    }
    let (first, second) = values.split_at(values.len() / 2);
    mean(second) >= mean(first)
}

pub fn to_f64(series: &[u64]) -> Vec<f64> {
    series.iter().map(|&c| c as f64).collect()
}
