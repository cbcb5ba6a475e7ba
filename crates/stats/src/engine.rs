use crate::series::{count_on, daily_counts, day_over_day_percent, is_increasing, mean, to_f64};
use crate::summary::{StatsSource, StatsSummary, day_label};
use crate::window::{DEFAULT_WINDOW_DAYS, DateWindow, resolve_window};
use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};
use common::types::{Preset, ServerAggregate, TimestampedRecord};
use logging::*;
use serde_json::Value;

#[derive(Debug, Clone)]
pub struct StatsOptions<Tz: TimeZone> {
    /// 日付の区切りに使うタイムゾーン
    pub tz: Tz,
    pub window_days: u32,
    pub range_start: Option<NaiveDate>,
    pub range_end: Option<NaiveDate>,
    /// 未指定なら呼び出し時の現在時刻
    pub now: Option<DateTime<Utc>>,
    pub clamp_max_percent: Option<f64>,
}

impl<Tz: TimeZone> StatsOptions<Tz> {
    pub fn new(tz: Tz) -> Self {
        Self {
            tz,
            window_days: DEFAULT_WINDOW_DAYS,
            range_start: None,
            range_end: None,
            now: None,
            clamp_max_percent: None,
        }
    }

    pub fn from_preset(preset: &Preset, tz: Tz) -> Self {
        Self {
            window_days: preset.window_days,
            clamp_max_percent: preset.clamp_max_percent,
            ..Self::new(tz)
        }
    }

    pub fn with_now(self, now: DateTime<Utc>) -> Self {
        Self {
            now: Some(now),
            ..self
        }
    }

    pub fn with_window_days(self, window_days: u32) -> Self {
        Self {
            window_days,
            ..self
        }
    }

    pub fn with_range(self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self {
            range_start: start,
            range_end: end,
            ..self
        }
    }

    pub fn with_clamp_max_percent(self, max: Option<f64>) -> Self {
        Self {
            clamp_max_percent: max,
            ..self
        }
    }

    fn today(&self) -> NaiveDate {
        self.now
            .unwrap_or_else(Utc::now)
            .with_timezone(&self.tz)
            .date_naive()
    }

    fn clamp_percent(&self, value: f64) -> f64 {
        match self.clamp_max_percent {
            Some(max) => value.min(max),
            None => value,
        }
    }
}

/// 統計の入力。どちらの経路で計算するかは境界で一度だけ決める。
#[derive(Debug, Clone, PartialEq)]
pub enum StatsInput {
    Client(Vec<TimestampedRecord>),
    ServerAggregate(ServerAggregate),
}

impl StatsInput {
    /// API レスポンスから入力を組み立てる。
    ///
    /// - 集計フィールドが全て揃ったオブジェクト: `ServerAggregate`
    /// - 配列、または `data` 配列を持つオブジェクト: `Client`
    /// - それ以外: `None`
    pub fn from_api_response<Tz: TimeZone>(value: &Value, field: &str, tz: &Tz) -> Option<Self> {
        if let Some(aggregate) = ServerAggregate::from_api_fields(value) {
            return Some(StatsInput::ServerAggregate(aggregate));
        }
        let items = match value {
            Value::Array(items) => items,
            Value::Object(map) => map.get("data")?.as_array()?,
            _ => return None,
        };
        Some(StatsInput::Client(TimestampedRecord::from_json_list(
            items, field, tz,
        )))
    }

    pub fn source(&self) -> StatsSource {
        match self {
            StatsInput::Client(_) => StatsSource::Client,
            StatsInput::ServerAggregate(_) => StatsSource::ServerAggregate,
        }
    }
}

pub fn compute<Tz: TimeZone>(input: &StatsInput, options: &StatsOptions<Tz>) -> StatsSummary {
    match input {
        StatsInput::Client(records) => compute_stats(records, options),
        StatsInput::ServerAggregate(aggregate) => compute_from_aggregate(aggregate, options),
    }
}

/// レコードから統計値を求める。入力がどうであれ失敗しない。
pub fn compute_stats<Tz: TimeZone>(
    records: &[TimestampedRecord],
    options: &StatsOptions<Tz>,
) -> StatsSummary {
    let log = DEFAULT.new(o!(
        "function" => "stats::compute_stats",
        "records" => records.len(),
    ));

    let today = options.today();
    let yesterday = previous_day(today);

    let valid = records.iter().filter(|r| r.is_valid()).count();
    if valid < records.len() {
        debug!(log, "records without timestamp dropped";
            "dropped" => records.len() - valid
        );
    }
    if valid == 0 {
        debug!(log, "no valid records");
        return StatsSummary::empty(yesterday);
    }

    let resolution = resolve_window(
        today,
        options.window_days,
        options.range_start,
        options.range_end,
    );
    if resolution.reset {
        warn!(log, "inverted date range, falling back to trailing window";
            "range_start" => ?options.range_start,
            "range_end" => ?options.range_end
        );
    }
    let window = resolution.window;

    let summary = summarize(records, &window, yesterday, options);
    debug!(log, "computed";
        "start" => %window.start(),
        "end" => %window.end(),
        "days" => window.day_count(),
        "yesterday_count" => summary.yesterday_count,
        "window_average_count" => summary.window_average_count
    );
    summary
}

fn summarize<Tz: TimeZone>(
    records: &[TimestampedRecord],
    window: &DateWindow,
    yesterday: NaiveDate,
    options: &StatsOptions<Tz>,
) -> StatsSummary {
    let series = daily_counts(records, window, &options.tz);
    let counts = to_f64(&series);
    let percents = day_over_day_percent(&series);

    StatsSummary {
        yesterday_count: count_on(records, yesterday, &options.tz),
        yesterday_label: day_label(yesterday),
        window_average_count: mean(&counts),
        is_count_increasing: is_increasing(&counts),
        window_average_percent: options.clamp_percent(mean(&percents)),
        is_percent_increasing: is_increasing(&percents),
        source: StatsSource::Client,
    }
}

/// バックエンドの集計値をそのまま出力に写す。増減フラグは値が 0 以上かどうか。
pub fn compute_from_aggregate<Tz: TimeZone>(
    aggregate: &ServerAggregate,
    options: &StatsOptions<Tz>,
) -> StatsSummary {
    let yesterday = previous_day(options.today());
    StatsSummary {
        yesterday_count: aggregate.yesterday_count,
        yesterday_label: day_label(yesterday),
        window_average_count: aggregate.avg_daily_growth_count,
        is_count_increasing: aggregate.avg_daily_growth_count >= 0.0,
        window_average_percent: options.clamp_percent(aggregate.avg_daily_growth_percent),
        is_percent_increasing: aggregate.avg_daily_growth_percent >= 0.0,
        source: StatsSource::ServerAggregate,
    }
}

fn previous_day(today: NaiveDate) -> NaiveDate {
    today.checked_sub_days(Days::new(1)).unwrap_or(today)
}
