use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// 統計値をどちらの経路で求めたか
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsSource {
    /// レコードから算出
    Client,
    /// バックエンドの集計値をそのまま使用
    ServerAggregate,
}

impl Display for StatsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatsSource::Client => write!(f, "client"),
            StatsSource::ServerAggregate => write!(f, "server_aggregate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsSummary {
    pub yesterday_count: u64,
    pub yesterday_label: String,
    pub window_average_count: f64,
    pub is_count_increasing: bool,
    pub window_average_percent: f64,
    pub is_percent_increasing: bool,
    pub source: StatsSource,
}

impl StatsSummary {
    pub(crate) fn empty(yesterday: NaiveDate) -> Self {
        Self {
            yesterday_count: 0,
            yesterday_label: day_label(yesterday),
            window_average_count: 0.0,
            is_count_increasing: false,
            window_average_percent: 0.0,
            is_percent_increasing: false,
            source: StatsSource::Client,
        }
    }

    /// 表示用の整数件数
    pub fn window_average_count_rounded(&self) -> i64 {
        self.window_average_count.round() as i64
    }

    pub fn window_average_percent_display(&self) -> String {
        format!("{:.2}%", self.window_average_percent)
    }
}

impl Display for StatsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arrow = |up: bool| if up { "↑" } else { "↓" };
        writeln!(
            f,
            "Yesterday ({}): {}",
            self.yesterday_label, self.yesterday_count
        )?;
        writeln!(
            f,
            "Average daily count: {} {}",
            self.window_average_count_rounded(),
            arrow(self.is_count_increasing)
        )?;
        writeln!(
            f,
            "Average daily change: {} {}",
            self.window_average_percent_display(),
            arrow(self.is_percent_increasing)
        )?;
        write!(f, "Source: {}", self.source)
    }
}

/// `Jan 5` 形式
pub fn day_label(date: NaiveDate) -> String {
    date.format("%b %-d").to_string()
}
