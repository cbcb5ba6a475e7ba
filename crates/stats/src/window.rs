use chrono::{Days, NaiveDate};

pub const DEFAULT_WINDOW_DAYS: u32 = 30;

/// 終了日だけ指定された場合の開始日までの日数
const RANGE_END_ONLY_LOOKBACK_DAYS: u64 = 29;

/// これを超える期間は終了日側に寄せて切り詰める（約 100 年）
pub const MAX_WINDOW_DAYS: u32 = 36_600;

/// 集計対象のカレンダー日の範囲（両端を含む）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// `start > end` の場合は `end` の 1 日だけの期間になる
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        let start = start.min(end);
        let earliest = subtract_days(end, u64::from(MAX_WINDOW_DAYS - 1));
        Self {
            start: start.max(earliest),
            end,
        }
    }

    /// `today` で終わる `days` 日間
    pub fn trailing(today: NaiveDate, days: u32) -> Self {
        let days = days.clamp(1, MAX_WINDOW_DAYS);
        Self::new(subtract_days(today, u64::from(days - 1)), today)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// 期間の日数。開始日 00:00:00.000 から終了日 23:59:59.999 までを切り上げた値で、最小 1。
    pub fn day_count(&self) -> usize {
        let days = (self.end - self.start).num_days() + 1;
        usize::try_from(days).unwrap_or(1).max(1)
    }

    pub fn index_of(&self, date: NaiveDate) -> Option<usize> {
        if date < self.start || date > self.end {
            return None;
        }
        usize::try_from((date - self.start).num_days()).ok()
    }

    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        self.start.iter_days().take(self.day_count())
    }
}

/// 解決結果。範囲指定が逆転していて既定の期間に戻した場合は `reset` が立つ。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowResolution {
    pub window: DateWindow,
    pub reset: bool,
}

/// 集計期間を決める。
///
/// - 開始日のみ: 開始日から `today` まで
/// - 終了日のみ: 終了日の 29 日前から終了日まで
/// - 両方: そのまま
/// - どちらも無し、または開始日が終了日より後: `today` で終わる `window_days` 日間
pub fn resolve_window(
    today: NaiveDate,
    window_days: u32,
    range_start: Option<NaiveDate>,
    range_end: Option<NaiveDate>,
) -> WindowResolution {
    let trailing = DateWindow::trailing(today, window_days);
    let (start, end) = match (range_start, range_end) {
        (None, None) => {
            return WindowResolution {
                window: trailing,
                reset: false,
            };
        }
        (Some(start), None) => (start, today),
        (None, Some(end)) => (subtract_days(end, RANGE_END_ONLY_LOOKBACK_DAYS), end),
        (Some(start), Some(end)) => (start, end),
    };

    if start > end {
        return WindowResolution {
            window: trailing,
            reset: true,
        };
    }

    WindowResolution {
        window: DateWindow::new(start, end),
        reset: false,
    }
}

fn subtract_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_sub_days(Days::new(days))
        .unwrap_or(NaiveDate::MIN)
}
