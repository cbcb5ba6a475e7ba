//! ダッシュボードの「昨日の件数」「日平均」「平均変化率」と増減トレンドの算出。
//!
//! 計算は純粋関数で、同じ入力と `now` に対して常に同じ結果を返す。

pub mod engine;
pub mod series;
pub mod summary;
pub mod window;

pub use engine::{StatsInput, StatsOptions, compute, compute_from_aggregate, compute_stats};
pub use series::{day_over_day_percent, is_increasing, mean};
pub use summary::{StatsSource, StatsSummary};
pub use window::{DEFAULT_WINDOW_DAYS, DateWindow, resolve_window};
