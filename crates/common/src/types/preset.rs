use crate::config::PresetConfig;
use serde::Serialize;

/// ダッシュボード各ページの集計パラメータ
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Preset {
    pub name: String,
    pub date_field: String,
    pub window_days: u32,
    /// 平均変化率の上限。med-orders ページのみ 100 で頭打ちにしている。
    pub clamp_max_percent: Option<f64>,
}

impl Preset {
    pub const BUILTIN_NAMES: [&'static str; 3] = ["med_orders", "activities", "users"];

    pub fn builtin(name: &str) -> Option<Self> {
        let clamp_max_percent = match name {
            "med_orders" => Some(100.0),
            "activities" | "users" => None,
            _ => return None,
        };
        Some(Self {
            name: name.to_string(),
            date_field: "createdAt".to_string(),
            window_days: 30,
            clamp_max_percent,
        })
    }

    pub fn with_overrides(self, over: &PresetConfig) -> Self {
        Self {
            name: self.name,
            date_field: over.date_field.clone().unwrap_or(self.date_field),
            window_days: over.window_days.unwrap_or(self.window_days),
            clamp_max_percent: over.clamp_max_percent.or(self.clamp_max_percent),
        }
    }
}
