// ==========================================
// 急诊就诊统计引擎 - KPI 汇总
// ==========================================
// 职责: 日序列 (可按年份限定) → 汇总卡片指标
// ==========================================

use crate::domain::ratio::mean;
use crate::domain::stats::{DailyStat, StatTotals};
use crate::domain::types::YearFilter;
use serde::{Deserialize, Serialize};

/// KPI 汇总
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KpiSummary {
    pub year: YearFilter,
    pub totals: StatTotals,
    pub day_count: u32,
    pub first_date: Option<String>,
    pub last_date: Option<String>,
    pub avg_daily_visits: Option<f64>,
    pub avg_duration_minutes: Option<f64>,
    pub avg_hospitalized_duration_minutes: Option<f64>,
    pub hospitalized_share: Option<f64>,
    pub night_share: Option<f64>,
    pub ems_share: Option<f64>,
}

pub struct KpiEngine;

impl Default for KpiEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl KpiEngine {
    pub fn new() -> Self {
        Self
    }

    /// 汇总日序列（日序列已按日期升序）
    pub fn summarize(&self, daily: &[DailyStat], year: YearFilter) -> KpiSummary {
        let scoped: Vec<&DailyStat> = daily
            .iter()
            .filter(|d| match year {
                YearFilter::All => true,
                YearFilter::Year(y) => year_of_key(&d.date) == Some(y),
            })
            .collect();

        let mut totals = StatTotals::default();
        for d in &scoped {
            totals.absorb(&d.totals);
        }
        let day_count = scoped.len() as u32;

        KpiSummary {
            year,
            totals,
            day_count,
            first_date: scoped.first().map(|d| d.date.clone()),
            last_date: scoped.last().map(|d| d.date.clone()),
            avg_daily_visits: mean(totals.count as f64, day_count as u64),
            avg_duration_minutes: totals.avg_duration_minutes(),
            avg_hospitalized_duration_minutes: totals.avg_hospitalized_duration_minutes(),
            hospitalized_share: totals.hospitalized_share(),
            night_share: totals.night_share(),
            ems_share: totals.ems_share(),
        }
    }
}

fn year_of_key(key: &str) -> Option<i32> {
    key.get(..4).and_then(|y| y.parse().ok())
}
