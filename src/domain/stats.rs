// ==========================================
// 急诊就诊统计引擎 - 日历统计对象
// ==========================================
// 职责: 日/月/年汇总的统计口径
// 说明: 派生对象，不持久化；记录集变化时整体重建
// ==========================================

use crate::domain::ratio::{mean, share};
use serde::{Deserialize, Serialize};

/// 汇总计数（日/月/年共享同一口径）
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StatTotals {
    /// 就诊人次
    pub count: u64,
    /// 夜班到达人次
    pub night_count: u64,
    /// 急救车送达人次
    pub ems_count: u64,
    /// 住院人次
    pub hospitalized_count: u64,
    /// 离院（未住院）人次
    pub discharged_count: u64,
    /// 停留时长合计（分钟）
    pub duration_minutes_sum: f64,
    /// 停留时长样本数（两端时间齐全且非负）
    pub duration_samples: u64,
    /// 住院患者停留时长合计（分钟）
    pub hospitalized_duration_minutes_sum: f64,
    pub hospitalized_duration_samples: u64,
}

impl StatTotals {
    /// 累加另一组计数
    pub fn absorb(&mut self, other: &StatTotals) {
        self.count += other.count;
        self.night_count += other.night_count;
        self.ems_count += other.ems_count;
        self.hospitalized_count += other.hospitalized_count;
        self.discharged_count += other.discharged_count;
        self.duration_minutes_sum += other.duration_minutes_sum;
        self.duration_samples += other.duration_samples;
        self.hospitalized_duration_minutes_sum += other.hospitalized_duration_minutes_sum;
        self.hospitalized_duration_samples += other.hospitalized_duration_samples;
    }

    /// 平均停留时长：分母为有效样本数，而非就诊人次
    pub fn avg_duration_minutes(&self) -> Option<f64> {
        mean(self.duration_minutes_sum, self.duration_samples)
    }

    pub fn avg_hospitalized_duration_minutes(&self) -> Option<f64> {
        mean(
            self.hospitalized_duration_minutes_sum,
            self.hospitalized_duration_samples,
        )
    }

    pub fn hospitalized_share(&self) -> Option<f64> {
        share(self.hospitalized_count, self.count)
    }

    pub fn night_share(&self) -> Option<f64> {
        share(self.night_count, self.count)
    }

    pub fn ems_share(&self) -> Option<f64> {
        share(self.ems_count, self.count)
    }
}

/// 日统计，键为本地日历日期 (YYYY-MM-DD)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyStat {
    pub date: String,
    #[serde(flatten)]
    pub totals: StatTotals,
}

/// 月统计，键为 YYYY-MM
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStat {
    pub month: String,
    pub year: i32,
    pub month_of_year: u32,
    /// 有数据的天数
    pub day_count: u32,
    /// 当月日历天数
    pub days_in_period: u32,
    /// 是否完整（可参与环比）
    pub is_complete: bool,
    #[serde(flatten)]
    pub totals: StatTotals,
}

/// 年统计
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearlyStat {
    pub year: i32,
    pub day_count: u32,
    pub month_count: u32,
    pub is_complete: bool,
    #[serde(flatten)]
    pub totals: StatTotals,
}

/// 相邻周期对比
///
/// 仅当两个周期都完整时才会生成。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodDelta {
    pub period: String,
    pub previous_period: String,
    pub count_delta: i64,
    /// 相对变化率（上期为 0 时为 None）
    pub count_change: Option<f64>,
    pub hospitalized_share_delta: Option<f64>,
    pub avg_duration_delta: Option<f64>,
}
