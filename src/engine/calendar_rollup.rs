// ==========================================
// 急诊就诊统计引擎 - 日历汇总引擎
// ==========================================
// 职责: 记录 → 日统计 → 月统计 → 年统计 + 相邻周期对比
// 红线: 月/年汇总是对日序列的纯折叠，不回读记录
// 红线: 不完整周期不产生对比
// ==========================================

use crate::config::CalendarConfig;
use crate::domain::ratio::{delta, share};
use crate::domain::record::VisitRecord;
use crate::domain::stats::{DailyStat, MonthlyStat, PeriodDelta, StatTotals, YearlyStat};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::instrument;

/// 日历序列（汇总组件一次性消费）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarSeries {
    pub daily: Vec<DailyStat>,
    pub monthly: Vec<MonthlyStat>,
    pub yearly: Vec<YearlyStat>,
    pub month_deltas: Vec<PeriodDelta>,
    pub year_deltas: Vec<PeriodDelta>,
}

// ==========================================
// CalendarRollupEngine - 日历汇总引擎
// ==========================================
pub struct CalendarRollupEngine;

impl Default for CalendarRollupEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl CalendarRollupEngine {
    pub fn new() -> Self {
        Self
    }

    /// 一次构建完整日历序列
    #[instrument(skip(self, records, config), fields(count = records.len()))]
    pub fn build_series(&self, records: &[VisitRecord], config: &CalendarConfig) -> CalendarSeries {
        let daily = self.rollup_daily(records, config);
        let monthly = self.rollup_monthly(&daily, config);
        let yearly = self.rollup_yearly(&monthly);
        let month_deltas = self.month_deltas(&monthly);
        let year_deltas = self.year_deltas(&yearly);
        CalendarSeries {
            daily,
            monthly,
            yearly,
            month_deltas,
            year_deltas,
        }
    }

    // ==========================================
    // 日汇总
    // ==========================================

    /// 按日汇总
    ///
    /// 日期键取到达时间，缺失时取离院时间；两者都缺失的记录不参与。
    /// 输出按日期升序。
    pub fn rollup_daily(&self, records: &[VisitRecord], config: &CalendarConfig) -> Vec<DailyStat> {
        let mut by_date: BTreeMap<NaiveDate, StatTotals> = BTreeMap::new();
        let mut skipped = 0usize;

        for record in records {
            let Some(date) = record.calendar_date() else {
                skipped += 1;
                continue;
            };
            let totals = by_date.entry(date).or_default();
            accumulate(totals, record, config);
        }

        if skipped > 0 {
            tracing::debug!(skipped, "无时间戳记录未参与日汇总");
        }

        by_date
            .into_iter()
            .map(|(date, totals)| DailyStat {
                date: date.format("%Y-%m-%d").to_string(),
                totals,
            })
            .collect()
    }

    // ==========================================
    // 月汇总
    // ==========================================

    /// 按月汇总（日序列折叠）
    ///
    /// 无法解析的日期键直接跳过。
    pub fn rollup_monthly(&self, daily: &[DailyStat], config: &CalendarConfig) -> Vec<MonthlyStat> {
        let mut by_month: BTreeMap<(i32, u32), (u32, StatTotals)> = BTreeMap::new();

        for day in daily {
            let Ok(date) = NaiveDate::parse_from_str(&day.date, "%Y-%m-%d") else {
                tracing::debug!(key = %day.date, "跳过无法解析的日期键");
                continue;
            };
            let entry = by_month.entry((date.year(), date.month())).or_default();
            entry.0 += 1;
            entry.1.absorb(&day.totals);
        }

        by_month
            .into_iter()
            .map(|((year, month), (day_count, totals))| {
                let days_in_period = days_in_month(year, month);
                MonthlyStat {
                    month: format!("{:04}-{:02}", year, month),
                    year,
                    month_of_year: month,
                    day_count,
                    days_in_period,
                    is_complete: is_month_complete(day_count, days_in_period, config.completeness_ratio),
                    totals,
                }
            })
            .collect()
    }

    // ==========================================
    // 年汇总
    // ==========================================

    /// 按年汇总（月序列折叠），12 个月均有数据才算完整
    pub fn rollup_yearly(&self, monthly: &[MonthlyStat]) -> Vec<YearlyStat> {
        let mut by_year: BTreeMap<i32, YearlyStat> = BTreeMap::new();

        for month in monthly {
            let entry = by_year.entry(month.year).or_insert_with(|| YearlyStat {
                year: month.year,
                day_count: 0,
                month_count: 0,
                is_complete: false,
                totals: StatTotals::default(),
            });
            entry.day_count += month.day_count;
            entry.month_count += 1;
            entry.totals.absorb(&month.totals);
        }

        by_year
            .into_values()
            .map(|mut y| {
                y.is_complete = y.month_count == 12;
                y
            })
            .collect()
    }

    // ==========================================
    // 相邻周期对比
    // ==========================================

    /// 相邻月份对比（必须是日历上连续的两个完整月）
    pub fn month_deltas(&self, monthly: &[MonthlyStat]) -> Vec<PeriodDelta> {
        monthly
            .windows(2)
            .filter_map(|pair| {
                let (prev, cur) = (&pair[0], &pair[1]);
                let consecutive = next_month(prev.year, prev.month_of_year)
                    == (cur.year, cur.month_of_year);
                (consecutive && prev.is_complete && cur.is_complete).then(|| {
                    period_delta(&cur.month, &prev.month, &cur.totals, &prev.totals)
                })
            })
            .collect()
    }

    /// 相邻年份对比（两年都完整）
    pub fn year_deltas(&self, yearly: &[YearlyStat]) -> Vec<PeriodDelta> {
        yearly
            .windows(2)
            .filter_map(|pair| {
                let (prev, cur) = (&pair[0], &pair[1]);
                (cur.year == prev.year + 1 && prev.is_complete && cur.is_complete).then(|| {
                    period_delta(
                        &cur.year.to_string(),
                        &prev.year.to_string(),
                        &cur.totals,
                        &prev.totals,
                    )
                })
            })
            .collect()
    }
}

/// 单条记录计入日统计
fn accumulate(totals: &mut StatTotals, record: &VisitRecord, config: &CalendarConfig) {
    totals.count += 1;
    if record.ems {
        totals.ems_count += 1;
    }
    if record.hospitalized {
        totals.hospitalized_count += 1;
    } else {
        totals.discharged_count += 1;
    }
    // 夜班按到达小时判定；无到达时刻不计夜班
    if let Some(hour) = record.arrival.as_ref().and_then(|a| a.hour()) {
        if config.is_night_hour(hour) {
            totals.night_count += 1;
        }
    }
    if let Some(minutes) = record.duration_minutes() {
        totals.duration_minutes_sum += minutes as f64;
        totals.duration_samples += 1;
        if record.hospitalized {
            totals.hospitalized_duration_minutes_sum += minutes as f64;
            totals.hospitalized_duration_samples += 1;
        }
    }
}

fn period_delta(
    period: &str,
    previous_period: &str,
    current: &StatTotals,
    previous: &StatTotals,
) -> PeriodDelta {
    let count_delta = current.count as i64 - previous.count as i64;
    let count_change = share(current.count, previous.count).map(|r| r - 1.0);
    PeriodDelta {
        period: period.to_string(),
        previous_period: previous_period.to_string(),
        count_delta,
        count_change,
        hospitalized_share_delta: delta(current.hospitalized_share(), previous.hospitalized_share()),
        avg_duration_delta: delta(current.avg_duration_minutes(), previous.avg_duration_minutes()),
    }
}

fn is_month_complete(day_count: u32, days_in_period: u32, completeness_ratio: f64) -> bool {
    days_in_period > 0 && day_count as f64 >= completeness_ratio * days_in_period as f64
}

fn next_month(year: i32, month: u32) -> (i32, u32) {
    if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    }
}

/// 当月日历天数
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (ny, nm) = next_month(year, month);
    match (
        NaiveDate::from_ymd_opt(year, month, 1),
        NaiveDate::from_ymd_opt(ny, nm, 1),
    ) {
        (Some(first), Some(next)) => (next - first).num_days() as u32,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::VisitTimestamp;

    fn visit(y: i32, m: u32, d: u32, h: u32) -> VisitRecord {
        VisitRecord::new(Some(VisitTimestamp::new(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, 0, 0)
                .unwrap(),
        )))
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(2023, 2), 28);
        assert_eq!(days_in_month(2024, 12), 31);
    }

    #[test]
    fn test_night_count_wraps_midnight() {
        let engine = CalendarRollupEngine::new();
        let config = CalendarConfig::default();
        let records = vec![visit(2024, 3, 1, 22), visit(2024, 3, 1, 3), visit(2024, 3, 1, 12)];
        let daily = engine.rollup_daily(&records, &config);
        assert_eq!(daily.len(), 1);
        assert_eq!(daily[0].totals.count, 3);
        assert_eq!(daily[0].totals.night_count, 2);
        assert_eq!(daily[0].totals.discharged_count, 3);
    }

    #[test]
    fn test_duration_denominator_is_sample_count() {
        let engine = CalendarRollupEngine::new();
        let mut with_discharge = visit(2024, 3, 1, 10);
        with_discharge.discharge = Some(VisitTimestamp::new(
            NaiveDate::from_ymd_opt(2024, 3, 1)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap(),
        ));
        let records = vec![with_discharge, visit(2024, 3, 1, 11)];
        let daily = engine.rollup_daily(&records, &CalendarConfig::default());
        assert_eq!(daily[0].totals.avg_duration_minutes(), Some(120.0));
    }

    #[test]
    fn test_malformed_daily_key_is_skipped() {
        let engine = CalendarRollupEngine::new();
        let daily = vec![
            DailyStat {
                date: "2024-03-01".to_string(),
                totals: StatTotals {
                    count: 2,
                    ..Default::default()
                },
            },
            DailyStat {
                date: "not-a-date".to_string(),
                totals: StatTotals {
                    count: 5,
                    ..Default::default()
                },
            },
        ];
        let monthly = engine.rollup_monthly(&daily, &CalendarConfig::default());
        assert_eq!(monthly.len(), 1);
        assert_eq!(monthly[0].totals.count, 2);
        assert!(!monthly[0].is_complete);
    }

    #[test]
    fn test_incomplete_months_produce_no_delta() {
        let engine = CalendarRollupEngine::new();
        let config = CalendarConfig::default();
        // 三月全月、四月仅一天
        let mut records: Vec<VisitRecord> = (1..=31).map(|d| visit(2024, 3, d, 10)).collect();
        records.push(visit(2024, 4, 1, 10));
        let series = engine.build_series(&records, &config);
        assert_eq!(series.monthly.len(), 2);
        assert!(series.monthly[0].is_complete);
        assert!(!series.monthly[1].is_complete);
        assert!(series.month_deltas.is_empty());
    }

    #[test]
    fn test_complete_consecutive_months_produce_delta() {
        let engine = CalendarRollupEngine::new();
        let mut records: Vec<VisitRecord> = (1..=31).map(|d| visit(2024, 3, d, 10)).collect();
        records.extend((1..=30).flat_map(|d| [visit(2024, 4, d, 10), visit(2024, 4, d, 11)]));
        let series = engine.build_series(&records, &CalendarConfig::default());
        assert_eq!(series.month_deltas.len(), 1);
        let d = &series.month_deltas[0];
        assert_eq!(d.period, "2024-04");
        assert_eq!(d.previous_period, "2024-03");
        assert_eq!(d.count_delta, 29);
        assert!(d.avg_duration_delta.is_none());
    }
}
