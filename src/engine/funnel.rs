// ==========================================
// 急诊就诊统计引擎 - 去向漏斗
// ==========================================
// 职责: 到达 → 离院 / 住院 漏斗，可按年份限定
// 规则: 未指定年份时推断；指定年份无数据时回退为整段序列
// ==========================================

use crate::domain::stats::DailyStat;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// 漏斗结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunnelResult {
    pub arrived: u64,
    pub discharged: u64,
    pub hospitalized: u64,
    /// 实际限定的年份；None 表示跨全部年份汇总
    pub year: Option<i32>,
}

pub struct FunnelEngine;

impl Default for FunnelEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl FunnelEngine {
    pub fn new() -> Self {
        Self
    }

    /// 计算漏斗
    ///
    /// # 参数
    /// - daily: 主序列
    /// - target_year: 目标年份，None 时推断
    /// - fallback: 主序列为空时使用的备用序列
    pub fn compute(
        &self,
        daily: &[DailyStat],
        target_year: Option<i32>,
        fallback: Option<&[DailyStat]>,
    ) -> FunnelResult {
        let primary = keyed(daily);
        let using_fallback = primary.is_empty();
        let source = if using_fallback {
            fallback.map(keyed).unwrap_or_default()
        } else {
            primary
        };

        let year = target_year.or_else(|| infer_year(&source, using_fallback));

        if let Some(y) = year {
            let scoped: Vec<&DailyStat> = source
                .iter()
                .filter(|(d, _)| d.year() == y)
                .map(|(_, s)| *s)
                .collect();
            if !scoped.is_empty() {
                return aggregate(scoped.into_iter(), Some(y));
            }
            tracing::debug!(year = y, "目标年份无数据，漏斗回退为整段序列");
        }

        aggregate(source.iter().map(|(_, s)| *s), None)
    }
}

/// 可解析日期键的条目
fn keyed(daily: &[DailyStat]) -> Vec<(NaiveDate, &DailyStat)> {
    daily
        .iter()
        .filter_map(|s| {
            NaiveDate::parse_from_str(&s.date, "%Y-%m-%d")
                .ok()
                .map(|d| (d, s))
        })
        .collect()
}

/// 年份推断
///
/// 所有条目同一年 → 该年；仅有备用序列 → 备用序列最近一年；否则不限定。
fn infer_year(entries: &[(NaiveDate, &DailyStat)], using_fallback: bool) -> Option<i32> {
    let years: BTreeSet<i32> = entries.iter().map(|(d, _)| d.year()).collect();
    if years.len() == 1 {
        return years.iter().next().copied();
    }
    if using_fallback {
        return years.iter().next_back().copied();
    }
    None
}

fn aggregate<'a>(stats: impl Iterator<Item = &'a DailyStat>, year: Option<i32>) -> FunnelResult {
    let mut result = FunnelResult {
        year,
        ..Default::default()
    };
    for s in stats {
        result.arrived += s.totals.count;
        result.discharged += s.totals.discharged_count;
        result.hospitalized += s.totals.hospitalized_count;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::stats::StatTotals;

    fn day(date: &str, count: u64, hospitalized: u64) -> DailyStat {
        DailyStat {
            date: date.to_string(),
            totals: StatTotals {
                count,
                hospitalized_count: hospitalized,
                discharged_count: count - hospitalized,
                ..Default::default()
            },
        }
    }

    #[test]
    fn test_single_year_is_inferred() {
        let daily = vec![day("2024-01-01", 3, 1), day("2024-05-01", 2, 0)];
        let f = FunnelEngine::new().compute(&daily, None, None);
        assert_eq!(f.year, Some(2024));
        assert_eq!(f.arrived, 5);
        assert_eq!(f.hospitalized, 1);
        assert_eq!(f.discharged, 4);
    }

    #[test]
    fn test_multi_year_without_target_is_unscoped() {
        let daily = vec![day("2023-12-31", 3, 1), day("2024-01-01", 2, 2)];
        let f = FunnelEngine::new().compute(&daily, None, None);
        assert_eq!(f.year, None);
        assert_eq!(f.arrived, 5);
        assert_eq!(f.hospitalized, 3);
    }

    #[test]
    fn test_missing_target_year_fills_gap_with_whole_series() {
        let daily = vec![day("2023-12-31", 3, 1), day("2024-01-01", 2, 2)];
        let f = FunnelEngine::new().compute(&daily, Some(2020), None);
        assert_eq!(f.year, None);
        assert_eq!(f.arrived, 5);
    }

    #[test]
    fn test_empty_primary_uses_fallback_latest_year() {
        let fallback = vec![day("2023-06-01", 4, 1), day("2024-06-01", 6, 3)];
        let f = FunnelEngine::new().compute(&[], None, Some(&fallback));
        assert_eq!(f.year, Some(2024));
        assert_eq!(f.arrived, 6);
        assert_eq!(f.hospitalized, 3);
    }

    #[test]
    fn test_everything_empty() {
        let f = FunnelEngine::new().compute(&[], None, None);
        assert_eq!(f, FunnelResult::default());
    }
}
