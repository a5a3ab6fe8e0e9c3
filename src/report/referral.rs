// ==========================================
// 急诊就诊统计引擎 - 转诊来源报表
// ==========================================
// 职责: 转诊按年趋势 / 转诊 × 去向按年趋势 / 转诊 × 月份热力图
// 口径: 年份与月份均取日历日期（到达优先，缺失取离院），不做班次调整
// ==========================================

use crate::domain::ratio::percent;
use crate::domain::record::VisitRecord;
use crate::domain::types::Referral;
use crate::report::models::{
    ReferralDispositionPoint, ReferralMonthCell, ReferralMonthHeatmap, ReferralYearPoint,
};
use chrono::Datelike;
use std::collections::BTreeMap;

/// 转诊来源按年趋势（年份升序）
pub fn referral_by_year(records: &[VisitRecord]) -> Vec<ReferralYearPoint> {
    let mut by_year: BTreeMap<i32, [u64; 3]> = BTreeMap::new();
    for record in records {
        let Some(year) = record.calendar_year() else {
            continue;
        };
        by_year.entry(year).or_default()[referral_slot(record.referral)] += 1;
    }

    by_year
        .into_iter()
        .map(|(year, [with, without, unknown])| {
            let total = with + without + unknown;
            ReferralYearPoint {
                year,
                with_referral: with,
                without_referral: without,
                unknown,
                total,
                with_referral_percent: percent(with, total),
            }
        })
        .collect()
}

/// 转诊来源 × 去向 按年趋势
///
/// 输出按 (年份, 转诊来源固定顺序) 排列，无数据的组合不输出。
pub fn referral_disposition_by_year(records: &[VisitRecord]) -> Vec<ReferralDispositionPoint> {
    let mut by_key: BTreeMap<(i32, usize), (u64, u64)> = BTreeMap::new();
    for record in records {
        let Some(year) = record.calendar_year() else {
            continue;
        };
        let entry = by_key
            .entry((year, referral_slot(record.referral)))
            .or_default();
        if record.hospitalized {
            entry.0 += 1;
        } else {
            entry.1 += 1;
        }
    }

    by_key
        .into_iter()
        .map(|((year, slot), (hospitalized, discharged))| {
            let total = hospitalized + discharged;
            ReferralDispositionPoint {
                year,
                referral: Referral::ALL[slot],
                hospitalized,
                discharged,
                total,
                hospitalized_percent: percent(hospitalized, total),
            }
        })
        .collect()
}

/// 转诊来源 × 月份热力图（12 × 3，占比为当月内占比）
pub fn referral_by_month(records: &[VisitRecord]) -> ReferralMonthHeatmap {
    let mut counts = [[0u64; 3]; 12];
    for record in records {
        let Some(date) = record.calendar_date() else {
            continue;
        };
        counts[date.month0() as usize][referral_slot(record.referral)] += 1;
    }

    let mut cells = Vec::with_capacity(36);
    let mut max_count = 0;
    for (m, row) in counts.iter().enumerate() {
        let month_total: u64 = row.iter().sum();
        for (slot, count) in row.iter().enumerate() {
            max_count = max_count.max(*count);
            cells.push(ReferralMonthCell {
                month_of_year: m as u32 + 1,
                referral: Referral::ALL[slot],
                count: *count,
                percent_in_month: percent(*count, month_total),
                month_total,
            });
        }
    }

    ReferralMonthHeatmap { cells, max_count }
}

fn referral_slot(referral: Referral) -> usize {
    match referral {
        Referral::WithReferral => 0,
        Referral::WithoutReferral => 1,
        Referral::Unknown => 2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::VisitTimestamp;
    use chrono::NaiveDate;

    fn visit(y: i32, m: u32, referral: Referral, hospitalized: bool) -> VisitRecord {
        let mut r = VisitRecord::new(Some(VisitTimestamp::new(
            NaiveDate::from_ymd_opt(y, m, 10)
                .unwrap()
                .and_hms_opt(2, 0, 0)
                .unwrap(),
        )));
        r.referral = referral;
        r.hospitalized = hospitalized;
        r
    }

    #[test]
    fn test_referral_by_year_uses_calendar_year() {
        // 1 月 10 日 02:00 仍计入当年（不做班次调整）
        let records = vec![
            visit(2024, 1, Referral::WithReferral, false),
            visit(2024, 1, Referral::WithoutReferral, false),
            visit(2023, 5, Referral::WithReferral, true),
        ];
        let points = referral_by_year(&records);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].year, 2023);
        assert_eq!(points[1].total, 2);
        assert_eq!(points[1].with_referral_percent, Some(50.0));
    }

    #[test]
    fn test_disposition_split() {
        let records = vec![
            visit(2024, 3, Referral::WithReferral, true),
            visit(2024, 3, Referral::WithReferral, false),
            visit(2024, 3, Referral::WithReferral, false),
        ];
        let points = referral_disposition_by_year(&records);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].referral, Referral::WithReferral);
        assert_eq!(points[0].hospitalized, 1);
        assert_eq!(points[0].discharged, 2);
    }

    #[test]
    fn test_month_heatmap_shares_within_month() {
        let records = vec![
            visit(2024, 3, Referral::WithReferral, false),
            visit(2024, 3, Referral::Unknown, false),
        ];
        let heatmap = referral_by_month(&records);
        assert_eq!(heatmap.cells.len(), 36);
        assert_eq!(heatmap.max_count, 1);
        let march_with = heatmap
            .cells
            .iter()
            .find(|c| c.month_of_year == 3 && c.referral == Referral::WithReferral)
            .unwrap();
        assert_eq!(march_with.percent_in_month, Some(50.0));
        let january = heatmap.cells.iter().find(|c| c.month_of_year == 1).unwrap();
        assert_eq!(january.percent_in_month, None);
    }
}
