// ==========================================
// 急诊就诊统计引擎 - 转诊片区 × 住院
// ==========================================
// 职责: 持转诊单就诊按社区卫生服务片区分组，计算住院占比
// 口径: 年度趋势按班次归属年份（早于班次起始时刻的就诊计入前一天）
// 红线: 片区类型仅为文本启发式，不作为权威分类
// 规则: 无片区的记录单独成行（Unassigned），不与同名的真实片区合并，不进入趋势
// ==========================================

use crate::domain::ratio::percent;
use crate::domain::record::VisitRecord;
use crate::domain::types::{CatchmentKind, Referral, SortDirection};
use crate::report::collation::LabelCollator;
use crate::report::models::{
    BucketLabels, CatchmentKindSummary, CatchmentReport, CatchmentRow, CatchmentTrend,
    CatchmentTrendPoint, RowKind,
};
use crate::report::ranking::sort_ranked;
use crate::report::suppression::{meets_min_group, trend_candidates};
use std::collections::{BTreeMap, HashMap};

/// 片区类型启发式
pub fn classify_catchment(label: &str) -> CatchmentKind {
    let lower = label.to_lowercase();
    let tokens: Vec<&str> = lower
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .collect();
    let has = |words: &[&str]| tokens.iter().any(|t| words.contains(t));

    if has(&["district", "rajono", "rajonas", "raj", "county"]) {
        CatchmentKind::District
    } else if has(&["city", "miesto", "miestas", "town", "urban"]) {
        CatchmentKind::City
    } else {
        CatchmentKind::Unknown
    }
}

#[derive(Default)]
struct Tally {
    count: u64,
    hospitalized: u64,
}

impl Tally {
    fn add(&mut self, hospitalized: bool) {
        self.count += 1;
        if hospitalized {
            self.hospitalized += 1;
        }
    }
}

/// 片区报表
///
/// # 参数
/// - records: 当前范围内的记录（明细行与分类分布）
/// - trend_records: 趋势使用的记录（跨全部年份）
pub fn catchment_report(
    records: &[VisitRecord],
    trend_records: &[VisitRecord],
    min_group_size: u64,
    shift_start_hour: u32,
    collator: &LabelCollator,
    labels: &BucketLabels,
) -> CatchmentReport {
    // None = 无片区
    let mut by_area: HashMap<Option<String>, Tally> = HashMap::new();
    for record in records.iter().filter(|r| r.referral == Referral::WithReferral) {
        by_area
            .entry(record.primary_care_area.clone())
            .or_default()
            .add(record.hospitalized);
    }
    let total_referred: u64 = by_area.values().map(|t| t.count).sum();

    let mut rows: Vec<CatchmentRow> = by_area
        .into_iter()
        .map(|(area, tally)| {
            let (label, row_kind, kind) = match area {
                Some(label) => {
                    let kind = classify_catchment(&label);
                    (label, RowKind::Group, kind)
                }
                None => (labels.unknown.clone(), RowKind::Unassigned, CatchmentKind::Unknown),
            };
            CatchmentRow {
                label,
                row_kind,
                kind,
                count: tally.count,
                hospitalized: tally.hospitalized,
                hospitalized_percent: percent(tally.hospitalized, tally.count),
                percent: percent(tally.count, total_referred),
                suppressed: !meets_min_group(tally.count, min_group_size),
            }
        })
        .collect();
    sort_ranked(&mut rows, collator, SortDirection::Descending);

    let by_kind = CatchmentKind::ALL
        .into_iter()
        .map(|kind| {
            let (count, hospitalized) = rows
                .iter()
                .filter(|r| r.kind == kind)
                .fold((0, 0), |(c, h), r| (c + r.count, h + r.hospitalized));
            CatchmentKindSummary {
                kind,
                count,
                hospitalized,
                hospitalized_percent: percent(hospitalized, count),
            }
        })
        .collect();

    let candidates = trend_candidates(&rows);

    let mut trend_tallies: HashMap<String, BTreeMap<i32, Tally>> = HashMap::new();
    for record in trend_records
        .iter()
        .filter(|r| r.referral == Referral::WithReferral)
    {
        let Some(year) = record.shift_adjusted_year(shift_start_hour) else {
            continue;
        };
        let Some(label) = record.primary_care_area.as_ref() else {
            continue;
        };
        if !candidates.contains(label) {
            continue;
        }
        trend_tallies
            .entry(label.clone())
            .or_default()
            .entry(year)
            .or_default()
            .add(record.hospitalized);
    }

    let trends = candidates
        .iter()
        .map(|label| CatchmentTrend {
            label: label.clone(),
            kind: classify_catchment(label),
            points: trend_tallies
                .remove(label)
                .unwrap_or_default()
                .into_iter()
                .map(|(year, tally)| CatchmentTrendPoint {
                    year,
                    count: tally.count,
                    hospitalized: tally.hospitalized,
                    hospitalized_percent: percent(tally.hospitalized, tally.count),
                })
                .collect(),
        })
        .collect();

    CatchmentReport {
        rows,
        by_kind,
        trends,
        trend_candidates: candidates,
        total_referred,
        min_group_size,
    }
}
