// ==========================================
// 急诊就诊统计引擎 - 科室 / 人口学分布
// ==========================================
// 职责: 科室分布（含住院占比、平均停留时长）+ 性别 × 年龄段分布
// ==========================================

use crate::domain::ratio::{mean, percent};
use crate::domain::record::VisitRecord;
use crate::domain::types::{AgeBand, Sex, SortDirection};
use crate::report::collation::LabelCollator;
use crate::report::models::{BucketLabels, DepartmentRow, RowKind, SexAgeCell};
use crate::report::ranking::sort_ranked;
use crate::report::suppression::partition_by_min_group;
use std::collections::HashMap;

#[derive(Default, Clone)]
struct DepartmentTally {
    count: u64,
    hospitalized: u64,
    duration_sum: f64,
    duration_samples: u64,
}

impl DepartmentTally {
    fn absorb(&mut self, other: &DepartmentTally) {
        self.count += other.count;
        self.hospitalized += other.hospitalized;
        self.duration_sum += other.duration_sum;
        self.duration_samples += other.duration_samples;
    }

    fn into_row(self, label: String, total: u64, kind: RowKind) -> DepartmentRow {
        DepartmentRow {
            label,
            count: self.count,
            percent: percent(self.count, total),
            hospitalized_percent: percent(self.hospitalized, self.count),
            avg_duration_minutes: mean(self.duration_sum, self.duration_samples),
            kind,
        }
    }
}

/// 科室分布
///
/// 无科室的记录归入"未知"；样本不足的科室合并为一行。
pub fn department_breakdown(
    records: &[VisitRecord],
    min_group_size: u64,
    collator: &LabelCollator,
    labels: &BucketLabels,
) -> Vec<DepartmentRow> {
    let mut by_department: HashMap<String, DepartmentTally> = HashMap::new();
    for record in records {
        let label = record
            .department
            .clone()
            .unwrap_or_else(|| labels.unknown.clone());
        let tally = by_department.entry(label).or_default();
        tally.count += 1;
        if record.hospitalized {
            tally.hospitalized += 1;
        }
        if let Some(minutes) = record.duration_minutes() {
            tally.duration_sum += minutes as f64;
            tally.duration_samples += 1;
        }
    }
    let total = records.len() as u64;

    let (kept, small) = partition_by_min_group(
        by_department.into_iter().collect::<Vec<_>>(),
        min_group_size,
        |(_, t)| t.count,
    );

    let mut rows: Vec<DepartmentRow> = kept
        .into_iter()
        .map(|(label, tally)| tally.into_row(label, total, RowKind::Group))
        .collect();

    if !small.is_empty() {
        let mut merged = DepartmentTally::default();
        for (_, tally) in &small {
            merged.absorb(tally);
        }
        rows.push(merged.into_row(
            labels.insufficient_sample.clone(),
            total,
            RowKind::InsufficientSample,
        ));
    }

    sort_ranked(&mut rows, collator, SortDirection::Descending);
    rows
}

/// 性别 × 年龄段分布（仅输出有数据的年龄段，占比为年龄段内占比）
pub fn sex_age_distribution(records: &[VisitRecord]) -> Vec<SexAgeCell> {
    let mut counts: HashMap<(AgeBand, Sex), u64> = HashMap::new();
    let mut band_totals: HashMap<AgeBand, u64> = HashMap::new();
    for record in records {
        *counts.entry((record.age_band, record.sex)).or_default() += 1;
        *band_totals.entry(record.age_band).or_default() += 1;
    }

    AgeBand::ALL
        .iter()
        .filter_map(|band| band_totals.get(band).map(|total| (*band, *total)))
        .flat_map(|(band, band_total)| {
            let counts = &counts;
            Sex::ALL.iter().map(move |sex| {
                let count = counts.get(&(band, *sex)).copied().unwrap_or(0);
                SexAgeCell {
                    age_band: band,
                    sex: *sex,
                    count,
                    percent_in_band: percent(count, band_total),
                    band_total,
                }
            })
        })
        .collect()
}
