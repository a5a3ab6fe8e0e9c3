// ==========================================
// 急诊就诊统计引擎 - 诊断报表
// ==========================================
// 职责: 诊断分组频次 + 年龄段 × 诊断分组热力图
// 口径: 诊断分组 = ICD-10 类目（字母 + 两位数字），无法识别的编码不计入
// ==========================================

use crate::domain::ratio::percent;
use crate::domain::record::VisitRecord;
use crate::domain::types::{AgeBand, SortDirection};
use crate::report::collation::LabelCollator;
use crate::report::models::{
    AgeDiagnosisCell, AgeDiagnosisHeatmap, BucketLabels, DiagnosisReport, ReportRow, RowKind,
};
use crate::report::ranking::sort_ranked;
use crate::report::suppression::{apply_top_n, collapse_small_groups, fill_percents};
use std::collections::{BTreeMap, HashMap, HashSet};

/// 诊断分组频次
pub fn diagnosis_frequency(
    records: &[VisitRecord],
    top_n: usize,
    min_group_size: u64,
    collator: &LabelCollator,
    labels: &BucketLabels,
) -> DiagnosisReport {
    let counts = count_groups(records);
    let total: u64 = counts.values().sum();

    let rows: Vec<ReportRow> = counts
        .into_iter()
        .map(|(label, count)| ReportRow {
            label,
            count,
            percent: None,
            kind: RowKind::Group,
        })
        .collect();

    let mut rows = collapse_small_groups(rows, min_group_size, &labels.insufficient_sample);
    sort_ranked(&mut rows, collator, SortDirection::Descending);
    let mut rows = apply_top_n(rows, top_n, &labels.other);
    fill_percents(&mut rows, total);

    DiagnosisReport {
        rows,
        total,
        min_group_size,
    }
}

/// 年龄段 × 诊断分组热力图
///
/// 列为频次最高的 top_n 个诊断分组，其余并入"其他"列，
/// 因此每个年龄段的占比合计为 100。
pub fn age_diagnosis_heatmap(
    records: &[VisitRecord],
    top_n: usize,
    collator: &LabelCollator,
    labels: &BucketLabels,
) -> AgeDiagnosisHeatmap {
    let mut totals_by_group = count_groups(records)
        .into_iter()
        .map(|(label, count)| ReportRow {
            label,
            count,
            percent: None,
            kind: RowKind::Group,
        })
        .collect::<Vec<_>>();
    sort_ranked(&mut totals_by_group, collator, SortDirection::Descending);

    let top: HashSet<String> = totals_by_group
        .iter()
        .take(top_n)
        .map(|r| r.label.clone())
        .collect();
    let mut diagnoses: Vec<String> = totals_by_group
        .iter()
        .take(top_n)
        .map(|r| r.label.clone())
        .collect();
    let has_other = totals_by_group.len() > top_n;
    if has_other {
        diagnoses.push(labels.other.clone());
    }

    let mut band_totals: HashMap<AgeBand, u64> = HashMap::new();
    let mut cell_counts: HashMap<(AgeBand, String), u64> = HashMap::new();
    for record in records {
        let Some(group) = record.diagnosis_group() else {
            continue;
        };
        let column = if top.contains(&group) {
            group
        } else {
            labels.other.clone()
        };
        *band_totals.entry(record.age_band).or_default() += 1;
        *cell_counts.entry((record.age_band, column)).or_default() += 1;
    }

    let age_bands: Vec<AgeBand> = AgeBand::ALL
        .iter()
        .copied()
        .filter(|b| band_totals.contains_key(b))
        .collect();

    let mut cells = Vec::with_capacity(age_bands.len() * diagnoses.len());
    for band in &age_bands {
        let band_total = band_totals.get(band).copied().unwrap_or(0);
        for diagnosis in &diagnoses {
            let count = cell_counts
                .get(&(*band, diagnosis.clone()))
                .copied()
                .unwrap_or(0);
            cells.push(AgeDiagnosisCell {
                age_band: *band,
                diagnosis: diagnosis.clone(),
                count,
                percent_in_band: percent(count, band_total),
                band_total,
            });
        }
    }

    AgeDiagnosisHeatmap {
        age_bands,
        diagnoses,
        cells,
    }
}

fn count_groups(records: &[VisitRecord]) -> BTreeMap<String, u64> {
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for group in records.iter().filter_map(|r| r.diagnosis_group()) {
        *counts.entry(group).or_default() += 1;
    }
    counts
}
