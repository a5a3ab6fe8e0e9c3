// ==========================================
// 急诊就诊统计引擎 - 小样本抑制
// ==========================================
// 规则: 计数 < min_group_size 的分组不单独展示
//       (合并为"其他/样本不足"桶，或排除出趋势候选)
// ==========================================

use crate::domain::ratio::percent;
use crate::report::models::{CatchmentRow, ReportRow, RowKind};

/// 是否达到最小分组样本量
pub fn meets_min_group(count: u64, min_group_size: u64) -> bool {
    count >= min_group_size
}

/// 按最小样本量拆分分组: (保留, 样本不足)
pub fn partition_by_min_group<T>(
    groups: Vec<T>,
    min_group_size: u64,
    count: impl Fn(&T) -> u64,
) -> (Vec<T>, Vec<T>) {
    groups
        .into_iter()
        .partition(|g| meets_min_group(count(g), min_group_size))
}

/// 将样本不足的行合并为一个桶
///
/// 没有样本不足行时不产生桶。
pub fn collapse_small_groups(
    rows: Vec<ReportRow>,
    min_group_size: u64,
    bucket_label: &str,
) -> Vec<ReportRow> {
    let (mut kept, small) = partition_by_min_group(rows, min_group_size, |r| r.count);
    if !small.is_empty() {
        tracing::debug!(collapsed = small.len(), min_group_size, "合并样本不足分组");
        kept.push(ReportRow {
            label: bucket_label.to_string(),
            count: small.iter().map(|r| r.count).sum(),
            percent: None,
            kind: RowKind::InsufficientSample,
        });
    }
    kept
}

/// 保留前 top_n 个普通分组，其余合并为"其他"
///
/// 输入需已按主指标排序；合成桶不占 top_n 名额。
pub fn apply_top_n(rows: Vec<ReportRow>, top_n: usize, other_label: &str) -> Vec<ReportRow> {
    let (groups, synthetic): (Vec<ReportRow>, Vec<ReportRow>) =
        rows.into_iter().partition(|r| !r.kind.is_synthetic());
    if groups.len() <= top_n {
        return groups.into_iter().chain(synthetic).collect();
    }
    let mut out: Vec<ReportRow> = Vec::with_capacity(top_n + 2);
    let mut other = 0u64;
    for (i, row) in groups.into_iter().enumerate() {
        if i < top_n {
            out.push(row);
        } else {
            other += row.count;
        }
    }
    out.push(ReportRow {
        label: other_label.to_string(),
        count: other,
        percent: None,
        kind: RowKind::Other,
    });
    out.extend(synthetic);
    out
}

/// 填充百分比
pub fn fill_percents(rows: &mut [ReportRow], total: u64) {
    for row in rows {
        row.percent = percent(row.count, total);
    }
}

/// 趋势候选：剔除样本不足的片区
pub fn trend_candidates(rows: &[CatchmentRow]) -> Vec<String> {
    rows.iter()
        .filter(|r| !r.suppressed && !r.row_kind.is_synthetic())
        .map(|r| r.label.clone())
        .collect()
}
