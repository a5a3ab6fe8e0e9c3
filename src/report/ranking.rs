// ==========================================
// 急诊就诊统计引擎 - 报表行排序
// ==========================================
// 规则: 主指标排序（默认降序），并列按语言规则的标签升序
// 规则: 合成桶（其他/样本不足）固定排在最后
// ==========================================

use crate::domain::types::SortDirection;
use crate::report::collation::LabelCollator;
use crate::report::models::{CatchmentRow, DepartmentRow, ReportRow};
use std::cmp::Ordering;

/// 可排序的报表行
pub trait Ranked {
    /// 主指标
    fn metric(&self) -> f64;
    fn label(&self) -> &str;
    /// 固定排在最后的合成行
    fn pinned_last(&self) -> bool {
        false
    }
}

impl Ranked for ReportRow {
    fn metric(&self) -> f64 {
        self.count as f64
    }
    fn label(&self) -> &str {
        &self.label
    }
    fn pinned_last(&self) -> bool {
        self.kind.is_synthetic()
    }
}

impl Ranked for DepartmentRow {
    fn metric(&self) -> f64 {
        self.count as f64
    }
    fn label(&self) -> &str {
        &self.label
    }
    fn pinned_last(&self) -> bool {
        self.kind.is_synthetic()
    }
}

impl Ranked for CatchmentRow {
    fn metric(&self) -> f64 {
        self.count as f64
    }
    fn label(&self) -> &str {
        &self.label
    }
    fn pinned_last(&self) -> bool {
        self.row_kind.is_synthetic()
    }
}

/// 稳定排序
pub fn sort_ranked<T: Ranked>(rows: &mut [T], collator: &LabelCollator, direction: SortDirection) {
    rows.sort_by(|a, b| compare_ranked(a, b, collator, direction));
}

pub fn compare_ranked<T: Ranked>(
    a: &T,
    b: &T,
    collator: &LabelCollator,
    direction: SortDirection,
) -> Ordering {
    let by_metric = a.metric().total_cmp(&b.metric());
    let by_metric = match direction {
        SortDirection::Descending => by_metric.reverse(),
        SortDirection::Ascending => by_metric,
    };
    a.pinned_last()
        .cmp(&b.pinned_last())
        .then(by_metric)
        .then_with(|| collator.compare(a.label(), b.label()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::models::RowKind;

    fn row(label: &str, count: u64, kind: RowKind) -> ReportRow {
        ReportRow {
            label: label.to_string(),
            count,
            percent: None,
            kind,
        }
    }

    #[test]
    fn test_ties_break_by_label() {
        let collator = LabelCollator::new("en");
        let mut rows = vec![
            row("beta", 3, RowKind::Group),
            row("Other", 50, RowKind::Other),
            row("alpha", 3, RowKind::Group),
            row("gamma", 9, RowKind::Group),
        ];
        sort_ranked(&mut rows, &collator, SortDirection::Descending);
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["gamma", "alpha", "beta", "Other"]);

        sort_ranked(&mut rows, &collator, SortDirection::Ascending);
        let labels: Vec<&str> = rows.iter().map(|r| r.label.as_str()).collect();
        assert_eq!(labels, vec!["alpha", "beta", "gamma", "Other"]);
    }
}
