// ==========================================
// 急诊就诊统计引擎 - 报表视图模型
// ==========================================
// 职责: 报表包 → 展示就绪的行（排序方向、剔除样本不足行、趋势目标）
// 说明: 只依赖报表包，不回读记录；排序切换不触发报表重算
// ==========================================

use crate::domain::types::{CatchmentKind, Referral, Sex, SortDirection};
use crate::i18n::t;
use crate::report::collation::LabelCollator;
use crate::report::models::{CatchmentRow, CatchmentTrend, DepartmentRow, ReportBundle, ReportRow};
use crate::report::ranking::sort_ranked;
use serde::{Deserialize, Serialize};

/// 仅影响展示的参数
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ViewParams {
    pub sort_direction: SortDirection,
    /// 选中的片区趋势目标（不在候选中时回退为第一个候选）
    pub catchment_target: Option<String>,
}

impl ViewParams {
    pub fn cache_key(&self) -> String {
        format!(
            "sort={}|target={}",
            self.sort_direction,
            self.catchment_target.as_deref().unwrap_or("")
        )
    }
}

/// 带显示标签的枚举项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Labeled<T> {
    pub value: T,
    pub label: String,
}

fn labeled<T: Copy>(values: &[T], key: impl Fn(&T) -> &'static str, locale: &str) -> Vec<Labeled<T>> {
    values
        .iter()
        .map(|v| Labeled {
            value: *v,
            label: t(key(v), locale),
        })
        .collect()
}

/// 报表视图模型
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportViewModel {
    pub sort_direction: SortDirection,
    pub diagnosis_rows: Vec<ReportRow>,
    pub department_rows: Vec<DepartmentRow>,
    /// 已剔除样本不足的片区行
    pub catchment_rows: Vec<CatchmentRow>,
    pub suppressed_catchments: usize,
    pub trend_candidates: Vec<String>,
    pub selected_trend: Option<CatchmentTrend>,
    pub referral_labels: Vec<Labeled<Referral>>,
    pub sex_labels: Vec<Labeled<Sex>>,
    pub catchment_kind_labels: Vec<Labeled<CatchmentKind>>,
}

/// 构建视图模型
pub fn build_view_model(bundle: &ReportBundle, params: &ViewParams, locale: &str) -> ReportViewModel {
    let collator = LabelCollator::new(locale);
    let direction = params.sort_direction;

    let mut diagnosis_rows = bundle.diagnosis.rows.clone();
    sort_ranked(&mut diagnosis_rows, &collator, direction);

    let mut department_rows = bundle.departments.clone();
    sort_ranked(&mut department_rows, &collator, direction);

    let (mut catchment_rows, suppressed): (Vec<CatchmentRow>, Vec<CatchmentRow>) = bundle
        .catchment
        .rows
        .iter()
        .cloned()
        .partition(|r| !r.suppressed);
    sort_ranked(&mut catchment_rows, &collator, direction);

    let trends = &bundle.catchment.trends;
    let selected_trend = params
        .catchment_target
        .as_ref()
        .and_then(|target| trends.iter().find(|tr| &tr.label == target))
        .or_else(|| trends.first())
        .cloned();

    ReportViewModel {
        sort_direction: direction,
        diagnosis_rows,
        department_rows,
        catchment_rows,
        suppressed_catchments: suppressed.len(),
        trend_candidates: bundle.catchment.trend_candidates.clone(),
        selected_trend,
        referral_labels: labeled(&Referral::ALL, Referral::label_key, locale),
        sex_labels: labeled(&Sex::ALL, Sex::label_key, locale),
        catchment_kind_labels: labeled(&CatchmentKind::ALL, CatchmentKind::label_key, locale),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalendarConfig;
    use crate::domain::record::{VisitRecord, VisitTimestamp};
    use crate::engine::ScopeResolver;
    use crate::report::{ReportEngine, ReportParams};
    use chrono::NaiveDate;

    fn bundle() -> ReportBundle {
        let records: Vec<VisitRecord> = ["Alpha", "Alpha", "Beta"]
            .iter()
            .map(|area| {
                let mut r = VisitRecord::new(Some(VisitTimestamp::new(
                    NaiveDate::from_ymd_opt(2024, 3, 1)
                        .unwrap()
                        .and_hms_opt(12, 0, 0)
                        .unwrap(),
                )));
                r.referral = Referral::WithReferral;
                r.primary_care_area = Some(area.to_string());
                r
            })
            .collect();
        let params = ReportParams {
            min_group_size: 2,
            ..Default::default()
        };
        let scope = ScopeResolver::new().resolve(&records, params.year);
        ReportEngine::new().compute_bundle(&records, &scope, &params, &CalendarConfig::default())
    }

    #[test]
    fn test_labels_follow_locale() {
        let vm = build_view_model(&bundle(), &ViewParams::default(), "zh-CN");
        assert_eq!(vm.referral_labels[0].label, "持转诊单");
        assert_eq!(vm.sex_labels.len(), 3);
        assert_eq!(vm.catchment_kind_labels[1].label, "城市");
    }

    #[test]
    fn test_suppressed_rows_leave_view() {
        let vm = build_view_model(&bundle(), &ViewParams::default(), "en");
        assert_eq!(vm.catchment_rows.len(), 1);
        assert_eq!(vm.catchment_rows[0].label, "Alpha");
        assert_eq!(vm.suppressed_catchments, 1);
        assert_eq!(vm.selected_trend.map(|t| t.label), Some("Alpha".to_string()));
    }
}
