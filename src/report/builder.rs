// ==========================================
// 急诊就诊统计引擎 - 报表包构建
// ==========================================
// 职责: (范围内记录, 参数) → 全部交叉分析报表
// 红线: 纯函数；排序方向不参与本层（由视图层处理）
// ==========================================

use crate::config::CalendarConfig;
use crate::domain::record::VisitRecord;
use crate::domain::types::YearFilter;
use crate::engine::scope::ScopeMeta;
use crate::report::breakdown::{department_breakdown, sex_age_distribution};
use crate::report::catchment::catchment_report;
use crate::report::collation::LabelCollator;
use crate::report::diagnosis::{age_diagnosis_heatmap, diagnosis_frequency};
use crate::report::models::{BucketLabels, ReportBundle};
use crate::report::referral::{referral_by_month, referral_by_year, referral_disposition_by_year};
use serde::{Deserialize, Serialize};
use tracing::instrument;

pub const DEFAULT_TOP_N: usize = 10;
pub const DEFAULT_MIN_GROUP_SIZE: u64 = 5;

/// 报表计算参数
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReportParams {
    pub year: YearFilter,
    pub top_n: usize,
    pub min_group_size: u64,
}

impl Default for ReportParams {
    fn default() -> Self {
        Self {
            year: YearFilter::All,
            top_n: DEFAULT_TOP_N,
            min_group_size: DEFAULT_MIN_GROUP_SIZE,
        }
    }
}

impl ReportParams {
    /// 规范化: top_n 为 0 回退默认值，min_group_size 至少为 1
    pub fn normalized(mut self) -> Self {
        if self.top_n == 0 {
            self.top_n = DEFAULT_TOP_N;
        }
        self.min_group_size = self.min_group_size.max(1);
        self
    }

    /// 计算缓存键片段（不含排序方向；日历设置仅取报表读取的部分）
    pub fn cache_key(&self, config: &CalendarConfig) -> String {
        format!(
            "year={}|top={}|min={}|{}",
            self.year,
            self.top_n,
            self.min_group_size,
            config.report_key_fragment()
        )
    }
}

pub struct ReportEngine;

impl Default for ReportEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportEngine {
    pub fn new() -> Self {
        Self
    }

    /// 构建报表包
    ///
    /// # 参数
    /// - records: 完整记录集（年度趋势跨全部年份）
    /// - scope: 已按年份解析的范围
    #[instrument(skip_all, fields(scoped = scope.record_count(), year = %scope.effective_year))]
    pub fn compute_bundle(
        &self,
        records: &[VisitRecord],
        scope: &ScopeMeta,
        params: &ReportParams,
        config: &CalendarConfig,
    ) -> ReportBundle {
        let collator = LabelCollator::new(&config.locale);
        let labels = BucketLabels::for_locale(&config.locale);
        let scoped = &scope.records;
        let extended: Vec<VisitRecord> = records
            .iter()
            .filter(|r| r.has_extended_fields())
            .cloned()
            .collect();

        ReportBundle {
            year: scope.effective_year,
            record_count: scoped.len(),
            diagnosis: diagnosis_frequency(
                scoped,
                params.top_n,
                params.min_group_size,
                &collator,
                &labels,
            ),
            age_diagnosis: age_diagnosis_heatmap(scoped, params.top_n, &collator, &labels),
            referral_by_year: referral_by_year(&extended),
            referral_disposition: referral_disposition_by_year(&extended),
            referral_by_month: referral_by_month(scoped),
            catchment: catchment_report(
                scoped,
                &extended,
                params.min_group_size,
                config.shift_start_hour,
                &collator,
                &labels,
            ),
            departments: department_breakdown(scoped, params.min_group_size, &collator, &labels),
            sex_age: sex_age_distribution(scoped),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_normalized() {
        let p = ReportParams {
            year: YearFilter::All,
            top_n: 0,
            min_group_size: 0,
        }
        .normalized();
        assert_eq!(p.top_n, DEFAULT_TOP_N);
        assert_eq!(p.min_group_size, 1);
    }

    #[test]
    fn test_cache_key_tracks_calendar_settings() {
        let p = ReportParams::default();
        let a = CalendarConfig::default();
        let mut b = CalendarConfig::default();
        b.shift_start_hour = 7;
        assert_ne!(p.cache_key(&a), p.cache_key(&b));
        assert_eq!(p.cache_key(&a), p.cache_key(&a.clone()));

        let mut c = CalendarConfig::default();
        c.night_end_hour = 5;
        assert_eq!(p.cache_key(&a), p.cache_key(&c));
    }
}
