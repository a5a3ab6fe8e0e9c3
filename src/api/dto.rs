// ==========================================
// 急诊就诊统计引擎 - API 数据传输对象
// ==========================================
// 职责: 界面控件传入的松散参数 → 强类型参数
// 红线: 非法值回退为默认值，不报错
// ==========================================

use crate::cache::RecordSetVersion;
use crate::engine::{CalendarSeries, FunnelResult, IntensityMatrix, KpiSummary};
use crate::domain::types::{SortDirection, YearFilter};
use crate::report::{ReportParams, ReportViewModel, ViewParams, DEFAULT_MIN_GROUP_SIZE, DEFAULT_TOP_N};
use serde::{Deserialize, Serialize};

/// 仪表盘过滤条件（来自界面控件，均为可选文本/数值）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardFilter {
    /// 年份（"all"、空或非法值均视为全部）
    pub year: Option<String>,
    pub top_n: Option<usize>,
    pub min_group_size: Option<u64>,
    /// "asc" / "desc"
    pub sort_direction: Option<String>,
    pub catchment_target: Option<String>,
}

impl DashboardFilter {
    pub fn year_filter(&self) -> YearFilter {
        self.year
            .as_deref()
            .map(YearFilter::parse_lenient)
            .unwrap_or_default()
    }

    pub fn report_params(&self) -> ReportParams {
        ReportParams {
            year: self.year_filter(),
            top_n: self.top_n.unwrap_or(DEFAULT_TOP_N),
            min_group_size: self.min_group_size.unwrap_or(DEFAULT_MIN_GROUP_SIZE),
        }
        .normalized()
    }

    pub fn view_params(&self) -> ViewParams {
        ViewParams {
            sort_direction: self
                .sort_direction
                .as_deref()
                .map(SortDirection::parse_lenient)
                .unwrap_or_default(),
            catchment_target: self
                .catchment_target
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        }
    }
}

impl From<YearFilter> for DashboardFilter {
    fn from(year: YearFilter) -> Self {
        DashboardFilter {
            year: Some(year.to_string()),
            ..Default::default()
        }
    }
}

/// 范围摘要（不含记录明细）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeSummary {
    pub available_years: Vec<i32>,
    pub effective_year: YearFilter,
    pub coverage: Option<f64>,
    pub extended_count: usize,
    pub total_count: usize,
    pub scoped_count: usize,
}

/// 一次过滤状态下的仪表盘快照
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSnapshot {
    pub records_version: RecordSetVersion,
    pub record_count: usize,
    pub kpi: KpiSummary,
    pub calendar: CalendarSeries,
    pub funnel: FunnelResult,
    pub intensity: Vec<IntensityMatrix>,
    pub scope: ScopeSummary,
    pub view: ReportViewModel,
}
