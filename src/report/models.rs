// ==========================================
// 急诊就诊统计引擎 - 交叉分析报表模型
// ==========================================
// 职责: 每类报表一个显式结构（不使用通用行包）
// 说明: 派生对象，由缓存层以 Arc 共享
// ==========================================

use crate::domain::types::{AgeBand, CatchmentKind, Referral, Sex, YearFilter};
use crate::i18n::t;
use serde::{Deserialize, Serialize};

/// 报表合成桶标签（已按语言翻译）
#[derive(Debug, Clone)]
pub struct BucketLabels {
    pub other: String,
    pub insufficient_sample: String,
    pub unknown: String,
}

impl BucketLabels {
    pub fn for_locale(locale: &str) -> Self {
        Self {
            other: t("report.other", locale),
            insufficient_sample: t("report.insufficient_sample", locale),
            unknown: t("report.unknown", locale),
        }
    }
}

/// 行类型：普通分组 / 合成桶
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowKind {
    Group,
    /// 小样本合并桶
    InsufficientSample,
    /// 超出 top-N 的合并桶
    Other,
    /// 缺少分组字段的记录（如无片区）
    Unassigned,
}

impl RowKind {
    pub fn is_synthetic(&self) -> bool {
        !matches!(self, RowKind::Group)
    }
}

/// 基础报表行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportRow {
    pub label: String,
    pub count: u64,
    /// 占报表总数的百分比 (0-100)
    pub percent: Option<f64>,
    pub kind: RowKind,
}

// ==========================================
// 诊断频次
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisReport {
    pub rows: Vec<ReportRow>,
    /// 有诊断分组的记录数
    pub total: u64,
    pub min_group_size: u64,
}

// ==========================================
// 年龄段 × 诊断 热力图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeDiagnosisCell {
    pub age_band: AgeBand,
    pub diagnosis: String,
    pub count: u64,
    /// 年龄段内占比 (0-100)，每个年龄段合计 100
    pub percent_in_band: Option<f64>,
    pub band_total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgeDiagnosisHeatmap {
    pub age_bands: Vec<AgeBand>,
    /// 列（诊断分组），按总频次排序，最多 top-N 个
    pub diagnoses: Vec<String>,
    pub cells: Vec<AgeDiagnosisCell>,
}

// ==========================================
// 转诊来源按年趋势
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferralYearPoint {
    pub year: i32,
    pub with_referral: u64,
    pub without_referral: u64,
    pub unknown: u64,
    pub total: u64,
    /// 持转诊单占比 (0-100)
    pub with_referral_percent: Option<f64>,
}

// ==========================================
// 转诊来源 × 去向 按年趋势
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferralDispositionPoint {
    pub year: i32,
    pub referral: Referral,
    pub hospitalized: u64,
    pub discharged: u64,
    pub total: u64,
    /// 住院占比 (0-100)
    pub hospitalized_percent: Option<f64>,
}

// ==========================================
// 转诊来源 × 月份 热力图
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferralMonthCell {
    /// 1-12
    pub month_of_year: u32,
    pub referral: Referral,
    pub count: u64,
    /// 当月内占比 (0-100)
    pub percent_in_month: Option<f64>,
    pub month_total: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReferralMonthHeatmap {
    pub cells: Vec<ReferralMonthCell>,
    pub max_count: u64,
}

// ==========================================
// 转诊片区 × 住院
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchmentRow {
    pub label: String,
    /// 无片区的记录为 `Unassigned`，其余为 `Group`
    pub row_kind: RowKind,
    /// 启发式分类，仅供参考
    pub kind: CatchmentKind,
    /// 持转诊单就诊人次
    pub count: u64,
    pub hospitalized: u64,
    /// 转诊患者住院占比 (0-100)
    pub hospitalized_percent: Option<f64>,
    /// 占全部转诊人次的百分比
    pub percent: Option<f64>,
    /// 样本不足（不进入趋势候选）
    pub suppressed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchmentTrendPoint {
    /// 班次归属年份
    pub year: i32,
    pub count: u64,
    pub hospitalized: u64,
    pub hospitalized_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchmentTrend {
    pub label: String,
    pub kind: CatchmentKind,
    pub points: Vec<CatchmentTrendPoint>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchmentKindSummary {
    pub kind: CatchmentKind,
    pub count: u64,
    pub hospitalized: u64,
    pub hospitalized_percent: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchmentReport {
    /// 明细行（含样本不足行）
    pub rows: Vec<CatchmentRow>,
    /// 按片区分类的住院分布
    pub by_kind: Vec<CatchmentKindSummary>,
    /// 每个片区的年度趋势（班次归属年份）
    pub trends: Vec<CatchmentTrend>,
    /// 可作为趋势目标的片区（已剔除样本不足行）
    pub trend_candidates: Vec<String>,
    pub total_referred: u64,
    pub min_group_size: u64,
}

// ==========================================
// 科室分布
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DepartmentRow {
    pub label: String,
    pub count: u64,
    pub percent: Option<f64>,
    pub hospitalized_percent: Option<f64>,
    pub avg_duration_minutes: Option<f64>,
    pub kind: RowKind,
}

// ==========================================
// 性别 × 年龄段
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SexAgeCell {
    pub age_band: AgeBand,
    pub sex: Sex,
    pub count: u64,
    pub percent_in_band: Option<f64>,
    pub band_total: u64,
}

// ==========================================
// 报表包（计算缓存层的值）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportBundle {
    pub year: YearFilter,
    pub record_count: usize,
    pub diagnosis: DiagnosisReport,
    pub age_diagnosis: AgeDiagnosisHeatmap,
    pub referral_by_year: Vec<ReferralYearPoint>,
    pub referral_disposition: Vec<ReferralDispositionPoint>,
    pub referral_by_month: ReferralMonthHeatmap,
    pub catchment: CatchmentReport,
    pub departments: Vec<DepartmentRow>,
    pub sex_age: Vec<SexAgeCell>,
}
