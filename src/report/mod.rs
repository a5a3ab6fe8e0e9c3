// ==========================================
// 急诊就诊统计引擎 - 交叉分析报表层
// ==========================================
// 职责: 诊断/转诊/片区/科室/人口学交叉分析 + 视图模型
// 红线: 报表是 (记录子集, 参数) 的纯函数
// 规则: 小样本抑制、主指标降序 + 标签升序的稳定排序
// ==========================================

pub mod breakdown;
pub mod builder;
pub mod catchment;
pub mod collation;
pub mod diagnosis;
pub mod models;
pub mod ranking;
pub mod referral;
pub mod suppression;
pub mod view_model;

pub use builder::{ReportEngine, ReportParams, DEFAULT_MIN_GROUP_SIZE, DEFAULT_TOP_N};
pub use catchment::classify_catchment;
pub use collation::LabelCollator;
pub use models::{
    AgeDiagnosisCell, AgeDiagnosisHeatmap, BucketLabels, CatchmentKindSummary, CatchmentReport,
    CatchmentRow, CatchmentTrend, CatchmentTrendPoint, DepartmentRow, DiagnosisReport,
    ReferralDispositionPoint, ReferralMonthCell, ReferralMonthHeatmap, ReferralYearPoint,
    ReportBundle, ReportRow, RowKind, SexAgeCell,
};
pub use ranking::{sort_ranked, Ranked};
pub use view_model::{build_view_model, Labeled, ReportViewModel, ViewParams};
