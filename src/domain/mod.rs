// ==========================================
// 急诊就诊统计引擎 - 领域模型层
// ==========================================
// 职责: 定义就诊记录、分类类型、统计口径
// 红线: 不含计算逻辑,不含缓存逻辑
// ==========================================

pub mod ratio;
pub mod record;
pub mod stats;
pub mod types;

// 重导出核心类型
pub use record::{diagnosis_group_of, VisitRecord, VisitTimestamp};
pub use stats::{DailyStat, MonthlyStat, PeriodDelta, StatTotals, YearlyStat};
pub use types::{
    AgeBand, CatchmentKind, IntensityMetric, Referral, Sex, SortDirection, YearFilter,
};
