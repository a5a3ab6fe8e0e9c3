// ==========================================
// 急诊就诊统计引擎 - 引擎层
// ==========================================
// 职责: 纯计算引擎（日历汇总、时段强度、范围解析、漏斗、KPI）
// 红线: 引擎无状态、不缓存、不修改输入记录
// ==========================================

pub mod calendar_rollup;
pub mod funnel;
pub mod intensity;
pub mod kpi;
pub mod scope;

// 重导出核心引擎
pub use calendar_rollup::{days_in_month, CalendarRollupEngine, CalendarSeries};
pub use funnel::{FunnelEngine, FunnelResult};
pub use intensity::{IntensityCell, IntensityEngine, IntensityMatrix};
pub use kpi::{KpiEngine, KpiSummary};
pub use scope::{ScopeMeta, ScopeResolver};
