// ==========================================
// 急诊就诊统计引擎 - 核心库
// ==========================================
// 系统定位: 急诊就诊记录 → 日历汇总 / 时段强度 / 去向漏斗 / 交叉分析
// 技术栈: Rust + tokio（后台计算委托）
// 红线: 计算均为纯函数；缓存仅在进程内，由显式上下文持有
// ==========================================

// 初始化国际化系统
rust_i18n::i18n!("locales", fallback = "en");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与统计口径
pub mod domain;

// 配置层 - 日历/业务规则配置
pub mod config;

// 记录模型与校验层
pub mod importer;

// 引擎层 - 日历汇总/时段强度/范围/漏斗/KPI
pub mod engine;

// 报表层 - 交叉分析与视图模型
pub mod report;

// 缓存层 - 记录集版本与多级缓存
pub mod cache;

// 后台计算委托
pub mod worker;

// API 层 - 仪表盘门面
pub mod api;

// 日志系统
pub mod logging;

// 性能统计
pub mod perf;

// 国际化
pub mod i18n;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    AgeBand, DailyStat, IntensityMetric, MonthlyStat, Referral, Sex, SortDirection, StatTotals,
    VisitRecord, VisitTimestamp, YearFilter, YearlyStat,
};

// 配置
pub use config::{CalendarConfig, ConfigManager};

// 引擎
pub use engine::{
    CalendarRollupEngine, CalendarSeries, FunnelEngine, FunnelResult, IntensityEngine,
    IntensityMatrix, KpiEngine, ScopeMeta, ScopeResolver,
};

// 报表
pub use report::{ReportBundle, ReportEngine, ReportParams, ReportViewModel, ViewParams};

// 缓存
pub use cache::{AnalyticsCacheContext, RecordSet, RecordSetVersion};

// API
pub use api::{ApiError, ApiResult, DashboardApi, DashboardFilter};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "ed-visit-analytics";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
