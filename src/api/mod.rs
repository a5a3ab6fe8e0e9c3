// ==========================================
// 急诊就诊统计引擎 - API 层
// ==========================================
// 职责: 仪表盘门面，供渲染/导出协作方调用
// ==========================================

pub mod dashboard_api;
pub mod dto;
pub mod error;

// 重导出核心类型
pub use dashboard_api::DashboardApi;
pub use dto::{DashboardFilter, DashboardSnapshot, ScopeSummary};
pub use error::{ApiError, ApiResult};
