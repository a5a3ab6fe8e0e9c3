// ==========================================
// 急诊就诊统计引擎 - 后台计算层
// ==========================================
// 职责: 长耗时报表计算的异步委托
// 红线: 与同步路径共用同一缓存契约
// ==========================================

pub mod error;
pub mod report_worker;

pub use error::{WorkerError, WorkerResult};
pub use report_worker::{BlockingPoolWorker, ReportWorker};
