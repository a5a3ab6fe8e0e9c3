// ==========================================
// 急诊就诊统计引擎 - 多级缓存层
// ==========================================
// 职责: 记录集版本令牌 + 缓存层级 + 会话缓存上下文
// 红线: 缓存仅在进程内，不持久化
// ==========================================

pub mod context;
pub mod keys;
pub mod record_set;
pub mod tier;

pub use context::{
    AnalyticsCacheContext, CacheStats, CompletionOutcome, ComputationJob, ComputationRequest,
    ComputationTicket,
};
pub use record_set::{RecordSet, RecordSetVersion};
pub use tier::{CacheEntry, CacheTier, TierStats};
