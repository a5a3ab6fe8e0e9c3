// ==========================================
// 急诊就诊统计引擎 - API层错误类型
// ==========================================
// 职责: 汇总导入/配置/后台计算错误，转换为调用方可读的错误消息
// 说明: 纯计算不产生错误；错误只来自上游输入与运行时
// ==========================================

use crate::config::ConfigError;
use crate::importer::ImportError;
use crate::worker::WorkerError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入错误
    // ==========================================
    #[error("记录导入失败: {0}")]
    Import(#[from] ImportError),

    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    // ==========================================
    // 运行时错误
    // ==========================================
    #[error("后台计算失败: {0}")]
    Worker(#[from] WorkerError),

    #[error("会话状态锁获取失败: {0}")]
    LockError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
