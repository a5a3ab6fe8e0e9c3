// ==========================================
// 急诊就诊统计引擎 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 单行字段错误在校验器中降级为 DQ 告警，不阻断整批
// ==========================================

use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 批次级错误 =====
    #[error("JSON 解析失败: {0}")]
    JsonParseError(String),

    #[error("导入批次为空")]
    EmptyBatch,

    // ===== 字段级错误 =====
    #[error("时间格式错误 (行 {row}, 字段 {field}): 无法识别 {value}")]
    DateFormatError {
        row: usize,
        field: String,
        value: String,
    },

    #[error("字段值无法识别 (行 {row}, 字段 {field}): {value}")]
    UnrecognizedValue {
        row: usize,
        field: String,
        value: String,
    },
}

impl From<serde_json::Error> for ImportError {
    fn from(err: serde_json::Error) -> Self {
        ImportError::JsonParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
