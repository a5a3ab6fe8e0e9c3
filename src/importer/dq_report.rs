// ==========================================
// 急诊就诊统计引擎 - 数据质量报告
// ==========================================

use serde::{Deserialize, Serialize};

// ==========================================
// DqLevel - 数据质量级别
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DqLevel {
    Warning, // 警告（记录仍入库，相关计算会排除该字段）
    Info,    // 提示（仅记录）
}

// ==========================================
// DqKind - 问题类型
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DqKind {
    UnparseableTimestamp,
    MissingTimestamps,
    NegativeDuration,
    UnrecognizedValue,
}

// ==========================================
// DqViolation - 问题明细
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DqViolation {
    pub row_number: usize, // 原始行号（从 0 开始）
    pub kind: DqKind,
    pub level: DqLevel,
    pub field: String,
    pub message: String,
}

// ==========================================
// DqSummary - 数据质量汇总
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqSummary {
    pub total_rows: usize,
    /// 无任何问题的行数
    pub clean_rows: usize,
    pub warning: usize,
    pub info: usize,
    /// 无任何时间戳（不参与日历汇总）的行数
    pub without_timestamps: usize,
}

// ==========================================
// DqReport - 数据质量报告
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DqReport {
    pub summary: DqSummary,
    pub violations: Vec<DqViolation>,
}

impl DqReport {
    /// 按类型计数
    pub fn count_of(&self, kind: DqKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }
}
