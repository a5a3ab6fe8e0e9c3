// ==========================================
// 急诊就诊统计引擎 - 原始行
// ==========================================
// 职责: 上游解析阶段交付的原始行（字段均为可选字符串）
// 说明: CSV 读取与列映射属于外部协作方，这里只接收映射后的结果
// ==========================================

use crate::importer::error::{ImportError, ImportResult};
use serde::{Deserialize, Serialize};

/// 原始就诊行
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawVisitRow {
    pub arrival: Option<String>,
    pub discharge: Option<String>,
    pub ems: Option<String>,
    pub hospitalized: Option<String>,
    pub department: Option<String>,
    pub diagnosis_code: Option<String>,
    pub referral: Option<String>,
    pub primary_care_area: Option<String>,
    /// 周岁年龄或年龄段标签
    pub age: Option<String>,
    pub sex: Option<String>,
}

/// 从 JSON 数组解析原始行
pub fn parse_rows_json(raw: &str) -> ImportResult<Vec<RawVisitRow>> {
    let rows: Vec<RawVisitRow> = serde_json::from_str(raw)?;
    if rows.is_empty() {
        return Err(ImportError::EmptyBatch);
    }
    Ok(rows)
}
