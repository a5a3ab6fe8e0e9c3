// ==========================================
// 急诊就诊统计引擎 - 数据清洗器
// ==========================================
// 职责: TRIM / NULL 标准化 / 时间戳解析 / 布尔值解析
// ==========================================

use crate::domain::record::VisitTimestamp;
use chrono::{DateTime, NaiveDate, NaiveDateTime};

/// 带时刻的时间格式（按顺序尝试）
const DATETIME_FORMATS: [&str; 8] = [
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y.%m.%d %H:%M:%S",
    "%Y.%m.%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
];

/// 仅日期格式
const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y%m%d", "%Y.%m.%d", "%d.%m.%Y"];

/// 视为空值的占位文本
const NULL_TOKENS: [&str; 6] = ["", "-", "n/a", "na", "null", "none"];

pub struct DataCleaner;

impl DataCleaner {
    pub fn clean_text(&self, value: &str, uppercase: bool) -> String {
        let trimmed = value.trim();
        if uppercase {
            trimmed.to_uppercase()
        } else {
            trimmed.to_string()
        }
    }

    /// 空串与占位文本统一为 None
    pub fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| {
            let trimmed = v.trim();
            if NULL_TOKENS.contains(&trimmed.to_lowercase().as_str()) {
                None
            } else {
                Some(trimmed.to_string())
            }
        })
    }

    /// 解析时间戳
    ///
    /// RFC 3339 带时区的值丢弃偏移，保留本地墙上时间。
    /// 仅日期的值标记为无时刻。
    pub fn parse_timestamp(&self, value: &str) -> Option<VisitTimestamp> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Some(VisitTimestamp::new(dt.naive_local()));
        }

        for fmt in DATETIME_FORMATS {
            if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
                return Some(VisitTimestamp::new(dt));
            }
        }

        for fmt in DATE_FORMATS {
            if let Ok(d) = NaiveDate::parse_from_str(value, fmt) {
                return Some(VisitTimestamp::date_only(d));
            }
        }

        None
    }

    /// 解析布尔标志，无法识别时返回 None
    pub fn parse_flag(&self, value: &str) -> Option<bool> {
        match value.trim().to_lowercase().as_str() {
            "1" | "true" | "yes" | "y" | "taip" | "是" => Some(true),
            "0" | "false" | "no" | "n" | "ne" | "否" | "" => Some(false),
            _ => None,
        }
    }
}
