// ==========================================
// 急诊就诊统计引擎 - 日历/业务规则配置
// ==========================================
// 职责: 夜班时段、班次起始时刻、标签排序语言、完整度阈值
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use serde::{Deserialize, Serialize};

/// 月份完整度默认阈值（有数据天数 / 日历天数）
pub const DEFAULT_COMPLETENESS_RATIO: f64 = 0.9;

/// 日历配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalendarConfig {
    /// 夜班开始小时（含）
    pub night_start_hour: u32,
    /// 夜班结束小时（不含），可跨午夜
    pub night_end_hour: u32,
    /// 班次起始小时，早于此时刻的就诊归属前一天
    pub shift_start_hour: u32,
    /// 标签排序/展示语言
    pub locale: String,
    /// 月份完整度阈值
    pub completeness_ratio: f64,
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            night_start_hour: 20,
            night_end_hour: 7,
            shift_start_hour: 8,
            locale: "en".to_string(),
            completeness_ratio: DEFAULT_COMPLETENESS_RATIO,
        }
    }
}

impl CalendarConfig {
    /// 校验配置
    pub fn validate(&self) -> ConfigResult<()> {
        for (key, hour) in [
            ("night_start_hour", self.night_start_hour),
            ("night_end_hour", self.night_end_hour),
            ("shift_start_hour", self.shift_start_hour),
        ] {
            if hour > 23 {
                return Err(ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: hour.to_string(),
                    message: "小时必须在 0-23 之间".to_string(),
                });
            }
        }
        if !(self.completeness_ratio > 0.0 && self.completeness_ratio <= 1.0) {
            return Err(ConfigError::InvalidValue {
                key: "completeness_ratio".to_string(),
                value: self.completeness_ratio.to_string(),
                message: "阈值必须在 (0, 1] 之间".to_string(),
            });
        }
        if self.locale.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "locale".to_string(),
                value: self.locale.clone(),
                message: "语言不能为空".to_string(),
            });
        }
        Ok(())
    }

    /// 判断某个到达小时是否属于夜班
    ///
    /// 区间为 [start, end)，start > end 时跨午夜；start == end 表示不设夜班。
    pub fn is_night_hour(&self, hour: u32) -> bool {
        let (start, end) = (self.night_start_hour, self.night_end_hour);
        if start == end {
            false
        } else if start < end {
            hour >= start && hour < end
        } else {
            hour >= start || hour < end
        }
    }

    /// 交叉分析报表读取的设置（班次起始、语言）
    pub fn report_key_fragment(&self) -> String {
        format!("shift={}|locale={}", self.shift_start_hour, self.locale)
    }

    /// 参与缓存键的日历设置
    pub fn cache_key_fragment(&self) -> String {
        format!(
            "night={}-{}|shift={}|locale={}|complete={}",
            self.night_start_hour,
            self.night_end_hour,
            self.shift_start_hour,
            self.locale,
            self.completeness_ratio
        )
    }
}
