// ==========================================
// 急诊就诊统计引擎 - 就诊记录
// ==========================================
// 职责: 定义一次急诊就诊的不可变记录
// 红线: 引擎层只读，不修改记录
// ==========================================

use crate::domain::types::{AgeBand, Referral, Sex};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// 就诊时间戳
///
/// 上游可能只提供日期（无时刻），此时 `time_known = false`，
/// 该时间戳不参与按小时分桶的计算。
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VisitTimestamp {
    pub at: NaiveDateTime,
    pub time_known: bool,
}

impl VisitTimestamp {
    /// 带时刻的时间戳
    pub fn new(at: NaiveDateTime) -> Self {
        Self {
            at,
            time_known: true,
        }
    }

    /// 仅日期的时间戳（时刻记为 00:00，不可用于分桶）
    pub fn date_only(date: NaiveDate) -> Self {
        Self {
            at: date.and_hms_opt(0, 0, 0).unwrap_or_default(),
            time_known: false,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.at.date()
    }

    /// 小时（仅对带时刻的时间戳有意义）
    pub fn hour(&self) -> Option<u32> {
        self.time_known.then(|| self.at.hour())
    }

    /// 星期索引，周一 = 0
    pub fn weekday_index(&self) -> usize {
        self.at.weekday().num_days_from_monday() as usize
    }

    /// 班次归属日期
    ///
    /// 早于 `shift_start_hour` 的就诊归属前一天；
    /// 无时刻的时间戳按原日期归属。
    pub fn shift_adjusted_date(&self, shift_start_hour: u32) -> NaiveDate {
        match self.hour() {
            Some(h) if h < shift_start_hour => self.at.date() - Duration::days(1),
            _ => self.at.date(),
        }
    }
}

/// 急诊就诊记录
///
/// 入库后不可变。`arrival <= discharge` 是预期但不强制的，
/// 下游计算时长时必须自行防御负值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisitRecord {
    pub arrival: Option<VisitTimestamp>,
    pub discharge: Option<VisitTimestamp>,
    /// 是否由急救车送达
    pub ems: bool,
    pub hospitalized: bool,
    pub department: Option<String>,
    pub diagnosis_code: Option<String>,
    pub referral: Referral,
    /// 转诊来源的社区卫生服务片区
    pub primary_care_area: Option<String>,
    pub age_band: AgeBand,
    pub sex: Sex,
}

impl VisitRecord {
    /// 创建只含到达时间的最小记录（其余字段取未知值）
    pub fn new(arrival: Option<VisitTimestamp>) -> Self {
        Self {
            arrival,
            discharge: None,
            ems: false,
            hospitalized: false,
            department: None,
            diagnosis_code: None,
            referral: Referral::Unknown,
            primary_care_area: None,
            age_band: AgeBand::Unknown,
            sex: Sex::Other,
        }
    }

    /// 统计口径时间戳：优先到达时间，缺失时用离院时间
    pub fn anchor(&self) -> Option<&VisitTimestamp> {
        self.arrival.as_ref().or(self.discharge.as_ref())
    }

    /// 日历日期键
    pub fn calendar_date(&self) -> Option<NaiveDate> {
        self.anchor().map(|t| t.date())
    }

    /// 日历年份
    pub fn calendar_year(&self) -> Option<i32> {
        self.calendar_date().map(|d| d.year())
    }

    /// 班次归属年份
    pub fn shift_adjusted_year(&self, shift_start_hour: u32) -> Option<i32> {
        self.anchor()
            .map(|t| t.shift_adjusted_date(shift_start_hour).year())
    }

    /// 停留时长（分钟）
    ///
    /// 两端任一缺失或时长为负时返回 None。
    /// 仅日期的时间戳无法给出可信时长，同样返回 None。
    pub fn duration_minutes(&self) -> Option<i64> {
        let arrival = self.arrival.as_ref()?;
        let discharge = self.discharge.as_ref()?;
        if !arrival.time_known || !discharge.time_known {
            return None;
        }
        let minutes = (discharge.at - arrival.at).num_minutes();
        (minutes >= 0).then_some(minutes)
    }

    /// 是否含扩展字段（转诊/片区/诊断任一）
    pub fn has_extended_fields(&self) -> bool {
        self.referral != Referral::Unknown
            || self.primary_care_area.is_some()
            || self.diagnosis_code.is_some()
    }

    /// 诊断分组：字母 + 两位数字（ICD-10 类目），如 J18.9 → J18
    pub fn diagnosis_group(&self) -> Option<String> {
        self.diagnosis_code.as_deref().and_then(diagnosis_group_of)
    }
}

/// 从诊断编码中提取 ICD-10 类目
pub fn diagnosis_group_of(code: &str) -> Option<String> {
    let normalized: String = code
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase();
    let mut chars = normalized.chars();
    let letter = chars.next()?;
    let d1 = chars.next()?;
    let d2 = chars.next()?;
    if letter.is_ascii_alphabetic() && d1.is_ascii_digit() && d2.is_ascii_digit() {
        Some(format!("{}{}{}", letter, d1, d2))
    } else {
        None
    }
}
