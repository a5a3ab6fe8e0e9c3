// ==========================================
// 急诊就诊统计引擎 - 领域类型定义
// ==========================================
// 职责: 分类字段枚举、过滤参数枚举
// 说明: 所有枚举均可序列化，供渲染/导出协作方直接使用
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 转诊来源 (Referral)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Referral {
    WithReferral,    // 持转诊单
    WithoutReferral, // 自行就诊
    Unknown,         // 未知
}

impl Referral {
    /// 固定展示顺序
    pub const ALL: [Referral; 3] = [
        Referral::WithReferral,
        Referral::WithoutReferral,
        Referral::Unknown,
    ];

    /// 国际化键
    pub fn label_key(&self) -> &'static str {
        match self {
            Referral::WithReferral => "referral.with",
            Referral::WithoutReferral => "referral.without",
            Referral::Unknown => "referral.unknown",
        }
    }
}

impl fmt::Display for Referral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Referral::WithReferral => write!(f, "WITH_REFERRAL"),
            Referral::WithoutReferral => write!(f, "WITHOUT_REFERRAL"),
            Referral::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ==========================================
// 年龄段 (Age Band)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "0-17")]
    Age0To17,
    #[serde(rename = "18-34")]
    Age18To34,
    #[serde(rename = "35-49")]
    Age35To49,
    #[serde(rename = "50-64")]
    Age50To64,
    #[serde(rename = "65-79")]
    Age65To79,
    #[serde(rename = "80+")]
    Age80Plus,
    #[serde(rename = "unknown")]
    Unknown,
}

impl AgeBand {
    /// 固定展示顺序（未知放最后）
    pub const ALL: [AgeBand; 7] = [
        AgeBand::Age0To17,
        AgeBand::Age18To34,
        AgeBand::Age35To49,
        AgeBand::Age50To64,
        AgeBand::Age65To79,
        AgeBand::Age80Plus,
        AgeBand::Unknown,
    ];

    /// 由周岁年龄映射年龄段
    pub fn from_age(age: u32) -> Self {
        match age {
            0..=17 => AgeBand::Age0To17,
            18..=34 => AgeBand::Age18To34,
            35..=49 => AgeBand::Age35To49,
            50..=64 => AgeBand::Age50To64,
            65..=79 => AgeBand::Age65To79,
            _ => AgeBand::Age80Plus,
        }
    }

    /// 年龄段代码（与序列化一致）
    pub fn code(&self) -> &'static str {
        match self {
            AgeBand::Age0To17 => "0-17",
            AgeBand::Age18To34 => "18-34",
            AgeBand::Age35To49 => "35-49",
            AgeBand::Age50To64 => "50-64",
            AgeBand::Age65To79 => "65-79",
            AgeBand::Age80Plus => "80+",
            AgeBand::Unknown => "unknown",
        }
    }

    pub fn index(&self) -> usize {
        AgeBand::ALL
            .iter()
            .position(|b| b == self)
            .unwrap_or(AgeBand::ALL.len() - 1)
    }
}

impl fmt::Display for AgeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ==========================================
// 性别 (Sex)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sex {
    Male,
    Female,
    Other, // 其他/未说明
}

impl Sex {
    pub const ALL: [Sex; 3] = [Sex::Male, Sex::Female, Sex::Other];

    pub fn label_key(&self) -> &'static str {
        match self {
            Sex::Male => "sex.male",
            Sex::Female => "sex.female",
            Sex::Other => "sex.other",
        }
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Sex::Male => write!(f, "MALE"),
            Sex::Female => write!(f, "FEMALE"),
            Sex::Other => write!(f, "OTHER"),
        }
    }
}

// ==========================================
// 强度矩阵指标 (Intensity Metric)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntensityMetric {
    Arrivals,        // 到达人次（按到达时间）
    Discharges,      // 离院人次（按离院时间）
    Hospitalized,    // 住院人次（按离院时间）
    AverageDuration, // 平均停留时长（按到达时间）
}

impl IntensityMetric {
    pub const ALL: [IntensityMetric; 4] = [
        IntensityMetric::Arrivals,
        IntensityMetric::Discharges,
        IntensityMetric::Hospitalized,
        IntensityMetric::AverageDuration,
    ];

    /// 是否以离院时间分桶
    pub fn uses_discharge_time(&self) -> bool {
        matches!(
            self,
            IntensityMetric::Discharges | IntensityMetric::Hospitalized
        )
    }
}

impl fmt::Display for IntensityMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntensityMetric::Arrivals => write!(f, "arrivals"),
            IntensityMetric::Discharges => write!(f, "discharges"),
            IntensityMetric::Hospitalized => write!(f, "hospitalized"),
            IntensityMetric::AverageDuration => write!(f, "average_duration"),
        }
    }
}

// ==========================================
// 排序方向 (Sort Direction)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Descending,
    Ascending,
}

impl SortDirection {
    /// 宽松解析，无法识别时回退为降序
    pub fn parse_lenient(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "asc" | "ascending" => SortDirection::Ascending,
            _ => SortDirection::Descending,
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SortDirection::Descending => write!(f, "desc"),
            SortDirection::Ascending => write!(f, "asc"),
        }
    }
}

// ==========================================
// 年份过滤 (Year Filter)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YearFilter {
    #[default]
    All,
    Year(i32),
}

impl YearFilter {
    /// 宽松解析: "all"、空串或无法识别的值一律回退为 All
    pub fn parse_lenient(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return YearFilter::All;
        }
        match trimmed.parse::<i32>() {
            Ok(year) if (1900..=9999).contains(&year) => YearFilter::Year(year),
            _ => YearFilter::All,
        }
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            YearFilter::All => None,
            YearFilter::Year(y) => Some(*y),
        }
    }

    pub fn matches(&self, year: i32) -> bool {
        match self {
            YearFilter::All => true,
            YearFilter::Year(y) => *y == year,
        }
    }
}

impl fmt::Display for YearFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            YearFilter::All => write!(f, "all"),
            YearFilter::Year(y) => write!(f, "{}", y),
        }
    }
}

// ==========================================
// 社区卫生服务片区类型 (Catchment Kind)
// ==========================================
// 仅为启发式提示信息，不作为权威分类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CatchmentKind {
    District, // 区县
    City,     // 城市
    Unknown,
}

impl CatchmentKind {
    pub const ALL: [CatchmentKind; 3] = [
        CatchmentKind::District,
        CatchmentKind::City,
        CatchmentKind::Unknown,
    ];

    pub fn label_key(&self) -> &'static str {
        match self {
            CatchmentKind::District => "catchment.district",
            CatchmentKind::City => "catchment.city",
            CatchmentKind::Unknown => "catchment.unknown",
        }
    }
}

impl fmt::Display for CatchmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatchmentKind::District => write!(f, "DISTRICT"),
            CatchmentKind::City => write!(f, "CITY"),
            CatchmentKind::Unknown => write!(f, "UNKNOWN"),
        }
    }
}
