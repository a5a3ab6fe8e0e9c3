// ==========================================
// 急诊就诊统计引擎 - 分析范围解析
// ==========================================
// 职责: 扩展字段子集 + 年份过滤 → ScopeMeta
// 红线: 非法/不存在的年份回退为"全部"，不报错
// ==========================================

use crate::domain::ratio::share;
use crate::domain::record::VisitRecord;
use crate::domain::types::YearFilter;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::instrument;

/// 分析范围
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScopeMeta {
    /// 解析后的记录子集（含扩展字段且满足年份过滤）
    #[serde(skip)]
    pub records: Vec<VisitRecord>,
    /// 可选年份（升序）
    pub available_years: Vec<i32>,
    /// 实际生效的年份过滤
    pub effective_year: YearFilter,
    /// 覆盖率 = 含扩展字段记录数 ÷ 记录总数
    pub coverage: Option<f64>,
    pub extended_count: usize,
    pub total_count: usize,
}

impl ScopeMeta {
    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}

pub struct ScopeResolver;

impl Default for ScopeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl ScopeResolver {
    pub fn new() -> Self {
        Self
    }

    /// 解析分析范围
    #[instrument(skip(self, records), fields(total = records.len()))]
    pub fn resolve(&self, records: &[VisitRecord], requested: YearFilter) -> ScopeMeta {
        let extended: Vec<&VisitRecord> =
            records.iter().filter(|r| r.has_extended_fields()).collect();

        let available_years: Vec<i32> = extended
            .iter()
            .filter_map(|r| r.calendar_year())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let effective_year = match requested {
            YearFilter::Year(y) if available_years.contains(&y) => YearFilter::Year(y),
            YearFilter::Year(y) => {
                tracing::debug!(year = y, "请求的年份无数据，回退为全部");
                YearFilter::All
            }
            YearFilter::All => YearFilter::All,
        };

        let scoped: Vec<VisitRecord> = extended
            .iter()
            .filter(|r| match effective_year {
                YearFilter::All => true,
                YearFilter::Year(y) => r.calendar_year() == Some(y),
            })
            .map(|r| (*r).clone())
            .collect();

        ScopeMeta {
            records: scoped,
            available_years,
            effective_year,
            coverage: share(extended.len() as u64, records.len() as u64),
            extended_count: extended.len(),
            total_count: records.len(),
        }
    }
}
