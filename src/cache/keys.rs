// ==========================================
// 急诊就诊统计引擎 - 缓存组合键
// ==========================================
// 规则: 每个层级的键恰好包含影响该层结果的全部参数，不多不少
// ==========================================

use crate::config::CalendarConfig;
use crate::domain::types::YearFilter;
use crate::report::{ReportParams, ViewParams};

/// 范围层: 仅年份
pub fn scope_key(year: YearFilter) -> String {
    format!("year={}", year)
}

/// 计算层: 年份 + top-N + 最小分组 + 班次起始/语言（不含排序方向与夜班区间）
pub fn computation_key(params: &ReportParams, config: &CalendarConfig) -> String {
    params.cache_key(config)
}

/// 视图层: 计算层键 + 展示参数
pub fn view_key(params: &ReportParams, view: &ViewParams, config: &CalendarConfig) -> String {
    format!("{}#{}", computation_key(params, config), view.cache_key())
}

/// 日历序列层: 仅日历设置
pub fn calendar_key(config: &CalendarConfig) -> String {
    config.cache_key_fragment()
}

/// 强度层: 只依赖记录集本身
pub fn intensity_key() -> String {
    "all-metrics".to_string()
}

/// 漏斗层: 仅年份（漏斗计数与夜班区间、语言无关）
pub fn funnel_key(year: YearFilter) -> String {
    format!("funnel|year={}", year)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::SortDirection;

    #[test]
    fn test_sort_direction_only_in_view_key() {
        let params = ReportParams::default();
        let config = CalendarConfig::default();
        let desc = ViewParams::default();
        let asc = ViewParams {
            sort_direction: SortDirection::Ascending,
            ..Default::default()
        };
        assert_ne!(view_key(&params, &desc, &config), view_key(&params, &asc, &config));
        assert!(view_key(&params, &asc, &config).starts_with(&computation_key(&params, &config)));
    }

    #[test]
    fn test_year_changes_scope_and_computation_keys() {
        let config = CalendarConfig::default();
        let all = ReportParams::default();
        let y2024 = ReportParams {
            year: YearFilter::Year(2024),
            ..Default::default()
        };
        assert_ne!(computation_key(&all, &config), computation_key(&y2024, &config));
        assert_ne!(scope_key(all.year), scope_key(y2024.year));
    }

    #[test]
    fn test_night_window_not_in_computation_key() {
        let params = ReportParams::default();
        let config = CalendarConfig::default();
        let shifted_night = CalendarConfig {
            night_start_hour: 22,
            night_end_hour: 6,
            completeness_ratio: 0.5,
            ..Default::default()
        };
        assert_eq!(
            computation_key(&params, &config),
            computation_key(&params, &shifted_night)
        );
        assert_ne!(calendar_key(&config), calendar_key(&shifted_night));

        let shifted_start = CalendarConfig {
            shift_start_hour: 7,
            ..Default::default()
        };
        assert_ne!(
            computation_key(&params, &config),
            computation_key(&params, &shifted_start)
        );
    }
}
