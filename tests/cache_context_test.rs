// ==========================================
// 多级缓存上下文集成测试
// ==========================================
// 测试目标: 记录集身份、层级键、排序切换不触发重算
// ==========================================

mod helpers;

use ed_visit_analytics::cache::{AnalyticsCacheContext, RecordSet};
use ed_visit_analytics::config::CalendarConfig;
use ed_visit_analytics::domain::types::{SortDirection, YearFilter};
use ed_visit_analytics::report::{ReportParams, ViewParams};
use helpers::referral_fixture;
use std::sync::Arc;

#[test]
fn test_same_set_and_params_return_same_reference() {
    let mut ctx = AnalyticsCacheContext::new();
    let set = RecordSet::new(referral_fixture());
    let config = CalendarConfig::default();
    let params = ReportParams::default();

    let first = ctx.reports(&set, &params, &config);
    let second = ctx.reports(&set, &params, &config);
    assert!(Arc::ptr_eq(&first, &second));

    // 克隆共享同一版本
    let clone = set.clone();
    let third = ctx.reports(&clone, &params, &config);
    assert!(Arc::ptr_eq(&first, &third));
}

#[test]
fn test_structurally_equal_set_is_a_new_identity() {
    let mut ctx = AnalyticsCacheContext::new();
    let config = CalendarConfig::default();
    let params = ReportParams::default();

    let original = RecordSet::new(referral_fixture());
    let replacement = RecordSet::new(referral_fixture());
    assert_ne!(original.version(), replacement.version());

    let a = ctx.reports(&original, &params, &config);
    let b = ctx.reports(&replacement, &params, &config);
    assert!(!Arc::ptr_eq(&a, &b), "新记录集必须重新计算");
    assert_eq!(*a, *b);
    assert!(ctx.stats().computation.invalidations >= 1);
}

#[test]
fn test_sort_toggle_reuses_computation() {
    let mut ctx = AnalyticsCacheContext::new();
    let set = RecordSet::new(referral_fixture());
    let config = CalendarConfig::default();
    let params = ReportParams::default();

    ctx.view_model(&set, &params, &ViewParams::default(), &config);
    for direction in [SortDirection::Ascending, SortDirection::Descending] {
        let view = ViewParams {
            sort_direction: direction,
            ..Default::default()
        };
        ctx.view_model(&set, &params, &view, &config);
    }

    let stats = ctx.stats();
    assert_eq!(stats.computation.misses, 1, "排序切换不应重算报表");
    assert_eq!(stats.computation.writes, 1);
    assert_eq!(stats.view.writes, 3);
}

#[test]
fn test_year_change_recomputes_but_reuses_scope_slots() {
    let mut ctx = AnalyticsCacheContext::new();
    let set = RecordSet::new(referral_fixture());
    let config = CalendarConfig::default();

    let all = ReportParams::default();
    let y2023 = ReportParams {
        year: YearFilter::Year(2023),
        ..Default::default()
    };

    let a = ctx.reports(&set, &all, &config);
    let b = ctx.reports(&set, &y2023, &config);
    assert!(!Arc::ptr_eq(&a, &b));
    assert_eq!(b.record_count, 3);

    // 计算层只保留一个条目，范围层保留多个年份
    let stats = ctx.stats();
    assert_eq!(stats.computation.entries, 1);
    assert_eq!(stats.scope.entries, 2);

    let again = ctx.scope(&set, YearFilter::All);
    assert_eq!(again.record_count(), 10);
    assert_eq!(ctx.stats().scope.hits, 1);
}

#[test]
fn test_calendar_settings_change_computation_key() {
    let mut ctx = AnalyticsCacheContext::new();
    let set = RecordSet::new(referral_fixture());
    let params = ReportParams::default();
    let config = CalendarConfig::default();
    let shifted = CalendarConfig {
        shift_start_hour: 6,
        ..CalendarConfig::default()
    };

    let a = ctx.reports(&set, &params, &config);
    let b = ctx.reports(&set, &params, &shifted);
    assert!(!Arc::ptr_eq(&a, &b));

    let s1 = ctx.calendar_series(&set, &config);
    let s2 = ctx.calendar_series(&set, &config);
    assert!(Arc::ptr_eq(&s1, &s2));
}

#[test]
fn test_night_window_change_keeps_report_tiers() {
    let mut ctx = AnalyticsCacheContext::new();
    let set = RecordSet::new(referral_fixture());
    let params = ReportParams::default();
    let view = ViewParams::default();
    let config = CalendarConfig::default();
    let night_shifted = CalendarConfig {
        night_start_hour: 22,
        night_end_hour: 6,
        ..CalendarConfig::default()
    };

    let a = ctx.view_model(&set, &params, &view, &config);
    let b = ctx.view_model(&set, &params, &view, &night_shifted);
    assert!(Arc::ptr_eq(&a, &b), "夜班区间不影响报表");

    let stats = ctx.stats();
    assert_eq!(stats.computation.misses, 1, "只有首次查询计算报表");
    assert_eq!(stats.computation.writes, 1);
    assert_eq!(stats.view.misses, 1);
    assert_eq!(stats.view.hits, 1);

    let s1 = ctx.calendar_series(&set, &config);
    let s2 = ctx.calendar_series(&set, &night_shifted);
    assert!(!Arc::ptr_eq(&s1, &s2), "日历序列随夜班区间重算");
}

#[test]
fn test_clear_drops_all_tiers() {
    let mut ctx = AnalyticsCacheContext::new();
    let set = RecordSet::new(referral_fixture());
    let config = CalendarConfig::default();

    ctx.view_model(&set, &ReportParams::default(), &ViewParams::default(), &config);
    ctx.calendar_series(&set, &config);
    ctx.clear();

    let stats = ctx.stats();
    assert_eq!(stats.scope.entries, 0);
    assert_eq!(stats.computation.entries, 0);
    assert_eq!(stats.view.entries, 0);
    assert_eq!(stats.calendar.entries, 0);
}
