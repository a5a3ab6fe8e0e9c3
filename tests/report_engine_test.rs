// ==========================================
// 交叉分析报表集成测试
// ==========================================
// 测试目标: 小样本抑制、趋势候选、班次归属年份、排序确定性
// ==========================================

mod helpers;

use ed_visit_analytics::config::CalendarConfig;
use ed_visit_analytics::domain::types::{CatchmentKind, SortDirection, YearFilter};
use ed_visit_analytics::engine::ScopeResolver;
use ed_visit_analytics::report::{
    build_view_model, ReportEngine, ReportParams, RowKind, ViewParams,
};
use helpers::{referral_fixture, VisitBuilder};

fn bundle_for(
    records: &[ed_visit_analytics::VisitRecord],
    params: &ReportParams,
) -> ed_visit_analytics::ReportBundle {
    let config = CalendarConfig::default();
    let scope = ScopeResolver::new().resolve(records, params.year);
    ReportEngine::new().compute_bundle(records, &scope, params, &config)
}

#[test]
fn test_small_catchment_is_never_a_trend_candidate() {
    let records = referral_fixture();
    let params = ReportParams {
        min_group_size: 3,
        ..Default::default()
    };
    let bundle = bundle_for(&records, &params);
    let catchment = &bundle.catchment;

    // 明细行仍保留样本不足的片区
    assert_eq!(catchment.rows.len(), 2);
    let small = catchment
        .rows
        .iter()
        .find(|r| r.label == "Small Clinic")
        .unwrap();
    assert!(small.suppressed);
    assert_eq!(small.count, 2);

    assert_eq!(catchment.trend_candidates, vec!["Vilniaus rajono PSPC".to_string()]);
    assert!(catchment.trends.iter().all(|t| t.label != "Small Clinic"));

    let big = &catchment.rows[0];
    assert_eq!(big.label, "Vilniaus rajono PSPC");
    assert_eq!(big.kind, CatchmentKind::District);
    assert_eq!(big.hospitalized, 4);
    assert_eq!(big.hospitalized_percent, Some(50.0));
}

#[test]
fn test_catchment_trend_uses_shift_adjusted_year() {
    let records = vec![
        // 元旦凌晨，班次归属 2023 年
        VisitBuilder::arriving("2024-01-01 03:00")
            .referred_from("City Clinic")
            .hospitalized()
            .build(),
        VisitBuilder::arriving("2024-01-01 09:00")
            .referred_from("City Clinic")
            .build(),
    ];
    let params = ReportParams {
        min_group_size: 1,
        ..Default::default()
    };
    let bundle = bundle_for(&records, &params);
    let trend = &bundle.catchment.trends[0];
    let years: Vec<i32> = trend.points.iter().map(|p| p.year).collect();
    assert_eq!(years, vec![2023, 2024]);
    assert_eq!(trend.points[0].hospitalized_percent, Some(100.0));

    // 转诊按年趋势取日历年份
    assert_eq!(bundle.referral_by_year.len(), 1);
    assert_eq!(bundle.referral_by_year[0].year, 2024);
}

#[test]
fn test_diagnosis_rows_collapse_and_sort() {
    let mut records = Vec::new();
    for (code, n) in [("J18.9", 6), ("I21.0", 6), ("A09", 5), ("R07.4", 1), ("S06", 2)] {
        for _ in 0..n {
            records.push(VisitBuilder::arriving("2024-02-01 10:00").diagnosis(code).build());
        }
    }
    let params = ReportParams {
        top_n: 2,
        min_group_size: 3,
        ..Default::default()
    };
    let bundle = bundle_for(&records, &params);
    let labels: Vec<&str> = bundle.diagnosis.rows.iter().map(|r| r.label.as_str()).collect();

    // I21 与 J18 并列，按标签升序
    assert_eq!(labels, vec!["I21", "J18", "Other", "Other / insufficient sample"]);
    assert_eq!(bundle.diagnosis.rows[2].kind, RowKind::Other);
    assert_eq!(bundle.diagnosis.rows[2].count, 5);
    assert_eq!(bundle.diagnosis.rows[3].count, 3);
    let percent_sum: f64 = bundle.diagnosis.rows.iter().filter_map(|r| r.percent).sum();
    assert!((percent_sum - 100.0).abs() < 1e-9);
}

#[test]
fn test_view_model_drops_suppressed_rows_and_applies_direction() {
    let records = referral_fixture();
    let params = ReportParams {
        year: YearFilter::Year(2024),
        min_group_size: 3,
        ..Default::default()
    };
    let bundle = bundle_for(&records, &params);
    assert_eq!(bundle.year, YearFilter::Year(2024));

    let view = build_view_model(
        &bundle,
        &ViewParams {
            sort_direction: SortDirection::Ascending,
            catchment_target: Some("Small Clinic".to_string()),
        },
        "en",
    );
    assert_eq!(view.catchment_rows.len(), 1);
    assert_eq!(view.suppressed_catchments, 1);
    // 目标不在候选中，回退为第一个候选
    assert_eq!(
        view.selected_trend.as_ref().map(|t| t.label.as_str()),
        Some("Vilniaus rajono PSPC")
    );

    // 合成桶始终在最后
    assert!(view.diagnosis_rows.last().unwrap().kind.is_synthetic());
    let groups_only: Vec<u64> = view
        .diagnosis_rows
        .iter()
        .filter(|r| !r.kind.is_synthetic())
        .map(|r| r.count)
        .collect();
    let mut ascending = groups_only.clone();
    ascending.sort();
    assert_eq!(groups_only, ascending);
}

#[test]
fn test_heatmap_and_referral_reports_present() {
    let records = referral_fixture();
    let bundle = bundle_for(&records, &ReportParams::default());

    assert_eq!(bundle.referral_by_year.len(), 2);
    assert_eq!(bundle.referral_by_month.cells.len(), 36);
    assert!(!bundle.age_diagnosis.cells.is_empty());
    assert!(!bundle.sex_age.is_empty());
    assert_eq!(bundle.record_count, 10);
}
