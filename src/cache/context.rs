// ==========================================
// 急诊就诊统计引擎 - 会话缓存上下文
// ==========================================
// 职责: 一个仪表盘会话的全部缓存层级
//   1. 范围层     (记录集版本, 年份)               → ScopeMeta
//   2. 计算层     (记录集版本, 年份/top-N/最小分组/日历设置) → ReportBundle
//   3. 视图层     (计算层键 + 排序方向/趋势目标)   → ReportViewModel
//   4. 日历序列层 (记录集版本, 日历设置)           → CalendarSeries
//   5. 强度层     (记录集版本)                     → 全部强度矩阵
//   6. 漏斗层     (记录集版本, 年份)               → FunnelResult
// 红线: 显式传入，不使用全局单例
// 红线: 后台计算结果仅在票据仍为最新时写回
// 票据作废: 新票据签发 / 其他键的报表被读取 / 记录集替换 / 清空
// ==========================================

use crate::cache::keys::{calendar_key, computation_key, funnel_key, intensity_key, scope_key, view_key};
use crate::cache::record_set::{RecordSet, RecordSetVersion};
use crate::cache::tier::{CacheTier, TierStats};
use crate::config::CalendarConfig;
use crate::domain::types::YearFilter;
use crate::engine::{
    CalendarRollupEngine, CalendarSeries, FunnelEngine, FunnelResult, IntensityEngine,
    IntensityMatrix, ScopeMeta, ScopeResolver,
};
use crate::report::{build_view_model, ReportBundle, ReportEngine, ReportParams, ReportViewModel, ViewParams};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const SCOPE_TIER_CAPACITY: usize = 32;

/// 各层统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub scope: TierStats,
    pub computation: TierStats,
    pub view: TierStats,
    pub calendar: TierStats,
    pub intensity: TierStats,
    pub funnel: TierStats,
}

/// 后台计算票据
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputationTicket {
    pub records_version: RecordSetVersion,
    pub key: String,
    pub generation: u64,
}

/// 后台计算所需的全部输入
#[derive(Debug, Clone)]
pub struct ComputationJob {
    pub ticket: ComputationTicket,
    pub records: RecordSet,
    pub scope: Arc<ScopeMeta>,
    pub params: ReportParams,
    pub config: CalendarConfig,
}

impl ComputationJob {
    /// 执行纯计算（可在任意线程）
    pub fn run(&self) -> ReportBundle {
        ReportEngine::new().compute_bundle(
            self.records.records(),
            &self.scope,
            &self.params,
            &self.config,
        )
    }
}

/// 发起计算的结果
#[derive(Debug)]
pub enum ComputationRequest {
    /// 计算层已命中
    Ready(Arc<ReportBundle>),
    /// 需要计算
    Pending(ComputationJob),
}

/// 写回结果
#[derive(Debug)]
pub enum CompletionOutcome {
    Stored(Arc<ReportBundle>),
    /// 已有更新的请求，结果被丢弃
    Superseded,
}

/// 会话缓存上下文
#[derive(Debug)]
pub struct AnalyticsCacheContext {
    scope: CacheTier<ScopeMeta>,
    computation: CacheTier<ReportBundle>,
    view: CacheTier<ReportViewModel>,
    calendar: CacheTier<CalendarSeries>,
    intensity: CacheTier<Vec<IntensityMatrix>>,
    funnel: CacheTier<FunnelResult>,
    generation: u64,
    /// 最近一次观察到的记录集版本
    current_version: Option<RecordSetVersion>,
    /// 唯一有效的未完成票据
    pending: Option<ComputationTicket>,
}

impl Default for AnalyticsCacheContext {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsCacheContext {
    pub fn new() -> Self {
        Self {
            scope: CacheTier::new("scope", SCOPE_TIER_CAPACITY),
            computation: CacheTier::new("computation", 1),
            view: CacheTier::new("view", 1),
            calendar: CacheTier::new("calendar", 1),
            intensity: CacheTier::new("intensity", 1),
            funnel: CacheTier::new("funnel", SCOPE_TIER_CAPACITY),
            generation: 0,
            current_version: None,
            pending: None,
        }
    }

    /// 记录集版本变化时作废旧版本的票据
    fn observe(&mut self, version: RecordSetVersion) {
        if self.current_version == Some(version) {
            return;
        }
        self.current_version = Some(version);
        if self
            .pending
            .as_ref()
            .is_some_and(|p| p.records_version != version)
        {
            tracing::debug!(%version, "记录集已替换，作废未完成票据");
            self.pending = None;
        }
    }

    /// 已为其他键提供报表时，未完成票据不再是最新请求
    fn retire_unless(&mut self, version: RecordSetVersion, key: &str) {
        if self
            .pending
            .as_ref()
            .is_some_and(|p| p.records_version != version || p.key != key)
        {
            tracing::debug!(key, "已提供更新的报表，作废未完成票据");
            self.pending = None;
        }
    }

    /// 记录集被替换（由持有记录集的一方调用）
    pub fn records_replaced(&mut self, version: RecordSetVersion) {
        self.observe(version);
    }

    // ==========================================
    // 同步路径
    // ==========================================

    /// 日历序列
    pub fn calendar_series(&mut self, set: &RecordSet, config: &CalendarConfig) -> Arc<CalendarSeries> {
        self.observe(set.version());
        self.calendar
            .get_or_insert_with(set.version(), calendar_key(config), || {
                CalendarRollupEngine::new().build_series(set.records(), config)
            })
    }

    /// 分析范围
    pub fn scope(&mut self, set: &RecordSet, year: YearFilter) -> Arc<ScopeMeta> {
        self.observe(set.version());
        self.scope.get_or_insert_with(set.version(), scope_key(year), || {
            ScopeResolver::new().resolve(set.records(), year)
        })
    }

    /// 全部强度矩阵
    pub fn intensity(&mut self, set: &RecordSet) -> Arc<Vec<IntensityMatrix>> {
        self.observe(set.version());
        self.intensity.get_or_insert_with(set.version(), intensity_key(), || {
            IntensityEngine::new().compute_all(set.records())
        })
    }

    /// 去向漏斗
    ///
    /// 主序列为范围内记录的日序列，完整记录集的日序列作为备用。
    pub fn funnel(
        &mut self,
        set: &RecordSet,
        year: YearFilter,
        config: &CalendarConfig,
    ) -> Arc<FunnelResult> {
        self.observe(set.version());
        let key = funnel_key(year);
        if let Some(funnel) = self.funnel.get(set.version(), &key) {
            return funnel;
        }
        let scope = self.scope(set, year);
        let series = self.calendar_series(set, config);
        let scoped_daily = CalendarRollupEngine::new().rollup_daily(&scope.records, config);
        let funnel = FunnelEngine::new().compute(
            &scoped_daily,
            scope.effective_year.year(),
            Some(&series.daily),
        );
        self.funnel.insert(set.version(), key, funnel)
    }

    /// 报表包
    pub fn reports(
        &mut self,
        set: &RecordSet,
        params: &ReportParams,
        config: &CalendarConfig,
    ) -> Arc<ReportBundle> {
        self.observe(set.version());
        let key = computation_key(params, config);
        self.retire_unless(set.version(), &key);
        if let Some(bundle) = self.computation.get(set.version(), &key) {
            return bundle;
        }
        let scope = self.scope(set, params.year);
        let bundle = ReportEngine::new().compute_bundle(set.records(), &scope, params, config);
        self.computation.insert(set.version(), key, bundle)
    }

    /// 视图模型
    pub fn view_model(
        &mut self,
        set: &RecordSet,
        params: &ReportParams,
        view: &ViewParams,
        config: &CalendarConfig,
    ) -> Arc<ReportViewModel> {
        self.observe(set.version());
        self.retire_unless(set.version(), &computation_key(params, config));
        let key = view_key(params, view, config);
        if let Some(vm) = self.view.get(set.version(), &key) {
            return vm;
        }
        let bundle = self.reports(set, params, config);
        let vm = build_view_model(&bundle, view, &config.locale);
        self.view.insert(set.version(), key, vm)
    }

    // ==========================================
    // 两阶段路径（后台计算）
    // ==========================================

    /// 发起计算：命中直接返回；否则签发新票据，之前的票据全部作废
    pub fn begin_computation(
        &mut self,
        set: &RecordSet,
        params: &ReportParams,
        config: &CalendarConfig,
    ) -> ComputationRequest {
        self.observe(set.version());
        let key = computation_key(params, config);
        if let Some(bundle) = self.computation.get(set.version(), &key) {
            self.retire_unless(set.version(), &key);
            return ComputationRequest::Ready(bundle);
        }
        let scope = self.scope(set, params.year);
        self.generation += 1;
        let ticket = ComputationTicket {
            records_version: set.version(),
            key,
            generation: self.generation,
        };
        tracing::debug!(generation = ticket.generation, key = %ticket.key, "签发计算票据");
        self.pending = Some(ticket.clone());
        ComputationRequest::Pending(ComputationJob {
            ticket,
            records: set.clone(),
            scope,
            params: params.clone(),
            config: config.clone(),
        })
    }

    /// 票据是否仍为最新（同一代次、同一记录集版本）
    pub fn is_current(&self, ticket: &ComputationTicket) -> bool {
        self.pending.as_ref() == Some(ticket)
            && self.current_version == Some(ticket.records_version)
    }

    /// 写回计算结果
    pub fn complete_computation(
        &mut self,
        ticket: &ComputationTicket,
        bundle: ReportBundle,
    ) -> CompletionOutcome {
        if !self.is_current(ticket) {
            tracing::debug!(generation = ticket.generation, "计算结果已过期，丢弃");
            return CompletionOutcome::Superseded;
        }
        self.pending = None;
        let stored = self
            .computation
            .insert(ticket.records_version, ticket.key.clone(), bundle);
        CompletionOutcome::Stored(stored)
    }

    // ==========================================
    // 维护
    // ==========================================

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            scope: self.scope.stats(),
            computation: self.computation.stats(),
            view: self.view.stats(),
            calendar: self.calendar.stats(),
            intensity: self.intensity.stats(),
            funnel: self.funnel.stats(),
        }
    }

    /// 清空全部层级（票据同时作废）
    pub fn clear(&mut self) {
        self.scope.clear();
        self.computation.clear();
        self.view.clear();
        self.calendar.clear();
        self.intensity.clear();
        self.funnel.clear();
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::{VisitRecord, VisitTimestamp};
    use crate::domain::types::{Referral, SortDirection};
    use chrono::NaiveDate;

    fn set() -> RecordSet {
        let mut r = VisitRecord::new(Some(VisitTimestamp::new(
            NaiveDate::from_ymd_opt(2024, 2, 1)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
        )));
        r.referral = Referral::WithReferral;
        RecordSet::new(vec![r])
    }

    #[test]
    fn test_sort_toggle_keeps_computation_tier() {
        let mut ctx = AnalyticsCacheContext::new();
        let records = set();
        let config = CalendarConfig::default();
        let params = ReportParams::default();

        let desc = ctx.view_model(&records, &params, &ViewParams::default(), &config);
        let asc_view = ViewParams {
            sort_direction: SortDirection::Ascending,
            ..Default::default()
        };
        let asc = ctx.view_model(&records, &params, &asc_view, &config);

        assert!(!Arc::ptr_eq(&desc, &asc));
        let stats = ctx.stats();
        assert_eq!(stats.computation.misses, 1);
        assert_eq!(stats.computation.hits, 1);
        assert_eq!(stats.view.misses, 2);
    }

    #[test]
    fn test_superseded_ticket_is_discarded() {
        let mut ctx = AnalyticsCacheContext::new();
        let records = set();
        let config = CalendarConfig::default();

        let first = match ctx.begin_computation(&records, &ReportParams::default(), &config) {
            ComputationRequest::Pending(job) => job,
            ComputationRequest::Ready(_) => panic!("expected pending"),
        };
        let newer_params = ReportParams {
            top_n: 3,
            ..Default::default()
        };
        let second = match ctx.begin_computation(&records, &newer_params, &config) {
            ComputationRequest::Pending(job) => job,
            ComputationRequest::Ready(_) => panic!("expected pending"),
        };

        let stale = first.run();
        assert!(matches!(
            ctx.complete_computation(&first.ticket, stale),
            CompletionOutcome::Superseded
        ));
        let fresh = second.run();
        assert!(matches!(
            ctx.complete_computation(&second.ticket, fresh),
            CompletionOutcome::Stored(_)
        ));
        assert!(matches!(
            ctx.begin_computation(&records, &newer_params, &config),
            ComputationRequest::Ready(_)
        ));
    }

    #[test]
    fn test_ready_request_for_other_key_retires_ticket() {
        let mut ctx = AnalyticsCacheContext::new();
        let records = set();
        let config = CalendarConfig::default();
        let other = ReportParams {
            top_n: 3,
            ..Default::default()
        };
        ctx.reports(&records, &other, &config);

        let job = match ctx.begin_computation(&records, &ReportParams::default(), &config) {
            ComputationRequest::Pending(job) => job,
            ComputationRequest::Ready(_) => panic!("expected pending"),
        };
        assert!(ctx.is_current(&job.ticket));
        assert!(matches!(
            ctx.begin_computation(&records, &other, &config),
            ComputationRequest::Ready(_)
        ));
        assert!(!ctx.is_current(&job.ticket));
    }

    #[test]
    fn test_records_replaced_retires_ticket() {
        let mut ctx = AnalyticsCacheContext::new();
        let records = set();
        let config = CalendarConfig::default();
        let job = match ctx.begin_computation(&records, &ReportParams::default(), &config) {
            ComputationRequest::Pending(job) => job,
            ComputationRequest::Ready(_) => panic!("expected pending"),
        };
        ctx.records_replaced(set().version());
        let bundle = job.run();
        assert!(matches!(
            ctx.complete_computation(&job.ticket, bundle),
            CompletionOutcome::Superseded
        ));
        assert_eq!(ctx.stats().computation.writes, 0);
    }
}
