// ==========================================
// 急诊就诊统计引擎 - 仪表盘 API
// ==========================================
// 职责: 持有当前记录集、日历配置与会话缓存上下文，
//       对外提供仪表盘各组件所需的计算结果
// 架构: API 层 → 缓存上下文 → 引擎/报表（纯计算）
// ==========================================

use std::sync::{Arc, Mutex, MutexGuard};

use crate::api::dto::{DashboardFilter, DashboardSnapshot, ScopeSummary};
use crate::api::error::{ApiError, ApiResult};
use crate::cache::{
    AnalyticsCacheContext, CacheStats, CompletionOutcome, ComputationRequest, RecordSet,
    RecordSetVersion,
};
use crate::config::CalendarConfig;
use crate::domain::record::VisitRecord;
use crate::domain::types::IntensityMetric;
use crate::engine::{CalendarSeries, FunnelResult, IntensityMatrix, KpiEngine, KpiSummary, ScopeMeta};
use crate::importer::{parse_rows_json, DqReport, RawVisitRow, RecordValidator};
use crate::perf::PerfGuard;
use crate::report::{ReportBundle, ReportViewModel};
use crate::worker::ReportWorker;

/// 会话状态
struct SessionState {
    records: RecordSet,
    config: CalendarConfig,
    cache: AnalyticsCacheContext,
}

// ==========================================
// DashboardApi - 仪表盘 API
// ==========================================

/// 仪表盘API
///
/// 一个实例对应一个仪表盘会话；缓存随实例存在，不跨会话共享。
pub struct DashboardApi {
    state: Mutex<SessionState>,
    validator: RecordValidator,
}

impl Default for DashboardApi {
    fn default() -> Self {
        Self::new(CalendarConfig::default())
    }
}

impl DashboardApi {
    /// 创建新的DashboardApi实例（空记录集）
    pub fn new(config: CalendarConfig) -> Self {
        Self {
            state: Mutex::new(SessionState {
                records: RecordSet::empty(),
                config,
                cache: AnalyticsCacheContext::new(),
            }),
            validator: RecordValidator::new(),
        }
    }

    fn lock(&self) -> ApiResult<MutexGuard<'_, SessionState>> {
        self.state
            .lock()
            .map_err(|e| ApiError::LockError(e.to_string()))
    }

    // ==========================================
    // 记录集管理
    // ==========================================

    /// 替换记录集（新版本令牌，全部缓存层随之失效，未完成的后台计算作废）
    pub fn load_records(&self, records: Vec<VisitRecord>) -> ApiResult<RecordSetVersion> {
        let set = RecordSet::new(records);
        let version = set.version();
        let mut state = self.lock()?;
        tracing::info!(%version, count = set.len(), "加载记录集");
        state.records = set;
        state.cache.records_replaced(version);
        Ok(version)
    }

    /// 校验原始行并加载
    pub fn import_rows(&self, rows: &[RawVisitRow]) -> ApiResult<DqReport> {
        let _perf = PerfGuard::new("import_rows");
        let (records, report) = self.validator.validate_rows(rows);
        self.load_records(records)?;
        Ok(report)
    }

    /// 从 JSON 文本导入
    pub fn import_json(&self, raw: &str) -> ApiResult<DqReport> {
        let rows = parse_rows_json(raw)?;
        self.import_rows(&rows)
    }

    /// 当前记录集（共享引用）
    pub fn record_set(&self) -> ApiResult<RecordSet> {
        Ok(self.lock()?.records.clone())
    }

    // ==========================================
    // 配置
    // ==========================================

    pub fn config(&self) -> ApiResult<CalendarConfig> {
        Ok(self.lock()?.config.clone())
    }

    /// 更新日历配置
    ///
    /// 日历设置参与缓存键，受影响的层级会在下次查询时自然重算。
    pub fn update_config(&self, config: CalendarConfig) -> ApiResult<()> {
        config.validate()?;
        let mut state = self.lock()?;
        tracing::info!(key = %config.cache_key_fragment(), "更新日历配置");
        state.config = config;
        Ok(())
    }

    // ==========================================
    // 日历汇总 / KPI
    // ==========================================

    pub fn calendar_series(&self) -> ApiResult<Arc<CalendarSeries>> {
        let _perf = PerfGuard::new("calendar_series");
        let mut state = self.lock()?;
        let SessionState {
            records,
            config,
            cache,
        } = &mut *state;
        Ok(cache.calendar_series(records, config))
    }

    pub fn kpi_summary(&self, filter: &DashboardFilter) -> ApiResult<KpiSummary> {
        let series = self.calendar_series()?;
        Ok(KpiEngine::new().summarize(&series.daily, filter.year_filter()))
    }

    // ==========================================
    // 时段强度
    // ==========================================

    pub fn intensity(&self, metric: IntensityMetric) -> ApiResult<IntensityMatrix> {
        let all = self.intensity_all()?;
        all.iter()
            .find(|m| m.metric == metric)
            .cloned()
            .ok_or_else(|| ApiError::Other(anyhow::anyhow!("缺少强度指标: {}", metric)))
    }

    /// 全部强度矩阵（按记录集版本缓存）
    pub fn intensity_all(&self) -> ApiResult<Arc<Vec<IntensityMatrix>>> {
        let mut state = self.lock()?;
        let SessionState { records, cache, .. } = &mut *state;
        Ok(cache.intensity(records))
    }

    // ==========================================
    // 范围 / 漏斗
    // ==========================================

    pub fn scope(&self, filter: &DashboardFilter) -> ApiResult<Arc<ScopeMeta>> {
        let mut state = self.lock()?;
        let SessionState { records, cache, .. } = &mut *state;
        Ok(cache.scope(records, filter.year_filter()))
    }

    /// 去向漏斗
    ///
    /// 主序列为当前范围（含扩展字段）记录的日序列；
    /// 范围为空时以完整记录集的日序列作为备用。
    pub fn funnel(&self, filter: &DashboardFilter) -> ApiResult<FunnelResult> {
        let mut state = self.lock()?;
        let SessionState {
            records,
            config,
            cache,
        } = &mut *state;
        Ok(*cache.funnel(records, filter.year_filter(), config))
    }

    // ==========================================
    // 交叉分析报表
    // ==========================================

    pub fn reports(&self, filter: &DashboardFilter) -> ApiResult<Arc<ReportBundle>> {
        let _perf = PerfGuard::new("reports");
        let params = filter.report_params();
        let mut state = self.lock()?;
        let SessionState {
            records,
            config,
            cache,
        } = &mut *state;
        Ok(cache.reports(records, &params, config))
    }

    pub fn view_model(&self, filter: &DashboardFilter) -> ApiResult<Arc<ReportViewModel>> {
        let _perf = PerfGuard::new("view_model");
        let params = filter.report_params();
        let view = filter.view_params();
        let mut state = self.lock()?;
        let SessionState {
            records,
            config,
            cache,
        } = &mut *state;
        Ok(cache.view_model(records, &params, &view, config))
    }

    /// 委托后台计算报表包
    ///
    /// 计算期间不持有会话锁；若期间有更新的请求，返回 `Superseded`。
    pub async fn reports_via_worker(
        &self,
        worker: &dyn ReportWorker,
        filter: &DashboardFilter,
    ) -> ApiResult<CompletionOutcome> {
        let params = filter.report_params();
        let request = {
            let mut state = self.lock()?;
            let SessionState {
                records,
                config,
                cache,
            } = &mut *state;
            cache.begin_computation(records, &params, config)
        };

        let job = match request {
            ComputationRequest::Ready(bundle) => return Ok(CompletionOutcome::Stored(bundle)),
            ComputationRequest::Pending(job) => job,
        };
        let ticket = job.ticket.clone();
        let bundle = worker.compute(job).await?;

        let mut state = self.lock()?;
        Ok(state.cache.complete_computation(&ticket, bundle))
    }

    // ==========================================
    // 聚合快照
    // ==========================================

    /// 一次过滤状态下的全部组件数据
    pub fn snapshot(&self, filter: &DashboardFilter) -> ApiResult<DashboardSnapshot> {
        let _perf = PerfGuard::new("snapshot");
        let records = self.record_set()?;
        let calendar = self.calendar_series()?;
        let scope = self.scope(filter)?;
        let view = self.view_model(filter)?;
        let funnel = self.funnel(filter)?;
        let kpi = KpiEngine::new().summarize(&calendar.daily, scope.effective_year);
        let intensity = self.intensity_all()?;

        Ok(DashboardSnapshot {
            records_version: records.version(),
            record_count: records.len(),
            kpi,
            calendar: (*calendar).clone(),
            funnel,
            intensity: (*intensity).clone(),
            scope: ScopeSummary {
                available_years: scope.available_years.clone(),
                effective_year: scope.effective_year,
                coverage: scope.coverage,
                extended_count: scope.extended_count,
                total_count: scope.total_count,
                scoped_count: scope.record_count(),
            },
            view: (*view).clone(),
        })
    }

    // ==========================================
    // 诊断
    // ==========================================

    pub fn cache_stats(&self) -> ApiResult<CacheStats> {
        Ok(self.lock()?.cache.stats())
    }

    /// 清空会话缓存
    pub fn clear_cache(&self) -> ApiResult<()> {
        self.lock()?.cache.clear();
        Ok(())
    }

    /// 可选年份
    pub fn available_years(&self) -> ApiResult<Vec<i32>> {
        Ok(self.scope(&DashboardFilter::default())?.available_years.clone())
    }
}

