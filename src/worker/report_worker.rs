// ==========================================
// 急诊就诊统计引擎 - 报表计算委托
// ==========================================
// 职责: 把报表包的纯计算交给后台执行
// 说明: 不建模取消与超时；过期结果由缓存上下文在写回时丢弃
// ==========================================

use crate::cache::ComputationJob;
use crate::report::ReportBundle;
use crate::worker::error::{WorkerError, WorkerResult};
use async_trait::async_trait;
use uuid::Uuid;

// ==========================================
// ReportWorker Trait
// ==========================================
// 实现者: BlockingPoolWorker（tokio blocking 线程池）
#[async_trait]
pub trait ReportWorker: Send + Sync {
    /// 执行一次报表计算
    async fn compute(&self, job: ComputationJob) -> WorkerResult<ReportBundle>;
}

/// tokio blocking 线程池实现
#[derive(Debug, Clone, Default)]
pub struct BlockingPoolWorker;

impl BlockingPoolWorker {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ReportWorker for BlockingPoolWorker {
    async fn compute(&self, job: ComputationJob) -> WorkerResult<ReportBundle> {
        let job_id = Uuid::new_v4();
        let generation = job.ticket.generation;
        tracing::debug!(%job_id, generation, "报表计算任务开始");

        let result = tokio::task::spawn_blocking(move || {
            let _perf = crate::perf::PerfGuard::new("worker_compute_bundle");
            job.run()
        })
        .await;

        match result {
            Ok(bundle) => {
                tracing::debug!(%job_id, generation, "报表计算任务完成");
                Ok(bundle)
            }
            Err(e) if e.is_cancelled() => Err(WorkerError::Cancelled { job_id }),
            Err(e) => Err(WorkerError::JobFailed {
                job_id,
                message: e.to_string(),
            }),
        }
    }
}
