// ==========================================
// 急诊就诊统计引擎 - 后台计算错误
// ==========================================

use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum WorkerError {
    #[error("后台计算任务执行失败 (job_id={job_id}): {message}")]
    JobFailed { job_id: Uuid, message: String },

    #[error("后台计算任务被取消 (job_id={job_id})")]
    Cancelled { job_id: Uuid },
}

pub type WorkerResult<T> = Result<T, WorkerError>;
