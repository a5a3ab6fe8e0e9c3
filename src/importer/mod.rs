// ==========================================
// 急诊就诊统计引擎 - 记录模型与校验层
// ==========================================
// 职责: 规范化/校验就诊记录的时间与分类字段
// 说明: 下游所有计算都假设记录已经过此层
// ==========================================

pub mod data_cleaner;
pub mod dq_report;
pub mod error;
pub mod field_mapper;
pub mod raw_row;
pub mod record_validator;

pub use data_cleaner::DataCleaner;
pub use dq_report::{DqKind, DqLevel, DqReport, DqSummary, DqViolation};
pub use error::{ImportError, ImportResult};
pub use field_mapper::FieldMapper;
pub use raw_row::{parse_rows_json, RawVisitRow};
pub use record_validator::RecordValidator;
