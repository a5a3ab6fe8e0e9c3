// ==========================================
// 急诊就诊统计引擎 - 就诊记录校验器
// ==========================================
// 职责: 原始行 → VisitRecord + DQ 报告
// 红线: 不拒绝任何行；字段问题只让该字段在相关计算中被排除
// ==========================================

use crate::domain::record::{VisitRecord, VisitTimestamp};
use crate::importer::data_cleaner::DataCleaner;
use crate::importer::dq_report::{DqKind, DqLevel, DqReport, DqSummary, DqViolation};
use crate::importer::error::ImportError;
use crate::importer::field_mapper::FieldMapper;
use crate::importer::raw_row::RawVisitRow;

pub struct RecordValidator {
    cleaner: DataCleaner,
    mapper: FieldMapper,
}

impl Default for RecordValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordValidator {
    pub fn new() -> Self {
        Self {
            cleaner: DataCleaner,
            mapper: FieldMapper,
        }
    }

    /// 批量校验
    ///
    /// # 返回
    /// - 与输入等长、顺序一致的记录
    /// - DQ 报告
    pub fn validate_rows(&self, rows: &[RawVisitRow]) -> (Vec<VisitRecord>, DqReport) {
        let mut records = Vec::with_capacity(rows.len());
        let mut violations = Vec::new();
        let mut clean_rows = 0;
        let mut without_timestamps = 0;

        for (row_number, row) in rows.iter().enumerate() {
            let before = violations.len();
            let record = self.validate_row(row_number, row, &mut violations);
            if record.anchor().is_none() {
                without_timestamps += 1;
            }
            if violations.len() == before {
                clean_rows += 1;
            }
            records.push(record);
        }

        let warning = violations
            .iter()
            .filter(|v| v.level == DqLevel::Warning)
            .count();
        let info = violations.len() - warning;

        if warning > 0 {
            tracing::warn!(
                total_rows = rows.len(),
                warning,
                without_timestamps,
                "就诊记录存在数据质量告警"
            );
        }

        let report = DqReport {
            summary: DqSummary {
                total_rows: rows.len(),
                clean_rows,
                warning,
                info,
                without_timestamps,
            },
            violations,
        };
        (records, report)
    }

    /// 单行校验
    pub fn validate_row(
        &self,
        row_number: usize,
        row: &RawVisitRow,
        violations: &mut Vec<DqViolation>,
    ) -> VisitRecord {
        let arrival = self.timestamp_field(row_number, "arrival", row.arrival.as_deref(), violations);
        let discharge =
            self.timestamp_field(row_number, "discharge", row.discharge.as_deref(), violations);

        if arrival.is_none() && discharge.is_none() {
            violations.push(DqViolation {
                row_number,
                kind: DqKind::MissingTimestamps,
                level: DqLevel::Warning,
                field: "arrival".to_string(),
                message: "到达与离院时间均缺失，不参与日历汇总".to_string(),
            });
        }

        if let (Some(a), Some(d)) = (&arrival, &discharge) {
            if d.at < a.at {
                violations.push(DqViolation {
                    row_number,
                    kind: DqKind::NegativeDuration,
                    level: DqLevel::Warning,
                    field: "discharge".to_string(),
                    message: format!("离院时间早于到达时间: {} < {}", d.at, a.at),
                });
            }
        }

        let ems = self.flag_field(row_number, "ems", row.ems.as_deref(), violations);
        let hospitalized =
            self.flag_field(row_number, "hospitalized", row.hospitalized.as_deref(), violations);

        let referral_raw = self.cleaner.normalize_null(row.referral.as_deref());
        let (referral, ok) = self.mapper.map_referral(referral_raw.as_deref());
        if !ok {
            self.push_unrecognized(row_number, "referral", referral_raw.as_deref(), violations);
        }

        let sex_raw = self.cleaner.normalize_null(row.sex.as_deref());
        let (sex, ok) = self.mapper.map_sex(sex_raw.as_deref());
        if !ok {
            self.push_unrecognized(row_number, "sex", sex_raw.as_deref(), violations);
        }

        let age_raw = self.cleaner.normalize_null(row.age.as_deref());
        let (age_band, ok) = self.mapper.map_age_band(age_raw.as_deref());
        if !ok {
            self.push_unrecognized(row_number, "age", age_raw.as_deref(), violations);
        }

        let department = self
            .cleaner
            .normalize_null(row.department.as_deref())
            .map(|d| self.cleaner.clean_text(&d, false));
        let diagnosis_code = self.mapper.normalize_diagnosis_code(
            self.cleaner.normalize_null(row.diagnosis_code.as_deref()).as_deref(),
        );
        let primary_care_area = self.mapper.normalize_area_label(
            self.cleaner
                .normalize_null(row.primary_care_area.as_deref())
                .as_deref(),
        );

        VisitRecord {
            arrival,
            discharge,
            ems,
            hospitalized,
            department,
            diagnosis_code,
            referral,
            primary_care_area,
            age_band,
            sex,
        }
    }

    fn timestamp_field(
        &self,
        row_number: usize,
        field: &str,
        value: Option<&str>,
        violations: &mut Vec<DqViolation>,
    ) -> Option<VisitTimestamp> {
        let raw = self.cleaner.normalize_null(value)?;
        match self.cleaner.parse_timestamp(&raw) {
            Some(ts) => Some(ts),
            None => {
                let err = ImportError::DateFormatError {
                    row: row_number,
                    field: field.to_string(),
                    value: raw,
                };
                violations.push(DqViolation {
                    row_number,
                    kind: DqKind::UnparseableTimestamp,
                    level: DqLevel::Warning,
                    field: field.to_string(),
                    message: err.to_string(),
                });
                None
            }
        }
    }

    fn flag_field(
        &self,
        row_number: usize,
        field: &str,
        value: Option<&str>,
        violations: &mut Vec<DqViolation>,
    ) -> bool {
        let Some(raw) = value else {
            return false;
        };
        match self.cleaner.parse_flag(raw) {
            Some(flag) => flag,
            None => {
                self.push_unrecognized(row_number, field, Some(raw), violations);
                false
            }
        }
    }

    fn push_unrecognized(
        &self,
        row_number: usize,
        field: &str,
        value: Option<&str>,
        violations: &mut Vec<DqViolation>,
    ) {
        let err = ImportError::UnrecognizedValue {
            row: row_number,
            field: field.to_string(),
            value: value.unwrap_or_default().to_string(),
        };
        violations.push(DqViolation {
            row_number,
            kind: DqKind::UnrecognizedValue,
            level: DqLevel::Info,
            field: field.to_string(),
            message: err.to_string(),
        });
    }
}
