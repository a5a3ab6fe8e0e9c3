// ==========================================
// 急诊就诊统计引擎 - 时段强度矩阵
// ==========================================
// 职责: 星期 × 小时 (7×24) 的单指标矩阵
// 口径: 计数类指标 = 小时合计 ÷ 该星期出现过的不同日期数
// 口径: 平均停留时长 = 时长合计 ÷ 样本数
// 红线: 只做数值，不做任何展示决策
// ==========================================

use crate::domain::ratio::{mean, ratio};
use crate::domain::record::{VisitRecord, VisitTimestamp};
use crate::domain::types::IntensityMetric;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::instrument;

pub const WEEKDAYS: usize = 7;
pub const HOURS: usize = 24;

/// 矩阵单元
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct IntensityCell {
    /// 单元值；没有可用分母时为 None
    pub value: Option<f64>,
    /// 原始样本数（计数类指标即小时合计）
    pub samples: u64,
}

/// 强度矩阵
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntensityMatrix {
    pub metric: IntensityMetric,
    /// cells[weekday][hour]，周一 = 0
    pub cells: Vec<Vec<IntensityCell>>,
    /// 每个星期出现过的不同日期数
    pub weekday_days: [u32; WEEKDAYS],
    /// 全部单元的最大值（供色阶归一化）
    pub max: f64,
    pub has_data: bool,
}

impl IntensityMatrix {
    pub fn cell(&self, weekday: usize, hour: usize) -> Option<&IntensityCell> {
        self.cells.get(weekday).and_then(|row| row.get(hour))
    }
}

// ==========================================
// IntensityEngine - 时段强度引擎
// ==========================================
pub struct IntensityEngine;

impl Default for IntensityEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl IntensityEngine {
    pub fn new() -> Self {
        Self
    }

    /// 计算单指标矩阵
    #[instrument(skip(self, records), fields(count = records.len(), metric = %metric))]
    pub fn compute(&self, records: &[VisitRecord], metric: IntensityMetric) -> IntensityMatrix {
        let mut totals = [[0.0f64; HOURS]; WEEKDAYS];
        let mut samples = [[0u64; HOURS]; WEEKDAYS];
        let mut observed: [HashSet<NaiveDate>; WEEKDAYS] = Default::default();

        for record in records {
            let Some(ts) = bucket_timestamp(record, metric) else {
                continue;
            };
            let Some(hour) = ts.hour() else {
                continue;
            };
            let (wd, h) = (ts.weekday_index(), hour as usize);
            observed[wd].insert(ts.date());

            match metric {
                IntensityMetric::Arrivals | IntensityMetric::Discharges => {
                    totals[wd][h] += 1.0;
                    samples[wd][h] += 1;
                }
                IntensityMetric::Hospitalized => {
                    if record.hospitalized {
                        totals[wd][h] += 1.0;
                        samples[wd][h] += 1;
                    }
                }
                IntensityMetric::AverageDuration => {
                    if let Some(minutes) = record.duration_minutes() {
                        totals[wd][h] += minutes as f64;
                        samples[wd][h] += 1;
                    }
                }
            }
        }

        let mut weekday_days = [0u32; WEEKDAYS];
        for (wd, dates) in observed.iter().enumerate() {
            weekday_days[wd] = dates.len() as u32;
        }

        let mut max = 0.0f64;
        let mut has_data = false;
        let cells: Vec<Vec<IntensityCell>> = (0..WEEKDAYS)
            .map(|wd| {
                (0..HOURS)
                    .map(|h| {
                        let value = match metric {
                            IntensityMetric::AverageDuration => mean(totals[wd][h], samples[wd][h]),
                            _ => ratio(totals[wd][h], weekday_days[wd] as f64),
                        };
                        if samples[wd][h] > 0 {
                            has_data = true;
                        }
                        if let Some(v) = value {
                            max = max.max(v);
                        }
                        IntensityCell {
                            value,
                            samples: samples[wd][h],
                        }
                    })
                    .collect()
            })
            .collect();

        IntensityMatrix {
            metric,
            cells,
            weekday_days,
            max,
            has_data,
        }
    }

    /// 全部指标
    pub fn compute_all(&self, records: &[VisitRecord]) -> Vec<IntensityMatrix> {
        IntensityMetric::ALL
            .iter()
            .map(|m| self.compute(records, *m))
            .collect()
    }
}

/// 分桶用时间戳：离院/住院按离院时间，其余按到达时间
fn bucket_timestamp(record: &VisitRecord, metric: IntensityMetric) -> Option<&VisitTimestamp> {
    if metric.uses_discharge_time() {
        record.discharge.as_ref()
    } else {
        record.arrival.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32) -> VisitTimestamp {
        VisitTimestamp::new(
            NaiveDate::from_ymd_opt(y, m, d)
                .unwrap()
                .and_hms_opt(h, 15, 0)
                .unwrap(),
        )
    }

    #[test]
    fn test_empty_matrix_has_no_data() {
        let m = IntensityEngine::new().compute(&[], IntensityMetric::Arrivals);
        assert!(!m.has_data);
        assert_eq!(m.max, 0.0);
        assert_eq!(m.cell(0, 0).unwrap().value, None);
    }

    #[test]
    fn test_average_duration_distinguishes_zero_from_missing() {
        let mut zero = VisitRecord::new(Some(at(2024, 2, 5, 9)));
        zero.discharge = Some(at(2024, 2, 5, 9));
        let m = IntensityEngine::new().compute(&[zero], IntensityMetric::AverageDuration);
        let cell = m.cell(0, 9).unwrap();
        assert_eq!(cell.value, Some(0.0));
        assert_eq!(cell.samples, 1);
        assert_eq!(m.cell(0, 10).unwrap().value, None);
        assert!(m.has_data);
    }

    #[test]
    fn test_date_only_timestamps_are_not_bucketed() {
        let date_only =
            VisitRecord::new(Some(VisitTimestamp::date_only(NaiveDate::from_ymd_opt(2024, 2, 5).unwrap())));
        let m = IntensityEngine::new().compute(&[date_only], IntensityMetric::Arrivals);
        assert!(!m.has_data);
        assert_eq!(m.weekday_days[0], 0);
    }

    #[test]
    fn test_hospitalized_uses_discharge_time() {
        let mut r = VisitRecord::new(Some(at(2024, 2, 5, 23)));
        r.discharge = Some(at(2024, 2, 6, 2));
        r.hospitalized = true;
        let m = IntensityEngine::new().compute(&[r], IntensityMetric::Hospitalized);
        assert_eq!(m.cell(1, 2).unwrap().value, Some(1.0));
        assert_eq!(m.cell(0, 23).unwrap().value, None);
    }
}
