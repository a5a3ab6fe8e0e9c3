// ==========================================
// 急诊就诊统计引擎 - 比率计算
// ==========================================
// 红线: 所有比率在分母为 0 时返回 None，不产生 NaN
// ==========================================

/// 比率：分母为 0 返回 None
pub fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    if denominator == 0.0 || !denominator.is_finite() || !numerator.is_finite() {
        None
    } else {
        Some(numerator / denominator)
    }
}

/// 计数比率
pub fn share(part: u64, total: u64) -> Option<f64> {
    if total == 0 {
        None
    } else {
        Some(part as f64 / total as f64)
    }
}

/// 百分比 (0-100)
pub fn percent(part: u64, total: u64) -> Option<f64> {
    share(part, total).map(|s| s * 100.0)
}

/// 平均值：样本数为 0 返回 None
pub fn mean(sum: f64, samples: u64) -> Option<f64> {
    if samples == 0 {
        None
    } else {
        Some(sum / samples as f64)
    }
}

/// 两个可选值之差，任一缺失返回 None
pub fn delta(current: Option<f64>, previous: Option<f64>) -> Option<f64> {
    Some(current? - previous?)
}
