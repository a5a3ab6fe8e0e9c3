// ==========================================
// 性能统计
// ==========================================
// PerfGuard: 记录 elapsed_ms + 期间发生的缓存命中/未命中次数
// 计数器为线程局部，由缓存层写入
// ==========================================

use std::cell::Cell;
use std::time::Instant;

thread_local! {
    static PERF_DEPTH: Cell<u32> = const { Cell::new(0) };
    static CACHE_HITS: Cell<u64> = const { Cell::new(0) };
    static CACHE_MISSES: Cell<u64> = const { Cell::new(0) };
}

/// 记录一次缓存命中
pub fn record_cache_hit() {
    CACHE_HITS.with(|c| c.set(c.get().saturating_add(1)));
}

/// 记录一次缓存未命中
pub fn record_cache_miss() {
    CACHE_MISSES.with(|c| c.set(c.get().saturating_add(1)));
}

/// 当前线程累计 (命中, 未命中)
pub fn cache_counters() -> (u64, u64) {
    (
        CACHE_HITS.with(|c| c.get()),
        CACHE_MISSES.with(|c| c.get()),
    )
}

/// 性能统计 Guard
///
/// 使用方式：
/// ```ignore
/// let _perf = ed_visit_analytics::perf::PerfGuard::new("reports");
/// // do work...
/// ```
pub struct PerfGuard {
    op: &'static str,
    start: Instant,
    hits_start: u64,
    misses_start: u64,
}

impl PerfGuard {
    pub fn new(op: &'static str) -> Self {
        PERF_DEPTH.with(|d| d.set(d.get().saturating_add(1)));
        let (hits_start, misses_start) = cache_counters();
        Self {
            op,
            start: Instant::now(),
            hits_start,
            misses_start,
        }
    }
}

impl Drop for PerfGuard {
    fn drop(&mut self) {
        let elapsed_ms = self.start.elapsed().as_millis() as u64;
        let (hits_end, misses_end) = cache_counters();
        let cache_hits = hits_end.saturating_sub(self.hits_start);
        let cache_misses = misses_end.saturating_sub(self.misses_start);
        let depth = PERF_DEPTH.with(|d| d.get());

        tracing::info!(
            target: "perf",
            op = self.op,
            elapsed_ms,
            cache_hits,
            cache_misses,
            depth,
            "done"
        );

        PERF_DEPTH.with(|d| d.set(d.get().saturating_sub(1)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_accumulate() {
        let (h0, m0) = cache_counters();
        record_cache_hit();
        record_cache_hit();
        record_cache_miss();
        let (h1, m1) = cache_counters();
        assert_eq!(h1 - h0, 2);
        assert_eq!(m1 - m0, 1);
    }

    #[test]
    fn test_guard_drop_restores_depth() {
        {
            let _outer = PerfGuard::new("outer");
            let _inner = PerfGuard::new("inner");
            assert_eq!(PERF_DEPTH.with(|d| d.get()), 2);
        }
        assert_eq!(PERF_DEPTH.with(|d| d.get()), 0);
    }
}
