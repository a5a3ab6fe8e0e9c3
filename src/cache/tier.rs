// ==========================================
// 急诊就诊统计引擎 - 缓存层级
// ==========================================
// 职责: 单个缓存层级 {记录集版本, 组合键, 值} 的读写
// 规则: 条目有效 ⇔ 记录集版本相同 且 组合键相同
// 规则: 条目整体替换（版本/键/值一起写入），不做部分更新
// 规则: 记录集版本变化时整层清空
// ==========================================

use crate::cache::record_set::RecordSetVersion;
use crate::perf;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

/// 缓存条目
#[derive(Debug)]
pub struct CacheEntry<V> {
    pub records_version: RecordSetVersion,
    pub key: String,
    pub value: Arc<V>,
}

/// 层级统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierStats {
    pub hits: u64,
    pub misses: u64,
    /// 因记录集版本变化而整层清空的次数
    pub invalidations: u64,
    pub writes: u64,
    pub entries: usize,
}

/// 缓存层级
#[derive(Debug)]
pub struct CacheTier<V> {
    name: &'static str,
    capacity: usize,
    entries: VecDeque<CacheEntry<V>>,
    stats: TierStats,
}

impl<V> CacheTier<V> {
    /// 创建层级；capacity 至少为 1
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity: capacity.max(1),
            entries: VecDeque::new(),
            stats: TierStats::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// 查询；记录集版本变化时先整层失效
    pub fn get(&mut self, version: RecordSetVersion, key: &str) -> Option<Arc<V>> {
        self.invalidate_if_stale(version);
        match self.entries.iter().find(|e| e.key == key) {
            Some(entry) => {
                self.stats.hits += 1;
                perf::record_cache_hit();
                tracing::debug!(tier = self.name, key, "cache hit");
                Some(Arc::clone(&entry.value))
            }
            None => {
                self.stats.misses += 1;
                perf::record_cache_miss();
                tracing::debug!(tier = self.name, key, "cache miss");
                None
            }
        }
    }

    /// 只读查询（不计统计、不触发失效）
    pub fn peek(&self, version: RecordSetVersion, key: &str) -> Option<Arc<V>> {
        self.entries
            .iter()
            .find(|e| e.records_version == version && e.key == key)
            .map(|e| Arc::clone(&e.value))
    }

    /// 写入条目并返回共享引用
    pub fn insert(&mut self, version: RecordSetVersion, key: String, value: V) -> Arc<V> {
        self.insert_shared(version, key, Arc::new(value))
    }

    /// 写入已共享的值
    pub fn insert_shared(&mut self, version: RecordSetVersion, key: String, value: Arc<V>) -> Arc<V> {
        self.invalidate_if_stale(version);
        self.entries.retain(|e| e.key != key);
        self.entries.push_back(CacheEntry {
            records_version: version,
            key,
            value: Arc::clone(&value),
        });
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.stats.writes += 1;
        value
    }

    /// 命中直接返回，否则计算并写入
    pub fn get_or_insert_with<F>(&mut self, version: RecordSetVersion, key: String, compute: F) -> Arc<V>
    where
        F: FnOnce() -> V,
    {
        if let Some(value) = self.get(version, &key) {
            return value;
        }
        let value = compute();
        self.insert(version, key, value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> TierStats {
        TierStats {
            entries: self.entries.len(),
            ..self.stats
        }
    }

    fn invalidate_if_stale(&mut self, version: RecordSetVersion) {
        let stale = self
            .entries
            .front()
            .is_some_and(|e| e.records_version != version);
        if stale {
            tracing::info!(tier = self.name, dropped = self.entries.len(), "记录集已替换，缓存层失效");
            self.entries.clear();
            self.stats.invalidations += 1;
        }
    }
}
