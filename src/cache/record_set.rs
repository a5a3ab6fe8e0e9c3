// ==========================================
// 急诊就诊统计引擎 - 记录集与版本令牌
// ==========================================
// 职责: 以显式版本令牌表示记录集"身份"
// 规则: 每次构造新记录集分配新版本（内容相同也不同）；克隆共享版本
// ==========================================

use crate::domain::record::VisitRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_VERSION: AtomicU64 = AtomicU64::new(1);

/// 记录集版本令牌（不透明）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RecordSetVersion(u64);

impl RecordSetVersion {
    fn next() -> Self {
        Self(NEXT_VERSION.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for RecordSetVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// 不可变记录集
#[derive(Debug, Clone)]
pub struct RecordSet {
    version: RecordSetVersion,
    records: Arc<Vec<VisitRecord>>,
}

impl RecordSet {
    pub fn new(records: Vec<VisitRecord>) -> Self {
        Self {
            version: RecordSetVersion::next(),
            records: Arc::new(records),
        }
    }

    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn version(&self) -> RecordSetVersion {
        self.version
    }

    pub fn records(&self) -> &[VisitRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for RecordSet {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_contents_get_distinct_versions() {
        let a = RecordSet::new(vec![VisitRecord::new(None)]);
        let b = RecordSet::new(vec![VisitRecord::new(None)]);
        assert_eq!(a.records(), b.records());
        assert_ne!(a.version(), b.version());
    }

    #[test]
    fn test_clone_shares_identity() {
        let a = RecordSet::new(vec![VisitRecord::new(None)]);
        let b = a.clone();
        assert_eq!(a.version(), b.version());
    }
}
