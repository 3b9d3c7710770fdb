//! Q 表
//!
//! (局面哈希, 走法) → 平均回报。Q 值以该局面的走子方为视角。
//! 在同一代理的多次搜索之间保留（积累的"经验"），换新对局前需显式清空。

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};

/// 单个 (局面, 走法) 的统计
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct QEntry {
    /// 访问次数
    pub visits: u32,
    /// 平均回报
    pub mean: f64,
}

/// Q 表
#[derive(Debug)]
pub struct QTable<A> {
    values: HashMap<(u64, A), QEntry>,
    /// 局面访问次数（UCB 的父节点计数）
    state_visits: HashMap<u64, u32>,
    hits: AtomicU64,
    lookups: AtomicU64,
}

impl<A: Copy + Eq + Hash> QTable<A> {
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
            state_visits: HashMap::new(),
            hits: AtomicU64::new(0),
            lookups: AtomicU64::new(0),
        }
    }

    /// 查询条目（未访问过时为 None）
    pub fn entry(&self, hash: u64, action: A) -> Option<QEntry> {
        self.lookups.fetch_add(1, Ordering::Relaxed);
        let entry = self.values.get(&(hash, action)).copied();
        if entry.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        entry
    }

    /// 平均回报，没有记录时为 0
    pub fn q_value(&self, hash: u64, action: A) -> f64 {
        self.entry(hash, action).map_or(0.0, |e| e.mean)
    }

    /// 局面访问次数
    pub fn state_visits(&self, hash: u64) -> u32 {
        self.state_visits.get(&hash).copied().unwrap_or(0)
    }

    /// 记录一次回报：增量均值 Q += (r - Q) / n
    pub fn update(&mut self, hash: u64, action: A, reward: f64) {
        *self.state_visits.entry(hash).or_insert(0) += 1;

        let entry = self.values.entry((hash, action)).or_default();
        entry.visits += 1;
        entry.mean += (reward - entry.mean) / entry.visits as f64;
    }

    /// 清空表（条目与统计一并清零）
    pub fn clear(&mut self) {
        self.values.clear();
        self.state_visits.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.lookups.store(0, Ordering::Relaxed);
    }

    /// 条目数
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// 获取统计信息
    pub fn stats(&self) -> QTableStats {
        QTableStats {
            entries: self.values.len(),
            hits: self.hits.load(Ordering::Relaxed),
            lookups: self.lookups.load(Ordering::Relaxed),
        }
    }
}

impl<A: Copy + Eq + Hash> Default for QTable<A> {
    fn default() -> Self {
        Self::new()
    }
}

/// Q 表统计信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QTableStats {
    pub entries: usize,
    pub hits: u64,
    pub lookups: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incremental_mean() {
        let mut table = QTable::new();
        table.update(7, 1u8, 1.0);
        table.update(7, 1u8, 0.0);
        table.update(7, 1u8, -1.0);
        table.update(7, 1u8, 1.0);

        let entry = table.entry(7, 1).unwrap();
        assert_eq!(entry.visits, 4);
        assert!((entry.mean - 0.25).abs() < 1e-12);
        assert_eq!(table.state_visits(7), 4);
    }

    #[test]
    fn test_missing_entry_defaults_to_zero() {
        let table: QTable<u8> = QTable::new();
        assert_eq!(table.q_value(1, 2), 0.0);
        assert_eq!(table.state_visits(1), 0);

        let stats = table.stats();
        assert_eq!(stats.lookups, 1);
        assert_eq!(stats.hits, 0);
    }

    #[test]
    fn test_state_visits_across_actions() {
        let mut table = QTable::new();
        table.update(3, 0u8, 1.0);
        table.update(3, 1u8, -1.0);

        assert_eq!(table.state_visits(3), 2);
        assert_eq!(table.len(), 2);
        assert_eq!(table.q_value(3, 1), -1.0);
    }

    #[test]
    fn test_clear() {
        let mut table = QTable::new();
        table.update(3, 0u8, 1.0);
        table.q_value(3, 0);
        table.clear();

        assert!(table.is_empty());
        assert_eq!(table.state_visits(3), 0);
        assert_eq!(
            table.stats(),
            QTableStats {
                entries: 0,
                hits: 0,
                lookups: 0
            }
        );
    }
}
