//! 置换表
//!
//! 用于缓存已搜索过的局面，避免重复计算。条目以局面哈希为键，
//! 只在显式 `clear` 时删除。

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use game_core::WIN_THRESHOLD;
use serde::{Deserialize, Serialize};

/// 置换表条目类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryType {
    /// 精确值
    Exact,
    /// 下界（Beta 截断）
    LowerBound,
    /// 上界（Alpha 截断）
    UpperBound,
}

/// 替换策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplacementPolicy {
    /// 总是覆盖
    #[default]
    Always,
    /// 只有新条目深度不小于旧条目时覆盖
    DepthPreferred,
}

/// 置换表条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTEntry<A> {
    /// 评估分数（胜负分已换算为相对本节点的距离）
    pub score: i32,
    /// 剩余搜索深度
    pub depth: u8,
    /// 条目类型
    pub entry_type: EntryType,
    /// 最佳走法
    pub best_action: Option<A>,
}

/// 置换表
pub struct TranspositionTable<A> {
    /// 条目
    entries: HashMap<u64, TTEntry<A>>,
    /// 替换策略
    policy: ReplacementPolicy,
    /// 命中次数
    hits: AtomicU64,
    /// 查询次数
    probes: AtomicU64,
    /// 写入次数
    stores: u64,
}

impl<A: Copy> TranspositionTable<A> {
    /// 创建空置换表
    pub fn new(policy: ReplacementPolicy) -> Self {
        Self {
            entries: HashMap::new(),
            policy,
            hits: AtomicU64::new(0),
            probes: AtomicU64::new(0),
            stores: 0,
        }
    }

    /// 查询条目
    pub fn probe(&self, hash: u64) -> Option<&TTEntry<A>> {
        self.probes.fetch_add(1, Ordering::Relaxed);

        let entry = self.entries.get(&hash);
        if entry.is_some() {
            self.hits.fetch_add(1, Ordering::Relaxed);
        }
        entry
    }

    /// 存储条目
    pub fn store(
        &mut self,
        hash: u64,
        score: i32,
        depth: u8,
        entry_type: EntryType,
        best_action: Option<A>,
    ) {
        let should_replace = match (self.policy, self.entries.get(&hash)) {
            (ReplacementPolicy::Always, _) | (_, None) => true,
            (ReplacementPolicy::DepthPreferred, Some(existing)) => depth >= existing.depth,
        };

        if should_replace {
            self.stores += 1;
            self.entries.insert(
                hash,
                TTEntry {
                    score,
                    depth,
                    entry_type,
                    best_action,
                },
            );
        }
    }

    /// 清空表（条目与统计一并清零）
    pub fn clear(&mut self) {
        self.entries.clear();
        self.hits.store(0, Ordering::Relaxed);
        self.probes.store(0, Ordering::Relaxed);
        self.stores = 0;
    }

    /// 条目数
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// 获取命中率
    pub fn hit_rate(&self) -> f64 {
        self.stats().hit_rate()
    }

    /// 获取统计信息
    pub fn stats(&self) -> TTStats {
        TTStats {
            entries: self.entries.len(),
            hits: self.hits.load(Ordering::Relaxed),
            probes: self.probes.load(Ordering::Relaxed),
            stores: self.stores,
        }
    }
}

impl<A: Copy> Default for TranspositionTable<A> {
    fn default() -> Self {
        Self::new(ReplacementPolicy::default())
    }
}

/// 置换表统计信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TTStats {
    pub entries: usize,
    pub hits: u64,
    pub probes: u64,
    pub stores: u64,
}

impl TTStats {
    pub fn hit_rate(&self) -> f64 {
        if self.probes == 0 {
            0.0
        } else {
            self.hits as f64 / self.probes as f64
        }
    }
}

/// 写入前换算胜负分：从"距根节点"改为"距本节点"
#[inline]
pub(crate) fn score_to_tt(score: i32, ply: i32) -> i32 {
    if score > WIN_THRESHOLD {
        score + ply
    } else if score < -WIN_THRESHOLD {
        score - ply
    } else {
        score
    }
}

/// 读取后换算胜负分：从"距本节点"改回"距根节点"
#[inline]
pub(crate) fn score_from_tt(score: i32, ply: i32) -> i32 {
    if score > WIN_THRESHOLD {
        score - ply
    } else if score < -WIN_THRESHOLD {
        score + ply
    } else {
        score
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::WIN_VALUE;

    #[test]
    fn test_tt_store_and_probe() {
        let mut tt = TranspositionTable::new(ReplacementPolicy::Always);

        let hash = 0x1234567890ABCDEF_u64;
        tt.store(hash, 100, 5, EntryType::Exact, Some(4u8));

        let entry = tt.probe(hash).copied();
        assert_eq!(
            entry,
            Some(TTEntry {
                score: 100,
                depth: 5,
                entry_type: EntryType::Exact,
                best_action: Some(4),
            })
        );
    }

    #[test]
    fn test_tt_miss() {
        let tt: TranspositionTable<u8> = TranspositionTable::default();

        assert!(tt.probe(0x1234567890ABCDEF).is_none());
        let stats = tt.stats();
        assert_eq!(stats.probes, 1);
        assert_eq!(stats.hits, 0);
    }

    #[test]
    fn test_tt_always_overwrites() {
        let mut tt = TranspositionTable::new(ReplacementPolicy::Always);
        let hash = 42;

        tt.store(hash, 50, 5, EntryType::Exact, Some(1u8));
        tt.store(hash, 100, 3, EntryType::LowerBound, Some(2u8));

        let entry = tt.probe(hash).unwrap();
        assert_eq!(entry.depth, 3);
        assert_eq!(entry.score, 100);
        assert_eq!(entry.entry_type, EntryType::LowerBound);
        assert_eq!(tt.len(), 1);
    }

    #[test]
    fn test_tt_depth_preferred() {
        let mut tt = TranspositionTable::new(ReplacementPolicy::DepthPreferred);
        let hash = 42;

        tt.store(hash, 50, 5, EntryType::Exact, Some(1u8));
        tt.store(hash, 100, 3, EntryType::Exact, Some(2u8));
        assert_eq!(tt.probe(hash).unwrap().depth, 5);

        tt.store(hash, 70, 6, EntryType::Exact, Some(3u8));
        assert_eq!(tt.probe(hash).unwrap().score, 70);
    }

    #[test]
    fn test_tt_clear_resets_stats() {
        let mut tt = TranspositionTable::default();
        tt.store(1, 10, 1, EntryType::Exact, Some(0u8));
        assert!(tt.probe(1).is_some());
        assert!(tt.hit_rate() > 0.0);

        tt.clear();
        assert!(tt.is_empty());
        assert_eq!(
            tt.stats(),
            TTStats {
                entries: 0,
                hits: 0,
                probes: 0,
                stores: 0
            }
        );
        assert!(tt.probe(1).is_none());
    }

    #[test]
    fn test_win_score_normalisation() {
        let win_at_root_ply_5 = WIN_VALUE - 5;
        let stored = score_to_tt(win_at_root_ply_5, 3);
        assert_eq!(stored, WIN_VALUE - 2);
        assert_eq!(score_from_tt(stored, 1), WIN_VALUE - 3);

        let loss = -(WIN_VALUE - 4);
        assert_eq!(score_from_tt(score_to_tt(loss, 2), 2), loss);

        assert_eq!(score_to_tt(120, 7), 120);
    }
}
