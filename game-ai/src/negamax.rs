//! Negamax 搜索
//!
//! 利用零和对称性 value(s, p) = -value(s, -p)，把极大/极小两种节点合并为同一个递归函数，
//! 并用置换表缓存带边界语义的子树结果。

use std::time::Instant;

use game_core::{Applied, Evaluator, GameState, Side, DRAW_VALUE};
use tracing::{debug, trace};

use crate::error::Result;
use crate::search::{
    clamp_heuristic, root_actions, terminal_score, SearchResult, Searcher, INFINITY,
};
use crate::transposition::{
    score_from_tt, score_to_tt, EntryType, ReplacementPolicy, TTStats, TranspositionTable,
};

/// Negamax 搜索器
pub struct NegamaxSearcher<S: GameState, E> {
    evaluator: E,
    depth: u8,
    /// 关闭置换表时为 None
    table: Option<TranspositionTable<S::Action>>,
    nodes_searched: u64,
}

impl<S, E> NegamaxSearcher<S, E>
where
    S: GameState,
    E: Evaluator<S>,
{
    /// 创建带置换表的搜索器
    pub fn new(evaluator: E, depth: u8) -> Self {
        Self::with_table(evaluator, depth, Some(ReplacementPolicy::default()))
    }

    /// 创建不带置换表的搜索器
    pub fn without_table(evaluator: E, depth: u8) -> Self {
        Self::with_table(evaluator, depth, None)
    }

    /// 指定置换表替换策略创建，`None` 表示不使用置换表
    pub fn with_table(evaluator: E, depth: u8, policy: Option<ReplacementPolicy>) -> Self {
        Self {
            evaluator,
            depth: depth.max(1),
            table: policy.map(TranspositionTable::new),
            nodes_searched: 0,
        }
    }

    /// 搜索深度
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// 上一次搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// 置换表统计（未启用时为 None）
    pub fn table_stats(&self) -> Option<TTStats> {
        self.table.as_ref().map(TranspositionTable::stats)
    }

    /// 清空置换表
    ///
    /// 哈希不包含走子历史，换新对局前必须调用，否则旧条目可能造成错误截断。
    pub fn reset_table(&mut self) {
        if let Some(table) = self.table.as_mut() {
            debug!(entries = table.len(), "transposition table cleared");
            table.clear();
        }
    }

    /// 以 `side` 为根节点视角搜索最佳走法
    pub fn search(&mut self, state: &S, side: Side) -> Result<SearchResult<S::Action>> {
        let actions = root_actions(state)?;
        self.nodes_searched = 0;
        let started = Instant::now();

        let mut root = state.clone();
        let (best, score) = self.negamax(&mut root, self.depth, -INFINITY, INFINITY, side, 0);

        let result = SearchResult {
            action: best.unwrap_or(actions[0]),
            score,
            nodes: self.nodes_searched,
        };

        debug!(
            depth = self.depth,
            nodes = result.nodes,
            score = result.score,
            tt_entries = self.table.as_ref().map_or(0, TranspositionTable::len),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "negamax search finished"
        );

        Ok(result)
    }

    /// 选择走法
    pub fn choose_move_for(&mut self, state: &S, side: Side) -> Result<S::Action> {
        Ok(self.search(state, side)?.action)
    }

    /// Negamax Alpha-Beta（fail-hard）
    ///
    /// 返回值以 `color` 为视角；`ply` 为距根节点的层数。
    fn negamax(
        &mut self,
        state: &mut S,
        depth: u8,
        mut alpha: i32,
        mut beta: i32,
        color: Side,
        ply: i32,
    ) -> (Option<S::Action>, i32) {
        self.nodes_searched += 1;

        let alpha_original = alpha;
        let hash = state.position_hash();

        if let Some(entry) = self.table.as_ref().and_then(|t| t.probe(hash)) {
            if entry.depth >= depth {
                let score = score_from_tt(entry.score, ply);
                match entry.entry_type {
                    EntryType::Exact => return (entry.best_action, score),
                    EntryType::LowerBound => alpha = alpha.max(score),
                    EntryType::UpperBound => beta = beta.min(score),
                }
                if alpha >= beta {
                    trace!(hash, depth, score, "transposition cutoff");
                    return (entry.best_action, score);
                }
            }
        }

        if let Some(score) = terminal_score(state.outcome(), color, ply) {
            return (None, score);
        }

        if depth == 0 {
            return (None, clamp_heuristic(self.evaluator.evaluate(state, color)));
        }

        let actions = state.legal_actions();
        if actions.is_empty() {
            return (None, DRAW_VALUE);
        }

        let mut best_action = None;
        let mut best_score = -INFINITY;

        for action in actions {
            let score = {
                let mut child = Applied::new(state, action);
                -self
                    .negamax(&mut *child, depth - 1, -beta, -alpha, color.opponent(), ply + 1)
                    .1
            };

            if score > best_score || best_action.is_none() {
                best_score = score;
                best_action = Some(action);
            }
            alpha = alpha.max(best_score);
            if alpha >= beta {
                break; // Beta 剪枝
            }
        }

        // fail-hard：截断返回 beta，否则返回 alpha
        let value = alpha.min(beta);

        if let Some(table) = self.table.as_mut() {
            let entry_type = if value <= alpha_original {
                EntryType::UpperBound
            } else if value >= beta {
                EntryType::LowerBound
            } else {
                EntryType::Exact
            };
            table.store(hash, score_to_tt(value, ply), depth, entry_type, best_action);
        }

        (best_action, value)
    }
}

impl<S, E> Searcher<S> for NegamaxSearcher<S, E>
where
    S: GameState,
    E: Evaluator<S>,
{
    fn choose_move(&mut self, state: &S) -> Result<S::Action> {
        self.choose_move_for(state, state.side_to_move())
    }

    fn reset(&mut self) {
        self.reset_table();
    }

    fn strategy(&self) -> &'static str {
        if self.table.is_some() {
            "negamax-tt"
        } else {
            "negamax"
        }
    }
    fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    fn cached_entries(&self) -> usize {
        self.table.as_ref().map_or(0, TranspositionTable::len)
    }
}
