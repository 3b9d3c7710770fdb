//! Minimax 搜索
//!
//! 定深穷举搜索，可选 Alpha-Beta 剪枝。分值始终以 `maximizing_player` 为视角：
//! 极大层取最大值，极小层取最小值。

use std::time::Instant;

use game_core::{Applied, Evaluator, GameState, Side, DRAW_VALUE};
use tracing::debug;

use crate::error::Result;
use crate::search::{
    clamp_heuristic, root_actions, terminal_score, SearchResult, Searcher, INFINITY,
};

/// Minimax 搜索器
pub struct MinimaxSearcher<E> {
    evaluator: E,
    depth: u8,
    alpha_beta: bool,
    nodes_searched: u64,
}

impl<E> MinimaxSearcher<E> {
    /// 创建搜索器，`depth` 至少为 1
    pub fn new(evaluator: E, depth: u8, alpha_beta: bool) -> Self {
        Self {
            evaluator,
            depth: depth.max(1),
            alpha_beta,
            nodes_searched: 0,
        }
    }

    /// 搜索深度
    pub fn depth(&self) -> u8 {
        self.depth
    }

    /// 是否启用 Alpha-Beta 剪枝
    pub fn alpha_beta(&self) -> bool {
        self.alpha_beta
    }

    /// 上一次搜索的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }

    /// 以 `maximizing_player` 为极大方搜索最佳走法
    pub fn search<S>(&mut self, state: &S, maximizing_player: Side) -> Result<SearchResult<S::Action>>
    where
        S: GameState,
        E: Evaluator<S>,
    {
        let actions = root_actions(state)?;
        self.nodes_searched = 0;
        let started = Instant::now();

        let mut root = state.clone();
        let (best, score) = if self.alpha_beta {
            self.alpha_beta_search(&mut root, self.depth, true, -INFINITY, INFINITY, maximizing_player, 0)
        } else {
            self.minimax(&mut root, self.depth, true, maximizing_player, 0)
        };

        let result = SearchResult {
            action: best.unwrap_or(actions[0]),
            score,
            nodes: self.nodes_searched,
        };

        debug!(
            alpha_beta = self.alpha_beta,
            depth = self.depth,
            nodes = result.nodes,
            score = result.score,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "minimax search finished"
        );

        Ok(result)
    }

    /// 选择走法
    pub fn choose_move_for<S>(&mut self, state: &S, maximizing_player: Side) -> Result<S::Action>
    where
        S: GameState,
        E: Evaluator<S>,
    {
        Ok(self.search(state, maximizing_player)?.action)
    }

    /// 朴素 Minimax
    fn minimax<S>(
        &mut self,
        state: &mut S,
        depth: u8,
        maximizing: bool,
        player: Side,
        ply: i32,
    ) -> (Option<S::Action>, i32)
    where
        S: GameState,
        E: Evaluator<S>,
    {
        self.nodes_searched += 1;

        if let Some(score) = terminal_score(state.outcome(), player, ply) {
            return (None, score);
        }

        if depth == 0 {
            return (None, clamp_heuristic(self.evaluator.evaluate(state, player)));
        }

        let actions = state.legal_actions();
        if actions.is_empty() {
            return (None, DRAW_VALUE);
        }

        let mut best_action = None;
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };

        for action in actions {
            let (_, score) = {
                let mut child = Applied::new(state, action);
                self.minimax(&mut *child, depth - 1, !maximizing, player, ply + 1)
            };

            let better = if maximizing {
                score > best_score
            } else {
                score < best_score
            };
            if better || best_action.is_none() {
                best_score = score;
                best_action = Some(action);
            }
        }

        (best_action, best_score)
    }

    /// Alpha-Beta 搜索（fail-hard：截断时返回触发截断的边界）
    #[allow(clippy::too_many_arguments)]
    fn alpha_beta_search<S>(
        &mut self,
        state: &mut S,
        depth: u8,
        maximizing: bool,
        mut alpha: i32,
        mut beta: i32,
        player: Side,
        ply: i32,
    ) -> (Option<S::Action>, i32)
    where
        S: GameState,
        E: Evaluator<S>,
    {
        self.nodes_searched += 1;

        if let Some(score) = terminal_score(state.outcome(), player, ply) {
            return (None, score);
        }

        if depth == 0 {
            return (None, clamp_heuristic(self.evaluator.evaluate(state, player)));
        }

        let actions = state.legal_actions();
        if actions.is_empty() {
            return (None, DRAW_VALUE);
        }

        let mut best_action = None;
        let mut best_score = if maximizing { -INFINITY } else { INFINITY };

        for action in actions {
            let (_, score) = {
                let mut child = Applied::new(state, action);
                self.alpha_beta_search(&mut *child, depth - 1, !maximizing, alpha, beta, player, ply + 1)
            };

            if maximizing {
                if score > best_score || best_action.is_none() {
                    best_score = score;
                    best_action = Some(action);
                }
                alpha = alpha.max(best_score);
                if beta <= alpha {
                    return (best_action, beta); // Beta 剪枝
                }
            } else {
                if score < best_score || best_action.is_none() {
                    best_score = score;
                    best_action = Some(action);
                }
                beta = beta.min(best_score);
                if beta <= alpha {
                    return (best_action, alpha); // Alpha 剪枝
                }
            }
        }

        (best_action, best_score)
    }
}

impl<S, E> Searcher<S> for MinimaxSearcher<E>
where
    S: GameState,
    E: Evaluator<S>,
{
    fn choose_move(&mut self, state: &S) -> Result<S::Action> {
        self.choose_move_for(state, state.side_to_move())
    }

    fn strategy(&self) -> &'static str {
        if self.alpha_beta {
            "alpha-beta"
        } else {
            "minimax"
        }
    }
    fn nodes_searched(&self) -> u64 {
        self.nodes_searched
    }
}
