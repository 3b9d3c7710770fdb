//! 蒙特卡洛树搜索
//!
//! 每次迭代依次执行选择、扩展、随机模拟、回传四个阶段，直到超过时间限制。
//! 动作价值保存在 Q 表中，Q 值以每个节点的走子方为视角，回传时按走子方翻转符号
//! 并逐层衰减。

mod qtable;
mod tree;

use std::time::{Duration, Instant};

use game_core::{GameState, Outcome, Side};
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{Result, SearchError};
use crate::search::{root_actions, Searcher};

pub use qtable::{QEntry, QTable, QTableStats};
use tree::{Node, NodeId, Tree};

/// 选择阶段的评分方式
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SelectionPolicy {
    /// 只看平均回报
    Greedy,
    /// UCB：Q + c·√(2·ln(N)/n)
    Ucb { exploration: f64 },
}

impl Default for SelectionPolicy {
    fn default() -> Self {
        SelectionPolicy::Ucb { exploration: 0.9 }
    }
}

/// 最终走法的选择依据
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinalChoice {
    /// 平均回报最高
    #[default]
    MeanReward,
    /// 访问次数最多
    VisitCount,
}

/// MCTS 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MctsConfig {
    /// 每步时间限制（毫秒）
    pub time_limit_ms: u64,
    /// 模拟次数上限（None 表示只受时间限制）
    pub max_simulations: Option<u64>,
    /// 选择阶段评分方式
    pub selection: SelectionPolicy,
    /// 最终走法选择依据
    pub final_choice: FinalChoice,
    /// 每层回报衰减系数，取值 (0, 1]
    pub reward_decay: f64,
    /// 随机数种子（None 表示从系统熵初始化）
    pub seed: Option<u64>,
}

impl Default for MctsConfig {
    fn default() -> Self {
        Self {
            time_limit_ms: 1000,
            max_simulations: None,
            selection: SelectionPolicy::default(),
            final_choice: FinalChoice::default(),
            reward_decay: 0.9,
            seed: None,
        }
    }
}

/// MCTS 搜索结果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MctsResult<A> {
    /// 最佳走法
    pub action: A,
    /// 最佳走法的平均回报（根节点走子方视角）
    pub mean_reward: f64,
    /// 最佳走法的访问次数
    pub visits: u32,
    /// 本次搜索的模拟次数
    pub simulations: u64,
    /// 搜索树节点数
    pub tree_size: usize,
}

/// MCTS 搜索器
pub struct MctsSearcher<S: GameState> {
    config: MctsConfig,
    q_table: QTable<S::Action>,
    rng: ChaCha8Rng,
    /// 上一次搜索的树节点数
    last_tree_size: usize,
}

impl<S: GameState> MctsSearcher<S> {
    /// 创建搜索器
    pub fn new(config: MctsConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            config,
            q_table: QTable::new(),
            rng,
            last_tree_size: 0,
        }
    }

    /// 配置
    pub fn config(&self) -> &MctsConfig {
        &self.config
    }

    /// Q 表（跨搜索保留）
    pub fn q_table(&self) -> &QTable<S::Action> {
        &self.q_table
    }

    /// 清空 Q 表
    ///
    /// 哈希不包含对局历史，开始无关的新对局前必须调用。
    pub fn reset_q_table(&mut self) {
        debug!(entries = self.q_table.len(), "q-table cleared");
        self.q_table.clear();
    }

    /// 搜索最佳走法
    pub fn search(&mut self, state: &S) -> Result<MctsResult<S::Action>> {
        root_actions(state)?;

        let root_side = state.side_to_move();
        let started = Instant::now();
        let deadline = started + Duration::from_millis(self.config.time_limit_ms);
        let mut tree = Tree::new(state.clone());
        let mut simulations = 0u64;

        // 至少完成一次模拟，保证根节点有已探索的子节点
        loop {
            self.simulate(&mut tree, root_side)?;
            simulations += 1;

            if Instant::now() >= deadline {
                break;
            }
            if self
                .config
                .max_simulations
                .is_some_and(|limit| simulations >= limit)
            {
                break;
            }
        }

        self.last_tree_size = tree.len();
        let root = tree.get(tree.root());
        let (action, _) = self
            .best_child(root, Metric::Final(self.config.final_choice))
            .ok_or(SearchError::NoLegalAction)?;
        let entry = self.q_table.entry(root.hash, action).unwrap_or_default();

        let result = MctsResult {
            action,
            mean_reward: entry.mean,
            visits: entry.visits,
            simulations,
            tree_size: tree.len(),
        };

        debug!(
            simulations,
            tree_size = result.tree_size,
            mean_reward = result.mean_reward,
            visits = result.visits,
            q_entries = self.q_table.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "mcts search finished"
        );

        Ok(result)
    }

    /// 一次完整模拟：选择 → 扩展 → 随机模拟 → 回传
    fn simulate(&mut self, tree: &mut Tree<S>, root_side: Side) -> Result<()> {
        let selected = self.select(tree);

        let (leaf, reward) = if tree.get(selected).is_terminal() {
            // 选到终局节点时直接回传其结果
            (selected, terminal_reward(tree.get(selected).outcome, root_side))
        } else {
            let child = self.expand(tree, selected)?;
            (child, self.rollout(&tree.get(child).state, root_side))
        };

        self.backpropagate(tree, leaf, reward, root_side);
        Ok(())
    }

    /// 选择：沿已完全扩展的非终局节点向下，直到终局或未完全扩展的节点
    fn select(&mut self, tree: &Tree<S>) -> NodeId {
        let mut current = tree.root();
        loop {
            let node = tree.get(current);
            if node.is_terminal() || !node.is_fully_expanded() {
                return current;
            }
            match self.best_child(node, Metric::Selection(self.config.selection)) {
                Some((_, child)) => current = child,
                None => return current,
            }
        }
    }

    /// 扩展：随机选一个未尝试的走法创建子节点
    fn expand(&mut self, tree: &mut Tree<S>, node: NodeId) -> Result<NodeId> {
        let untried = tree.get(node).untried.len();
        if untried == 0 {
            return Err(SearchError::NoLegalAction);
        }
        let index = self.rng.gen_range(0..untried);
        tree.expand(node, index).ok_or(SearchError::NoLegalAction)
    }

    /// 随机模拟到终局，返回根节点走子方视角的回报（已按模拟步数衰减）
    fn rollout(&mut self, state: &S, root_side: Side) -> f64 {
        let mut board = state.clone();
        let mut depth = 0i32;

        let outcome = loop {
            let outcome = board.outcome();
            if outcome.is_terminal() {
                break outcome;
            }
            match board.legal_actions().choose(&mut self.rng) {
                Some(&action) => board.apply(action),
                None => break Outcome::Draw,
            }
            depth += 1;
        };

        terminal_reward(outcome, root_side) * self.config.reward_decay.powi(depth)
    }

    /// 回传：从 `leaf` 向上更新每条边的 Q 值
    fn backpropagate(&mut self, tree: &mut Tree<S>, leaf: NodeId, reward: f64, root_side: Side) {
        let mut current = leaf;
        let mut reward = reward;

        loop {
            tree.get_mut(current).visits += 1;

            let node = tree.get(current);
            let (Some(parent), Some(action)) = (node.parent, node.action) else {
                break;
            };

            let parent_node = tree.get(parent);
            // Q 值以父节点的走子方为视角
            let mover = parent_node.state.side_to_move();
            let signed = reward * f64::from(mover.sign(root_side));
            self.q_table.update(parent_node.hash, action, signed);

            reward *= self.config.reward_decay;
            current = parent;
        }
    }

    /// 按指标选择最佳子节点，同分时随机
    fn best_child(&mut self, node: &Node<S>, metric: Metric) -> Option<(S::Action, NodeId)> {
        let parent_visits = self.q_table.state_visits(node.hash).max(1) as f64;

        let scored: Vec<(f64, S::Action, NodeId)> = node
            .children
            .iter()
            .map(|&(action, child)| {
                let entry = self.q_table.entry(node.hash, action).unwrap_or_default();
                let score = match metric {
                    Metric::Selection(SelectionPolicy::Greedy)
                    | Metric::Final(FinalChoice::MeanReward) => entry.mean,
                    Metric::Selection(SelectionPolicy::Ucb { exploration }) => {
                        if entry.visits == 0 {
                            f64::INFINITY
                        } else {
                            entry.mean
                                + exploration
                                    * (2.0 * parent_visits.ln() / entry.visits as f64).sqrt()
                        }
                    }
                    Metric::Final(FinalChoice::VisitCount) => entry.visits as f64,
                };
                (score, action, child)
            })
            .collect();

        let best = scored
            .iter()
            .map(|(score, _, _)| *score)
            .fold(f64::NEG_INFINITY, f64::max);

        let candidates: Vec<(S::Action, NodeId)> = scored
            .into_iter()
            .filter(|(score, _, _)| *score == best)
            .map(|(_, action, child)| (action, child))
            .collect();

        candidates.choose(&mut self.rng).copied()
    }
}

/// 子节点评分指标
#[derive(Debug, Clone, Copy)]
enum Metric {
    Selection(SelectionPolicy),
    Final(FinalChoice),
}

/// 终局回报：胜 1，负 -1，和 0（`root_side` 视角）
fn terminal_reward(outcome: Outcome, root_side: Side) -> f64 {
    match outcome {
        Outcome::Win(winner) => f64::from(winner.sign(root_side)),
        Outcome::Draw | Outcome::InProgress => 0.0,
    }
}

impl<S: GameState> Searcher<S> for MctsSearcher<S> {
    fn choose_move(&mut self, state: &S) -> Result<S::Action> {
        Ok(self.search(state)?.action)
    }

    fn reset(&mut self) {
        self.reset_q_table();
    }

    fn strategy(&self) -> &'static str {
        "mcts"
    }
    fn nodes_searched(&self) -> u64 {
        self.last_tree_size as u64
    }

    fn cached_entries(&self) -> usize {
        self.q_table.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::TicTacToe;

    fn config(simulations: u64, seed: u64) -> MctsConfig {
        MctsConfig {
            time_limit_ms: 10_000,
            max_simulations: Some(simulations),
            seed: Some(seed),
            ..MctsConfig::default()
        }
    }

    #[test]
    fn test_terminal_state_is_rejected() {
        let state = TicTacToe::from_layout("XXX/OO./...").unwrap();
        let mut searcher = MctsSearcher::new(config(10, 1));
        assert!(matches!(
            searcher.search(&state),
            Err(SearchError::InvalidState { .. })
        ));
        assert!(searcher.q_table().is_empty());
    }

    #[test]
    fn test_single_simulation_returns_explored_action() {
        let state = TicTacToe::new();
        let mut searcher = MctsSearcher::new(config(1, 3));
        let result = searcher.search(&state).unwrap();

        assert_eq!(result.simulations, 1);
        assert_eq!(result.tree_size, 2);
        assert_eq!(result.visits, 1);
        assert!(state.legal_actions().contains(&result.action));
    }

    #[test]
    fn test_finds_immediate_win() {
        let state = TicTacToe::from_layout("XX./OO./...").unwrap();
        for seed in 0..5 {
            let mut searcher = MctsSearcher::new(config(500, seed));
            let result = searcher.search(&state).unwrap();
            assert_eq!(result.action, 2, "seed {}", seed);
            assert_eq!(result.mean_reward, 1.0);
        }
    }

    #[test]
    fn test_deterministic_with_seed() {
        let state = TicTacToe::from_layout("X...O....").unwrap();
        let a = MctsSearcher::new(config(300, 42)).search(&state).unwrap();
        let b = MctsSearcher::new(config(300, 42)).search(&state).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_reward_sign_follows_mover() {
        // O 走子；O 下 5 立即获胜
        let state = TicTacToe::from_layout("XX./OO./X..").unwrap();
        assert_eq!(state.side_to_move(), Side::Second);

        let mut searcher = MctsSearcher::new(config(200, 7));
        let result = searcher.search(&state).unwrap();
        assert_eq!(result.action, 5);
        assert_eq!(result.mean_reward, 1.0);
        assert!(searcher.q_table().q_value(state.position_hash(), 5) > 0.0);
    }

    #[test]
    fn test_backpropagation_alternates_sign() {
        let state = TicTacToe::from_layout("XX./OO./...").unwrap();
        let mut searcher = MctsSearcher::new(config(1, 0));
        let mut tree = Tree::new(state.clone());
        let root = tree.root();

        // 根 → X 下 8 → O 下 5（O 获胜）
        let x_index = tree.get(root).untried.iter().position(|a| *a == 8).unwrap();
        let x_move = tree.expand(root, x_index).unwrap();
        let o_index = tree.get(x_move).untried.iter().position(|a| *a == 5).unwrap();
        let o_move = tree.expand(x_move, o_index).unwrap();
        assert_eq!(tree.get(o_move).outcome, Outcome::Win(Side::Second));

        searcher.backpropagate(&mut tree, o_move, -1.0, Side::First);

        let q = searcher.q_table();
        // O 视角：好棋
        assert_eq!(q.q_value(tree.get(x_move).hash, 5), 1.0);
        // X 视角：坏棋，且衰减一层
        assert!((q.q_value(state.position_hash(), 8) + 0.9).abs() < 1e-12);
        assert_eq!(tree.get(root).visits, 1);
        assert_eq!(tree.get(o_move).visits, 1);
    }

    #[test]
    fn test_greedy_selection_finds_immediate_win() {
        let state = TicTacToe::from_layout("XX./OO./...").unwrap();
        for seed in 0..10 {
            let mut searcher = MctsSearcher::new(MctsConfig {
                selection: SelectionPolicy::Greedy,
                ..config(300, seed)
            });
            let result = searcher.search(&state).unwrap();
            assert_eq!(result.action, 2, "seed {}", seed);
            assert_eq!(result.mean_reward, 1.0);
            assert_eq!(result.simulations, 300);
        }
    }

    #[test]
    fn test_visit_count_final_choice() {
        let state = TicTacToe::from_layout("XX./OO./...").unwrap();
        let mut searcher = MctsSearcher::new(MctsConfig {
            final_choice: FinalChoice::VisitCount,
            ..config(2000, 11)
        });
        assert_eq!(searcher.search(&state).unwrap().action, 2);
    }

    #[test]
    fn test_q_table_persists_until_reset() {
        let state = TicTacToe::from_layout("X...O....").unwrap();
        let mut searcher = MctsSearcher::new(config(50, 5));

        searcher.search(&state).unwrap();
        let entries = searcher.q_table().len();
        assert!(entries > 0);

        searcher.search(&state).unwrap();
        assert!(searcher.q_table().len() >= entries);

        searcher.reset_q_table();
        assert!(searcher.q_table().is_empty());
        assert_eq!(searcher.q_table().stats().hits, 0);
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = MctsConfig {
            selection: SelectionPolicy::Greedy,
            final_choice: FinalChoice::VisitCount,
            ..MctsConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        let parsed: MctsConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);

        let partial: MctsConfig = serde_json::from_str(r#"{"time_limit_ms": 50}"#).unwrap();
        assert_eq!(partial.time_limit_ms, 50);
        assert_eq!(partial.reward_decay, 0.9);
    }
}
