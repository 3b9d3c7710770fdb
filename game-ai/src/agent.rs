//! 搜索代理
//!
//! 根据配置选择搜索策略，对外只暴露 `choose_move` / `reset` 两个操作。
//! 置换表和 Q 表归代理所有，生命周期与代理一致。

use std::time::Instant;

use game_core::{Evaluator, GameState};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, SearchError};
use crate::mcts::{MctsConfig, MctsSearcher, SelectionPolicy};
use crate::minimax::MinimaxSearcher;
use crate::negamax::NegamaxSearcher;
use crate::search::Searcher;
use crate::transposition::ReplacementPolicy;

fn default_true() -> bool {
    true
}

/// 搜索策略配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategyConfig {
    /// Minimax，可选 Alpha-Beta 剪枝
    Minimax {
        depth: u8,
        #[serde(default = "default_true")]
        alpha_beta: bool,
    },
    /// Negamax，可选置换表
    Negamax {
        depth: u8,
        #[serde(default = "default_true")]
        use_transposition_table: bool,
        #[serde(default)]
        replacement: ReplacementPolicy,
    },
    /// 蒙特卡洛树搜索
    Mcts(MctsConfig),
}

impl StrategyConfig {
    /// 策略名称
    pub fn kind(&self) -> &'static str {
        match self {
            StrategyConfig::Minimax { .. } => "minimax",
            StrategyConfig::Negamax { .. } => "negamax",
            StrategyConfig::Mcts(_) => "mcts",
        }
    }
}

/// 代理配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentConfig {
    /// 代理名称（日志中使用）
    pub name: String,
    /// 搜索策略
    pub strategy: StrategyConfig,
}

impl AgentConfig {
    /// 朴素 Minimax
    pub fn minimax(depth: u8) -> Self {
        Self {
            name: format!("minimax-d{}", depth),
            strategy: StrategyConfig::Minimax {
                depth,
                alpha_beta: false,
            },
        }
    }

    /// Alpha-Beta
    pub fn alpha_beta(depth: u8) -> Self {
        Self {
            name: format!("alpha-beta-d{}", depth),
            strategy: StrategyConfig::Minimax {
                depth,
                alpha_beta: true,
            },
        }
    }

    /// Negamax + 置换表
    pub fn negamax(depth: u8) -> Self {
        Self {
            name: format!("negamax-d{}", depth),
            strategy: StrategyConfig::Negamax {
                depth,
                use_transposition_table: true,
                replacement: ReplacementPolicy::default(),
            },
        }
    }

    /// MCTS，每步 `time_limit_ms` 毫秒
    pub fn mcts(time_limit_ms: u64) -> Self {
        Self {
            name: format!("mcts-{}ms", time_limit_ms),
            strategy: StrategyConfig::Mcts(MctsConfig {
                time_limit_ms,
                ..MctsConfig::default()
            }),
        }
    }

    /// 从 JSON 解析并校验
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// 校验配置
    pub fn validate(&self) -> Result<()> {
        let invalid = |reason: String| Err(SearchError::InvalidConfig { reason });

        match &self.strategy {
            StrategyConfig::Minimax { depth, .. } | StrategyConfig::Negamax { depth, .. } => {
                if *depth == 0 {
                    return invalid("search depth must be at least 1".to_string());
                }
            }
            StrategyConfig::Mcts(mcts) => {
                if !(mcts.reward_decay > 0.0 && mcts.reward_decay <= 1.0) {
                    return invalid(format!(
                        "reward_decay must be in (0, 1], got {}",
                        mcts.reward_decay
                    ));
                }
                if let SelectionPolicy::Ucb { exploration } = mcts.selection {
                    if !exploration.is_finite() || exploration < 0.0 {
                        return invalid(format!(
                            "exploration constant must be a non-negative number, got {}",
                            exploration
                        ));
                    }
                }
                if mcts.max_simulations == Some(0) {
                    return invalid("max_simulations must be at least 1".to_string());
                }
            }
        }

        Ok(())
    }
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self::negamax(4)
    }
}

/// 搜索代理
pub struct SearchAgent<S: GameState> {
    config: AgentConfig,
    searcher: Box<dyn Searcher<S>>,
}

impl<S: GameState + 'static> SearchAgent<S> {
    /// 按配置创建代理
    ///
    /// `evaluator` 用于定深搜索的叶节点；MCTS 只依赖随机模拟，不使用评估函数。
    pub fn new<E>(config: AgentConfig, evaluator: E) -> Result<Self>
    where
        E: Evaluator<S> + 'static,
    {
        config.validate()?;

        let searcher: Box<dyn Searcher<S>> = match &config.strategy {
            StrategyConfig::Minimax { depth, alpha_beta } => {
                Box::new(MinimaxSearcher::new(evaluator, *depth, *alpha_beta))
            }
            StrategyConfig::Negamax {
                depth,
                use_transposition_table,
                replacement,
            } => Box::new(NegamaxSearcher::with_table(
                evaluator,
                *depth,
                use_transposition_table.then_some(*replacement),
            )),
            StrategyConfig::Mcts(mcts) => Box::new(MctsSearcher::new(mcts.clone())),
        };

        info!(
            name = %config.name,
            strategy = searcher.strategy(),
            "search agent created"
        );

        Ok(Self { config, searcher })
    }
}

impl<S: GameState> SearchAgent<S> {
    /// 代理名称
    pub fn name(&self) -> &str {
        &self.config.name
    }

    /// 代理配置
    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    /// 当前策略名称
    pub fn strategy(&self) -> &'static str {
        self.searcher.strategy()
    }

    /// 上一次搜索访问的节点数
    pub fn nodes_searched(&self) -> u64 {
        self.searcher.nodes_searched()
    }

    /// 置换表 / Q 表中的条目数
    pub fn cached_entries(&self) -> usize {
        self.searcher.cached_entries()
    }

    /// 为当前走子方选择走法，终局局面返回 `InvalidState`
    pub fn choose_move(&mut self, state: &S) -> Result<S::Action> {
        let started = Instant::now();
        let action = self.searcher.choose_move(state)?;

        debug!(
            name = %self.config.name,
            strategy = self.searcher.strategy(),
            side = ?state.side_to_move(),
            action = ?action,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "move chosen"
        );

        Ok(action)
    }

    /// 清空置换表 / Q 表，开始新对局前调用
    pub fn reset(&mut self) {
        debug!(name = %self.config.name, "agent reset");
        self.searcher.reset();
    }
}
