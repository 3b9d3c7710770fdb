//! 博弈搜索引擎
//!
//! 包含:
//! - 棋局评估函数
//! - Minimax / Alpha-Beta 搜索
//! - Negamax + 置换表
//! - 蒙特卡洛树搜索 (MCTS)
//! - 统一的搜索代理 (SearchAgent)

mod agent;
mod error;
mod evaluate;
mod mcts;
mod minimax;
mod negamax;
mod search;
mod transposition;

pub use agent::{AgentConfig, SearchAgent, StrategyConfig};
pub use error::{Result, SearchError};
pub use evaluate::{KaufmanMaterial, MaterialCount, PieceSquareEvaluator};
pub use mcts::{
    FinalChoice, MctsConfig, MctsResult, MctsSearcher, QEntry, QTable, QTableStats, SelectionPolicy,
};
pub use minimax::MinimaxSearcher;
pub use negamax::NegamaxSearcher;
pub use search::{SearchResult, Searcher, INFINITY};
pub use transposition::{EntryType, ReplacementPolicy, TTEntry, TTStats, TranspositionTable};
