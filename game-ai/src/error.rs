//! 错误类型定义

use game_core::Outcome;
use thiserror::Error;

/// 搜索错误
#[derive(Error, Debug)]
pub enum SearchError {
    /// 局面已终局或没有合法走法，无法选择走法
    #[error("Cannot choose a move: position is not playable (outcome: {outcome:?})")]
    InvalidState { outcome: Outcome },

    /// 扩展时没有未尝试的走法（逻辑错误）
    #[error("No untried action left to expand")]
    NoLegalAction,

    /// 配置无效
    #[error("Invalid agent configuration: {reason}")]
    InvalidConfig { reason: String },

    /// 配置解析错误
    #[error("Config parse error: {0}")]
    Config(#[from] serde_json::Error),
}

/// 搜索结果类型
pub type Result<T> = std::result::Result<T, SearchError>;
