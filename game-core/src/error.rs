//! 错误类型定义

use thiserror::Error;

/// 博弈规则错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GameError {
    /// 无效的格子
    #[error("Invalid square: {index}")]
    InvalidSquare { index: usize },

    /// 格子已被占用
    #[error("Square {index} is already occupied")]
    Occupied { index: usize },

    /// 无效的 FEN 字符串
    #[error("Invalid FEN string: {reason}")]
    InvalidFen { reason: String },

    /// 无效的局面描述
    #[error("Invalid layout: {reason}")]
    InvalidLayout { reason: String },

    /// 游戏已结束
    #[error("Game is already over")]
    GameOver,
}

/// 博弈操作结果类型
pub type Result<T> = std::result::Result<T, GameError>;
