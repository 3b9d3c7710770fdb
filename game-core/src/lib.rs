//! 双人零和完全信息博弈的共享库
//!
//! 包含:
//! - 博弈状态接口 (GameState trait) 与走子/撤销守卫
//! - 胜负结果、行棋方、评估函数接口
//! - 国际象棋棋子、棋盘与 FEN 布局（供参考评估函数使用）
//! - Zobrist 哈希
//! - 井字棋参考实现

mod board;
mod constants;
mod error;
mod fen;
mod piece;
mod state;
mod tictactoe;
mod zobrist;

pub use board::{Board, PieceLayout};
pub use constants::*;
pub use error::{GameError, Result};
pub use fen::{Fen, INITIAL_PLACEMENT};
pub use piece::{Piece, PieceType, Square};
pub use state::{Applied, Evaluator, GameState, Outcome, Side};
pub use tictactoe::{LineEvaluator, TicTacToe};
pub use zobrist::ZobristTable;
