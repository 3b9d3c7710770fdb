//! 棋盘布局

use serde::{Deserialize, Serialize};

use crate::constants::SQUARE_COUNT;
use crate::piece::{Piece, Square};

/// 可列出棋子布局的局面
///
/// 参考评估函数只依赖此接口，任何实现了它的规则引擎状态都可直接评估。
pub trait PieceLayout {
    /// 全部棋子及其格子
    fn pieces(&self) -> Vec<(Square, Piece)>;
}

/// 8x8 棋盘（仅记录棋子摆放）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    /// 索引为 rank * 8 + file，使用 Vec 以支持 serde
    squares: Vec<Option<Piece>>,
}

impl Board {
    /// 创建空棋盘
    pub fn empty() -> Self {
        Self {
            squares: vec![None; SQUARE_COUNT],
        }
    }

    /// 获取指定格子的棋子
    pub fn get(&self, square: Square) -> Option<Piece> {
        self.squares[square.index()]
    }

    /// 设置指定格子的棋子
    pub fn set(&mut self, square: Square, piece: Option<Piece>) {
        self.squares[square.index()] = piece;
    }
}

impl PieceLayout for Board {
    fn pieces(&self) -> Vec<(Square, Piece)> {
        self.squares
            .iter()
            .enumerate()
            .filter_map(|(index, piece)| Some((Square::new(index)?, (*piece)?)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::Fen;
    use crate::piece::PieceType;
    use crate::state::Side;

    #[test]
    fn test_set_and_get() {
        let mut board = Board::empty();
        let e1 = Square::from_coords(4, 0).unwrap();
        board.set(e1, Some(Piece::new(PieceType::King, Side::First)));

        assert_eq!(board.get(e1), Some(Piece::new(PieceType::King, Side::First)));
        assert_eq!(board.pieces().len(), 1);

        board.set(e1, None);
        assert!(board.pieces().is_empty());
    }

    #[test]
    fn test_initial_layout() {
        let pieces = Fen::initial().pieces();
        assert_eq!(pieces.len(), 32);
        assert_eq!(
            pieces
                .iter()
                .filter(|(_, p)| *p == Piece::new(PieceType::Pawn, Side::First))
                .count(),
            8
        );
    }
}
