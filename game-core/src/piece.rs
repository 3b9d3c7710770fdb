//! 国际象棋棋子定义
//!
//! 只描述棋子和格子，供评估函数使用；走法规则不在本库范围内。

use serde::{Deserialize, Serialize};

use crate::constants::{BOARD_SIZE, SQUARE_COUNT};
use crate::state::Side;

/// 棋子类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PieceType {
    /// 兵
    Pawn,
    /// 马
    Knight,
    /// 象
    Bishop,
    /// 车
    Rook,
    /// 后
    Queen,
    /// 王
    King,
}

impl PieceType {
    /// 转换为索引
    pub fn index(&self) -> usize {
        match self {
            PieceType::Pawn => 0,
            PieceType::Knight => 1,
            PieceType::Bishop => 2,
            PieceType::Rook => 3,
            PieceType::Queen => 4,
            PieceType::King => 5,
        }
    }

    /// 获取 FEN 字符（先手大写，后手小写）
    pub fn to_fen_char(&self, side: Side) -> char {
        let c = match self {
            PieceType::Pawn => 'p',
            PieceType::Knight => 'n',
            PieceType::Bishop => 'b',
            PieceType::Rook => 'r',
            PieceType::Queen => 'q',
            PieceType::King => 'k',
        };
        match side {
            Side::First => c.to_ascii_uppercase(),
            Side::Second => c,
        }
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<(PieceType, Side)> {
        let side = if c.is_ascii_uppercase() {
            Side::First
        } else {
            Side::Second
        };
        let piece_type = match c.to_ascii_lowercase() {
            'p' => PieceType::Pawn,
            'n' => PieceType::Knight,
            'b' => PieceType::Bishop,
            'r' => PieceType::Rook,
            'q' => PieceType::Queen,
            'k' => PieceType::King,
            _ => return None,
        };
        Some((piece_type, side))
    }
}

/// 棋子
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    pub piece_type: PieceType,
    pub side: Side,
}

impl Piece {
    /// 创建新棋子
    pub fn new(piece_type: PieceType, side: Side) -> Self {
        Self { piece_type, side }
    }

    /// 获取 FEN 字符
    pub fn to_fen_char(&self) -> char {
        self.piece_type.to_fen_char(self.side)
    }

    /// 从 FEN 字符解析
    pub fn from_fen_char(c: char) -> Option<Piece> {
        PieceType::from_fen_char(c).map(|(piece_type, side)| Piece { piece_type, side })
    }
}

/// 棋盘格子，索引 0 = a1，63 = h8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Square(u8);

impl Square {
    /// 从索引创建
    pub fn new(index: usize) -> Option<Self> {
        if index < SQUARE_COUNT {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// 从列、行创建（均为 0-7）
    pub fn from_coords(file: u8, rank: u8) -> Option<Self> {
        if (file as usize) < BOARD_SIZE && (rank as usize) < BOARD_SIZE {
            Some(Self(rank * BOARD_SIZE as u8 + file))
        } else {
            None
        }
    }

    /// 数组索引
    pub fn index(&self) -> usize {
        self.0 as usize
    }

    /// 列 (0 = a)
    pub fn file(&self) -> u8 {
        self.0 % BOARD_SIZE as u8
    }

    /// 行 (0 = 第 1 行)
    pub fn rank(&self) -> u8 {
        self.0 / BOARD_SIZE as u8
    }

    /// 后手视角的对称格（63 - index）
    pub fn flipped(&self) -> Square {
        Square(SQUARE_COUNT as u8 - 1 - self.0)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", (b'a' + self.file()) as char, self.rank() + 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_piece_fen_char() {
        let white_king = Piece::new(PieceType::King, Side::First);
        assert_eq!(white_king.to_fen_char(), 'K');

        let black_queen = Piece::new(PieceType::Queen, Side::Second);
        assert_eq!(black_queen.to_fen_char(), 'q');

        assert_eq!(
            Piece::from_fen_char('R'),
            Some(Piece::new(PieceType::Rook, Side::First))
        );
        assert_eq!(
            Piece::from_fen_char('n'),
            Some(Piece::new(PieceType::Knight, Side::Second))
        );
        assert_eq!(Piece::from_fen_char('x'), None);
    }

    #[test]
    fn test_square_coords() {
        let e4 = Square::from_coords(4, 3).unwrap();
        assert_eq!(e4.index(), 28);
        assert_eq!(e4.to_string(), "e4");
        assert_eq!(e4.flipped().index(), 35);
        assert!(Square::new(64).is_none());
        assert!(Square::from_coords(8, 0).is_none());
    }
}
