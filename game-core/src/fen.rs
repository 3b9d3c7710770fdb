//! FEN 棋子布局解析和生成
//!
//! 只处理 FEN 的第一段（棋子摆放），其余字段（走子方、易位权等）属于规则引擎，
//! 解析时忽略。
//!
//! 示例：
//! `rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1`

use crate::board::Board;
use crate::constants::BOARD_SIZE;
use crate::error::GameError;
use crate::piece::{Piece, Square};

/// 初始局面的棋子布局
pub const INITIAL_PLACEMENT: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR";

/// FEN 格式处理
pub struct Fen;

impl Fen {
    /// 解析 FEN 字符串的棋子布局
    pub fn parse(fen: &str) -> Result<Board, GameError> {
        let placement = fen.split_whitespace().next().ok_or_else(|| GameError::InvalidFen {
            reason: "Empty FEN string".to_string(),
        })?;

        let mut board = Board::empty();
        let rows: Vec<&str> = placement.split('/').collect();

        if rows.len() != BOARD_SIZE {
            return Err(GameError::InvalidFen {
                reason: format!("Expected 8 ranks, got {}", rows.len()),
            });
        }

        // FEN 从第 8 行写到第 1 行
        for (row_idx, row) in rows.iter().enumerate() {
            let rank = (BOARD_SIZE - 1 - row_idx) as u8;
            let mut file = 0u8;

            for c in row.chars() {
                if file as usize >= BOARD_SIZE {
                    return Err(GameError::InvalidFen {
                        reason: format!("Rank {} has too many files", rank + 1),
                    });
                }

                if let Some(empty_count) = c.to_digit(10) {
                    file += empty_count as u8;
                } else if let Some(piece) = Piece::from_fen_char(c) {
                    let square = Square::from_coords(file, rank).ok_or_else(|| {
                        GameError::InvalidFen {
                            reason: format!("Piece outside the board on rank {}", rank + 1),
                        }
                    })?;
                    board.set(square, Some(piece));
                    file += 1;
                } else {
                    return Err(GameError::InvalidFen {
                        reason: format!("Invalid piece character: {}", c),
                    });
                }
            }

            if file as usize != BOARD_SIZE {
                return Err(GameError::InvalidFen {
                    reason: format!("Rank {} has {} files, expected 8", rank + 1, file),
                });
            }
        }

        Ok(board)
    }

    /// 将棋盘转换为 FEN 棋子布局
    pub fn placement(board: &Board) -> String {
        let mut rows = Vec::with_capacity(BOARD_SIZE);

        for rank in (0..BOARD_SIZE as u8).rev() {
            let mut row = String::new();
            let mut empty_count = 0;

            for file in 0..BOARD_SIZE as u8 {
                let piece = Square::from_coords(file, rank).and_then(|sq| board.get(sq));
                if let Some(piece) = piece {
                    if empty_count > 0 {
                        row.push_str(&empty_count.to_string());
                        empty_count = 0;
                    }
                    row.push(piece.to_fen_char());
                } else {
                    empty_count += 1;
                }
            }

            if empty_count > 0 {
                row.push_str(&empty_count.to_string());
            }

            rows.push(row);
        }

        rows.join("/")
    }

    /// 初始局面
    pub fn initial() -> Board {
        Self::parse(INITIAL_PLACEMENT).unwrap_or_else(|_| Board::empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::piece::PieceType;
    use crate::state::Side;

    #[test]
    fn test_parse_initial_fen() {
        let board = Fen::parse("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1").unwrap();

        let e1 = Square::from_coords(4, 0).unwrap();
        assert_eq!(board.get(e1), Some(Piece::new(PieceType::King, Side::First)));

        let d8 = Square::from_coords(3, 7).unwrap();
        assert_eq!(board.get(d8), Some(Piece::new(PieceType::Queen, Side::Second)));

        let a2 = Square::from_coords(0, 1).unwrap();
        assert_eq!(board.get(a2), Some(Piece::new(PieceType::Pawn, Side::First)));
    }

    #[test]
    fn test_placement_roundtrip() {
        let placement = "7B/8/8/8/8/8/pr6/k3K2R";
        let board = Fen::parse(placement).unwrap();
        assert_eq!(Fen::placement(&board), placement);
        assert_eq!(Fen::placement(&Fen::initial()), INITIAL_PLACEMENT);
    }

    #[test]
    fn test_invalid_fen() {
        assert!(matches!(Fen::parse(""), Err(GameError::InvalidFen { .. })));
        assert!(Fen::parse("8/8/8").is_err());
        assert!(Fen::parse("9/8/8/8/8/8/8/8").is_err());
        assert!(Fen::parse("7x/8/8/8/8/8/8/8").is_err());
        assert!(Fen::parse("7/8/8/8/8/8/8/8").is_err());
    }
}
