//! 棋局评估函数
//!
//! 适用于任何实现了 [`PieceLayout`] 的国际象棋局面。分值先按先手方计算，
//! 再换算到调用方给出的视角。

use game_core::{Evaluator, Piece, PieceLayout, PieceType, Side, Square};

/// 棋子位置分值表（先手方视角，后手方取镜像格子）
/// 索引为 rank * 8 + file，a1 = 0
mod position_tables {
    #[rustfmt::skip]
    pub const PAWN: [i32; 64] = [
         0,  0,  0,  0,  0,  0,  0,  0,
         5, 10, 10,-20,-20, 10, 10,  5,
         5, -5,-10,  0,  0,-10, -5,  5,
         0,  0,  0, 20, 20,  0,  0,  0,
         5,  5, 10, 25, 25, 10,  5,  5,
        10, 10, 20, 30, 30, 20, 10, 10,
        50, 50, 50, 50, 50, 50, 50, 50,  // 即将升变
         0,  0,  0,  0,  0,  0,  0,  0,
    ];

    #[rustfmt::skip]
    pub const KNIGHT: [i32; 64] = [
        -50,-40,-30,-30,-30,-30,-40,-50,
        -40,-20,  0,  5,  5,  0,-20,-40,
        -30,  5, 10, 15, 15, 10,  5,-30,
        -30,  0, 15, 20, 20, 15,  0,-30,
        -30,  5, 15, 20, 20, 15,  5,-30,
        -30,  0, 10, 15, 15, 10,  0,-30,
        -40,-20,  0,  0,  0,  0,-20,-40,
        -50,-40,-30,-30,-30,-30,-40,-50,
    ];

    #[rustfmt::skip]
    pub const BISHOP: [i32; 64] = [
        -20,-10,-10,-10,-10,-10,-10,-20,
        -10,  5,  0,  0,  0,  0,  5,-10,
        -10, 10, 10, 10, 10, 10, 10,-10,
        -10,  0, 10, 10, 10, 10,  0,-10,
        -10,  5,  5, 10, 10,  5,  5,-10,
        -10,  0,  5, 10, 10,  5,  0,-10,
        -10,  0,  0,  0,  0,  0,  0,-10,
        -20,-10,-10,-10,-10,-10,-10,-20,
    ];

    #[rustfmt::skip]
    pub const ROOK: [i32; 64] = [
         0,  0,  0,  5,  5,  0,  0,  0,
        -5,  0,  0,  0,  0,  0,  0, -5,
        -5,  0,  0,  0,  0,  0,  0, -5,
        -5,  0,  0,  0,  0,  0,  0, -5,
        -5,  0,  0,  0,  0,  0,  0, -5,
        -5,  0,  0,  0,  0,  0,  0, -5,
         5, 10, 10, 10, 10, 10, 10,  5,
         0,  0,  0,  0,  0,  0,  0,  0,
    ];

    #[rustfmt::skip]
    pub const QUEEN: [i32; 64] = [
        -20,-10,-10, -5, -5,-10,-10,-20,
        -10,  0,  5,  0,  0,  0,  0,-10,
        -10,  5,  5,  5,  5,  5,  0,-10,
          0,  0,  5,  5,  5,  5,  0, -5,
         -5,  0,  5,  5,  5,  5,  0, -5,
        -10,  0,  5,  5,  5,  5,  0,-10,
        -10,  0,  0,  0,  0,  0,  0,-10,
        -20,-10,-10, -5, -5,-10,-10,-20,
    ];

    /// 中局王的位置分（鼓励躲在易位后的角落）
    #[rustfmt::skip]
    pub const KING: [i32; 64] = [
         20, 30, 10,  0,  0, 10, 30, 20,
         20, 20,  0,  0,  0,  0, 20, 20,
        -10,-20,-20,-20,-20,-20,-20,-10,
        -20,-30,-30,-40,-40,-30,-30,-20,
        -30,-40,-40,-50,-50,-40,-40,-30,
        -30,-40,-40,-50,-50,-40,-40,-30,
        -30,-40,-40,-50,-50,-40,-40,-30,
        -30,-40,-40,-50,-50,-40,-40,-30,
    ];
}

/// 先手方视角的分值换算到 `perspective`
#[inline]
fn relative(score: i32, perspective: Side) -> i32 {
    Side::First.sign(perspective) * score
}

/// 按阵营累加：先手方加，后手方减
fn signed_sum<S, F>(state: &S, mut value: F) -> i32
where
    S: PieceLayout,
    F: FnMut(Square, Piece) -> i32,
{
    state
        .pieces()
        .into_iter()
        .map(|(square, piece)| value(square, piece) * piece.side.sign(Side::First))
        .sum()
}

/// 简单子力计数
///
/// 兵 10，马 30，象 30，车 50，后 90，王 900。
#[derive(Debug, Clone, Copy, Default)]
pub struct MaterialCount;

impl MaterialCount {
    pub fn piece_value(piece_type: PieceType) -> i32 {
        match piece_type {
            PieceType::Pawn => 10,
            PieceType::Knight => 30,
            PieceType::Bishop => 30,
            PieceType::Rook => 50,
            PieceType::Queen => 90,
            PieceType::King => 900,
        }
    }
}

impl<S: PieceLayout> Evaluator<S> for MaterialCount {
    fn evaluate(&self, state: &S, perspective: Side) -> i32 {
        let score = signed_sum(state, |_, piece| Self::piece_value(piece.piece_type));
        relative(score, perspective)
    }
}

/// Kaufman 子力价值
///
/// 兵 100，马 325，象 325，车 500，后 975，王不计分；恰好保有两只象的一方额外加 50。
#[derive(Debug, Clone, Copy, Default)]
pub struct KaufmanMaterial;

impl KaufmanMaterial {
    /// 双象加分
    pub const BISHOP_PAIR_BONUS: i32 = 50;

    pub fn piece_value(piece_type: PieceType) -> i32 {
        match piece_type {
            PieceType::Pawn => 100,
            PieceType::Knight => 325,
            PieceType::Bishop => 325,
            PieceType::Rook => 500,
            PieceType::Queen => 975,
            PieceType::King => 0,
        }
    }
}

impl<S: PieceLayout> Evaluator<S> for KaufmanMaterial {
    fn evaluate(&self, state: &S, perspective: Side) -> i32 {
        let mut bishops = [0usize; 2];
        let mut score = signed_sum(state, |_, piece| {
            if piece.piece_type == PieceType::Bishop {
                bishops[piece.side.index()] += 1;
            }
            Self::piece_value(piece.piece_type)
        });

        for side in [Side::First, Side::Second] {
            if bishops[side.index()] == 2 {
                score += Self::BISHOP_PAIR_BONUS * side.sign(Side::First);
            }
        }

        relative(score, perspective)
    }
}

/// 位置分评估（Simplified Evaluation Function 的位置表）
///
/// 只计位置分，不含子力；后手方的棋子查镜像格子。
#[derive(Debug, Clone, Copy, Default)]
pub struct PieceSquareEvaluator;

impl PieceSquareEvaluator {
    /// 单个棋子的位置分
    pub fn position_bonus(square: Square, piece: Piece) -> i32 {
        let index = match piece.side {
            Side::First => square.index(),
            Side::Second => square.flipped().index(),
        };

        let table = match piece.piece_type {
            PieceType::Pawn => &position_tables::PAWN,
            PieceType::Knight => &position_tables::KNIGHT,
            PieceType::Bishop => &position_tables::BISHOP,
            PieceType::Rook => &position_tables::ROOK,
            PieceType::Queen => &position_tables::QUEEN,
            PieceType::King => &position_tables::KING,
        };
        table[index]
    }
}

impl<S: PieceLayout> Evaluator<S> for PieceSquareEvaluator {
    fn evaluate(&self, state: &S, perspective: Side) -> i32 {
        relative(signed_sum(state, Self::position_bonus), perspective)
    }
}
