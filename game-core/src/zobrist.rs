//! Zobrist 哈希
//!
//! 为每个 (棋子种类, 格子) 组合生成一个随机数，局面哈希为所在组合的异或，
//! 支持走子/撤销时的增量更新。

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::constants::ZOBRIST_SEED;
use crate::state::Side;

/// Zobrist 哈希表
pub struct ZobristTable {
    /// 棋子哈希值，索引为 kind * squares + square
    pieces: Vec<u64>,
    /// 格子数
    squares: usize,
    /// 后手走子时叠加的哈希值
    side_to_move: u64,
}

impl ZobristTable {
    /// 创建新的 Zobrist 表（使用固定种子保证确定性）
    pub fn new(kinds: usize, squares: usize) -> Self {
        Self::with_seed(kinds, squares, ZOBRIST_SEED)
    }

    /// 使用指定种子创建
    pub fn with_seed(kinds: usize, squares: usize, seed: u64) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let pieces = (0..kinds * squares).map(|_| rng.gen()).collect();

        Self {
            pieces,
            squares,
            side_to_move: rng.gen(),
        }
    }

    /// 获取棋子的哈希值
    #[inline]
    pub fn piece_hash(&self, kind: usize, square: usize) -> u64 {
        self.pieces[kind * self.squares + square]
    }

    /// 获取走子方切换的哈希值
    #[inline]
    pub fn side_hash(&self) -> u64 {
        self.side_to_move
    }

    /// 计算完整哈希值
    pub fn hash<I>(&self, pieces: I, side_to_move: Side) -> u64
    where
        I: IntoIterator<Item = (usize, usize)>,
    {
        let mut hash = pieces
            .into_iter()
            .fold(0u64, |acc, (kind, square)| acc ^ self.piece_hash(kind, square));

        if side_to_move == Side::Second {
            hash ^= self.side_to_move;
        }

        hash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zobrist_deterministic() {
        let table1 = ZobristTable::new(2, 9);
        let table2 = ZobristTable::new(2, 9);

        let pieces = [(0, 4), (1, 0)];
        assert_eq!(
            table1.hash(pieces, Side::First),
            table2.hash(pieces, Side::First),
            "Zobrist 哈希应该是确定性的"
        );
    }

    #[test]
    fn test_zobrist_incremental_matches_full() {
        let table = ZobristTable::new(2, 9);

        let full = table.hash([(0, 4), (1, 0)], Side::First);
        let incremental = table.hash([(0, 4)], Side::Second)
            ^ table.piece_hash(1, 0)
            ^ table.side_hash();

        assert_eq!(full, incremental);
    }

    #[test]
    fn test_zobrist_side_matters() {
        let table = ZobristTable::new(2, 9);
        let pieces = [(0, 4)];

        assert_ne!(
            table.hash(pieces, Side::First),
            table.hash(pieces, Side::Second),
            "不同走子方应该有不同的哈希值"
        );
    }
}
