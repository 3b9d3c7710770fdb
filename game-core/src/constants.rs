//! 常量定义

/// 胜局分值（终局判定优先于任何启发式评估）
pub const WIN_VALUE: i32 = 9_999_999;

/// 和局分值
pub const DRAW_VALUE: i32 = 0;

/// 胜负分阈值：绝对值超过此值的分数表示已搜索到终局
pub const WIN_THRESHOLD: i32 = WIN_VALUE - 10_000;

/// 国际象棋棋盘边长
pub const BOARD_SIZE: usize = 8;

/// 国际象棋棋盘格数
pub const SQUARE_COUNT: usize = BOARD_SIZE * BOARD_SIZE;

/// 井字棋格数
pub const TICTACTOE_CELLS: usize = 9;

/// Zobrist 随机数种子（固定种子保证哈希跨进程一致）
pub const ZOBRIST_SEED: u64 = 0xDEADBEEF_CAFE_1234;
