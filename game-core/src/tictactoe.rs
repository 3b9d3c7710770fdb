//! 井字棋
//!
//! [`GameState`] 的参考实现：走法为格子索引 0-8（按行排列），
//! 先手为 X，哈希随走子增量更新。

use std::fmt;

use lazy_static::lazy_static;

use crate::constants::TICTACTOE_CELLS;
use crate::error::{GameError, Result};
use crate::state::{Evaluator, GameState, Outcome, Side};
use crate::zobrist::ZobristTable;

lazy_static! {
    static ref ZOBRIST: ZobristTable = ZobristTable::new(2, TICTACTOE_CELLS);
}

/// 八条连线
const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

/// 井字棋局面
#[derive(Debug, Clone)]
pub struct TicTacToe {
    cells: [Option<Side>; TICTACTOE_CELLS],
    to_move: Side,
    /// 已走格子，用于撤销
    history: Vec<u8>,
    hash: u64,
}

impl TicTacToe {
    /// 创建空棋盘
    pub fn new() -> Self {
        Self {
            cells: [None; TICTACTOE_CELLS],
            to_move: Side::First,
            history: Vec::new(),
            hash: 0,
        }
    }

    /// 从布局字符串创建，例如 `"XX./OO./..."`
    ///
    /// `X` 为先手，`O` 为后手，`.` 为空格；`/` 和空白被忽略。
    /// 走子方由双方棋子数推断。
    pub fn from_layout(layout: &str) -> Result<Self> {
        let mut cells = [None; TICTACTOE_CELLS];
        let mut index = 0;

        for c in layout.chars().filter(|c| *c != '/' && !c.is_whitespace()) {
            if index >= TICTACTOE_CELLS {
                return Err(GameError::InvalidLayout {
                    reason: format!("More than {} cells", TICTACTOE_CELLS),
                });
            }
            cells[index] = match c {
                'X' | 'x' => Some(Side::First),
                'O' | 'o' => Some(Side::Second),
                '.' | '-' => None,
                other => {
                    return Err(GameError::InvalidLayout {
                        reason: format!("Invalid cell character: {}", other),
                    })
                }
            };
            index += 1;
        }

        if index != TICTACTOE_CELLS {
            return Err(GameError::InvalidLayout {
                reason: format!("Expected {} cells, got {}", TICTACTOE_CELLS, index),
            });
        }

        let first = cells.iter().filter(|c| **c == Some(Side::First)).count();
        let second = cells.iter().filter(|c| **c == Some(Side::Second)).count();
        let to_move = match first.checked_sub(second) {
            Some(0) => Side::First,
            Some(1) => Side::Second,
            _ => {
                return Err(GameError::InvalidLayout {
                    reason: format!("Piece counts {} / {} are not reachable", first, second),
                })
            }
        };

        let hash = ZOBRIST.hash(
            cells
                .iter()
                .enumerate()
                .filter_map(|(square, cell)| cell.map(|side| (side.index(), square))),
            to_move,
        );

        Ok(Self {
            cells,
            to_move,
            history: Vec::new(),
            hash,
        })
    }

    /// 获取格子内容
    pub fn cell(&self, index: usize) -> Option<Side> {
        self.cells.get(index).copied().flatten()
    }

    /// 带规则校验的走子
    pub fn play(&mut self, index: u8) -> Result<()> {
        if self.outcome().is_terminal() {
            return Err(GameError::GameOver);
        }
        let idx = index as usize;
        if idx >= TICTACTOE_CELLS {
            return Err(GameError::InvalidSquare { index: idx });
        }
        if self.cells[idx].is_some() {
            return Err(GameError::Occupied { index: idx });
        }
        self.apply(index);
        Ok(())
    }

    /// 已走步数（不含布局中的初始棋子）
    pub fn moves_played(&self) -> usize {
        self.history.len()
    }

    fn winner(&self) -> Option<Side> {
        LINES.iter().find_map(|line| {
            let first = self.cells[line[0]]?;
            line.iter()
                .all(|&i| self.cells[i] == Some(first))
                .then_some(first)
        })
    }
}

impl Default for TicTacToe {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for TicTacToe {
    fn eq(&self, other: &Self) -> bool {
        self.cells == other.cells && self.to_move == other.to_move
    }
}

impl Eq for TicTacToe {}

impl GameState for TicTacToe {
    type Action = u8;

    fn side_to_move(&self) -> Side {
        self.to_move
    }

    fn legal_actions(&self) -> Vec<u8> {
        if self.outcome().is_terminal() {
            return Vec::new();
        }
        (0..TICTACTOE_CELLS as u8)
            .filter(|&i| self.cells[i as usize].is_none())
            .collect()
    }

    fn apply(&mut self, action: u8) {
        let idx = action as usize;
        debug_assert!(self.cells[idx].is_none(), "cell {} already occupied", idx);

        self.cells[idx] = Some(self.to_move);
        self.hash ^= ZOBRIST.piece_hash(self.to_move.index(), idx) ^ ZOBRIST.side_hash();
        self.to_move = self.to_move.opponent();
        self.history.push(action);
    }

    fn undo(&mut self) {
        if let Some(action) = self.history.pop() {
            let idx = action as usize;
            self.to_move = self.to_move.opponent();
            self.cells[idx] = None;
            self.hash ^= ZOBRIST.piece_hash(self.to_move.index(), idx) ^ ZOBRIST.side_hash();
        }
    }

    fn outcome(&self) -> Outcome {
        if let Some(side) = self.winner() {
            Outcome::Win(side)
        } else if self.cells.iter().all(Option::is_some) {
            Outcome::Draw
        } else {
            Outcome::InProgress
        }
    }

    fn position_hash(&self) -> u64 {
        self.hash
    }
}

impl fmt::Display for TicTacToe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(3) {
            let line: String = row
                .iter()
                .map(|cell| match cell {
                    Some(Side::First) => 'X',
                    Some(Side::Second) => 'O',
                    None => '.',
                })
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

/// 井字棋连线评估：统计双方尚未被封堵的连线
#[derive(Debug, Clone, Copy, Default)]
pub struct LineEvaluator;

impl LineEvaluator {
    /// 连线上己方棋子数对应的分值
    const WEIGHTS: [i32; 4] = [0, 1, 10, 100];
}

impl Evaluator<TicTacToe> for LineEvaluator {
    fn evaluate(&self, state: &TicTacToe, perspective: Side) -> i32 {
        LINES
            .iter()
            .map(|line| {
                let mine = line
                    .iter()
                    .filter(|&&i| state.cells[i] == Some(perspective))
                    .count();
                let theirs = line
                    .iter()
                    .filter(|&&i| state.cells[i] == Some(perspective.opponent()))
                    .count();
                match (mine, theirs) {
                    (m, 0) => Self::WEIGHTS[m],
                    (0, t) => -Self::WEIGHTS[t],
                    _ => 0,
                }
            })
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game() {
        let game = TicTacToe::new();
        assert_eq!(game.side_to_move(), Side::First);
        assert_eq!(game.legal_actions(), (0..9).collect::<Vec<u8>>());
        assert_eq!(game.outcome(), Outcome::InProgress);
    }

    #[test]
    fn test_play_validation() {
        let mut game = TicTacToe::new();
        game.play(4).unwrap();
        assert_eq!(game.play(4), Err(GameError::Occupied { index: 4 }));
        assert_eq!(game.play(9), Err(GameError::InvalidSquare { index: 9 }));
        assert_eq!(game.moves_played(), 1);
    }

    #[test]
    fn test_win_detection() {
        let game = TicTacToe::from_layout("XXX/OO./...").unwrap();
        assert_eq!(game.outcome(), Outcome::Win(Side::First));
        assert!(game.legal_actions().is_empty());

        let mut game = game;
        assert_eq!(game.play(5), Err(GameError::GameOver));
    }

    #[test]
    fn test_draw_detection() {
        let game = TicTacToe::from_layout("XOX/XOO/OXX").unwrap();
        assert_eq!(game.outcome(), Outcome::Draw);
    }

    #[test]
    fn test_layout_side_to_move() {
        let game = TicTacToe::from_layout("X../.../...").unwrap();
        assert_eq!(game.side_to_move(), Side::Second);

        assert!(TicTacToe::from_layout("O../.../...").is_err());
        assert!(TicTacToe::from_layout("XX./.../...").is_err());
        assert!(TicTacToe::from_layout("X../...").is_err());
        assert!(TicTacToe::from_layout("Z../.../...").is_err());
    }

    #[test]
    fn test_layout_hash_matches_played_hash() {
        let mut played = TicTacToe::new();
        for cell in [0, 4, 8] {
            played.play(cell).unwrap();
        }
        let parsed = TicTacToe::from_layout("X../.O./..X").unwrap();

        assert_eq!(played, parsed);
        assert_eq!(played.position_hash(), parsed.position_hash());
    }

    #[test]
    fn test_transposition_same_hash() {
        let mut a = TicTacToe::new();
        let mut b = TicTacToe::new();
        for cell in [0, 4, 8] {
            a.apply(cell);
        }
        for cell in [8, 4, 0] {
            b.apply(cell);
        }
        assert_eq!(a, b);
        assert_eq!(a.position_hash(), b.position_hash());
    }

    #[test]
    fn test_apply_undo_roundtrip() {
        let mut game = TicTacToe::from_layout("X../.O./...").unwrap();
        let before = game.clone();

        for action in before.legal_actions() {
            game.apply(action);
            assert_ne!(game.position_hash(), before.position_hash());
            game.undo();
            assert_eq!(game, before);
            assert_eq!(game.position_hash(), before.position_hash());
        }
    }

    #[test]
    fn test_line_evaluator_symmetry() {
        let game = TicTacToe::from_layout("X../.O./..X").unwrap();
        let first = LineEvaluator.evaluate(&game, Side::First);
        let second = LineEvaluator.evaluate(&game, Side::Second);

        assert_eq!(first, -second);
        assert_eq!(LineEvaluator.evaluate(&TicTacToe::new(), Side::First), 0);
    }

    #[test]
    fn test_display() {
        let game = TicTacToe::from_layout("X../.O./..X").unwrap();
        assert_eq!(game.to_string(), "X..\n.O.\n..X\n");
    }
}
