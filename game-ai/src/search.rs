//! 搜索公共部分
//!
//! 各搜索策略共享的接口、结果类型和终局计分。

use game_core::{GameState, Outcome, Side, DRAW_VALUE, WIN_THRESHOLD, WIN_VALUE};

use crate::error::{Result, SearchError};

/// 搜索窗口的无穷大（留出余量以便安全取反）
pub const INFINITY: i32 = i32::MAX - 1;

/// 搜索策略
///
/// 所有策略共用同一个 `choose_move` 约定，代理通过 trait 对象切换策略。
pub trait Searcher<S: GameState> {
    /// 为当前走子方选择一个走法
    fn choose_move(&mut self, state: &S) -> Result<S::Action>;

    /// 清空策略持有的缓存（置换表、Q 表）
    fn reset(&mut self) {}

    /// 策略名称（用于日志）
    fn strategy(&self) -> &'static str;

    /// 上一次搜索访问的节点数（MCTS 为搜索树大小）
    fn nodes_searched(&self) -> u64;

    /// 跨搜索保留的缓存条目数，没有缓存的策略为 0
    fn cached_entries(&self) -> usize {
        0
    }
}

/// 定深搜索结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchResult<A> {
    /// 最佳走法
    pub action: A,
    /// 最佳走法的分值
    pub score: i32,
    /// 搜索的节点数
    pub nodes: u64,
}

/// 检查局面可以走棋，返回根节点的合法走法
pub(crate) fn root_actions<S: GameState>(state: &S) -> Result<Vec<S::Action>> {
    let outcome = state.outcome();
    if outcome.is_terminal() {
        return Err(SearchError::InvalidState { outcome });
    }

    let actions = state.legal_actions();
    if actions.is_empty() {
        return Err(SearchError::InvalidState { outcome });
    }

    Ok(actions)
}

/// 终局分值（`perspective` 视角），对局未结束时返回 `None`
///
/// 胜负分按距根节点的层数递减，越快的胜利分值越高。
pub(crate) fn terminal_score(outcome: Outcome, perspective: Side, ply: i32) -> Option<i32> {
    match outcome {
        Outcome::InProgress => None,
        Outcome::Draw => Some(DRAW_VALUE),
        Outcome::Win(winner) => Some(winner.sign(perspective) * (WIN_VALUE - ply)),
    }
}

/// 把评估函数的返回值限制在胜负分区间之外
///
/// 任意评估值都严格小于胜负分，取反也不会溢出。
#[inline]
pub(crate) fn clamp_heuristic(score: i32) -> i32 {
    score.clamp(-(WIN_THRESHOLD - 1), WIN_THRESHOLD - 1)
}
