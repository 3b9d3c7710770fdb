//! 博弈状态接口
//!
//! 搜索核心只通过 [`GameState`] 访问具体游戏：合法走法、走子/撤销、
//! 终局判定和局面哈希。具体规则引擎不属于本库。

use std::fmt::Debug;
use std::hash::Hash;
use std::ops::{Deref, DerefMut};

use serde::{Deserialize, Serialize};

/// 行棋方
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    /// 先手
    First,
    /// 后手
    Second,
}

impl Side {
    /// 获取对方
    pub fn opponent(&self) -> Side {
        match self {
            Side::First => Side::Second,
            Side::Second => Side::First,
        }
    }

    /// 相对于 `perspective` 的符号：同一方为 1，对方为 -1
    pub fn sign(&self, perspective: Side) -> i32 {
        if *self == perspective {
            1
        } else {
            -1
        }
    }

    /// 转换为索引 (First=0, Second=1)
    pub fn index(&self) -> usize {
        match self {
            Side::First => 0,
            Side::Second => 1,
        }
    }
}

/// 对局结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// 对局进行中
    InProgress,
    /// 一方获胜
    Win(Side),
    /// 和棋
    Draw,
}

impl Outcome {
    /// 是否已终局
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::InProgress)
    }

    /// 获胜方
    pub fn winner(&self) -> Option<Side> {
        match self {
            Outcome::Win(side) => Some(*side),
            _ => None,
        }
    }
}

/// 博弈状态接口
///
/// 采用"走子 + 撤销"约定：`undo` 撤销最近一次 `apply`。
/// 搜索过程中请通过 [`Applied`] 走子，保证任何返回路径上都会撤销。
pub trait GameState: Clone {
    /// 走法
    type Action: Copy + Eq + Hash + Debug;

    /// 当前走子方
    fn side_to_move(&self) -> Side;

    /// 合法走法（同一进程内顺序必须稳定）
    fn legal_actions(&self) -> Vec<Self::Action>;

    /// 执行走法
    fn apply(&mut self, action: Self::Action);

    /// 撤销最近一次走法
    fn undo(&mut self);

    /// 终局判定
    fn outcome(&self) -> Outcome;

    /// 局面哈希（相等局面必须哈希相等）
    fn position_hash(&self) -> u64;

    /// 是否已终局
    fn is_terminal(&self) -> bool {
        self.outcome().is_terminal()
    }
}

/// 走子守卫
///
/// 创建时执行走法，离开作用域时撤销，剪枝导致的提前返回也不例外。
pub struct Applied<'a, S: GameState> {
    state: &'a mut S,
}

impl<'a, S: GameState> Applied<'a, S> {
    /// 在 `state` 上执行 `action`
    pub fn new(state: &'a mut S, action: S::Action) -> Self {
        state.apply(action);
        Self { state }
    }
}

impl<S: GameState> Deref for Applied<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.state
    }
}

impl<S: GameState> DerefMut for Applied<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.state
    }
}

impl<S: GameState> Drop for Applied<'_, S> {
    fn drop(&mut self) {
        self.state.undo();
    }
}

/// 局面评估函数
///
/// 正值对 `perspective` 有利。实现必须是纯函数，不得依赖额外状态。
pub trait Evaluator<S> {
    fn evaluate(&self, state: &S, perspective: Side) -> i32;
}

impl<S, F> Evaluator<S> for F
where
    F: Fn(&S, Side) -> i32,
{
    fn evaluate(&self, state: &S, perspective: Side) -> i32 {
        self(state, perspective)
    }
}
