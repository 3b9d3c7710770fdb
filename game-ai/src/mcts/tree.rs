//! MCTS 搜索树
//!
//! 节点存放在连续的 Vec 中，通过 NodeId（即 Vec 下标）访问。子节点归父节点独占，
//! 父节点引用只是索引，不持有所有权。整棵树在一次搜索结束后丢弃。

use game_core::{GameState, Outcome};

/// 节点索引
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

impl NodeId {
    #[inline]
    fn index(self) -> usize {
        self.0
    }
}

/// 节点扩展状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Expansion {
    /// 尚未扩展任何子节点
    Unexpanded,
    /// 部分走法已扩展
    PartiallyExpanded,
    /// 全部走法已扩展
    FullyExpanded,
}

/// 树节点
#[derive(Debug, Clone)]
pub struct Node<S: GameState> {
    /// 节点局面
    pub state: S,
    /// 局面哈希（Q 表的键）
    pub hash: u64,
    /// 父节点（根节点为 None）
    pub parent: Option<NodeId>,
    /// 从父节点到达本节点的走法（根节点为 None）
    pub action: Option<S::Action>,
    /// 已扩展的子节点，每个走法至多一个
    pub children: Vec<(S::Action, NodeId)>,
    /// 尚未扩展的走法
    pub untried: Vec<S::Action>,
    /// 终局结果；没有合法走法的进行中局面按和棋处理
    pub outcome: Outcome,
    /// 经过本节点的模拟次数
    pub visits: u32,
}

impl<S: GameState> Node<S> {
    fn new(state: S, parent: Option<NodeId>, action: Option<S::Action>) -> Self {
        let hash = state.position_hash();
        let mut outcome = state.outcome();
        let untried = if outcome.is_terminal() {
            Vec::new()
        } else {
            state.legal_actions()
        };
        if untried.is_empty() && !outcome.is_terminal() {
            outcome = Outcome::Draw;
        }

        Self {
            state,
            hash,
            parent,
            action,
            children: Vec::new(),
            untried,
            outcome,
            visits: 0,
        }
    }

    /// 是否终局
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// 扩展状态
    pub fn expansion(&self) -> Expansion {
        match (self.children.is_empty(), self.untried.is_empty()) {
            (_, true) => Expansion::FullyExpanded,
            (true, false) => Expansion::Unexpanded,
            (false, false) => Expansion::PartiallyExpanded,
        }
    }

    /// 是否已完全扩展
    pub fn is_fully_expanded(&self) -> bool {
        self.expansion() == Expansion::FullyExpanded
    }
}

/// 基于 arena 的搜索树
#[derive(Debug)]
pub struct Tree<S: GameState> {
    nodes: Vec<Node<S>>,
}

impl<S: GameState> Tree<S> {
    /// 以 `root_state` 为根创建
    pub fn new(root_state: S) -> Self {
        Self {
            nodes: vec![Node::new(root_state, None, None)],
        }
    }

    /// 根节点
    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &Node<S> {
        &self.nodes[id.index()]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<S> {
        &mut self.nodes[id.index()]
    }

    /// 节点总数
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// 扩展 `parent` 的第 `untried_index` 个未尝试走法，返回新节点
    pub fn expand(&mut self, parent: NodeId, untried_index: usize) -> Option<NodeId> {
        let parent_node = self.get_mut(parent);
        if untried_index >= parent_node.untried.len() {
            return None;
        }
        let action = parent_node.untried.swap_remove(untried_index);
        debug_assert!(
            parent_node.children.iter().all(|(a, _)| *a != action),
            "action {:?} expanded twice",
            action
        );

        let mut state = parent_node.state.clone();
        state.apply(action);

        let child = NodeId(self.nodes.len());
        self.nodes.push(Node::new(state, Some(parent), Some(action)));
        self.get_mut(parent).children.push((action, child));

        Some(child)
    }
}
