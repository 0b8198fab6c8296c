//! Longest-walk ranking of the condensation graph
//!
//! Ranks every node of an acyclic graph by the length of its longest
//! downstream walk: a node with no outgoing arcs ranks 0, and every other
//! node ranks one more than the largest rank among its heads. Sorting the
//! condensation graph ascending by walk length yields a safe build order,
//! leaf components first.
//!
//! The walk is memoized depth-first. Meeting a head that is still on the
//! recursion path means the input has a cycle; for a condensation graph that
//! is a bug in component extraction, so it surfaces as a hard error instead
//! of being skipped.

use thiserror::Error;

use crate::graph::{Graph, NodeId};
use crate::traversal::{DepthFirstPass, depth_first};

/// Errors from the ranking pass.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RankingError {
    /// The supposedly acyclic input contains a cycle. For a condensation
    /// graph this indicates broken component extraction, never a property of
    /// the analyzed codebase.
    #[error("cycle in condensation graph: component {tail} reaches active component {head}")]
    CondensationCycle { tail: NodeId, head: NodeId },
}

/// The result of ranking: node ids ordered leaf-first plus the walk length
/// per node.
#[derive(Debug, Clone)]
pub struct Ranking {
    order: Vec<NodeId>,
    walks: Vec<usize>,
}

impl Ranking {
    /// Node ids sorted ascending by walk length. Equal walks keep the input
    /// (completion) order of the graph.
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    /// Longest downstream walk length of `id`.
    pub fn walk(&self, id: NodeId) -> usize {
        self.walks[id.index()]
    }
}

/// Rank every node of `graph` by longest downstream walk.
pub fn rank_by_longest_walk<A>(graph: &Graph<A>) -> Result<Ranking, RankingError> {
    depth_first(graph, LongestWalk::new(graph.len()))
}

struct LongestWalk {
    active: Vec<bool>,
    walks: Vec<usize>,
    violation: Option<(NodeId, NodeId)>,
}

impl LongestWalk {
    fn new(vertices: usize) -> Self {
        Self {
            active: vec![false; vertices],
            walks: vec![0; vertices],
            violation: None,
        }
    }

    fn relax(&mut self, tail: NodeId, head: NodeId) {
        let candidate = 1 + self.walks[head.index()];
        if candidate > self.walks[tail.index()] {
            self.walks[tail.index()] = candidate;
        }
    }
}

impl<A> DepthFirstPass<A> for LongestWalk {
    type Output = Result<Ranking, RankingError>;

    fn enter(&mut self, _graph: &Graph<A>, vertex: NodeId) {
        self.active[vertex.index()] = true;
        self.walks[vertex.index()] = 0;
    }

    fn tree_arc(&mut self, _graph: &Graph<A>, tail: NodeId, head: NodeId) {
        self.relax(tail, head);
    }

    fn seen_arc(&mut self, _graph: &Graph<A>, tail: NodeId, head: NodeId) {
        if self.active[head.index()] {
            // The head's walk is not final yet: a cycle. Remember the first
            // offence; the walk itself terminates regardless.
            if self.violation.is_none() {
                self.violation = Some((tail, head));
            }
            return;
        }
        self.relax(tail, head);
    }

    fn exit(&mut self, _graph: &Graph<A>, vertex: NodeId) {
        self.active[vertex.index()] = false;
    }

    fn finish(self, graph: &Graph<A>) -> Result<Ranking, RankingError> {
        if let Some((tail, head)) = self.violation {
            return Err(RankingError::CondensationCycle { tail, head });
        }
        let mut order: Vec<NodeId> = graph.ids().collect();
        // sort_by_key is stable: equal walks keep completion order.
        order.sort_by_key(|id| self.walks[id.index()]);
        Ok(Ranking {
            order,
            walks: self.walks,
        })
    }
}
