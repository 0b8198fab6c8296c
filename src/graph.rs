//! Arena-backed directed graph model
//!
//! Vertices live in a flat arena and are addressed by stable [`NodeId`]
//! indices; adjacency is stored as index lists on each node. This sidesteps
//! the ownership cycles a pointer-based dependency graph would create and
//! keeps the graph immutable while analysis passes run, so several read-only
//! analyses may share one graph.

use std::fmt;

use serde::Serialize;

/// Stable index of a vertex within its [`Graph`].
///
/// Ids are only minted by the owning graph. Using an id from a different
/// (or smaller) graph is a caller bug and panics on first use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    /// Position of this vertex in the arena (0..graph.len()).
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Node<A> {
    attributes: A,
    foreign: bool,
    outgoing: Vec<NodeId>,
    incoming: Vec<NodeId>,
}

/// A directed graph over an opaque attribute payload `A`.
///
/// The payload is caller-owned semantic identity (a qualified module name, a
/// source path); the graph never inspects it beyond what callers ask for.
/// Arcs are unweighted, deduplicated, and kept in insertion order; insertion
/// order is semantic, since it fixes the visitation order of every traversal.
#[derive(Debug, Clone, Default)]
pub struct Graph<A> {
    nodes: Vec<Node<A>>,
}

impl<A> Graph<A> {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
        }
    }

    /// Add a vertex that belongs to the analyzed scope.
    pub fn add_vertex(&mut self, attributes: A) -> NodeId {
        self.push_node(attributes, false)
    }

    /// Add a vertex that is referenced by the graph but lies outside the
    /// analyzed scope (e.g. a standard-library package). Foreign vertices
    /// never join a strong component.
    pub fn add_foreign(&mut self, attributes: A) -> NodeId {
        self.push_node(attributes, true)
    }

    fn push_node(&mut self, attributes: A, foreign: bool) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            attributes,
            foreign,
            outgoing: Vec::new(),
            incoming: Vec::new(),
        });
        id
    }

    /// Add the arc `tail -> head`.
    ///
    /// Both adjacency sides are updated together: after this call the head's
    /// incoming list contains the tail and the tail's outgoing list contains
    /// the head. Adding an arc that already exists is a no-op (no
    /// multigraphs). Self-loops are legal.
    pub fn add_arc(&mut self, tail: NodeId, head: NodeId) {
        if self.nodes[tail.0].outgoing.contains(&head) {
            return;
        }
        self.nodes[tail.0].outgoing.push(head);
        self.nodes[head.0].incoming.push(tail);
    }

    /// Whether the arc `tail -> head` exists.
    pub fn has_arc(&self, tail: NodeId, head: NodeId) -> bool {
        self.nodes[tail.0].outgoing.contains(&head)
    }

    /// Number of vertices.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All vertex ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.nodes.len()).map(NodeId)
    }

    /// Heads of the vertex's outgoing arcs, in insertion order.
    pub fn outgoing(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].outgoing
    }

    /// Tails of the vertex's incoming arcs, in insertion order.
    pub fn incoming(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].incoming
    }

    pub fn out_degree(&self, id: NodeId) -> usize {
        self.nodes[id.0].outgoing.len()
    }

    pub fn in_degree(&self, id: NodeId) -> usize {
        self.nodes[id.0].incoming.len()
    }

    pub fn attributes(&self, id: NodeId) -> &A {
        &self.nodes[id.0].attributes
    }

    pub fn attributes_mut(&mut self, id: NodeId) -> &mut A {
        &mut self.nodes[id.0].attributes
    }

    pub fn is_foreign(&self, id: NodeId) -> bool {
        self.nodes[id.0].foreign
    }

    /// Total arc count (each arc counted once, on its tail side).
    pub fn arc_count(&self) -> usize {
        self.nodes.iter().map(|n| n.outgoing.len()).sum()
    }
}
