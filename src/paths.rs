//! Shortest-path explanation inside a strong component
//!
//! Answers "why do these two vertices depend on each other" with the
//! shortest dependency chain between them: a breadth-first search from the
//! source over a restricted vertex set, recording each vertex's predecessor
//! and walking the predecessors back once the target is reached.
//!
//! Inside one strong component a path always exists in both directions, so a
//! miss means the caller mixed components (or restricted the set too far);
//! that is reported as `None`, never as an error, so visualization callers
//! can simply skip the edge.

use std::collections::VecDeque;

use crate::graph::{Graph, NodeId};

/// Shortest chain of arcs from `from` to `to`, using only vertices in
/// `members`. Returns the full vertex sequence including both endpoints,
/// `Some(vec![from])` when `from == to`, and `None` when `to` is not
/// reachable within the member set.
pub fn shortest_path<A>(
    graph: &Graph<A>,
    members: &[NodeId],
    from: NodeId,
    to: NodeId,
) -> Option<Vec<NodeId>> {
    if from == to {
        return Some(vec![from]);
    }

    let mut allowed = vec![false; graph.len()];
    for &member in members {
        allowed[member.index()] = true;
    }
    if !allowed[from.index()] || !allowed[to.index()] {
        return None;
    }

    // Predecessor per vertex doubles as the visited mark.
    let mut predecessor: Vec<Option<NodeId>> = vec![None; graph.len()];
    let mut queue = VecDeque::new();
    predecessor[from.index()] = Some(from);
    queue.push_back(from);

    'search: while let Some(current) = queue.pop_front() {
        for &head in graph.outgoing(current) {
            if !allowed[head.index()] || predecessor[head.index()].is_some() {
                continue;
            }
            predecessor[head.index()] = Some(current);
            if head == to {
                break 'search;
            }
            queue.push_back(head);
        }
    }

    predecessor[to.index()]?;

    let mut path = vec![to];
    let mut current = to;
    while current != from {
        current = predecessor[current.index()]?;
        path.push(current);
    }
    path.reverse();
    Some(path)
}
