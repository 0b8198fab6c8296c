//! Strong component extraction
//!
//! Tarjan's algorithm as a [`DepthFirstPass`]: one depth-first walk assigns
//! every vertex a visitation order and a low-link (the smallest order
//! reachable through its subtree and back-arcs), and each vertex whose
//! low-link equals its own order closes a maximal strongly connected
//! component. The result is the condensation graph: one node per component,
//! with an arc between two components whenever any of their members are
//! connected.
//!
//! Foreign vertices are reachable targets only. They are never descended
//! into, join no component, and contribute no condensation arcs.

use rayon::prelude::*;

use crate::geometry::Geometry;
use crate::graph::{Graph, NodeId};
use crate::traversal::{DepthFirstPass, depth_first_from};

/// A maximal strongly connected subgraph.
///
/// Members are listed in reverse discovery order (the order Tarjan's stack
/// pops them). Every pair of members is mutually reachable through arcs
/// between members only; a singleton is a valid component.
#[derive(Debug, Clone)]
pub struct StrongComponent {
    members: Vec<NodeId>,
    geometry: Geometry,
}

impl StrongComponent {
    /// Member vertices of the original graph, reverse discovery order.
    pub fn members(&self) -> &[NodeId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Shortest-cycle, eccentricity and center figures for this component.
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Whether the component contains a cycle: more than one member, or a
    /// single member with a self-loop.
    pub fn is_cyclic(&self) -> bool {
        self.members.len() > 1 || self.geometry.girth.is_some()
    }
}

/// The condensation of an analyzed graph: a graph of [`StrongComponent`]s
/// plus the vertex-to-component ownership map.
///
/// Component nodes appear in completion order (the order their roots closed
/// during the walk). The condensation is acyclic by construction; the
/// longest-walk ranking re-checks that invariant rather than assuming it.
#[derive(Debug, Clone)]
pub struct Condensation {
    graph: Graph<StrongComponent>,
    owner: Vec<Option<NodeId>>,
}

impl Condensation {
    /// The condensation as a plain graph, traversable like any other.
    pub fn graph(&self) -> &Graph<StrongComponent> {
        &self.graph
    }

    /// Number of components.
    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    pub fn component(&self, id: NodeId) -> &StrongComponent {
        self.graph.attributes(id)
    }

    /// The component owning `vertex`, or `None` for foreign vertices.
    pub fn owner(&self, vertex: NodeId) -> Option<NodeId> {
        self.owner[vertex.index()]
    }

    /// Components with their condensation-graph ids, completion order.
    pub fn components(&self) -> impl Iterator<Item = (NodeId, &StrongComponent)> {
        self.graph.ids().map(|id| (id, self.graph.attributes(id)))
    }
}

/// Partition `graph` into strongly connected components and build the
/// condensation graph, including per-component geometry.
pub fn extract_components<A: Sync>(graph: &Graph<A>) -> Condensation {
    let roots = graph.ids().filter(|&id| !graph.is_foreign(id));
    depth_first_from(graph, roots, Extract::new(graph.len()))
}

/// Tarjan's algorithm over the traversal engine. The explicit stack carries
/// vertices not yet assigned to a component; membership is tracked with an
/// O(1) on-stack flag per vertex instead of scanning the stack.
struct Extract {
    counter: usize,
    order: Vec<usize>,
    low: Vec<usize>,
    stack: Vec<NodeId>,
    on_stack: Vec<bool>,
    owner: Vec<Option<usize>>,
    members: Vec<Vec<NodeId>>,
}

impl Extract {
    fn new(vertices: usize) -> Self {
        Self {
            counter: 0,
            order: vec![0; vertices],
            low: vec![0; vertices],
            stack: Vec::new(),
            on_stack: vec![false; vertices],
            owner: vec![None; vertices],
            members: Vec::new(),
        }
    }
}

impl<A: Sync> DepthFirstPass<A> for Extract {
    type Output = Condensation;

    fn follow(&self, graph: &Graph<A>, _tail: NodeId, head: NodeId) -> bool {
        !graph.is_foreign(head)
    }

    fn enter(&mut self, _graph: &Graph<A>, vertex: NodeId) {
        self.order[vertex.index()] = self.counter;
        self.low[vertex.index()] = self.counter;
        self.counter += 1;
        self.stack.push(vertex);
        self.on_stack[vertex.index()] = true;
    }

    fn tree_arc(&mut self, _graph: &Graph<A>, tail: NodeId, head: NodeId) {
        self.low[tail.index()] = self.low[tail.index()].min(self.low[head.index()]);
    }

    fn seen_arc(&mut self, _graph: &Graph<A>, tail: NodeId, head: NodeId) {
        if self.on_stack[head.index()] {
            self.low[tail.index()] = self.low[tail.index()].min(self.order[head.index()]);
        }
    }

    fn exit(&mut self, _graph: &Graph<A>, vertex: NodeId) {
        if self.low[vertex.index()] != self.order[vertex.index()] {
            return;
        }
        // vertex is a component root: everything above it on the stack
        // belongs to the same component. Pop order is reverse discovery.
        let index = self.members.len();
        let mut members = Vec::new();
        loop {
            let member = match self.stack.pop() {
                Some(member) => member,
                None => break,
            };
            self.on_stack[member.index()] = false;
            self.owner[member.index()] = Some(index);
            members.push(member);
            if member == vertex {
                break;
            }
        }
        self.members.push(members);
    }

    fn finish(self, graph: &Graph<A>) -> Condensation {
        // Geometry per component is independent of every other component,
        // so the all-pairs computation runs in parallel.
        let geometries: Vec<Geometry> = self
            .members
            .par_iter()
            .map(|members| Geometry::compute(graph, members))
            .collect();

        let mut condensed: Graph<StrongComponent> = Graph::with_capacity(self.members.len());
        let mut ids = Vec::with_capacity(self.members.len());
        for (members, geometry) in self.members.into_iter().zip(geometries) {
            ids.push(condensed.add_vertex(StrongComponent { members, geometry }));
        }

        let mut owner = vec![None; graph.len()];
        for (vertex, component) in self.owner.iter().enumerate() {
            if let Some(component) = component {
                owner[vertex] = Some(ids[*component]);
            }
        }

        // Inter-component arcs: one per connected component pair, regardless
        // of how many member arcs cross the boundary (add_arc deduplicates).
        for vertex in graph.ids() {
            let Some(tail_component) = owner[vertex.index()] else {
                continue;
            };
            for &head in graph.outgoing(vertex) {
                if graph.is_foreign(head) {
                    continue;
                }
                if let Some(head_component) = owner[head.index()] {
                    if head_component != tail_component {
                        condensed.add_arc(tail_component, head_component);
                    }
                }
            }
        }

        Condensation {
            graph: condensed,
            owner,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(graph: &Graph<&str>, members: &[NodeId]) -> Vec<String> {
        members.iter().map(|&m| graph.attributes(m).to_string()).collect()
    }

    fn sorted_names(graph: &Graph<&str>, members: &[NodeId]) -> Vec<String> {
        let mut names = names(graph, members);
        names.sort();
        names
    }

    #[test]
    fn test_acyclic_graph_yields_singletons() {
        let mut graph = Graph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        let c = graph.add_vertex("c");
        graph.add_arc(a, b);
        graph.add_arc(b, c);
        graph.add_arc(a, c);

        let condensation = extract_components(&graph);
        assert_eq!(condensation.len(), 3);
        for (_, component) in condensation.components() {
            assert_eq!(component.len(), 1);
            assert!(!component.is_cyclic());
        }
    }

    #[test]
    fn test_triangle_forms_one_component() {
        let mut graph = Graph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        let c = graph.add_vertex("c");
        graph.add_arc(a, b);
        graph.add_arc(b, c);
        graph.add_arc(c, a);

        let condensation = extract_components(&graph);
        assert_eq!(condensation.len(), 1);
        let (id, component) = condensation.components().next().unwrap();
        assert_eq!(sorted_names(&graph, component.members()), vec!["a", "b", "c"]);
        assert!(component.is_cyclic());
        assert_eq!(condensation.owner(a), Some(id));
        assert_eq!(condensation.owner(b), Some(id));
        assert_eq!(condensation.owner(c), Some(id));
    }

    #[test]
    fn test_members_in_reverse_discovery_order() {
        let mut graph = Graph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        let c = graph.add_vertex("c");
        graph.add_arc(a, b);
        graph.add_arc(b, c);
        graph.add_arc(c, a);

        let condensation = extract_components(&graph);
        let (_, component) = condensation.components().next().unwrap();
        // Discovered a, b, c; stack pops the other way around.
        assert_eq!(names(&graph, component.members()), vec!["c", "b", "a"]);
    }

    #[test]
    fn test_two_cycles_with_bridge() {
        let mut graph = Graph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        let c = graph.add_vertex("c");
        let d = graph.add_vertex("d");
        graph.add_arc(a, b);
        graph.add_arc(b, a);
        graph.add_arc(b, c);
        graph.add_arc(c, d);
        graph.add_arc(d, c);

        let condensation = extract_components(&graph);
        assert_eq!(condensation.len(), 2);

        let ab = condensation.owner(a).unwrap();
        let cd = condensation.owner(c).unwrap();
        assert_ne!(ab, cd);
        assert_eq!(condensation.owner(b), Some(ab));
        assert_eq!(condensation.owner(d), Some(cd));

        // The bridge b -> c becomes the single condensation arc ab -> cd.
        assert!(condensation.graph().has_arc(ab, cd));
        assert!(!condensation.graph().has_arc(cd, ab));
        assert_eq!(condensation.graph().arc_count(), 1);
    }

    #[test]
    fn test_branched_cycle_is_one_component() {
        // Two branches from a rejoin at d, and d closes the loop back to a.
        let mut graph = Graph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        let c = graph.add_vertex("c");
        let d = graph.add_vertex("d");
        graph.add_arc(a, b);
        graph.add_arc(a, c);
        graph.add_arc(b, d);
        graph.add_arc(c, d);
        graph.add_arc(d, a);

        let condensation = extract_components(&graph);
        assert_eq!(condensation.len(), 1);
        let (_, component) = condensation.components().next().unwrap();
        assert_eq!(sorted_names(&graph, component.members()), vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_components_in_completion_order() {
        // b's cycle closes before a: a depends on the b<->c cycle.
        let mut graph = Graph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        let c = graph.add_vertex("c");
        graph.add_arc(a, b);
        graph.add_arc(b, c);
        graph.add_arc(c, b);

        let condensation = extract_components(&graph);
        let sizes: Vec<usize> = condensation.components().map(|(_, c)| c.len()).collect();
        assert_eq!(sizes, vec![2, 1]);
        assert_eq!(condensation.owner(b), condensation.owner(c));
        assert_ne!(condensation.owner(a), condensation.owner(b));
    }

    #[test]
    fn test_foreign_vertices_join_no_component() {
        let mut graph = Graph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        let ext = graph.add_foreign("std.collections");
        graph.add_arc(a, b);
        graph.add_arc(b, a);
        graph.add_arc(a, ext);
        graph.add_arc(ext, a);

        let condensation = extract_components(&graph);
        assert_eq!(condensation.len(), 1);
        assert_eq!(condensation.owner(ext), None);
        // The foreign detour must not close a cycle or add condensation arcs.
        assert_eq!(condensation.graph().arc_count(), 0);
        let (_, component) = condensation.components().next().unwrap();
        assert_eq!(sorted_names(&graph, component.members()), vec!["a", "b"]);
    }

    #[test]
    fn test_self_loop_singleton_is_cyclic() {
        let mut graph = Graph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        graph.add_arc(a, a);
        graph.add_arc(a, b);

        let condensation = extract_components(&graph);
        assert_eq!(condensation.len(), 2);

        let a_component = condensation.component(condensation.owner(a).unwrap());
        assert_eq!(a_component.len(), 1);
        assert!(a_component.is_cyclic());

        let b_component = condensation.component(condensation.owner(b).unwrap());
        assert!(!b_component.is_cyclic());
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let mut graph = Graph::new();
        let a = graph.add_vertex("a");
        let b = graph.add_vertex("b");
        let c = graph.add_vertex("c");
        let d = graph.add_vertex("d");
        graph.add_arc(a, b);
        graph.add_arc(b, c);
        graph.add_arc(c, a);
        graph.add_arc(c, d);

        let first = extract_components(&graph);
        let second = extract_components(&graph);

        assert_eq!(first.len(), second.len());
        for id in graph.ids() {
            let in_first = first.owner(id).map(|c| sorted_names(&graph, first.component(c).members()));
            let in_second =
                second.owner(id).map(|c| sorted_names(&graph, second.component(c).members()));
            assert_eq!(in_first, in_second);
        }
    }
}
