//! Whole-graph analysis pipeline
//!
//! Runs the graph passes in their fixed order: strong component extraction
//! (with per-component geometry), then longest-walk ranking of the
//! condensation graph. Owns the combined result; shortest-path explanations
//! are answered on demand from it.
//!
//! Cancellation is cooperative and coarse: a [`ProgressSink`] is polled
//! between whole-graph passes only, never inside an algorithm, because
//! neither Tarjan's walk nor the all-pairs relaxation can be abandoned
//! midway without leaving scratch state meaningless.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::components::{Condensation, StrongComponent, extract_components};
use crate::graph::{Graph, NodeId};
use crate::paths::shortest_path;
use crate::ranking::{Ranking, RankingError, rank_by_longest_walk};

/// Observer of analysis progress, owned by the caller (a CLI, an IDE job).
///
/// Polled between passes; returning `true` from `cancelled` abandons the
/// run before the next pass starts.
pub trait ProgressSink {
    fn cancelled(&self) -> bool {
        false
    }

    fn pass_completed(&self, pass: &str) {
        let _ = pass;
    }
}

/// Sink that never cancels and swallows progress.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {}

/// Errors from the analysis pipeline.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The caller's progress sink requested cancellation between passes.
    #[error("analysis cancelled")]
    Cancelled,

    #[error(transparent)]
    Ranking(#[from] RankingError),
}

/// Complete result of one analysis run.
#[derive(Debug, Clone)]
pub struct CycleAnalysis {
    condensation: Condensation,
    ranking: Ranking,
}

/// Aggregate cycle counts for reports and exit-code decisions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CycleSummary {
    /// Total strong components, singletons included.
    pub components: usize,
    /// Components containing a cycle (more than one member, or a self-loop).
    pub cyclic_components: usize,
    /// Vertices that sit on at least one cycle.
    pub vertices_on_cycles: usize,
    /// Member count of the largest component.
    pub largest_component: usize,
}

impl CycleSummary {
    pub fn has_cycles(&self) -> bool {
        self.cyclic_components > 0
    }
}

/// Per-vertex metric row for exporters: a plain association of the vertex
/// name with its numeric analysis values.
#[derive(Debug, Clone, Serialize)]
pub struct VertexMetrics {
    pub name: String,
    /// Completion-order index of the owning component; `None` for foreign
    /// vertices.
    pub component: Option<usize>,
    pub component_size: usize,
    pub out_degree: usize,
    pub in_degree: usize,
    pub eccentricity: usize,
    pub center: bool,
    pub on_cycle: bool,
}

impl VertexMetrics {
    /// The row as (metric name, numeric value) pairs, the shape XML/CSV
    /// exporters consume.
    pub fn values(&self) -> Vec<(&'static str, f64)> {
        vec![
            ("component", self.component.map_or(-1.0, |c| c as f64)),
            ("componentSize", self.component_size as f64),
            ("outgoingArcs", self.out_degree as f64),
            ("incomingArcs", self.in_degree as f64),
            ("eccentricity", self.eccentricity as f64),
            ("center", if self.center { 1.0 } else { 0.0 }),
            ("onCycle", if self.on_cycle { 1.0 } else { 0.0 }),
        ]
    }
}

/// Analyze `graph` without progress reporting.
pub fn analyze<A: Sync>(graph: &Graph<A>) -> Result<CycleAnalysis, AnalysisError> {
    analyze_with(graph, &NoProgress)
}

/// Analyze `graph`, polling `progress` between passes.
pub fn analyze_with<A: Sync>(
    graph: &Graph<A>,
    progress: &dyn ProgressSink,
) -> Result<CycleAnalysis, AnalysisError> {
    if progress.cancelled() {
        return Err(AnalysisError::Cancelled);
    }
    let condensation = extract_components(graph);
    progress.pass_completed("strong components");

    if progress.cancelled() {
        return Err(AnalysisError::Cancelled);
    }
    let ranking = rank_by_longest_walk(condensation.graph())?;
    progress.pass_completed("longest-walk ranking");

    Ok(CycleAnalysis {
        condensation,
        ranking,
    })
}

impl CycleAnalysis {
    pub fn condensation(&self) -> &Condensation {
        &self.condensation
    }

    pub fn ranking(&self) -> &Ranking {
        &self.ranking
    }

    /// Components in ranked order: leaf components (nothing left to depend
    /// on) first, the deepest dependency chains last.
    pub fn ranked_components(&self) -> impl Iterator<Item = (NodeId, &StrongComponent)> {
        self.ranking
            .order()
            .iter()
            .map(|&id| (id, self.condensation.component(id)))
    }

    pub fn summary(&self) -> CycleSummary {
        let mut cyclic_components = 0;
        let mut vertices_on_cycles = 0;
        let mut largest_component = 0;
        for (_, component) in self.condensation.components() {
            largest_component = largest_component.max(component.len());
            if component.is_cyclic() {
                cyclic_components += 1;
                vertices_on_cycles += component.len();
            }
        }
        CycleSummary {
            components: self.condensation.len(),
            cyclic_components,
            vertices_on_cycles,
            largest_component,
        }
    }

    /// The shortest dependency chain from `from` to `to`, provided both
    /// belong to the same strong component. `None` otherwise: cross-component
    /// questions have no mutual-dependency chain to explain.
    pub fn explain<A>(&self, graph: &Graph<A>, from: NodeId, to: NodeId) -> Option<Vec<NodeId>> {
        let component = self.condensation.owner(from)?;
        if self.condensation.owner(to)? != component {
            return None;
        }
        shortest_path(
            graph,
            self.condensation.component(component).members(),
            from,
            to,
        )
    }

    /// Per-vertex metric rows in vertex insertion order.
    pub fn vertex_metrics<A: fmt::Display>(&self, graph: &Graph<A>) -> Vec<VertexMetrics> {
        graph
            .ids()
            .map(|id| {
                let owner = self.condensation.owner(id);
                let component = owner.map(|c| self.condensation.component(c));
                let eccentricity = component
                    .and_then(|c| {
                        let position = c.members().iter().position(|&m| m == id)?;
                        c.geometry().eccentricities.get(position).copied()
                    })
                    .unwrap_or(0);
                let center = component.is_some_and(|c| c.geometry().centers.contains(&id));
                VertexMetrics {
                    name: graph.attributes(id).to_string(),
                    component: owner.map(NodeId::index),
                    component_size: component.map_or(0, StrongComponent::len),
                    out_degree: graph.out_degree(id),
                    in_degree: graph.in_degree(id),
                    eccentricity,
                    center,
                    on_cycle: component.is_some_and(StrongComponent::is_cyclic),
                }
            })
            .collect()
    }
}
