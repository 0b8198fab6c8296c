//! Cycle geometry of a strong component
//!
//! All-pairs shortest hop counts over the members of one component
//! (Floyd-Warshall, arcs restricted to the component), and the figures
//! derived from them: girth, eccentricities, radius, diameter and the set of
//! center vertices. Distances are unweighted hop counts; unreachable is
//! represented as `Option::None`, so there is no sentinel arithmetic to
//! overflow.

use std::collections::HashMap;

use serde::Serialize;

use crate::graph::{Graph, NodeId};

/// Derived distance figures of one strong component.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Geometry {
    /// Length of the shortest cycle through any member; `None` means the
    /// component has no cycle (a singleton without a self-loop).
    pub girth: Option<usize>,
    /// Minimum eccentricity over all members. 0 for a singleton.
    pub radius: usize,
    /// Maximum eccentricity over all members. 0 for a singleton.
    pub diameter: usize,
    /// Eccentricity per member, parallel to the component's member order.
    pub eccentricities: Vec<usize>,
    /// Members whose eccentricity equals the radius. Ties all qualify.
    pub centers: Vec<NodeId>,
}

impl Geometry {
    /// Compute the geometry of `members` within `graph`. Arcs leaving the
    /// member set are ignored.
    pub fn compute<A>(graph: &Graph<A>, members: &[NodeId]) -> Self {
        let n = members.len();
        if n == 0 {
            return Self::default();
        }

        let index: HashMap<NodeId, usize> =
            members.iter().enumerate().map(|(i, &m)| (m, i)).collect();

        // Distance matrix seeded with the direct arcs. The diagonal starts
        // unreachable and only becomes finite if a cycle returns to the
        // vertex (a self-loop seeds it with 1 directly).
        let mut dist: Vec<Vec<Option<usize>>> = vec![vec![None; n]; n];
        for (i, &member) in members.iter().enumerate() {
            for head in graph.outgoing(member) {
                if let Some(&j) = index.get(head) {
                    dist[i][j] = Some(1);
                }
            }
        }

        for k in 0..n {
            for i in 0..n {
                let Some(ik) = dist[i][k] else { continue };
                for j in 0..n {
                    if let Some(kj) = dist[k][j] {
                        let via = ik + kj;
                        if dist[i][j].is_none_or(|direct| via < direct) {
                            dist[i][j] = Some(via);
                        }
                    }
                }
            }
        }

        let girth = (0..n).filter_map(|i| dist[i][i]).min();

        let eccentricities: Vec<usize> = (0..n)
            .map(|i| {
                (0..n)
                    .filter(|&j| j != i)
                    .filter_map(|j| dist[i][j])
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        let radius = eccentricities.iter().copied().min().unwrap_or(0);
        let diameter = eccentricities.iter().copied().max().unwrap_or(0);
        let centers = members
            .iter()
            .zip(&eccentricities)
            .filter(|&(_, &e)| e == radius)
            .map(|(&m, _)| m)
            .collect();

        Self {
            girth,
            radius,
            diameter,
            eccentricities,
            centers,
        }
    }
}
