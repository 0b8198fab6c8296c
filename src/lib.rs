//! # cyclometry - Dependency Cycle Analysis
//!
//! A library and CLI for analyzing dependency cycles in directed graphs:
//! strong components, cycle geometry, and a safe build-order ranking.
//!
//! ## Overview
//!
//! The analysis runs in fixed passes over a caller-supplied graph (one
//! vertex per package, module or class):
//!
//! 1. **Strong components** - Tarjan's algorithm partitions the graph into
//!    maximal strongly connected components and condenses it
//! 2. **Geometry** - all-pairs distances inside each component yield girth,
//!    radius, diameter and center vertices
//! 3. **Ranking** - components are ordered by longest downstream walk,
//!    leaf components first
//!
//! Shortest-path queries then explain why two vertices are mutually
//! dependent.
//!
//! ## Usage
//!
//! ```bash
//! # Analyze a dependency edge-list
//! cyclometry deps.txt
//!
//! # Summary only
//! cyclometry --summary deps.txt
//!
//! # JSON for tooling, written to a file
//! cyclometry --json -o report.json deps.json
//! ```
//!
//! As a library:
//!
//! ```
//! use cyclometry::{Graph, analyze};
//!
//! let mut graph = Graph::new();
//! let a = graph.add_vertex("a");
//! let b = graph.add_vertex("b");
//! graph.add_arc(a, b);
//! graph.add_arc(b, a);
//!
//! let analysis = analyze(&graph).unwrap();
//! assert!(analysis.summary().has_cycles());
//! assert_eq!(analysis.explain(&graph, a, b), Some(vec![a, b]));
//! ```

pub mod analysis;
pub mod components;
pub mod config;
pub mod geometry;
pub mod graph;
pub mod input;
pub mod paths;
pub mod ranking;
pub mod report;
pub mod traversal;

pub use analysis::{
    AnalysisError, CycleAnalysis, CycleSummary, NoProgress, ProgressSink, VertexMetrics, analyze,
    analyze_with,
};
pub use components::{Condensation, StrongComponent, extract_components};
pub use config::{
    AnalysisConfig, CompiledConfig, ConfigError, CyclometryConfig, ReportConfig,
    load_compiled_config, load_config,
};
pub use geometry::Geometry;
pub use graph::{Graph, NodeId};
pub use input::{InputError, LoadedGraph, load_graph, parse_edge_list, parse_json};
pub use paths::shortest_path;
pub use ranking::{Ranking, RankingError, rank_by_longest_walk};
pub use report::{generate_json, generate_report, generate_report_with_config, generate_summary};
pub use traversal::{DepthFirstPass, depth_first, depth_first_from};
