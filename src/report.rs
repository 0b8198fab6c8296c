//! Report generation for cycle analysis
//!
//! Renders an analysis into a human-readable report (build-order table,
//! cycle listings with an explanatory dependency chain) or a JSON document
//! for machine consumers.

use std::fmt;
use std::io::{self, Write};

use serde::Serialize;

use crate::analysis::{CycleAnalysis, CycleSummary, VertexMetrics};
use crate::components::StrongComponent;
use crate::config::ReportConfig;
use crate::graph::{Graph, NodeId};

/// Generate the full report with default thresholds
pub fn generate_report<A, W>(
    title: &str,
    graph: &Graph<A>,
    analysis: &CycleAnalysis,
    writer: &mut W,
) -> io::Result<()>
where
    A: fmt::Display,
    W: Write,
{
    generate_report_with_config(title, graph, analysis, &ReportConfig::default(), writer)
}

/// Generate the full report with custom thresholds
pub fn generate_report_with_config<A, W>(
    title: &str,
    graph: &Graph<A>,
    analysis: &CycleAnalysis,
    config: &ReportConfig,
    writer: &mut W,
) -> io::Result<()>
where
    A: fmt::Display,
    W: Write,
{
    let summary = analysis.summary();
    write_header(title, graph, &summary, writer)?;

    writeln!(writer)?;
    writeln!(writer, "Build order (leaf components first):")?;
    writeln!(writer, "  walk  size  girth  radius  diam  component")?;

    let mut listed = 0usize;
    let mut truncated = 0usize;
    for (id, component) in analysis.ranked_components() {
        if config.max_components != 0 && listed >= config.max_components {
            truncated += 1;
            continue;
        }
        listed += 1;
        let geometry = component.geometry();
        let girth = geometry
            .girth
            .map_or_else(|| "-".to_string(), |g| g.to_string());
        writeln!(
            writer,
            "  {:>4}  {:>4}  {:>5}  {:>6}  {:>4}  {}",
            analysis.ranking().walk(id),
            component.len(),
            girth,
            geometry.radius,
            geometry.diameter,
            component_label(graph, component),
        )?;
    }
    if truncated > 0 {
        writeln!(writer, "  ... {} more components not shown", truncated)?;
    }

    let cyclic: Vec<(NodeId, &StrongComponent)> = analysis
        .ranked_components()
        .filter(|(_, c)| c.is_cyclic())
        .collect();

    if !cyclic.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Cycles:")?;
        for (number, &(_, component)) in cyclic.iter().enumerate() {
            if config.max_components != 0 && number >= config.max_components {
                writeln!(
                    writer,
                    "  ... {} more cycles not shown",
                    cyclic.len() - number
                )?;
                break;
            }
            write_cycle(graph, analysis, number + 1, component, config, writer)?;
        }
    }

    Ok(())
}

/// Generate a summary report to the given writer
pub fn generate_summary<A, W>(
    title: &str,
    graph: &Graph<A>,
    analysis: &CycleAnalysis,
    writer: &mut W,
) -> io::Result<()>
where
    A: fmt::Display,
    W: Write,
{
    let summary = analysis.summary();
    write_header(title, graph, &summary, writer)?;
    if summary.has_cycles() {
        writeln!(
            writer,
            "\n{} cyclic component(s); largest has {} vertices.",
            summary.cyclic_components, summary.largest_component
        )?;
    } else {
        writeln!(writer, "\nNo dependency cycles.")?;
    }
    Ok(())
}

fn write_header<A, W>(
    title: &str,
    graph: &Graph<A>,
    summary: &CycleSummary,
    writer: &mut W,
) -> io::Result<()>
where
    W: Write,
{
    let foreign = graph.ids().filter(|&id| graph.is_foreign(id)).count();
    writeln!(writer, "Dependency Cycle Analysis: {}", title)?;
    writeln!(writer, "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━")?;
    writeln!(writer)?;
    writeln!(
        writer,
        "Vertices: {} ({} foreign) | Arcs: {} | Components: {} | Cycles: {} | On cycles: {}",
        graph.len(),
        foreign,
        graph.arc_count(),
        summary.components,
        summary.cyclic_components,
        summary.vertices_on_cycles
    )
}

fn component_label<A: fmt::Display>(graph: &Graph<A>, component: &StrongComponent) -> String {
    let members = component.members();
    match members.len() {
        0 => String::new(),
        1 => graph.attributes(members[0]).to_string(),
        n => format!("{} (+{} more)", graph.attributes(members[0]), n - 1),
    }
}

fn write_cycle<A, W>(
    graph: &Graph<A>,
    analysis: &CycleAnalysis,
    number: usize,
    component: &StrongComponent,
    config: &ReportConfig,
    writer: &mut W,
) -> io::Result<()>
where
    A: fmt::Display,
    W: Write,
{
    let geometry = component.geometry();
    let girth = geometry
        .girth
        .map_or_else(|| "-".to_string(), |g| g.to_string());
    writeln!(
        writer,
        "  [{}] {} vertices, girth {}, radius {}, diameter {}",
        number,
        component.len(),
        girth,
        geometry.radius,
        geometry.diameter
    )?;

    let members = component.members();
    let shown = if config.max_members == 0 {
        members.len()
    } else {
        members.len().min(config.max_members)
    };
    let names: Vec<String> = members[..shown]
        .iter()
        .map(|&m| graph.attributes(m).to_string())
        .collect();
    let suffix = if shown < members.len() {
        format!(" (+{} more)", members.len() - shown)
    } else {
        String::new()
    };
    writeln!(writer, "      members: {}{}", names.join(", "), suffix)?;

    let centers: Vec<String> = geometry
        .centers
        .iter()
        .map(|&c| graph.attributes(c).to_string())
        .collect();
    writeln!(writer, "      centers: {}", centers.join(", "))?;

    if let Some(chain) = cycle_chain(graph, analysis, component) {
        writeln!(writer, "      chain: {}", chain.join(" -> "))?;
    }

    Ok(())
}

/// A round trip through the cycle: the shortest chain from one member to
/// another and back again. For a self-loop singleton the trip is the loop
/// itself.
fn cycle_chain<A: fmt::Display>(
    graph: &Graph<A>,
    analysis: &CycleAnalysis,
    component: &StrongComponent,
) -> Option<Vec<String>> {
    let members = component.members();
    let first = *members.first()?;
    if members.len() == 1 {
        let name = graph.attributes(first).to_string();
        return Some(vec![name.clone(), name]);
    }
    let last = *members.last()?;
    let there = analysis.explain(graph, first, last)?;
    let back = analysis.explain(graph, last, first)?;
    let mut chain: Vec<String> = there
        .iter()
        .map(|&id| graph.attributes(id).to_string())
        .collect();
    chain.extend(back.iter().skip(1).map(|&id| graph.attributes(id).to_string()));
    Some(chain)
}

#[derive(Debug, Serialize)]
struct ComponentRow {
    index: usize,
    walk: usize,
    size: usize,
    cyclic: bool,
    girth: Option<usize>,
    radius: usize,
    diameter: usize,
    members: Vec<String>,
    centers: Vec<String>,
}

#[derive(Debug, Serialize)]
struct MachineReport {
    title: String,
    summary: CycleSummary,
    components: Vec<ComponentRow>,
    vertices: Vec<VertexMetrics>,
}

/// Generate the JSON machine output (full, never truncated)
pub fn generate_json<A, W>(
    title: &str,
    graph: &Graph<A>,
    analysis: &CycleAnalysis,
    writer: &mut W,
) -> io::Result<()>
where
    A: fmt::Display,
    W: Write,
{
    let components = analysis
        .ranked_components()
        .map(|(id, component)| {
            let geometry = component.geometry();
            ComponentRow {
                index: id.index(),
                walk: analysis.ranking().walk(id),
                size: component.len(),
                cyclic: component.is_cyclic(),
                girth: geometry.girth,
                radius: geometry.radius,
                diameter: geometry.diameter,
                members: component
                    .members()
                    .iter()
                    .map(|&m| graph.attributes(m).to_string())
                    .collect(),
                centers: geometry
                    .centers
                    .iter()
                    .map(|&c| graph.attributes(c).to_string())
                    .collect(),
            }
        })
        .collect();

    let report = MachineReport {
        title: title.to_string(),
        summary: analysis.summary(),
        components,
        vertices: analysis.vertex_metrics(graph),
    };
    serde_json::to_writer_pretty(&mut *writer, &report)?;
    writeln!(writer)
}
