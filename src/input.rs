//! Graph input formats
//!
//! The analyzer consumes a pre-extracted dependency graph, never source
//! code. Two formats are supported, chosen by file extension:
//!
//! Text edge-list (any extension but `.json`):
//!
//! ```text
//! # one arc per line
//! app.core -> app.util
//! app.util -> app.core
//!
//! # vertices outside the analyzed scope, declared before first use
//! extern java.lang
//! app.core -> java.lang
//! ```
//!
//! Vertices come into existence on first mention, in file order. The order
//! matters, because it fixes the traversal root order of every analysis
//! pass.
//!
//! JSON (`.json` extension):
//!
//! ```text
//! { "vertices": ["a", "b"], "foreign": ["ext"], "arcs": [["a", "b"], ["a", "ext"]] }
//! ```
//!
//! Config exclusion globs are applied here, at load time: an excluded vertex
//! is never created and every arc touching it is dropped.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use glob::Pattern;
use serde::Deserialize;
use thiserror::Error;

use crate::graph::{Graph, NodeId};

/// Errors from graph loading.
#[derive(Error, Debug)]
pub enum InputError {
    #[error("Failed to read graph file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Malformed arc on line {line}: '{content}' (expected 'tail -> head')")]
    MalformedArc { line: usize, content: String },

    #[error("Line {line}: '{name}' declared extern after it was already used")]
    ForeignAfterUse { name: String, line: usize },

    #[error("Failed to parse JSON graph: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Duplicate vertex '{0}'")]
    DuplicateVertex(String),

    #[error("Arc references unknown vertex '{0}'")]
    UnknownVertex(String),
}

/// A graph built from an input file, with name-based lookup kept alongside.
#[derive(Debug, Clone, Default)]
pub struct LoadedGraph {
    pub graph: Graph<String>,
    index: HashMap<String, NodeId>,
}

impl LoadedGraph {
    /// The vertex named `name`, if it survived loading.
    pub fn lookup(&self, name: &str) -> Option<NodeId> {
        self.index.get(name).copied()
    }

    fn intern(&mut self, name: &str, foreign: bool) -> NodeId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = if foreign {
            self.graph.add_foreign(name.to_string())
        } else {
            self.graph.add_vertex(name.to_string())
        };
        self.index.insert(name.to_string(), id);
        id
    }
}

/// Load a graph from `path`, dispatching on the file extension.
pub fn load_graph(path: &Path, exclude: &[Pattern]) -> Result<LoadedGraph, InputError> {
    let text = fs::read_to_string(path)?;
    if path.extension().is_some_and(|ext| ext == "json") {
        parse_json(&text, exclude)
    } else {
        parse_edge_list(&text, exclude)
    }
}

fn excluded(name: &str, exclude: &[Pattern]) -> bool {
    exclude.iter().any(|pattern| pattern.matches(name))
}

/// Parse the text edge-list format.
pub fn parse_edge_list(text: &str, exclude: &[Pattern]) -> Result<LoadedGraph, InputError> {
    let mut loaded = LoadedGraph::default();

    for (number, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or("").trim();
        if line.is_empty() {
            continue;
        }

        if let Some(name) = line.strip_prefix("extern ") {
            let name = name.trim();
            if loaded.index.contains_key(name) {
                return Err(InputError::ForeignAfterUse {
                    name: name.to_string(),
                    line: number + 1,
                });
            }
            if !excluded(name, exclude) {
                loaded.intern(name, true);
            }
            continue;
        }

        let (tail, head) = match line.split_once("->") {
            Some((tail, head)) if !tail.trim().is_empty() && !head.trim().is_empty() => {
                (tail.trim(), head.trim())
            }
            _ => {
                return Err(InputError::MalformedArc {
                    line: number + 1,
                    content: line.to_string(),
                });
            }
        };

        if excluded(tail, exclude) || excluded(head, exclude) {
            continue;
        }
        let tail = loaded.intern(tail, false);
        let head = loaded.intern(head, false);
        loaded.graph.add_arc(tail, head);
    }

    Ok(loaded)
}

#[derive(Debug, Deserialize)]
struct GraphFile {
    #[serde(default)]
    vertices: Vec<String>,
    #[serde(default)]
    foreign: Vec<String>,
    #[serde(default)]
    arcs: Vec<(String, String)>,
}

/// Parse the JSON graph format.
pub fn parse_json(text: &str, exclude: &[Pattern]) -> Result<LoadedGraph, InputError> {
    let file: GraphFile = serde_json::from_str(text)?;
    let mut loaded = LoadedGraph::default();

    for (names, foreign) in [(&file.vertices, false), (&file.foreign, true)] {
        for name in names {
            if excluded(name, exclude) {
                continue;
            }
            if loaded.index.contains_key(name) {
                return Err(InputError::DuplicateVertex(name.clone()));
            }
            loaded.intern(name, foreign);
        }
    }

    for (tail, head) in &file.arcs {
        if excluded(tail, exclude) || excluded(head, exclude) {
            continue;
        }
        let tail = loaded
            .lookup(tail)
            .ok_or_else(|| InputError::UnknownVertex(tail.clone()))?;
        let head = loaded
            .lookup(head)
            .ok_or_else(|| InputError::UnknownVertex(head.clone()))?;
        loaded.graph.add_arc(tail, head);
    }

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn no_exclude() -> Vec<Pattern> {
        Vec::new()
    }

    #[test]
    fn test_parse_edge_list() {
        let text = "\
# dependency dump
app.core -> app.util
app.util -> app.core   # back-arc
extern java.lang
app.core -> java.lang
";
        let loaded = parse_edge_list(text, &no_exclude()).unwrap();
        assert_eq!(loaded.graph.len(), 3);

        let core = loaded.lookup("app.core").unwrap();
        let util = loaded.lookup("app.util").unwrap();
        let lang = loaded.lookup("java.lang").unwrap();
        assert!(loaded.graph.has_arc(core, util));
        assert!(loaded.graph.has_arc(util, core));
        assert!(loaded.graph.has_arc(core, lang));
        assert!(loaded.graph.is_foreign(lang));
        assert!(!loaded.graph.is_foreign(core));
    }

    #[test]
    fn test_vertices_created_in_mention_order() {
        let loaded = parse_edge_list("b -> a\na -> c\n", &no_exclude()).unwrap();
        let names: Vec<&str> = loaded
            .graph
            .ids()
            .map(|id| loaded.graph.attributes(id).as_str())
            .collect();
        assert_eq!(names, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_malformed_arc_reports_line_number() {
        let err = parse_edge_list("a -> b\nnot an arc\n", &no_exclude()).unwrap_err();
        match err {
            InputError::MalformedArc { line, content } => {
                assert_eq!(line, 2);
                assert_eq!(content, "not an arc");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_dangling_arrow_is_malformed() {
        assert!(parse_edge_list("a ->\n", &no_exclude()).is_err());
        assert!(parse_edge_list("-> b\n", &no_exclude()).is_err());
    }

    #[test]
    fn test_extern_after_use_is_an_error() {
        let err = parse_edge_list("a -> b\nextern b\n", &no_exclude()).unwrap_err();
        match err {
            InputError::ForeignAfterUse { name, line } => {
                assert_eq!(name, "b");
                assert_eq!(line, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_exclusion_drops_vertices_and_arcs() {
        let patterns = vec![Pattern::new("gen.*").unwrap()];
        let loaded = parse_edge_list("a -> gen.stub\ngen.stub -> b\na -> b\n", &patterns).unwrap();

        assert_eq!(loaded.lookup("gen.stub"), None);
        assert_eq!(loaded.graph.len(), 2);
        assert_eq!(loaded.graph.arc_count(), 1);
    }

    #[test]
    fn test_parse_json() {
        let text = r#"{
            "vertices": ["a", "b"],
            "foreign": ["ext"],
            "arcs": [["a", "b"], ["b", "a"], ["a", "ext"]]
        }"#;
        let loaded = parse_json(text, &no_exclude()).unwrap();

        let a = loaded.lookup("a").unwrap();
        let b = loaded.lookup("b").unwrap();
        let ext = loaded.lookup("ext").unwrap();
        assert!(loaded.graph.has_arc(a, b));
        assert!(loaded.graph.has_arc(b, a));
        assert!(loaded.graph.has_arc(a, ext));
        assert!(loaded.graph.is_foreign(ext));
    }

    #[test]
    fn test_json_unknown_vertex_in_arc() {
        let text = r#"{ "vertices": ["a"], "arcs": [["a", "ghost"]] }"#;
        let err = parse_json(text, &no_exclude()).unwrap_err();
        assert!(matches!(err, InputError::UnknownVertex(name) if name == "ghost"));
    }

    #[test]
    fn test_json_duplicate_vertex() {
        let text = r#"{ "vertices": ["a", "a"], "arcs": [] }"#;
        assert!(matches!(
            parse_json(text, &no_exclude()).unwrap_err(),
            InputError::DuplicateVertex(_)
        ));
    }

    #[test]
    fn test_equivalent_inputs_build_identical_graphs() {
        let from_text =
            parse_edge_list("extern ext\na -> b\nb -> a\na -> ext\n", &no_exclude()).unwrap();
        let from_json = parse_json(
            r#"{ "vertices": ["a", "b"], "foreign": ["ext"],
                 "arcs": [["a", "b"], ["b", "a"], ["a", "ext"]] }"#,
            &no_exclude(),
        )
        .unwrap();

        assert_eq!(from_text.graph.len(), from_json.graph.len());
        for id in from_text.graph.ids() {
            let name = from_text.graph.attributes(id);
            let other = from_json.lookup(name).unwrap();
            assert_eq!(
                from_text.graph.is_foreign(id),
                from_json.graph.is_foreign(other)
            );
            let mut heads: Vec<&str> = from_text
                .graph
                .outgoing(id)
                .iter()
                .map(|&h| from_text.graph.attributes(h).as_str())
                .collect();
            let mut other_heads: Vec<&str> = from_json
                .graph
                .outgoing(other)
                .iter()
                .map(|&h| from_json.graph.attributes(h).as_str())
                .collect();
            heads.sort();
            other_heads.sort();
            assert_eq!(heads, other_heads);
        }
    }

    #[test]
    fn test_load_graph_dispatches_on_extension() {
        let dir = tempfile::tempdir().unwrap();

        let text_path = dir.path().join("deps.txt");
        let mut file = std::fs::File::create(&text_path).unwrap();
        writeln!(file, "a -> b").unwrap();
        let loaded = load_graph(&text_path, &no_exclude()).unwrap();
        assert_eq!(loaded.graph.len(), 2);

        let json_path = dir.path().join("deps.json");
        let mut file = std::fs::File::create(&json_path).unwrap();
        write!(file, r#"{{ "vertices": ["a"], "arcs": [] }}"#).unwrap();
        let loaded = load_graph(&json_path, &no_exclude()).unwrap();
        assert_eq!(loaded.graph.len(), 1);
    }

    #[test]
    fn test_load_graph_missing_file() {
        let err = load_graph(Path::new("/nonexistent/deps.txt"), &no_exclude()).unwrap_err();
        assert!(matches!(err, InputError::IoError(_)));
    }
}
