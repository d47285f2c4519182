//! Reading graphs and cost functions from JSON files

use anyhow::{Context, Result};
use gedx_core::{Graph, GraphDocument, Triple};
use gedx_cost::CostFunction;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// A graph file holds either a graph document or a list of RDF triples
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum GraphFile {
    Triples(Vec<Triple>),
    Document(GraphDocument),
}

/// Parse a graph document or a triple list; triple lists get `id` as graph id
pub fn parse_graph(id: &str, json: &str) -> Result<Graph> {
    let file: GraphFile = serde_json::from_str(json)
        .context("expected a graph document or a list of {subject, predicate, object} triples")?;

    let graph = match file {
        GraphFile::Triples(triples) => Graph::from_triples(id, &triples)?,
        GraphFile::Document(doc) => Graph::try_from(doc)?,
    };
    Ok(graph)
}

/// Read a graph file, named after its file stem when it holds triples
pub fn read_graph(path: &Path) -> Result<Graph> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let id = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    parse_graph(&id, &json).with_context(|| format!("Invalid graph file {}", path.display()))
}

pub fn read_cost_function(path: &Path) -> Result<CostFunction> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let costs = CostFunction::from_json(&json)
        .with_context(|| format!("Invalid cost function {}", path.display()))?;
    Ok(costs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_document() {
        let json = r#"{
            "id": "g",
            "directed": true,
            "nodes": [{"id": "a", "attributes": {"symbol": "x"}}, {"id": "b"}],
            "edges": [{"from": "a", "to": "b"}]
        }"#;
        let g = parse_graph("ignored", json).unwrap();
        assert_eq!(g.id(), "g");
        assert_eq!(g.len(), 2);
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn test_parse_triples() {
        let json = r#"[{"subject": "ex:a", "predicate": "ex:p", "object": "ex:b"}]"#;
        let g = parse_graph("t", json).unwrap();
        assert_eq!(g.id(), "t");
        assert!(g.is_directed());
        assert_eq!(g.len(), 2);
    }

    #[test]
    fn test_parse_rejects_dangling_edge() {
        let json = r#"{"id": "g", "nodes": [{"id": "a"}], "edges": [{"from": "a", "to": "b"}]}"#;
        let err = parse_graph("g", json).unwrap_err();
        assert!(err.to_string().contains("unknown node 'b'"));
    }

    #[test]
    fn test_read_graph_uses_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("query1.json");
        let mut file = fs::File::create(&path).unwrap();
        write!(file, r#"[{{"subject": "_:x", "predicate": "ex:p", "object": "ex:b"}}]"#).unwrap();

        let g = read_graph(&path).unwrap();
        assert_eq!(g.id(), "query1");
        assert_eq!(g.node(0).attribute("symbol"), Some("_"));
    }

    #[test]
    fn test_read_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(read_graph(&dir.path().join("missing.json")).is_err());
    }
}
