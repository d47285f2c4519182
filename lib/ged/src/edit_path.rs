//! Edit paths implied by node mappings
//!
//! A [`NodeMapping`] sends every source node to a target node or to
//! deletion; target nodes nobody maps to are inserted. Edge operations follow
//! from the node mapping: a source edge whose endpoints both land on target
//! nodes joined by an edge is substituted, every other source edge is
//! deleted, and target edges left uncovered are inserted.

use gedx_assignment::Assignment;
use gedx_core::{EdgeIndex, Error, Graph, NodeIndex, Result};
use gedx_cost::BoundCost;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single edit operation with its cost
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum EditOperation {
    NodeSubstitution { source: NodeIndex, target: NodeIndex, cost: f64 },
    NodeDeletion { source: NodeIndex, cost: f64 },
    NodeInsertion { target: NodeIndex, cost: f64 },
    EdgeSubstitution { source: EdgeIndex, target: EdgeIndex, cost: f64 },
    EdgeDeletion { source: EdgeIndex, cost: f64 },
    EdgeInsertion { target: EdgeIndex, cost: f64 },
}

impl EditOperation {
    #[inline]
    pub fn cost(&self) -> f64 {
        match *self {
            EditOperation::NodeSubstitution { cost, .. }
            | EditOperation::NodeDeletion { cost, .. }
            | EditOperation::NodeInsertion { cost, .. }
            | EditOperation::EdgeSubstitution { cost, .. }
            | EditOperation::EdgeDeletion { cost, .. }
            | EditOperation::EdgeInsertion { cost, .. } => cost,
        }
    }

    #[inline]
    pub fn is_node_operation(&self) -> bool {
        matches!(
            self,
            EditOperation::NodeSubstitution { .. }
                | EditOperation::NodeDeletion { .. }
                | EditOperation::NodeInsertion { .. }
        )
    }
}

/// Node correspondence between a source and a target graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeMapping {
    /// Image of every source node; `None` means deleted
    source_to_target: Vec<Option<NodeIndex>>,
    target_len: usize,
}

impl NodeMapping {
    /// Fails if an image is out of range or used twice
    pub fn new(source_to_target: Vec<Option<NodeIndex>>, target_len: usize) -> Result<Self> {
        let mut seen = vec![false; target_len];
        for (source, image) in source_to_target.iter().enumerate() {
            if let Some(t) = *image {
                if t >= target_len || seen[t] {
                    return Err(Error::Infeasible(format!(
                        "source node {source} maps to target {t}, which is out of range or taken"
                    )));
                }
                seen[t] = true;
            }
        }
        Ok(Self {
            source_to_target,
            target_len,
        })
    }

    /// Read the node mapping off an assignment over the
    /// `(n + m) x (n + m)` matrix of a source with `n` and a target with
    /// `m` nodes. Rows `0..n` landing in columns `0..m` are substitutions,
    /// any other column deletes the row's node.
    pub fn from_assignment(assignment: &Assignment, source_len: usize, target_len: usize) -> Result<Self> {
        let expected = source_len + target_len;
        if assignment.len() != expected {
            return Err(Error::AssignmentSize {
                expected,
                actual: assignment.len(),
            });
        }

        let source_to_target = (0..source_len)
            .map(|row| {
                let col = assignment.column_for(row);
                (col < target_len).then_some(col)
            })
            .collect();

        Ok(Self {
            source_to_target,
            target_len,
        })
    }

    #[inline]
    pub fn image(&self, source: NodeIndex) -> Option<NodeIndex> {
        self.source_to_target[source]
    }

    #[inline]
    pub fn source_len(&self) -> usize {
        self.source_to_target.len()
    }

    #[inline]
    pub fn target_len(&self) -> usize {
        self.target_len
    }

    pub fn as_slice(&self) -> &[Option<NodeIndex>] {
        &self.source_to_target
    }

    /// Target nodes that no source node maps to
    pub fn inserted(&self) -> Vec<NodeIndex> {
        let mut used = vec![false; self.target_len];
        for t in self.source_to_target.iter().flatten() {
            used[*t] = true;
        }
        (0..self.target_len).filter(|&t| !used[t]).collect()
    }
}

/// Ordered list of edit operations transforming a source into a target graph
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct EditPath {
    operations: Vec<EditOperation>,
    cost: f64,
}

impl EditPath {
    /// Edit path implied by `mapping`: node operations in source order,
    /// then edge substitutions and deletions, then edge insertions.
    pub fn from_mapping(
        costs: &BoundCost<'_, '_>,
        source: &Graph,
        target: &Graph,
        mapping: &NodeMapping,
    ) -> Result<Self> {
        if mapping.source_len() != source.len() || mapping.target_len() != target.len() {
            return Err(Error::AssignmentSize {
                expected: source.len() + target.len(),
                actual: mapping.source_len() + mapping.target_len(),
            });
        }

        let mut path = EditPath::default();

        for (u, image) in mapping.as_slice().iter().enumerate() {
            path.push(match *image {
                Some(v) => EditOperation::NodeSubstitution {
                    source: u,
                    target: v,
                    cost: costs.substitute_node(u, v),
                },
                None => EditOperation::NodeDeletion {
                    source: u,
                    cost: costs.node_indel(),
                },
            });
        }
        for v in mapping.inserted() {
            path.push(EditOperation::NodeInsertion {
                target: v,
                cost: costs.node_indel(),
            });
        }

        let mut covered = vec![false; target.edge_count()];
        for (e, edge) in source.edges().iter().enumerate() {
            let image = mapping
                .image(edge.source())
                .zip(mapping.image(edge.target()))
                .and_then(|(x, y)| target.edge_index_between(x, y));

            path.push(match image {
                Some(f) => {
                    covered[f] = true;
                    EditOperation::EdgeSubstitution {
                        source: e,
                        target: f,
                        cost: costs.substitute_edge(e, f),
                    }
                }
                None => EditOperation::EdgeDeletion {
                    source: e,
                    cost: costs.edge_indel(),
                },
            });
        }
        for (f, _) in covered.iter().enumerate().filter(|(_, c)| !**c) {
            path.push(EditOperation::EdgeInsertion {
                target: f,
                cost: costs.edge_indel(),
            });
        }

        Ok(path)
    }

    /// Edit path implied by an assignment over the local cost matrix
    pub fn from_assignment(
        costs: &BoundCost<'_, '_>,
        source: &Graph,
        target: &Graph,
        assignment: &Assignment,
    ) -> Result<Self> {
        let mapping = NodeMapping::from_assignment(assignment, source.len(), target.len())?;
        Self::from_mapping(costs, source, target, &mapping)
    }

    fn push(&mut self, op: EditOperation) {
        self.cost += op.cost();
        self.operations.push(op);
    }

    #[inline]
    pub fn cost(&self) -> f64 {
        self.cost
    }

    #[inline]
    pub fn operations(&self) -> &[EditOperation] {
        &self.operations
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Operations that change something, i.e. everything except free substitutions
    pub fn changes(&self) -> impl Iterator<Item = &EditOperation> + '_ {
        self.operations.iter().filter(|op| op.cost() > 0.0)
    }

    /// Human readable rendering with node and edge ids resolved
    pub fn describe<'a>(&'a self, source: &'a Graph, target: &'a Graph) -> DescribedPath<'a> {
        DescribedPath {
            path: self,
            source,
            target,
        }
    }
}

pub struct DescribedPath<'a> {
    path: &'a EditPath,
    source: &'a Graph,
    target: &'a Graph,
}

impl fmt::Display for DescribedPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (s, t) = (self.source, self.target);
        for op in self.path.operations() {
            match *op {
                EditOperation::NodeSubstitution { source, target, cost } => {
                    writeln!(f, "{} -> {} ({cost})", s.node(source).id(), t.node(target).id())?
                }
                EditOperation::NodeDeletion { source, cost } => {
                    writeln!(f, "{} -> eps ({cost})", s.node(source).id())?
                }
                EditOperation::NodeInsertion { target, cost } => {
                    writeln!(f, "eps -> {} ({cost})", t.node(target).id())?
                }
                EditOperation::EdgeSubstitution { source, target, cost } => {
                    writeln!(f, "{} -> {} ({cost})", s.edge(source).id(), t.edge(target).id())?
                }
                EditOperation::EdgeDeletion { source, cost } => {
                    writeln!(f, "{} -> eps ({cost})", s.edge(source).id())?
                }
                EditOperation::EdgeInsertion { target, cost } => {
                    writeln!(f, "eps -> {} ({cost})", t.edge(target).id())?
                }
            }
        }
        write!(f, "total: {}", self.path.cost())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gedx_cost::CostFunction;

    fn chain(id: &str, labels: &[&str], edge_label: &str) -> Graph {
        let mut builder = Graph::builder(id, true);
        for (i, label) in labels.iter().enumerate() {
            builder.add_node(format!("n{i}"), [("symbol", *label)]);
        }
        for i in 1..labels.len() {
            builder.add_edge(format!("n{}", i - 1), format!("n{i}"), [("symbol", edge_label)]);
        }
        builder.build().unwrap()
    }

    #[test]
    fn test_identity_mapping_is_free() {
        let g = chain("g", &["a", "b", "c"], "p");
        let cf = CostFunction::rdf_default();
        let costs = cf.bind(&g, &g).unwrap();
        let mapping = NodeMapping::new(vec![Some(0), Some(1), Some(2)], 3).unwrap();
        let path = EditPath::from_mapping(&costs, &g, &g, &mapping).unwrap();

        assert_eq!(path.cost(), 0.0);
        assert_eq!(path.len(), 5);
        assert_eq!(path.changes().count(), 0);
    }

    #[test]
    fn test_deletion_takes_incident_edges() {
        let s = chain("s", &["a", "b", "c"], "p");
        let t = chain("t", &["a", "b"], "p");
        let cf = CostFunction::rdf_default();
        let costs = cf.bind(&s, &t).unwrap();
        let mapping = NodeMapping::new(vec![Some(0), Some(1), None], 2).unwrap();
        let path = EditPath::from_mapping(&costs, &s, &t, &mapping).unwrap();

        // delete n2 and the edge n1 -> n2
        assert_eq!(path.cost(), 2.0);
        assert!(path
            .operations()
            .contains(&EditOperation::EdgeDeletion { source: 1, cost: 1.0 }));
    }

    #[test]
    fn test_uncovered_target_edges_inserted() {
        let s = chain("s", &["a", "b"], "p");
        let t = chain("t", &["a", "b"], "p");
        let cf = CostFunction::rdf_default();
        let costs = cf.bind(&s, &t).unwrap();
        // swapped images: edge n0 -> n1 has no counterpart n1 -> n0
        let mapping = NodeMapping::new(vec![Some(1), Some(0)], 2).unwrap();
        let path = EditPath::from_mapping(&costs, &s, &t, &mapping).unwrap();

        // two relabelled nodes (0.5 each), one edge deletion, one insertion
        assert_eq!(path.cost(), 3.0);
        assert!(path
            .operations()
            .contains(&EditOperation::EdgeInsertion { target: 0, cost: 1.0 }));
    }

    #[test]
    fn test_mapping_validation() {
        assert!(NodeMapping::new(vec![Some(0), Some(0)], 2).is_err());
        assert!(NodeMapping::new(vec![Some(2)], 2).is_err());
        let mapping = NodeMapping::new(vec![None, Some(1)], 3).unwrap();
        assert_eq!(mapping.inserted(), vec![0, 2]);
    }

    #[test]
    fn test_describe() {
        let s = chain("s", &["a"], "p");
        let t = chain("t", &["b", "c"], "p");
        let cf = CostFunction::rdf_default();
        let costs = cf.bind(&s, &t).unwrap();
        let mapping = NodeMapping::new(vec![Some(0)], 2).unwrap();
        let path = EditPath::from_mapping(&costs, &s, &t, &mapping).unwrap();
        let text = path.describe(&s, &t).to_string();

        assert!(text.contains("n0 -> n0 (0.5)"));
        assert!(text.contains("eps -> n1 (1)"));
        assert!(text.contains("eps -> n0_<>n1 (1)"));
        assert!(text.ends_with("total: 2.5"));
    }
}
