//! Bipartite cost matrix construction
//!
//! For a source with `n` and a target with `m` nodes the matrix is
//! `(n + m) x (n + m)`:
//!
//! ```text
//!            0..m                 m..m+n
//!  0..n    [ substitution       | deletion (diagonal) ]
//!  n..n+m  [ insertion (diag.)  | 0                   ]
//! ```
//!
//! A substitution cell adds to the node cost `(1 - alpha)` times the optimal
//! assignment of the two nodes' incident edges, so each cell sees the local
//! structure around its node pair. Deletion and insertion cells carry the
//! node cost plus one edge removal or insertion per incident edge.

use crate::DebugOptions;
use gedx_assignment::{AssignmentSolver, Cost, CostMatrix, Hungarian};
use gedx_core::{ensure_same_directedness, EdgeIndex, Graph, NodeIndex, Result};
use gedx_cost::{BoundCost, CostFunction};
use tracing::debug;

/// Position of an edge relative to the node it is incident to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Orientation {
    Outgoing,
    Incoming,
    Loop,
}

fn orientation(graph: &Graph, node: NodeIndex, edge: EdgeIndex) -> Orientation {
    let e = graph.edge(edge);
    if e.is_loop() {
        Orientation::Loop
    } else if !graph.is_directed() || e.source() == node {
        Orientation::Outgoing
    } else {
        Orientation::Incoming
    }
}

/// Builds cost matrices for graph pairs under one cost function
#[derive(Debug, Clone)]
pub struct MatrixGenerator<'c> {
    costs: &'c CostFunction,
    debug: DebugOptions,
}

impl<'c> MatrixGenerator<'c> {
    pub fn new(costs: &'c CostFunction) -> Self {
        Self {
            costs,
            debug: DebugOptions::default(),
        }
    }

    #[must_use]
    pub fn with_debug(mut self, debug: DebugOptions) -> Self {
        self.debug = debug;
        self
    }

    pub fn generate(&self, source: &Graph, target: &Graph) -> Result<CostMatrix> {
        ensure_same_directedness(source, target)?;
        let bound = self.costs.bind(source, target)?;
        self.generate_bound(&bound, source, target)
    }

    /// Same as [`generate`](Self::generate) with attributes already resolved
    pub fn generate_bound(
        &self,
        costs: &BoundCost<'_, '_>,
        source: &Graph,
        target: &Graph,
    ) -> Result<CostMatrix> {
        let (n, m) = (source.len(), target.len());
        let mut matrix = CostMatrix::filled(n + m, Cost::Forbidden);

        for u in 0..n {
            for v in 0..m {
                let local = costs.function().edge_weight() * local_edge_cost(costs, source, u, target, v)?;
                matrix.set(u, v, Cost::Finite(costs.substitute_node(u, v) + local))?;
            }
        }

        for u in 0..n {
            let cost = costs.node_indel() + source.node(u).degree() as f64 * costs.edge_indel();
            matrix.set(u, m + u, Cost::Finite(cost))?;
        }

        for v in 0..m {
            let cost = costs.node_indel() + target.node(v).degree() as f64 * costs.edge_indel();
            matrix.set(n + v, v, Cost::Finite(cost))?;
        }

        for row in n..n + m {
            for col in m..m + n {
                matrix.set(row, col, Cost::ZERO)?;
            }
        }

        if self.debug.cost_matrix {
            debug!(
                source = source.id(),
                target = target.id(),
                size = matrix.size(),
                "cost matrix\n{matrix}"
            );
        }

        Ok(matrix)
    }
}

/// Cost matrix of `source` against `target` with default debug settings
pub fn compute_cost_matrix(source: &Graph, target: &Graph, costs: &CostFunction) -> Result<CostMatrix> {
    MatrixGenerator::new(costs).generate(source, target)
}

/// Optimal unblended cost of turning the edges around source node `u` into
/// the edges around target node `v`: attribute costs for paired edges, the
/// flat edge cost for every unpaired one.
///
/// Edges of different orientation (outgoing, incoming, self-loop) are never
/// paired; they can still be deleted and inserted.
fn local_edge_cost(
    costs: &BoundCost<'_, '_>,
    source: &Graph,
    u: NodeIndex,
    target: &Graph,
    v: NodeIndex,
) -> Result<f64> {
    let source_edges = source.node(u).edges();
    let target_edges = target.node(v).edges();
    let (a, b) = (source_edges.len(), target_edges.len());

    if a == 0 || b == 0 {
        return Ok((a + b) as f64 * costs.edge_indel());
    }

    let mut local = CostMatrix::filled(a + b, Cost::Forbidden);

    for (k, &e) in source_edges.iter().enumerate() {
        let side = orientation(source, u, e);
        for (l, &f) in target_edges.iter().enumerate() {
            if side == orientation(target, v, f) {
                local.set(k, l, Cost::Finite(costs.edge_attribute_cost(e, f)))?;
            }
        }
        local.set(k, b + k, Cost::Finite(costs.edge_indel()))?;
    }

    for l in 0..b {
        local.set(a + l, l, Cost::Finite(costs.edge_indel()))?;
    }

    for row in a..a + b {
        for col in b..b + a {
            local.set(row, col, Cost::ZERO)?;
        }
    }

    Ok(Hungarian.solve(&local)?.total_cost())
}

#[cfg(test)]
mod tests {
    use super::*;
    use gedx_core::Error;

    fn pair() -> (Graph, Graph) {
        let s = Graph::builder("s", true)
            .node("a", [("symbol", "x")])
            .node("b", [("symbol", "y")])
            .edge("a", "b", [("symbol", "p")])
            .build()
            .unwrap();
        let t = Graph::builder("t", true)
            .node("a", [("symbol", "x")])
            .node("b", [("symbol", "y")])
            .node("c", [("symbol", "z")])
            .edge("a", "b", [("symbol", "q")])
            .build()
            .unwrap();
        (s, t)
    }

    #[test]
    fn test_block_layout() {
        let (s, t) = pair();
        let cf = CostFunction::rdf_default();
        let m = compute_cost_matrix(&s, &t, &cf).unwrap();
        assert_eq!(m.size(), 5);

        // a -> a: equal symbols, one outgoing edge each with a relabel
        assert_eq!(m.get(0, 0), Cost::Finite(0.5 * 1.0));
        // a -> b: relabelled node, outgoing vs incoming cannot pair
        assert_eq!(m.get(0, 1), Cost::Finite(0.5 + 0.5 * 2.0));
        // a -> c: c has no edges, delete a's edge
        assert_eq!(m.get(0, 2), Cost::Finite(0.5 + 0.5 * 1.0));

        // deletion block
        assert_eq!(m.get(0, 3), Cost::Finite(2.0));
        assert!(m.get(0, 4).is_forbidden());
        assert_eq!(m.get(1, 4), Cost::Finite(2.0));

        // insertion block
        assert_eq!(m.get(2, 0), Cost::Finite(2.0));
        assert_eq!(m.get(4, 2), Cost::Finite(1.0));
        assert!(m.get(4, 1).is_forbidden());

        // bottom-right block
        for row in 2..5 {
            for col in 3..5 {
                assert_eq!(m.get(row, col), Cost::ZERO);
            }
        }
    }

    #[test]
    fn test_undirected_edges_pair_either_way() {
        let s = Graph::builder("s", false)
            .node("a", [("symbol", "x")])
            .node("b", [("symbol", "x")])
            .edge("a", "b", [("symbol", "p")])
            .build()
            .unwrap();
        let cf = CostFunction::rdf_default();
        let m = compute_cost_matrix(&s, &s, &cf).unwrap();
        assert_eq!(m.get(0, 1), Cost::ZERO);
        assert_eq!(m.get(1, 0), Cost::ZERO);
    }

    #[test]
    fn test_rejects_mixed_directedness() {
        let (s, _) = pair();
        let u = Graph::builder("u", false).build().unwrap();
        let cf = CostFunction::rdf_default();
        assert!(matches!(
            compute_cost_matrix(&s, &u, &cf),
            Err(Error::DirectednessMismatch { .. })
        ));
    }

    #[test]
    fn test_empty_graphs() {
        let e = Graph::builder("e", true).build().unwrap();
        let cf = CostFunction::rdf_default();
        assert!(compute_cost_matrix(&e, &e, &cf).unwrap().is_empty());
    }

    #[test]
    fn test_local_structure_blended_by_edge_weight() {
        let (s, t) = pair();
        let cf = CostFunction {
            alpha: 0.25,
            ..CostFunction::rdf_default()
        };
        let m = compute_cost_matrix(&s, &t, &cf).unwrap();

        // node relabel 0.25, edge relabel (1 - 0.25) * 1
        assert_eq!(m.get(0, 0), Cost::Finite(0.75));
        // unpaired local edges get the same blend
        assert_eq!(m.get(0, 1), Cost::Finite(0.25 + 0.75 * 2.0));
        // deletion cells keep the flat costs
        assert_eq!(m.get(0, 3), Cost::Finite(2.0));
    }
}
