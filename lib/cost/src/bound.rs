//! Cost function bound to a source and a target graph
//!
//! Attribute names are resolved against both graphs once, numeric values are
//! parsed once, and every cost query afterwards is a pair of index lookups.

use crate::distance::AttrValue;
use crate::schema::{CostFunction, SideCost};
use gedx_core::{EdgeIndex, Graph, NodeIndex, Result};

/// Resolved attribute rows of one graph, one row per node or edge
#[derive(Debug, Clone)]
struct AttributeTable<'g> {
    stride: usize,
    values: Vec<AttrValue<'g>>,
}

impl<'g> AttributeTable<'g> {
    fn build<T, I, F>(side: &SideCost, items: I, lookup: F) -> Result<Self>
    where
        I: Iterator<Item = &'g T>,
        T: 'g,
        F: Fn(&'g T, &str) -> Option<&'g str>,
    {
        let mut values = Vec::new();
        for item in items {
            values.extend(side.resolve(|name| lookup(item, name))?);
        }
        Ok(Self {
            stride: side.attributes.len(),
            values,
        })
    }

    #[inline]
    fn row(&self, index: usize) -> &[AttrValue<'g>] {
        &self.values[index * self.stride..(index + 1) * self.stride]
    }
}

/// Cost model for one (source, target) graph pair.
///
/// Node indices passed as `source` refer to the source graph, `target`
/// indices to the target graph; the same holds for edges.
#[derive(Debug, Clone)]
pub struct BoundCost<'c, 'g> {
    function: &'c CostFunction,
    source_nodes: AttributeTable<'g>,
    target_nodes: AttributeTable<'g>,
    source_edges: AttributeTable<'g>,
    target_edges: AttributeTable<'g>,
}

impl CostFunction {
    /// Resolve this cost function against a graph pair.
    ///
    /// Fails if the configuration does not validate, or if a numeric cost
    /// kind meets a value that does not parse as a number.
    pub fn bind<'c, 'g>(&'c self, source: &'g Graph, target: &'g Graph) -> Result<BoundCost<'c, 'g>> {
        self.validate()?;
        let node_lookup = |n: &'g gedx_core::Node, name: &str| n.attribute(name);
        let edge_lookup = |e: &'g gedx_core::Edge, name: &str| e.attribute(name);

        Ok(BoundCost {
            function: self,
            source_nodes: AttributeTable::build(&self.node, source.nodes().iter(), node_lookup)?,
            target_nodes: AttributeTable::build(&self.node, target.nodes().iter(), node_lookup)?,
            source_edges: AttributeTable::build(&self.edge, source.edges().iter(), edge_lookup)?,
            target_edges: AttributeTable::build(&self.edge, target.edges().iter(), edge_lookup)?,
        })
    }
}

impl<'c, 'g> BoundCost<'c, 'g> {
    #[inline]
    pub fn function(&self) -> &'c CostFunction {
        self.function
    }

    /// Flat cost of inserting or deleting a node
    #[inline]
    pub fn node_indel(&self) -> f64 {
        self.function.node.base_cost
    }

    /// Flat cost of inserting or deleting an edge
    #[inline]
    pub fn edge_indel(&self) -> f64 {
        self.function.edge.base_cost
    }

    /// `alpha`-blended cost of substituting source node `u` by target node `v`
    #[inline]
    pub fn substitute_node(&self, u: NodeIndex, v: NodeIndex) -> f64 {
        let side = &self.function.node;
        self.function.alpha * side.combine(self.source_nodes.row(u), self.target_nodes.row(v))
    }

    /// Combined attribute cost of source edge `e` against target edge `f`, before blending
    #[inline]
    pub fn edge_attribute_cost(&self, e: EdgeIndex, f: EdgeIndex) -> f64 {
        self.function
            .edge
            .combine(self.source_edges.row(e), self.target_edges.row(f))
    }

    /// `(1 - alpha)`-blended cost of substituting source edge `e` by target edge `f`
    #[inline]
    pub fn substitute_edge(&self, e: EdgeIndex, f: EdgeIndex) -> f64 {
        self.function.edge_weight() * self.edge_attribute_cost(e, f)
    }

    /// Node operation cost; `None` means deletion of `source`
    #[inline]
    pub fn node_cost(&self, source: NodeIndex, target: Option<NodeIndex>) -> f64 {
        match target {
            Some(target) => self.substitute_node(source, target),
            None => self.node_indel(),
        }
    }

    /// Edge operation cost; `None` on one side means insertion or deletion
    #[inline]
    pub fn edge_cost(&self, source: Option<EdgeIndex>, target: Option<EdgeIndex>) -> f64 {
        match (source, target) {
            (Some(e), Some(f)) => self.substitute_edge(e, f),
            (Some(_), None) | (None, Some(_)) => self.edge_indel(),
            (None, None) => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{AttributeCost, CostKind};
    use gedx_core::{Error, ErrorKind};

    fn source() -> Graph {
        Graph::builder("s", true)
            .node("a", [("symbol", "x"), ("w", "1")])
            .node("b", [("symbol", "y"), ("w", "4")])
            .edge("a", "b", [("symbol", "p")])
            .build()
            .unwrap()
    }

    fn target() -> Graph {
        Graph::builder("t", true)
            .node("c", [("symbol", "y"), ("w", "2")])
            .node("d", [("symbol", "x")])
            .edge("c", "d", [("symbol", "q")])
            .build()
            .unwrap()
    }

    #[test]
    fn test_bound_matches_name_based_costs() {
        let (s, t) = (source(), target());
        let cf = CostFunction::rdf_default();
        let bound = cf.bind(&s, &t).unwrap();

        for u in 0..s.len() {
            for v in 0..t.len() {
                let expected = cf.node_cost(s.node(u), Some(t.node(v))).unwrap();
                assert_eq!(bound.substitute_node(u, v), expected);
            }
        }
        assert_eq!(bound.substitute_edge(0, 0), 0.5);
        assert_eq!(bound.edge_cost(Some(0), None), 1.0);
        assert_eq!(bound.edge_cost(None, None), 0.0);
        assert_eq!(bound.node_cost(0, None), 1.0);
    }

    #[test]
    fn test_numeric_binding() {
        let (s, t) = (source(), target());
        let cf = CostFunction::new(1.0, 1.0, 1.0)
            .unwrap()
            .with_node_attribute(AttributeCost::new("w", CostKind::Absolute));
        let bound = cf.bind(&s, &t).unwrap();
        assert_eq!(bound.substitute_node(1, 0), 2.0_f64.sqrt());
        // missing weight reads as zero
        assert_eq!(bound.substitute_node(1, 1), 2.0);
    }

    #[test]
    fn test_binding_rejects_non_numeric() {
        let (s, t) = (source(), target());
        let cf = CostFunction::new(1.0, 1.0, 1.0)
            .unwrap()
            .with_node_attribute(AttributeCost::new("symbol", CostKind::Squared));
        assert!(cf.bind(&s, &t).is_err());
    }

    #[test]
    fn test_binding_validates_struct_literals() {
        let (s, t) = (source(), target());
        let cf = CostFunction {
            alpha: 1.5,
            ..CostFunction::rdf_default()
        };
        let err = cf.bind(&s, &t).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert_eq!(err.kind(), ErrorKind::UnsupportedConfiguration);

        let cf = CostFunction {
            alpha: f64::NAN,
            ..CostFunction::rdf_default()
        };
        assert!(cf.bind(&s, &t).is_err());
    }

    #[test]
    fn test_binding_validates_builder_additions() {
        let (s, t) = (source(), target());
        let cf = CostFunction::new(1.0, 1.0, 0.5)
            .unwrap()
            .with_node_attribute(AttributeCost::new("w", CostKind::Absolute).with_importance(-3.0));
        let err = cf.bind(&s, &t).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnsupportedConfiguration);
    }

    #[test]
    fn test_unblended_edge_cost() {
        let (s, t) = (source(), target());
        let cf = CostFunction::rdf_default();
        let bound = cf.bind(&s, &t).unwrap();
        assert_eq!(bound.edge_attribute_cost(0, 0), 1.0);
        assert_eq!(bound.substitute_edge(0, 0), 0.5);
    }
}
