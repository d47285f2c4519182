//! Attributed graph model
//!
//! Nodes and edges live in flat vectors owned by the [`Graph`]; edges and
//! incidence lists refer to nodes by index. A dense adjacency table gives
//! O(1) lookup of the edge between an ordered node pair. For undirected
//! graphs both `(a, b)` and `(b, a)` resolve to the same edge.

use crate::{Error, Result};
use ahash::RandomState;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::{BTreeMap, HashMap};

pub type NodeIndex = usize;
pub type EdgeIndex = usize;

/// Attribute name to string value
pub type Attributes = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: String,
    attributes: Attributes,
    edges: SmallVec<[EdgeIndex; 4]>,
}

impl Node {
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Incident edges, each listed once (self-loops included)
    #[inline]
    pub fn edges(&self) -> &[EdgeIndex] {
        &self.edges
    }

    #[inline]
    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    source: NodeIndex,
    target: NodeIndex,
    id: String,
    attributes: Attributes,
}

impl Edge {
    #[inline]
    pub fn source(&self) -> NodeIndex {
        self.source
    }

    #[inline]
    pub fn target(&self) -> NodeIndex {
        self.target
    }

    /// Identity derived from the endpoint ids: `"<from>_<>to"`
    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    #[inline]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// The endpoint that is not `node`. For a self-loop this is `node` itself.
    #[inline]
    pub fn opposite(&self, node: NodeIndex) -> NodeIndex {
        if self.source == node {
            self.target
        } else {
            self.source
        }
    }

    #[inline]
    pub fn is_loop(&self) -> bool {
        self.source == self.target
    }
}

/// Immutable attributed graph. Build one with [`GraphBuilder`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphDocument", into = "GraphDocument")]
pub struct Graph {
    id: String,
    directed: bool,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    adjacency: Vec<Option<EdgeIndex>>,
    index: HashMap<String, NodeIndex, RandomState>,
}

impl Graph {
    pub fn builder(id: impl Into<String>, directed: bool) -> GraphBuilder {
        GraphBuilder::new(id, directed)
    }

    #[inline]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[inline]
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    /// Number of nodes
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    #[inline]
    pub fn node(&self, index: NodeIndex) -> &Node {
        &self.nodes[index]
    }

    #[inline]
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    #[inline]
    pub fn edge(&self, index: EdgeIndex) -> &Edge {
        &self.edges[index]
    }

    pub fn node_index(&self, id: &str) -> Option<NodeIndex> {
        self.index.get(id).copied()
    }

    pub fn node_by_id(&self, id: &str) -> Result<&Node> {
        self.node_index(id)
            .map(|i| &self.nodes[i])
            .ok_or_else(|| Error::NodeNotFound(id.to_string()))
    }

    /// Index of the edge from `a` to `b`, if any
    #[inline]
    pub fn edge_index_between(&self, a: NodeIndex, b: NodeIndex) -> Option<EdgeIndex> {
        self.adjacency[a * self.nodes.len() + b]
    }

    #[inline]
    pub fn edge_between(&self, a: NodeIndex, b: NodeIndex) -> Option<&Edge> {
        self.edge_index_between(a, b).map(|e| &self.edges[e])
    }

    pub fn incident_edges(&self, node: NodeIndex) -> impl Iterator<Item = &Edge> + '_ {
        self.nodes[node].edges.iter().map(move |&e| &self.edges[e])
    }

    /// Describes directedness for error messages
    pub(crate) fn kind_name(&self) -> &'static str {
        if self.directed {
            "directed"
        } else {
            "undirected"
        }
    }
}

/// Fails with [`Error::DirectednessMismatch`] unless both graphs agree.
pub fn ensure_same_directedness(source: &Graph, target: &Graph) -> Result<()> {
    if source.directed == target.directed {
        return Ok(());
    }
    Err(Error::DirectednessMismatch {
        source_graph: source.id.clone(),
        source_kind: source.kind_name(),
        target_graph: target.id.clone(),
        target_kind: target.kind_name(),
    })
}

/// Collects nodes and edges, validating everything in [`GraphBuilder::build`].
#[derive(Debug, Clone)]
pub struct GraphBuilder {
    id: String,
    directed: bool,
    nodes: Vec<(String, Attributes)>,
    edges: Vec<(String, String, Attributes)>,
}

impl GraphBuilder {
    pub fn new(id: impl Into<String>, directed: bool) -> Self {
        Self {
            id: id.into(),
            directed,
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }

    #[must_use]
    pub fn node<I, K, V>(mut self, id: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.add_node(id, attributes);
        self
    }

    #[must_use]
    pub fn edge<I, K, V>(mut self, from: impl Into<String>, to: impl Into<String>, attributes: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.add_edge(from, to, attributes);
        self
    }

    pub fn add_node<I, K, V>(&mut self, id: impl Into<String>, attributes: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.nodes.push((id.into(), collect_attributes(attributes)));
    }

    pub fn add_edge<I, K, V>(&mut self, from: impl Into<String>, to: impl Into<String>, attributes: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.edges.push((from.into(), to.into(), collect_attributes(attributes)));
    }

    pub fn build(self) -> Result<Graph> {
        let n = self.nodes.len();
        let mut index = HashMap::with_capacity_and_hasher(n, RandomState::new());
        let mut nodes = Vec::with_capacity(n);

        for (id, attributes) in self.nodes {
            if index.insert(id.clone(), nodes.len()).is_some() {
                return Err(Error::DuplicateNode(id, self.id));
            }
            nodes.push(Node {
                id,
                attributes,
                edges: SmallVec::new(),
            });
        }

        let mut adjacency = vec![None; n * n];
        let mut edges = Vec::with_capacity(self.edges.len());

        for (from, to, attributes) in self.edges {
            let lookup = |name: &str| {
                index.get(name).copied().ok_or_else(|| Error::DanglingEdge {
                    from: from.clone(),
                    to: to.clone(),
                    missing: name.to_string(),
                })
            };
            let source = lookup(&from)?;
            let target = lookup(&to)?;

            if adjacency[source * n + target].is_some() {
                return Err(Error::DuplicateEdge {
                    graph: self.id,
                    from,
                    to,
                });
            }

            let edge_index = edges.len();
            adjacency[source * n + target] = Some(edge_index);
            if !self.directed {
                adjacency[target * n + source] = Some(edge_index);
            }

            nodes[source].edges.push(edge_index);
            if target != source {
                nodes[target].edges.push(edge_index);
            }

            edges.push(Edge {
                source,
                target,
                id: format!("{from}_<>{to}"),
                attributes,
            });
        }

        Ok(Graph {
            id: self.id,
            directed: self.directed,
            nodes,
            edges,
            adjacency,
            index,
        })
    }
}

fn collect_attributes<I, K, V>(attributes: I) -> Attributes
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    attributes
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Serialized form of a [`Graph`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphDocument {
    pub id: String,
    #[serde(default)]
    pub directed: bool,
    #[serde(default)]
    pub nodes: Vec<NodeDocument>,
    #[serde(default)]
    pub edges: Vec<EdgeDocument>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeDocument {
    pub id: String,
    #[serde(default)]
    pub attributes: Attributes,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeDocument {
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub attributes: Attributes,
}

impl TryFrom<GraphDocument> for Graph {
    type Error = Error;

    fn try_from(doc: GraphDocument) -> Result<Self> {
        let mut builder = GraphBuilder::new(doc.id, doc.directed);
        for node in doc.nodes {
            builder.add_node(node.id, node.attributes);
        }
        for edge in doc.edges {
            builder.add_edge(edge.from, edge.to, edge.attributes);
        }
        builder.build()
    }
}

impl From<Graph> for GraphDocument {
    fn from(graph: Graph) -> Self {
        let edges = graph
            .edges
            .iter()
            .map(|e| EdgeDocument {
                from: graph.nodes[e.source].id.clone(),
                to: graph.nodes[e.target].id.clone(),
                attributes: e.attributes.clone(),
            })
            .collect();
        let nodes = graph
            .nodes
            .into_iter()
            .map(|n| NodeDocument {
                id: n.id,
                attributes: n.attributes,
            })
            .collect();
        GraphDocument {
            id: graph.id,
            directed: graph.directed,
            nodes,
            edges,
        }
    }
}
