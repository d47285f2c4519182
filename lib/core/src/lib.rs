//! # gedx Core
//!
//! Core data model for the gedx graph edit distance library.
//!
//! - [`Graph`] - Immutable attributed graph with O(1) adjacency lookup
//! - [`GraphBuilder`] - Validating constructor for graphs
//! - [`Triple`] - RDF triple, mapped to a graph by [`Graph::from_triples`]
//! - [`Error`] - Error taxonomy shared by all gedx crates
//!
//! ## Example
//!
//! ```rust
//! use gedx_core::Graph;
//!
//! let graph = Graph::builder("g1", true)
//!     .node("n1", [("symbol", "a")])
//!     .node("n2", [("symbol", "b")])
//!     .edge("n1", "n2", [("symbol", "knows")])
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(graph.len(), 2);
//! assert!(graph.edge_between(0, 1).is_some());
//! ```

pub mod error;
pub mod graph;
pub mod rdf;

pub use error::{Error, ErrorKind, Result};
pub use graph::{
    ensure_same_directedness, Attributes, Edge, EdgeDocument, EdgeIndex, Graph, GraphBuilder,
    GraphDocument, Node, NodeDocument, NodeIndex,
};
pub use rdf::{Triple, BLANK_SYMBOL, SYMBOL};
