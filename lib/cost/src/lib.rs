//! # gedx Cost
//!
//! Edit cost functions for attributed graphs.
//!
//! A [`CostFunction`] prices node and edge substitutions from their
//! attributes and charges a flat cost for insertions and deletions. It is
//! plain configuration (serde-friendly) and is reused across many distance
//! computations; [`CostFunction::bind`] resolves it against one graph pair.
//!
//! ## Features
//!
//! - **Cost kinds**: equality, discrete (mu/nu), absolute, squared, string edit distance
//! - **Importance**: per-attribute weight in [0, 1]
//! - **Combination**: sum or product of attribute costs, optionally square-rooted
//! - **Blending**: `alpha` for node substitutions, `1 - alpha` for edge substitutions
//!
//! ## Example
//!
//! ```rust
//! use gedx_core::Graph;
//! use gedx_cost::CostFunction;
//!
//! let g = Graph::builder("g", true)
//!     .node("a", [("symbol", "x")])
//!     .node("b", [("symbol", "y")])
//!     .build()
//!     .unwrap();
//!
//! let costs = CostFunction::rdf_default();
//! let bound = costs.bind(&g, &g).unwrap();
//! assert_eq!(bound.substitute_node(0, 0), 0.0);
//! assert_eq!(bound.substitute_node(0, 1), 0.5);
//! assert_eq!(bound.node_indel(), 1.0);
//! ```

pub mod bound;
pub mod distance;
pub mod schema;

pub use bound::BoundCost;
pub use distance::{attribute_cost, levenshtein, AttrValue};
pub use schema::{AttributeCost, Combination, CostFunction, CostKind, SideCost};
