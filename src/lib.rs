//! # gedx
//!
//! Graph edit distance between small attributed graphs.
//!
//! gedx computes the minimum cost of node and edge substitutions,
//! insertions and deletions turning one graph into another, either exactly
//! with A* search, bounded with beam search, or approximately with the
//! bipartite (assignment based) method.
//!
//! ## Quick Start
//!
//! ### From the command line
//!
//! ```bash
//! gedx g1.json g2.json --algorithm beam --beam 10
//! ```
//!
//! ### As a Library
//!
//! ```rust
//! use gedx::prelude::*;
//!
//! let g1 = Graph::builder("g1", true)
//!     .node("n1", [("symbol", "a")])
//!     .node("n2", [("symbol", "b")])
//!     .edge("n1", "n2", [("symbol", "knows")])
//!     .build()
//!     .unwrap();
//! let g2 = Graph::builder("g2", true)
//!     .node("n1", [("symbol", "a")])
//!     .node("n2", [("symbol", "b")])
//!     .node("n3", [("symbol", "c")])
//!     .edge("n1", "n2", [("symbol", "knows")])
//!     .build()
//!     .unwrap();
//!
//! let costs = CostFunction::rdf_default();
//! let matrix = compute_cost_matrix(&g1, &g2, &costs).unwrap();
//! let assignment = solve_assignment(&matrix, Solver::Hungarian).unwrap();
//!
//! assert_eq!(distance_from_assignment(&g1, &g2, &assignment, &costs).unwrap(), 1.0);
//! assert_eq!(distance_by_search(&g1, &g2, &costs, BeamWidth::Unbounded).unwrap(), 1.0);
//! // both directions are solved, so argument order does not matter
//! assert_eq!(distance_by_assignment(&g2, &g1, &costs, Solver::Hungarian).unwrap(), 1.0);
//! ```
//!
//! ## Crate Structure
//!
//! - [`gedx-core`](gedx_core) - Graph model, RDF triple mapping, errors
//! - [`gedx-cost`](gedx_cost) - Cost function configuration and attribute cost kinds
//! - [`gedx-assignment`](gedx_assignment) - Hungarian and Jonker-Volgenant solvers
//! - [`gedx-ged`](gedx_ged) - Cost matrix, edit paths, A* and beam search

pub mod input;
pub mod matcher;

// Re-export core types
pub use gedx_core::{
    Attributes, Edge, EdgeIndex, Error, ErrorKind, Graph, GraphBuilder, GraphDocument, Node,
    NodeIndex, Result, Triple,
};

pub use gedx_cost::{AttributeCost, BoundCost, Combination, CostFunction, CostKind, SideCost};

pub use gedx_assignment::{solve_assignment, Assignment, AssignmentSolver, Cost, CostMatrix, Solver};

pub use gedx_ged::{
    compute_cost_matrix, distance_by_assignment, distance_by_search, distance_from_assignment,
    BeamWidth, BipartiteOutcome, DebugOptions, EditDistance, EditOperation, EditPath,
    MatrixGenerator, NodeMapping, SearchOptions, SearchOutcome, SearchStatus,
};

pub use matcher::{Algorithm, Comparison, GraphMatcher};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        compute_cost_matrix, distance_by_assignment, distance_by_search, distance_from_assignment,
        solve_assignment, Algorithm, BeamWidth, CostFunction, DebugOptions, Error, Graph, GraphMatcher, Result,
        Solver, Triple,
    };
}
