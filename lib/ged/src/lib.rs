//! # gedx GED
//!
//! Graph edit distance between attributed graphs.
//!
//! - [`MatrixGenerator`] builds the bipartite `(n + m) x (n + m)` cost matrix
//! - [`EditDistance::from_assignment`] prices the edit path implied by an
//!   assignment over that matrix, giving a fast upper bound
//! - [`EditDistance::bipartite`] runs the whole approximation in both
//!   directions and keeps the cheaper edit path, so the result does not
//!   depend on argument order
//! - [`search`] runs A* (exact) or beam search (upper bound) over node mappings
//!
//! ## Example
//!
//! ```rust
//! use gedx_assignment::{solve_assignment, Solver};
//! use gedx_core::Graph;
//! use gedx_cost::CostFunction;
//! use gedx_ged::{compute_cost_matrix, distance_by_search, distance_from_assignment, BeamWidth};
//!
//! let g1 = Graph::builder("g1", true)
//!     .node("a", [("symbol", "x")])
//!     .node("b", [("symbol", "y")])
//!     .edge("a", "b", [("symbol", "p")])
//!     .build()
//!     .unwrap();
//! let g2 = Graph::builder("g2", true)
//!     .node("a", [("symbol", "x")])
//!     .node("b", [("symbol", "y")])
//!     .edge("a", "b", [("symbol", "q")])
//!     .build()
//!     .unwrap();
//!
//! let costs = CostFunction::rdf_default();
//! let matrix = compute_cost_matrix(&g1, &g2, &costs).unwrap();
//! let assignment = solve_assignment(&matrix, Solver::Hungarian).unwrap();
//!
//! assert_eq!(distance_from_assignment(&g1, &g2, &assignment, &costs).unwrap(), 0.5);
//! assert_eq!(distance_by_search(&g1, &g2, &costs, BeamWidth::Unbounded).unwrap(), 0.5);
//! ```

pub mod edit_path;
pub mod matrix_generator;
pub mod search;

pub use edit_path::{DescribedPath, EditOperation, EditPath, NodeMapping};
pub use matrix_generator::{compute_cost_matrix, MatrixGenerator};
pub use search::{distance_by_search, search, BeamWidth, SearchOptions, SearchOutcome, SearchStatus};

use gedx_assignment::{solve_assignment, Assignment, Solver};
use gedx_core::{ensure_same_directedness, Graph, Result};
use gedx_cost::{BoundCost, CostFunction};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which intermediate results to emit at `debug` level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugOptions {
    pub cost_matrix: bool,
    pub matching: bool,
    pub edit_path: bool,
}

impl DebugOptions {
    pub fn all() -> Self {
        Self {
            cost_matrix: true,
            matching: true,
            edit_path: true,
        }
    }
}

/// Edit path found by the bipartite approximation
#[derive(Debug, Clone, PartialEq)]
pub struct BipartiteOutcome {
    pub edit_path: EditPath,
    /// The edit path transforms the second graph into the first
    pub swapped: bool,
}

impl BipartiteOutcome {
    #[inline]
    pub fn distance(&self) -> f64 {
        self.edit_path.cost()
    }
}

/// Edit distance computations sharing one set of debug options
#[derive(Debug, Clone, Copy, Default)]
pub struct EditDistance {
    debug: DebugOptions,
}

impl EditDistance {
    pub fn new(debug: DebugOptions) -> Self {
        Self { debug }
    }

    #[inline]
    pub fn debug_options(&self) -> DebugOptions {
        self.debug
    }

    /// Edit path implied by `assignment` over the cost matrix of
    /// `source` against `target`
    pub fn edit_path_from_assignment(
        &self,
        costs: &BoundCost<'_, '_>,
        source: &Graph,
        target: &Graph,
        assignment: &Assignment,
    ) -> Result<EditPath> {
        ensure_same_directedness(source, target)?;
        if self.debug.matching {
            debug!(source = source.id(), target = target.id(), "matching {:?}", assignment.row_to_col());
        }

        let path = EditPath::from_assignment(costs, source, target, assignment)?;
        debug_assert!(path.cost().is_finite());
        self.log_path(&path, source, target);
        Ok(path)
    }

    /// Cost of the edit path implied by `assignment`
    pub fn from_assignment(
        &self,
        costs: &BoundCost<'_, '_>,
        source: &Graph,
        target: &Graph,
        assignment: &Assignment,
    ) -> Result<f64> {
        Ok(self.edit_path_from_assignment(costs, source, target, assignment)?.cost())
    }

    /// Bipartite approximation of the distance between `g1` and `g2`.
    ///
    /// Both directions are solved and the cheaper edit path is kept. On a tie
    /// the larger graph stays the source, so the distance is the same for
    /// `(g1, g2)` and `(g2, g1)`.
    pub fn bipartite(
        &self,
        costs: &CostFunction,
        g1: &Graph,
        g2: &Graph,
        solver: Solver,
    ) -> Result<BipartiteOutcome> {
        ensure_same_directedness(g1, g2)?;
        let prefer_swap = g1.len() < g2.len();
        let (first, second) = if prefer_swap { (g2, g1) } else { (g1, g2) };

        let preferred = self.bipartite_path(costs, first, second, solver)?;
        let reverse = self.bipartite_path(costs, second, first, solver)?;

        let outcome = if reverse.cost() < preferred.cost() {
            BipartiteOutcome {
                edit_path: reverse,
                swapped: !prefer_swap,
            }
        } else {
            BipartiteOutcome {
                edit_path: preferred,
                swapped: prefer_swap,
            }
        };
        debug!(
            g1 = g1.id(),
            g2 = g2.id(),
            swapped = outcome.swapped,
            distance = outcome.distance(),
            "bipartite distance"
        );
        Ok(outcome)
    }

    fn bipartite_path(&self, costs: &CostFunction, source: &Graph, target: &Graph, solver: Solver) -> Result<EditPath> {
        let bound = costs.bind(source, target)?;
        let matrix = MatrixGenerator::new(costs)
            .with_debug(self.debug)
            .generate_bound(&bound, source, target)?;
        let assignment = solve_assignment(&matrix, solver)?;
        self.edit_path_from_assignment(&bound, source, target, &assignment)
    }

    pub fn search(
        &self,
        costs: &BoundCost<'_, '_>,
        source: &Graph,
        target: &Graph,
        options: SearchOptions,
    ) -> Result<SearchOutcome> {
        let outcome = search::search(costs, source, target, options)?;
        if self.debug.matching {
            debug!(source = source.id(), target = target.id(), "matching {:?}", outcome.mapping.as_slice());
        }
        self.log_path(&outcome.edit_path, source, target);
        Ok(outcome)
    }

    fn log_path(&self, path: &EditPath, source: &Graph, target: &Graph) {
        if self.debug.edit_path {
            debug!(source = source.id(), target = target.id(), "edit path\n{}", path.describe(source, target));
        }
    }
}

/// Cost of the edit path implied by an assignment over the cost matrix
/// of `source` against `target`.
///
/// The assignment fixes the direction; use [`distance_by_assignment`] for a
/// distance that does not depend on argument order.
pub fn distance_from_assignment(
    source: &Graph,
    target: &Graph,
    assignment: &Assignment,
    costs: &CostFunction,
) -> Result<f64> {
    let bound = costs.bind(source, target)?;
    EditDistance::default().from_assignment(&bound, source, target, assignment)
}

/// Bipartite approximation of the edit distance, solved with `solver`
pub fn distance_by_assignment(g1: &Graph, g2: &Graph, costs: &CostFunction, solver: Solver) -> Result<f64> {
    Ok(EditDistance::default().bipartite(costs, g1, g2, solver)?.distance())
}
