//! # gedx Assignment
//!
//! Exact solvers for the linear sum assignment problem on square
//! [`CostMatrix`] values.
//!
//! - [`Hungarian`] - O(n³) primal-dual method with row/column potentials
//! - [`JonkerVolgenant`] - column reduction followed by shortest augmenting paths
//!
//! Both return a true optimum; permutations may differ when several
//! optima exist, the total cost never does. Cells marked
//! [`Cost::Forbidden`] are never selected; a matrix without any assignment
//! avoiding them is reported as [`gedx_core::Error::Infeasible`].
//!
//! ## Example
//!
//! ```rust
//! use gedx_assignment::{solve_assignment, CostMatrix, Solver};
//!
//! let matrix = CostMatrix::from_rows(&[
//!     vec![4.0, 1.0, 3.0],
//!     vec![2.0, 0.0, 5.0],
//!     vec![3.0, 2.0, 2.0],
//! ]).unwrap();
//!
//! let hungarian = solve_assignment(&matrix, Solver::Hungarian).unwrap();
//! let vj = solve_assignment(&matrix, Solver::VolgenantJonker).unwrap();
//! assert_eq!(hungarian.total_cost(), 5.0);
//! assert_eq!(vj.total_cost(), hungarian.total_cost());
//! ```

pub mod hungarian;
pub mod jonker_volgenant;
pub mod matrix;

pub use hungarian::Hungarian;
pub use jonker_volgenant::JonkerVolgenant;
pub use matrix::{Cost, CostMatrix};

use gedx_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An assignment problem solver
pub trait AssignmentSolver {
    fn name(&self) -> &'static str;

    /// Optimal row to column permutation of `matrix`
    fn solve(&self, matrix: &CostMatrix) -> Result<Assignment>;
}

/// Solver selection by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Solver {
    #[default]
    Hungarian,
    VolgenantJonker,
}

impl Solver {
    pub fn solve(self, matrix: &CostMatrix) -> Result<Assignment> {
        match self {
            Solver::Hungarian => Hungarian.solve(matrix),
            Solver::VolgenantJonker => JonkerVolgenant.solve(matrix),
        }
    }
}

impl FromStr for Solver {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hungarian" => Ok(Solver::Hungarian),
            "vj" | "volgenant-jonker" | "volgenantjonker" | "jonker-volgenant" => {
                Ok(Solver::VolgenantJonker)
            }
            _ => Err(Error::UnknownSolver(s.to_string())),
        }
    }
}

impl fmt::Display for Solver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Solver::Hungarian => f.write_str("hungarian"),
            Solver::VolgenantJonker => f.write_str("volgenant-jonker"),
        }
    }
}

/// Solve `matrix` with the selected solver
pub fn solve_assignment(matrix: &CostMatrix, solver: Solver) -> Result<Assignment> {
    let assignment = solver.solve(matrix)?;
    tracing::trace!(
        solver = %solver,
        size = matrix.size(),
        total_cost = assignment.total_cost(),
        "assignment solved"
    );
    Ok(assignment)
}

/// A permutation of matrix columns over rows, with its total cost
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    row_to_col: Vec<usize>,
    col_to_row: Vec<usize>,
    total_cost: f64,
}

impl Assignment {
    pub fn empty() -> Self {
        Self {
            row_to_col: Vec::new(),
            col_to_row: Vec::new(),
            total_cost: 0.0,
        }
    }

    /// Wrap a row to column permutation, computing its cost on `matrix`.
    ///
    /// Fails if the permutation has the wrong length, repeats a column or
    /// selects a forbidden cell.
    pub fn from_rows(matrix: &CostMatrix, row_to_col: Vec<usize>) -> Result<Self> {
        let n = matrix.size();
        if row_to_col.len() != n {
            return Err(Error::AssignmentSize {
                expected: n,
                actual: row_to_col.len(),
            });
        }

        let mut col_to_row = vec![usize::MAX; n];
        let mut total_cost = 0.0;
        for (row, &col) in row_to_col.iter().enumerate() {
            if col >= n || col_to_row[col] != usize::MAX {
                return Err(Error::Infeasible(format!(
                    "row {row} maps to column {col}, which is out of range or taken"
                )));
            }
            col_to_row[col] = row;
            match matrix.get(row, col) {
                Cost::Finite(c) => total_cost += c,
                Cost::Forbidden => {
                    return Err(Error::Infeasible(format!(
                        "row {row} is assigned to forbidden column {col}"
                    )))
                }
            }
        }

        Ok(Self {
            row_to_col,
            col_to_row,
            total_cost,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.row_to_col.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.row_to_col.is_empty()
    }

    #[inline]
    pub fn total_cost(&self) -> f64 {
        self.total_cost
    }

    #[inline]
    pub fn row_to_col(&self) -> &[usize] {
        &self.row_to_col
    }

    #[inline]
    pub fn col_to_row(&self) -> &[usize] {
        &self.col_to_row
    }

    #[inline]
    pub fn column_for(&self, row: usize) -> usize {
        self.row_to_col[row]
    }

    #[inline]
    pub fn row_for(&self, col: usize) -> usize {
        self.col_to_row[col]
    }

    /// `(row, column)` pairs in row order
    pub fn pairs(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.row_to_col.iter().copied().enumerate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solver_names() {
        assert_eq!("hungarian".parse::<Solver>().unwrap(), Solver::Hungarian);
        assert_eq!("VJ".parse::<Solver>().unwrap(), Solver::VolgenantJonker);
        let err = "munkres".parse::<Solver>().unwrap_err();
        assert!(matches!(err, Error::UnknownSolver(_)));
        assert_eq!(Solver::VolgenantJonker.to_string(), "volgenant-jonker");
    }

    #[test]
    fn test_from_rows_validates() {
        let m = CostMatrix::from_rows(&[vec![1.0, f64::INFINITY], vec![2.0, 3.0]]).unwrap();
        let a = Assignment::from_rows(&m, vec![0, 1]).unwrap();
        assert_eq!(a.total_cost(), 4.0);
        assert_eq!(a.row_for(1), 1);
        assert_eq!(a.pairs().collect::<Vec<_>>(), vec![(0, 0), (1, 1)]);

        assert!(Assignment::from_rows(&m, vec![1, 0]).is_err());
        assert!(Assignment::from_rows(&m, vec![0, 0]).is_err());
        assert!(matches!(
            Assignment::from_rows(&m, vec![0]),
            Err(Error::AssignmentSize { expected: 2, actual: 1 })
        ));
    }

    #[test]
    fn test_solvers_agree_with_ties() {
        let m = CostMatrix::from_rows(&[
            vec![1.0, 1.0, 2.0, 0.0],
            vec![1.0, 1.0, 0.0, 2.0],
            vec![0.0, 2.0, 1.0, 1.0],
            vec![2.0, 0.0, 1.0, 1.0],
        ])
        .unwrap();
        let hu = solve_assignment(&m, Solver::Hungarian).unwrap();
        let vj = solve_assignment(&m, Solver::VolgenantJonker).unwrap();
        assert_eq!(hu.total_cost(), 0.0);
        assert_eq!(vj.total_cost(), 0.0);
    }
}
