//! Hungarian algorithm (Kuhn–Munkres) with row/column potentials
//!
//! O(n³): rows are inserted one at a time and each insertion grows a
//! shortest alternating path over reduced costs `c[i][j] - u[i] - v[j]`
//! until it reaches a free column.

use crate::matrix::CostMatrix;
use crate::{Assignment, AssignmentSolver};
use gedx_core::{Error, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct Hungarian;

impl AssignmentSolver for Hungarian {
    fn name(&self) -> &'static str {
        "hungarian"
    }

    fn solve(&self, matrix: &CostMatrix) -> Result<Assignment> {
        let n = matrix.size();
        if n == 0 {
            return Ok(Assignment::empty());
        }
        matrix.ensure_coverable()?;

        // 1-based; index 0 is a virtual column/row used as the path root
        let mut u = vec![0.0f64; n + 1];
        let mut v = vec![0.0f64; n + 1];
        let mut col_owner = vec![0usize; n + 1];
        let mut way = vec![0usize; n + 1];

        for row in 1..=n {
            col_owner[0] = row;
            let mut j0 = 0usize;
            let mut min_slack = vec![f64::INFINITY; n + 1];
            let mut used = vec![false; n + 1];

            loop {
                used[j0] = true;
                let i0 = col_owner[j0];
                let mut delta = f64::INFINITY;
                let mut j1 = 0usize;

                for j in 1..=n {
                    if used[j] {
                        continue;
                    }
                    let reduced = matrix.value(i0 - 1, j - 1) - u[i0] - v[j];
                    if reduced < min_slack[j] {
                        min_slack[j] = reduced;
                        way[j] = j0;
                    }
                    if min_slack[j] < delta {
                        delta = min_slack[j];
                        j1 = j;
                    }
                }

                if !delta.is_finite() {
                    return Err(Error::Infeasible(format!(
                        "row {} cannot reach a free column through finite cells",
                        row - 1
                    )));
                }

                for j in 0..=n {
                    if used[j] {
                        u[col_owner[j]] += delta;
                        v[j] -= delta;
                    } else {
                        min_slack[j] -= delta;
                    }
                }

                j0 = j1;
                if col_owner[j0] == 0 {
                    break;
                }
            }

            // Flip the alternating path back to the root
            loop {
                let j1 = way[j0];
                col_owner[j0] = col_owner[j1];
                j0 = j1;
                if j0 == 0 {
                    break;
                }
            }
        }

        let mut row_to_col = vec![0usize; n];
        for j in 1..=n {
            row_to_col[col_owner[j] - 1] = j - 1;
        }

        Assignment::from_rows(matrix, row_to_col)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::CostMatrix;

    const INF: f64 = f64::INFINITY;

    #[test]
    fn test_small_optimum() {
        let m = CostMatrix::from_rows(&[
            vec![4.0, 1.0, 3.0],
            vec![2.0, 0.0, 5.0],
            vec![3.0, 2.0, 2.0],
        ])
        .unwrap();
        let a = Hungarian.solve(&m).unwrap();
        assert_eq!(a.total_cost(), 5.0);
        assert_eq!(a.row_to_col(), &[1, 0, 2]);
    }

    #[test]
    fn test_avoids_forbidden_cells() {
        let m = CostMatrix::from_rows(&[
            vec![0.0, INF, 9.0],
            vec![INF, 0.0, INF],
            vec![1.0, INF, INF],
        ])
        .unwrap();
        let a = Hungarian.solve(&m).unwrap();
        assert_eq!(a.row_to_col(), &[2, 1, 0]);
        assert_eq!(a.total_cost(), 10.0);
    }

    #[test]
    fn test_infeasible() {
        // rows 0 and 1 both only reach column 0
        let m = CostMatrix::from_rows(&[
            vec![1.0, INF, INF],
            vec![2.0, INF, INF],
            vec![1.0, 1.0, 1.0],
        ])
        .unwrap();
        assert!(matches!(Hungarian.solve(&m), Err(Error::Infeasible(_))));
    }

    #[test]
    fn test_empty_and_single() {
        let empty = CostMatrix::from_rows::<Vec<f64>>(&[]).unwrap();
        assert_eq!(Hungarian.solve(&empty).unwrap().len(), 0);

        let single = CostMatrix::from_rows(&[vec![7.5]]).unwrap();
        let a = Hungarian.solve(&single).unwrap();
        assert_eq!(a.total_cost(), 7.5);
    }
}
