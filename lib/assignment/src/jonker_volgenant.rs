//! Jonker–Volgenant shortest augmenting path algorithm
//!
//! Column reduction and reduction transfer build a cheap partial
//! assignment with column prices `v`; every row left free is then assigned
//! by a Dijkstra-like search for the shortest augmenting path over reduced
//! costs `c[i][j] - v[j]`, after which the prices of scanned columns are
//! raised so that reduced costs stay non-negative.

use crate::matrix::CostMatrix;
use crate::{Assignment, AssignmentSolver};
use gedx_core::{Error, Result};

#[derive(Debug, Clone, Copy, Default)]
pub struct JonkerVolgenant;

const UNASSIGNED: usize = usize::MAX;

impl AssignmentSolver for JonkerVolgenant {
    fn name(&self) -> &'static str {
        "volgenant-jonker"
    }

    fn solve(&self, matrix: &CostMatrix) -> Result<Assignment> {
        let n = matrix.size();
        if n == 0 {
            return Ok(Assignment::empty());
        }
        matrix.ensure_coverable()?;

        let c = |i: usize, j: usize| matrix.value(i, j);
        let mut row_sol = vec![UNASSIGNED; n];
        let mut col_sol = vec![UNASSIGNED; n];
        let mut v = vec![0.0f64; n];
        let mut matches = vec![0usize; n];

        // Column reduction: each column goes to its cheapest row; a row
        // claimed several times keeps the column with the lowest price.
        for j in (0..n).rev() {
            let mut imin = 0;
            let mut min = c(0, j);
            for i in 1..n {
                if c(i, j) < min {
                    min = c(i, j);
                    imin = i;
                }
            }
            v[j] = min;
            matches[imin] += 1;

            if matches[imin] == 1 {
                row_sol[imin] = j;
                col_sol[j] = imin;
            } else if v[j] < v[row_sol[imin]] {
                let j1 = row_sol[imin];
                row_sol[imin] = j;
                col_sol[j] = imin;
                col_sol[j1] = UNASSIGNED;
            } else {
                col_sol[j] = UNASSIGNED;
            }
        }

        // Reduction transfer from rows assigned exactly once
        let mut free_rows = Vec::new();
        for i in 0..n {
            match matches[i] {
                0 => free_rows.push(i),
                1 => {
                    let j1 = row_sol[i];
                    let min = (0..n)
                        .filter(|&j| j != j1)
                        .map(|j| c(i, j) - v[j])
                        .fold(f64::INFINITY, f64::min);
                    if min.is_finite() {
                        v[j1] -= min;
                    }
                }
                _ => {}
            }
        }

        // Augmentation
        let mut d = vec![0.0f64; n];
        let mut pred = vec![0usize; n];
        let mut col_list: Vec<usize> = (0..n).collect();

        for &free_row in &free_rows {
            for j in 0..n {
                d[j] = c(free_row, j) - v[j];
                pred[j] = free_row;
                col_list[j] = j;
            }

            // col_list[..low] scanned, [low..up] at the current minimum, [up..] unscanned
            let mut low = 0usize;
            let mut up = 0usize;
            let mut min = 0.0f64;
            let end_of_path;

            'search: loop {
                if up == low {
                    min = d[col_list[up]];
                    up += 1;
                    for k in up..n {
                        let j = col_list[k];
                        let h = d[j];
                        if h <= min {
                            if h < min {
                                up = low;
                                min = h;
                            }
                            col_list[k] = col_list[up];
                            col_list[up] = j;
                            up += 1;
                        }
                    }

                    if !min.is_finite() {
                        return Err(Error::Infeasible(format!(
                            "row {free_row} cannot reach a free column through finite cells"
                        )));
                    }

                    for k in low..up {
                        if col_sol[col_list[k]] == UNASSIGNED {
                            end_of_path = col_list[k];
                            break 'search;
                        }
                    }
                }

                let j1 = col_list[low];
                low += 1;
                let i = col_sol[j1];
                let h = c(i, j1) - v[j1] - min;

                let mut k = up;
                while k < n {
                    let j = col_list[k];
                    let reduced = c(i, j) - v[j] - h;
                    if reduced < d[j] {
                        pred[j] = i;
                        if reduced == min {
                            if col_sol[j] == UNASSIGNED {
                                end_of_path = j;
                                break 'search;
                            }
                            col_list[k] = col_list[up];
                            col_list[up] = j;
                            up += 1;
                        }
                        d[j] = reduced;
                    }
                    k += 1;
                }
            }

            // Columns scanned at the final minimum have d == min and keep their price
            for &j in &col_list[..low] {
                v[j] += d[j] - min;
            }

            let mut j = end_of_path;
            loop {
                let i = pred[j];
                col_sol[j] = i;
                let next = row_sol[i];
                row_sol[i] = j;
                if i == free_row {
                    break;
                }
                j = next;
            }
        }

        Assignment::from_rows(matrix, row_sol)
    }
}
