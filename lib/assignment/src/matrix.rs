//! Square cost matrix with typed forbidden cells

use gedx_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A matrix cell: either a non-negative finite cost or a cell that no
/// assignment may select.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Cost {
    Finite(f64),
    Forbidden,
}

impl Cost {
    pub const ZERO: Cost = Cost::Finite(0.0);

    /// The cost as a float, with forbidden cells read as `+inf`
    #[inline]
    pub fn value(self) -> f64 {
        match self {
            Cost::Finite(c) => c,
            Cost::Forbidden => f64::INFINITY,
        }
    }

    #[inline]
    pub fn is_forbidden(self) -> bool {
        matches!(self, Cost::Forbidden)
    }

    #[inline]
    pub fn finite(self) -> Option<f64> {
        match self {
            Cost::Finite(c) => Some(c),
            Cost::Forbidden => None,
        }
    }

    /// Checks the cell invariant: finite costs are non-negative and not NaN
    fn check(self, row: usize, col: usize) -> Result<Self> {
        match self {
            Cost::Finite(c) if c.is_nan() => Err(Error::NanCost { row, col }),
            Cost::Finite(c) if c < 0.0 => Err(Error::NegativeCost { row, col, value: c }),
            Cost::Finite(c) if c.is_infinite() => Ok(Cost::Forbidden),
            _ => Ok(self),
        }
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cost::Finite(c) => write!(f, "{c:.3}"),
            Cost::Forbidden => f.write_str("inf"),
        }
    }
}

/// Dense `n x n` assignment cost matrix, row-major
#[derive(Debug, Clone, PartialEq)]
pub struct CostMatrix {
    size: usize,
    cells: Vec<Cost>,
}

impl CostMatrix {
    /// `size x size` matrix with every cell set to `fill`
    pub fn filled(size: usize, fill: Cost) -> Self {
        Self {
            size,
            cells: vec![fill; size * size],
        }
    }

    /// Build from float rows. `+inf` marks a forbidden cell; NaN, negative
    /// values and ragged rows are rejected.
    pub fn from_rows<R>(rows: &[R]) -> Result<Self>
    where
        R: AsRef<[f64]>,
    {
        let size = rows.len();
        let mut cells = Vec::with_capacity(size * size);
        for (row, values) in rows.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != size {
                return Err(Error::NonSquareMatrix {
                    row,
                    expected: size,
                    actual: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                cells.push(Cost::Finite(value).check(row, col)?);
            }
        }
        Ok(Self { size, cells })
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Cost {
        self.cells[row * self.size + col]
    }

    /// Cell as a float, forbidden cells read as `+inf`
    #[inline]
    pub fn value(&self, row: usize, col: usize) -> f64 {
        self.get(row, col).value()
    }

    pub fn set(&mut self, row: usize, col: usize, cost: Cost) -> Result<()> {
        let cost = cost.check(row, col)?;
        self.cells[row * self.size + col] = cost;
        Ok(())
    }

    pub fn row(&self, row: usize) -> &[Cost] {
        &self.cells[row * self.size..(row + 1) * self.size]
    }

    /// Fails unless every row and every column has at least one finite cell
    pub fn ensure_coverable(&self) -> Result<()> {
        for row in 0..self.size {
            if self.row(row).iter().all(|c| c.is_forbidden()) {
                return Err(Error::Infeasible(format!("row {row} is entirely forbidden")));
            }
        }
        for col in 0..self.size {
            if (0..self.size).all(|row| self.get(row, col).is_forbidden()) {
                return Err(Error::Infeasible(format!("column {col} is entirely forbidden")));
            }
        }
        Ok(())
    }
}

impl fmt::Display for CostMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.size {
            let line: Vec<String> = self.row(row).iter().map(|c| format!("{:>8}", c.to_string())).collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        Ok(())
    }
}
