//! Thin wrapper around `russell_sparse`'s triplet/CSC representation and LU
//! factorization, so that no caller outside this module needs to know the
//! backing sparse format.

use crate::error::{Result, TdglError};
use num_complex::Complex64;
use russell_lab::Vector;
use russell_sparse::{CooMatrix, LinSolver, SparseMatrix as RussellSparseMatrix, Sym};

/// A sparse matrix assembled from triplets, independent of storage format.
pub struct SparseMatrix {
    rows: usize,
    cols: usize,
    triplets: Vec<(usize, usize, f64)>,
    coo: CooMatrix,
}

impl SparseMatrix {
    /// Assemble a matrix from `(row, col, value)` triplets.
    pub fn from_triplets(rows: usize, cols: usize, triplets: &[(usize, usize, f64)]) -> Result<Self> {
        let mut coo = CooMatrix::new(rows, cols, triplets.len().max(1), Sym::No)
            .map_err(|e| TdglError::InvalidOperator(format!("failed to allocate matrix: {}", e)))?;
        for &(r, c, v) in triplets {
            coo.put(r, c, v)
                .map_err(|e| TdglError::InvalidOperator(format!("failed to insert entry: {}", e)))?;
        }
        Ok(Self {
            rows,
            cols,
            triplets: triplets.to_vec(),
            coo,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn triplets(&self) -> &[(usize, usize, f64)] {
        &self.triplets
    }

    /// Matrix-vector product, used for the (comparatively small)
    /// gradient/divergence/Neumann operators that are applied but never
    /// factorized.
    pub fn matvec(&self, x: &[f64]) -> Result<Vec<f64>> {
        assert_eq!(x.len(), self.cols, "matvec operand length mismatch");
        let mut out = vec![0.0; self.rows];
        for &(r, c, v) in &self.triplets {
            out[r] += v * x[c];
        }
        Ok(out)
    }

    /// Factorize this matrix once via sparse LU; the result can be used to
    /// solve for many right-hand sides without refactorizing.
    pub fn factorize(self) -> Result<SparseSolver> {
        let mut solver = LinSolver::new(russell_sparse::Genie::Umfpack)
            .map_err(|e| TdglError::SolveFailure {
                step: 0,
                reason: format!("failed to create solver: {}", e),
            })?;
        let mut matrix = RussellSparseMatrix::from_coo(self.coo);
        solver
            .actual
            .factorize(&mut matrix, None)
            .map_err(|e| TdglError::SolveFailure {
                step: 0,
                reason: format!("factorization failed: {}", e),
            })?;
        Ok(SparseSolver { solver, matrix })
    }
}

/// A factorized Poisson-type system, ready for repeated solves against
/// different right-hand sides.
pub struct SparseSolver {
    solver: LinSolver,
    matrix: RussellSparseMatrix,
}

impl SparseSolver {
    pub fn solve(&mut self, rhs: &[f64]) -> Result<Vec<f64>> {
        let mut x = Vector::new(rhs.len());
        let b = Vector::from(rhs);
        self.solver
            .actual
            .solve(&mut x, &self.matrix, &b, false)
            .map_err(|e| TdglError::SolveFailure {
                step: 0,
                reason: format!("solve failed: {}", e),
            })?;
        Ok((0..x.dim()).map(|i| x[i]).collect())
    }
}

/// Triplet accumulator shared by the operator-assembly routines.
#[derive(Default)]
pub struct Triplets {
    entries: Vec<(usize, usize, f64)>,
}

impl Triplets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: usize, col: usize, value: f64) {
        self.entries.push((row, col, value));
    }

    pub fn into_matrix(self, rows: usize, cols: usize) -> Result<SparseMatrix> {
        SparseMatrix::from_triplets(rows, cols, &self.entries)
    }

    /// Drop every existing entry in `row` and replace it with a single
    /// `value` at `(row, row)`. Used to impose Dirichlet fixation.
    pub fn zero_row_and_set_diagonal(&mut self, row: usize, value: f64) {
        self.entries.retain(|&(r, _, _)| r != row);
        self.entries.push((row, row, value));
    }

    pub fn zero_row(&mut self, row: usize) {
        self.entries.retain(|&(r, _, _)| r != row);
    }
}

/// Complex-valued counterpart of [`Triplets`]/[`SparseMatrix`], for the
/// link-phase-carrying psi operators. These are only ever applied, never
/// factorized, so no `russell_sparse` backing is needed.
#[derive(Default)]
pub struct ComplexTriplets {
    entries: Vec<(usize, usize, Complex64)>,
}

impl ComplexTriplets {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, row: usize, col: usize, value: Complex64) {
        self.entries.push((row, col, value));
    }

    pub fn zero_row_and_set_diagonal(&mut self, row: usize, value: Complex64) {
        self.entries.retain(|&(r, _, _)| r != row);
        self.entries.push((row, row, value));
    }

    pub fn into_matrix(self, rows: usize, cols: usize) -> ComplexSparseMatrix {
        ComplexSparseMatrix {
            rows,
            cols,
            entries: self.entries,
        }
    }
}

pub struct ComplexSparseMatrix {
    rows: usize,
    cols: usize,
    entries: Vec<(usize, usize, Complex64)>,
}

impl ComplexSparseMatrix {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn matvec(&self, x: &[Complex64]) -> Vec<Complex64> {
        assert_eq!(x.len(), self.cols, "matvec operand length mismatch");
        let mut out = vec![Complex64::new(0.0, 0.0); self.rows];
        for &(r, c, v) in &self.entries {
            out[r] += v * x[c];
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matvec_applies_identity() {
        let triplets = [(0, 0, 1.0), (1, 1, 1.0)];
        let m = SparseMatrix::from_triplets(2, 2, &triplets).unwrap();
        let result = m.matvec(&[3.0, 4.0]).unwrap();
        assert_eq!(result, vec![3.0, 4.0]);
    }

    #[test]
    fn dirichlet_row_overwrite_keeps_only_diagonal() {
        let mut t = Triplets::new();
        t.push(0, 0, -2.0);
        t.push(0, 1, 1.0);
        t.push(1, 0, 1.0);
        t.push(1, 1, -2.0);
        t.zero_row_and_set_diagonal(0, 1.0);
        let m = t.into_matrix(2, 2).unwrap();
        let result = m.matvec(&[5.0, 7.0]).unwrap();
        assert_eq!(result[0], 5.0);
    }
}
