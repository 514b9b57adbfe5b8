//! preprocessing::eigen — thresholded symmetric eigendecomposition.
//!
//! Purpose
//! -------
//! Decompose a symmetric positive-semidefinite `d × d` matrix and keep only
//! the eigen directions whose eigenvalue exceeds `τ²`. This is the filtering
//! primitive behind both orthogonalization steps of the differential PCA.
//!
//! Key behaviors
//! -------------
//! - Copy the `ndarray` input into a `nalgebra::DMatrix` and call
//!   `symmetric_eigen`.
//! - Order eigenpairs by ascending eigenvalue (nalgebra does not sort), then
//!   drop every pair with `λ ≤ τ²`.
//! - Fail with `PreprocessError::DegenerateInput` when nothing survives.
//!
//! Invariants & assumptions
//! ------------------------
//! - The input is treated as symmetric; only its lower triangle is read by the
//!   solver.
//! - Retained eigenvectors are orthonormal columns of the returned matrix and
//!   appear in the same (ascending) order as the retained eigenvalues.
//! - Entries are finite; callers validate data before forming the matrix.
use crate::{
    preprocessing::errors::{FilterStage, PreprocessError, PreprocessResult},
    utils::to_dmatrix,
};
use ndarray::{Array1, Array2};

/// Retained eigenpairs of a thresholded decomposition.
///
/// Fields
/// ------
/// - `eigenvalues`: length-`k` retained eigenvalues, ascending, all `> τ²`.
/// - `eigenvectors`: `d × k` matrix whose column `c` pairs with
///   `eigenvalues[c]`.
/// - `discarded`: number of directions removed by the threshold (`d − k`).
#[derive(Debug, Clone, PartialEq)]
pub struct EigenFilter {
    pub eigenvalues: Array1<f64>,
    pub eigenvectors: Array2<f64>,
    pub discarded: usize,
}

impl EigenFilter {
    /// Number of retained directions `k`.
    pub fn retained(&self) -> usize {
        self.eigenvalues.len()
    }
}

/// eigen_filter — keep eigen directions with eigenvalue above `threshold²`.
///
/// Parameters
/// ----------
/// - `matrix`: `&Array2<f64>`
///   Symmetric PSD `d × d` matrix (a covariance or second-moment matrix).
/// - `threshold`: `f64`
///   Filter threshold `τ`; a direction is kept iff `λ > τ²`.
/// - `stage`: [`FilterStage`]
///   Reported in the error when every direction is filtered out.
///
/// Returns
/// -------
/// `PreprocessResult<EigenFilter>` with the retained eigenpairs in ascending
/// eigenvalue order.
///
/// Errors
/// ------
/// - `PreprocessError::NonSquareMatrix` if `matrix` is not square.
/// - `PreprocessError::DegenerateInput { stage, .. }` if no eigenvalue exceeds
///   `τ²`. Fatal for calibration: the data carries no usable signal in this
///   step.
///
/// Notes
/// -----
/// - Near-zero eigenvalues of a PSD matrix can come out slightly negative in
///   floating point; they are always below `τ²` and therefore dropped.
pub fn eigen_filter(
    matrix: &Array2<f64>, threshold: f64, stage: FilterStage,
) -> PreprocessResult<EigenFilter> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(PreprocessError::NonSquareMatrix { rows, cols });
    }

    let decomp = to_dmatrix(matrix.view()).symmetric_eigen();
    let eigenvalues = decomp.eigenvalues;
    let eigenvectors = decomp.eigenvectors;

    let mut order: Vec<usize> = (0..rows).collect();
    order.sort_by(|&a, &b| eigenvalues[a].total_cmp(&eigenvalues[b]));

    let cutoff = threshold * threshold;
    let kept: Vec<usize> = order.into_iter().filter(|&k| eigenvalues[k] > cutoff).collect();
    if kept.is_empty() {
        let largest_eigenvalue = eigenvalues.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        return Err(PreprocessError::DegenerateInput { stage, threshold, largest_eigenvalue });
    }

    tracing::debug!(
        stage = %stage,
        threshold,
        retained = kept.len(),
        discarded = rows - kept.len(),
        "eigen filter applied"
    );

    Ok(EigenFilter {
        eigenvalues: kept.iter().map(|&k| eigenvalues[k]).collect(),
        eigenvectors: Array2::from_shape_fn((rows, kept.len()), |(i, c)| {
            eigenvectors[(i, kept[c])]
        }),
        discarded: rows - kept.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Ascending ordering of retained eigenpairs.
    // - Filtering against the squared threshold.
    // - The fatal `DegenerateInput` path and the non-square guard.
    // -------------------------------------------------------------------------

    #[test]
    // Purpose
    // -------
    // Retained eigenvalues come back in ascending order with matching
    // eigenvector columns.
    //
    // Given
    // -----
    // - diag(3, 1, 2) and a tiny threshold.
    //
    // Expect
    // ------
    // - eigenvalues = [1, 2, 3]; column 0 spans e1, column 2 spans e0.
    fn eigen_filter_orders_eigenpairs_ascending() {
        let m = array![[3.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 2.0]];

        let out = eigen_filter(&m, 1e-6, FilterStage::Inputs).unwrap();

        assert_eq!(out.retained(), 3);
        assert_eq!(out.discarded, 0);
        assert_relative_eq!(out.eigenvalues[0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(out.eigenvalues[1], 2.0, epsilon = 1e-12);
        assert_relative_eq!(out.eigenvalues[2], 3.0, epsilon = 1e-12);
        assert_relative_eq!(out.eigenvectors[[1, 0]].abs(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(out.eigenvectors[[0, 2]].abs(), 1.0, epsilon = 1e-12);
    }

    #[test]
    // Purpose
    // -------
    // The cutoff is the square of the threshold, not the threshold itself.
    //
    // Given
    // -----
    // - diag(0.05, 1.0) and τ = 0.1 (τ² = 0.01 < 0.05 < τ).
    //
    // Expect
    // ------
    // - Both directions survive.
    fn eigen_filter_compares_against_squared_threshold() {
        let m = array![[0.05, 0.0], [0.0, 1.0]];

        let out = eigen_filter(&m, 0.1, FilterStage::Gradients).unwrap();

        assert_eq!(out.retained(), 2);
    }

    #[test]
    // Purpose
    // -------
    // A rank-one matrix keeps exactly one direction, aligned with its range.
    //
    // Given
    // -----
    // - v = [1, 1] / √2 and M = 2 v vᵗ.
    //
    // Expect
    // ------
    // - One retained eigenvalue ≈ 2 with eigenvector ±v; one discarded.
    fn eigen_filter_drops_null_space_of_rank_one_matrix() {
        let m = array![[1.0, 1.0], [1.0, 1.0]];

        let out = eigen_filter(&m, 1e-4, FilterStage::Inputs).unwrap();

        assert_eq!(out.retained(), 1);
        assert_eq!(out.discarded, 1);
        assert_relative_eq!(out.eigenvalues[0], 2.0, epsilon = 1e-12);
        let inv_sqrt2 = 1.0 / 2.0_f64.sqrt();
        assert_relative_eq!(out.eigenvectors[[0, 0]].abs(), inv_sqrt2, epsilon = 1e-12);
        assert_relative_eq!(out.eigenvectors[[1, 0]].abs(), inv_sqrt2, epsilon = 1e-12);
    }

    #[test]
    fn eigen_filter_fails_when_every_direction_is_below_threshold() {
        let m = array![[1e-10, 0.0], [0.0, 1e-12]];

        let err = eigen_filter(&m, 1e-4, FilterStage::Gradients).unwrap_err();

        match err {
            PreprocessError::DegenerateInput { stage, threshold, largest_eigenvalue } => {
                assert_eq!(stage, FilterStage::Gradients);
                assert_eq!(threshold, 1e-4);
                assert_relative_eq!(largest_eigenvalue, 1e-10, epsilon = 1e-20);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn eigen_filter_rejects_non_square_matrix() {
        let m = Array2::<f64>::zeros((2, 3));

        assert_eq!(
            eigen_filter(&m, 1e-4, FilterStage::Inputs).unwrap_err(),
            PreprocessError::NonSquareMatrix { rows: 2, cols: 3 }
        );
    }
}
