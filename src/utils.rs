//! utils — small numerical helpers shared across modules.
//!
//! Purpose
//! -------
//! Bridge between `ndarray` (used for all data and calibration statistics)
//! and `nalgebra` (used for symmetric eigendecompositions and Cholesky
//! factorizations), and compute the per-column moments that every
//! preprocessing transform needs.
//!
//! Conventions
//! -----------
//! - Matrices are `samples × features`; moments are taken over `Axis(0)`.
//! - Standard deviations are population standard deviations (divide by `m`,
//!   not `m − 1`).
//! - Callers validate shapes (non-empty, finite) before calling in here.
use nalgebra::DMatrix;
use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Axis};

/// Copy an `ndarray` matrix into a column-major `nalgebra::DMatrix`.
pub fn to_dmatrix(a: ArrayView2<'_, f64>) -> DMatrix<f64> {
    DMatrix::from_fn(a.nrows(), a.ncols(), |i, j| a[[i, j]])
}

/// Copy a `nalgebra::DMatrix` back into an `ndarray` matrix.
pub fn from_dmatrix(m: &DMatrix<f64>) -> Array2<f64> {
    Array2::from_shape_fn((m.nrows(), m.ncols()), |(i, j)| m[(i, j)])
}

/// Per-column mean and population standard deviation of a `samples × features`
/// matrix.
///
/// Returns `(means, stds)`, both of length `a.ncols()`. An empty matrix yields
/// zero-length vectors.
pub fn column_moments(a: ArrayView2<'_, f64>) -> (Array1<f64>, Array1<f64>) {
    let Some(means) = a.mean_axis(Axis(0)) else {
        return (Array1::zeros(a.ncols()), Array1::zeros(a.ncols()));
    };
    let m = a.nrows() as f64;
    let centered = &a - &means;
    let stds = centered.mapv(|v| v * v).sum_axis(Axis(0)).mapv(|s| (s / m).sqrt());
    (means, stds)
}

/// Mean and population standard deviation of a vector.
///
/// Returns `(0.0, 0.0)` for an empty vector.
pub fn moments(v: ArrayView1<'_, f64>) -> (f64, f64) {
    if v.is_empty() {
        return (0.0, 0.0);
    }
    let n = v.len() as f64;
    let mean = v.sum() / n;
    let var = v.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Largest absolute entry of a vector; `0.0` when empty.
pub fn max_abs(v: ArrayView1<'_, f64>) -> f64 {
    v.fold(0.0, |acc, &x| acc.max(x.abs()))
}

/// Per-column largest absolute entry of a `samples × features` matrix.
pub fn column_max_abs(a: ArrayView2<'_, f64>) -> Array1<f64> {
    a.fold_axis(Axis(0), 0.0, |&acc, &x| acc.max(x.abs()))
}

/// Relative tolerance below which a standard deviation is treated as zero.
pub const SCALE_EPS: f64 = 1e-12;

/// True when `std` is too small, relative to the magnitude of the data it was
/// computed from, to be used as a divisor.
///
/// `magnitude` is the largest absolute value of the column (see
/// [`max_abs`]). The comparison carries no absolute floor, so columns
/// expressed in very small units keep their spread. A non-finite `std`
/// and an all-zero column are both degenerate.
pub fn is_degenerate_scale(std: f64, magnitude: f64) -> bool {
    !(std > SCALE_EPS * magnitude)
}

/// Gram matrix `aᵗa / m` of a `samples × features` matrix.
pub fn gram(a: ArrayView2<'_, f64>) -> Array2<f64> {
    let m = a.nrows().max(1) as f64;
    a.t().dot(&a) / m
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use ndarray::array;

    #[test]
    // Purpose
    // -------
    // Copying into a `DMatrix` and back preserves every entry, including for
    // non-square shapes where row/column-major ordering would be exposed.
    fn dmatrix_bridge_round_trips_rectangular_matrix() {
        let a = array![[1.0, 2.0, 3.0], [4.0, 5.0, 6.0]];

        let m = to_dmatrix(a.view());

        assert_eq!(m.nrows(), 2);
        assert_eq!(m.ncols(), 3);
        assert_eq!(m[(1, 0)], 4.0);
        assert_eq!(from_dmatrix(&m), a);
    }

    #[test]
    // Purpose
    // -------
    // Column moments use population (divide-by-m) standard deviations.
    //
    // Given
    // -----
    // - Column 0 = [1, 3] (mean 2, population std 1).
    // - Column 1 = [5, 5] (constant).
    //
    // Expect
    // ------
    // - means = [2, 5], stds = [1, 0].
    fn column_moments_returns_population_std() {
        let a = array![[1.0, 5.0], [3.0, 5.0]];

        let (means, stds) = column_moments(a.view());

        assert_relative_eq!(means[0], 2.0);
        assert_relative_eq!(means[1], 5.0);
        assert_relative_eq!(stds[0], 1.0);
        assert_eq!(stds[1], 0.0);
    }

    #[test]
    fn moments_of_empty_vector_are_zero() {
        let v: Array1<f64> = array![];
        assert_eq!(moments(v.view()), (0.0, 0.0));
    }

    #[test]
    // Purpose
    // -------
    // A constant column whose mean is not exactly representable still counts
    // as degenerate, while a genuinely small spread does not.
    fn is_degenerate_scale_uses_relative_tolerance() {
        let a = array![[0.1], [0.1], [0.1]];
        let (_, stds) = column_moments(a.view());

        assert!(is_degenerate_scale(stds[0], column_max_abs(a.view())[0]));
        assert!(is_degenerate_scale(0.0, 0.0));
        assert!(is_degenerate_scale(f64::NAN, 1.0));
        assert!(!is_degenerate_scale(1e-6, 5.0));
    }

    #[test]
    // Purpose
    // -------
    // The tolerance scales with the column itself, so features measured in
    // tiny units are not mistaken for constants.
    //
    // Given
    // -----
    // - Column [1e-13, -2e-13, 3e-13, 0] (std ~1.9e-13, max |x| = 3e-13).
    //
    // Expect
    // ------
    // - Not degenerate.
    // - max_abs and column_max_abs agree on the largest magnitude.
    fn is_degenerate_scale_accepts_tiny_unit_column() {
        let a = array![[1e-13], [-2e-13], [3e-13], [0.0]];
        let (_, stds) = column_moments(a.view());
        let magnitude = column_max_abs(a.view())[0];

        assert_eq!(magnitude, 3e-13);
        assert_eq!(max_abs(a.column(0)), magnitude);
        assert!(!is_degenerate_scale(stds[0], magnitude));
    }

    #[test]
    // Purpose
    // -------
    // `gram` averages the outer products of the rows.
    fn gram_matches_hand_computed_second_moment() {
        let a = array![[1.0, 0.0], [1.0, 2.0]];

        let g = gram(a.view());

        // aᵗa = [[2, 2], [2, 4]], divided by m = 2.
        assert_eq!(g, array![[1.0, 1.0], [1.0, 2.0]]);
    }
}
