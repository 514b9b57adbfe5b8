//! Differential training data containers.
//!
//! Purpose
//! -------
//! Provide a small, validated container for the three parallel arrays that
//! make up a differential dataset: inputs `x`, scalar targets `y` and gradient
//! labels `dydx = ∂y/∂x`. Centralizing validation here lets every transform
//! assume clean, consistently shaped data.
//!
//! Invariants & assumptions
//! ------------------------
//! - `x` and `dydx` are `m × n` with `m ≥ 1` and `n ≥ 1`.
//! - `y.len() == m`.
//! - Every entry of `x`, `y` and `dydx` is finite.
//!
//! Testing notes
//! -------------
//! - Unit tests cover the happy path and each rejection branch of
//!   [`RawDataset::new`].
use crate::preprocessing::errors::{PreprocessError, PreprocessResult};
use ndarray::{Array1, Array2, ArrayView2};

/// `RawDataset` — validated inputs, targets and gradient labels in raw units.
///
/// Fields
/// ------
/// - `x`: `m × n` input features.
/// - `y`: length-`m` scalar targets.
/// - `dydx`: `m × n` gradients of `y` with respect to `x`.
///
/// Notes
/// -----
/// - Fields are private so the invariants established by [`RawDataset::new`]
///   cannot be broken afterwards; use the accessors or [`RawDataset::into_parts`].
#[derive(Debug, Clone, PartialEq)]
pub struct RawDataset {
    x: Array2<f64>,
    y: Array1<f64>,
    dydx: Array2<f64>,
}

impl RawDataset {
    /// Construct a validated [`RawDataset`].
    ///
    /// Errors
    /// ------
    /// - `PreprocessError::EmptyDataset` if `x` has no rows.
    /// - `PreprocessError::NoFeatures` if `x` has no columns.
    /// - `PreprocessError::TargetLengthMismatch` if `y.len() != x.nrows()`.
    /// - `PreprocessError::GradientShapeMismatch` if `dydx.dim() != x.dim()`.
    /// - `PreprocessError::NonFiniteData` for the first NaN/±inf entry, scanning
    ///   `x`, then `y`, then `dydx`.
    ///
    /// Examples
    /// --------
    /// ```rust
    /// # use ndarray::array;
    /// # use rust_diffml::preprocessing::data::RawDataset;
    /// let data = RawDataset::new(
    ///     array![[1.0, 2.0], [3.0, 4.0]],
    ///     array![0.5, 1.5],
    ///     array![[1.0, 0.0], [1.0, 0.0]],
    /// )
    /// .unwrap();
    /// assert_eq!(data.n_samples(), 2);
    /// assert_eq!(data.n_features(), 2);
    /// ```
    pub fn new(x: Array2<f64>, y: Array1<f64>, dydx: Array2<f64>) -> PreprocessResult<Self> {
        if x.nrows() == 0 {
            return Err(PreprocessError::EmptyDataset);
        }
        if x.ncols() == 0 {
            return Err(PreprocessError::NoFeatures);
        }
        if y.len() != x.nrows() {
            return Err(PreprocessError::TargetLengthMismatch {
                expected: x.nrows(),
                actual: y.len(),
            });
        }
        if dydx.dim() != x.dim() {
            return Err(PreprocessError::GradientShapeMismatch {
                expected: x.dim(),
                found: dydx.dim(),
            });
        }

        check_finite("x", x.view())?;
        if let Some((row, &value)) = y.iter().enumerate().find(|(_, v)| !v.is_finite()) {
            return Err(PreprocessError::NonFiniteData { array: "y", row, col: 0, value });
        }
        check_finite("dydx", dydx.view())?;

        Ok(RawDataset { x, y, dydx })
    }

    pub fn x(&self) -> &Array2<f64> {
        &self.x
    }

    pub fn y(&self) -> &Array1<f64> {
        &self.y
    }

    pub fn dydx(&self) -> &Array2<f64> {
        &self.dydx
    }

    /// Number of samples `m`.
    pub fn n_samples(&self) -> usize {
        self.x.nrows()
    }

    /// Number of input features `n`.
    pub fn n_features(&self) -> usize {
        self.x.ncols()
    }

    pub fn into_parts(self) -> (Array2<f64>, Array1<f64>, Array2<f64>) {
        (self.x, self.y, self.dydx)
    }
}

/// Inputs, targets and gradients expressed in a transform's output space.
///
/// `x` and `dydx` have `output_dim()` columns, which may be fewer than the raw
/// feature count under differential PCA.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledDataset {
    pub x: Array2<f64>,
    pub y: Array1<f64>,
    pub dydx: Array2<f64>,
}

fn check_finite(array: &'static str, a: ArrayView2<'_, f64>) -> PreprocessResult<()> {
    match a.indexed_iter().find(|(_, v)| !v.is_finite()) {
        Some(((row, col), &value)) => {
            Err(PreprocessError::NonFiniteData { array, row, col, value })
        }
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover construction behavior of `RawDataset::new`:
    // - shape agreement between `x`, `y` and `dydx`,
    // - non-empty samples and features,
    // - finiteness of every entry.
    // -------------------------------------------------------------------------

    #[test]
    fn new_returns_ok_for_consistent_finite_arrays() {
        let x = array![[1.0, 2.0], [3.0, 4.0], [5.0, 6.0]];
        let y = array![1.0, 2.0, 3.0];
        let dydx = array![[0.1, 0.2], [0.3, 0.4], [0.5, 0.6]];

        let data = RawDataset::new(x.clone(), y.clone(), dydx.clone()).unwrap();

        assert_eq!(data.x(), &x);
        assert_eq!(data.y(), &y);
        assert_eq!(data.dydx(), &dydx);
        assert_eq!(data.n_samples(), 3);
        assert_eq!(data.n_features(), 2);
    }

    #[test]
    fn new_rejects_empty_dataset() {
        let x = Array2::<f64>::zeros((0, 2));
        let y = Array1::<f64>::zeros(0);
        let dydx = Array2::<f64>::zeros((0, 2));

        assert_eq!(RawDataset::new(x, y, dydx).unwrap_err(), PreprocessError::EmptyDataset);
    }

    #[test]
    fn new_rejects_zero_features() {
        let x = Array2::<f64>::zeros((3, 0));
        let y = Array1::<f64>::zeros(3);
        let dydx = Array2::<f64>::zeros((3, 0));

        assert_eq!(RawDataset::new(x, y, dydx).unwrap_err(), PreprocessError::NoFeatures);
    }

    #[test]
    // Purpose
    // -------
    // `y` must carry exactly one target per input row.
    //
    // Given
    // -----
    // - `x` with 2 rows, `y` with 3 entries.
    //
    // Expect
    // ------
    // - `TargetLengthMismatch { expected: 2, actual: 3 }`.
    fn new_rejects_target_length_mismatch() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, 2.0, 3.0];
        let dydx = array![[1.0], [1.0]];

        assert_eq!(
            RawDataset::new(x, y, dydx).unwrap_err(),
            PreprocessError::TargetLengthMismatch { expected: 2, actual: 3 }
        );
    }

    #[test]
    fn new_rejects_gradient_shape_mismatch() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![1.0, 2.0];
        let dydx = array![[1.0], [1.0]];

        assert_eq!(
            RawDataset::new(x, y, dydx).unwrap_err(),
            PreprocessError::GradientShapeMismatch { expected: (2, 2), found: (2, 1) }
        );
    }

    #[test]
    // Purpose
    // -------
    // Non-finite entries are reported with the array name and position of the
    // first offender.
    //
    // Given
    // -----
    // - A NaN-free `x` and `y`, and `dydx[1, 0] = +∞`.
    //
    // Expect
    // ------
    // - `NonFiniteData { array: "dydx", row: 1, col: 0, value: +∞ }`.
    fn new_rejects_non_finite_gradient() {
        let x = array![[1.0, 2.0], [3.0, 4.0]];
        let y = array![1.0, 2.0];
        let dydx = array![[1.0, 0.0], [f64::INFINITY, 0.0]];

        assert_eq!(
            RawDataset::new(x, y, dydx).unwrap_err(),
            PreprocessError::NonFiniteData { array: "dydx", row: 1, col: 0, value: f64::INFINITY }
        );
    }

    #[test]
    fn new_rejects_nan_target() {
        let x = array![[1.0], [2.0]];
        let y = array![1.0, f64::NAN];
        let dydx = array![[1.0], [1.0]];

        let err = RawDataset::new(x, y, dydx).unwrap_err();

        assert!(matches!(err, PreprocessError::NonFiniteData { array: "y", row: 1, .. }));
    }
}
