//! preprocessing::standardize — per-feature standard normalization.
//!
//! Purpose
//! -------
//! Scale every input feature and the target to zero mean and unit variance,
//! and rescale gradient labels consistently with the chain rule:
//!
//! - `x̃ = (x − μx) / σx`
//! - `ỹ = (y − μy) / σy`
//! - `∂ỹ/∂x̃ = (∂y/∂x) · σx / σy`
//!
//! Invariants & assumptions
//! ------------------------
//! - No dimensionality change: `output_dim() == input_dim()`.
//! - Target and gradient maps are exact inverses of each other.
//! - Every `σx[j]` and `σy` is strictly positive; calibration fails with
//!   `PreprocessError::DegenerateScale` otherwise. Constant features must be
//!   removed upstream (or handled with the differential PCA, which filters
//!   them).
use crate::{
    preprocessing::{
        data::RawDataset,
        errors::{PreprocessError, PreprocessResult, ScaleQuantity},
        transform::{Scaler, check_features},
    },
    utils::{column_max_abs, column_moments, is_degenerate_scale, max_abs, moments},
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Calibrated standardization statistics.
///
/// Fields
/// ------
/// - `x_mean`, `x_std`: per-feature population mean and standard deviation.
/// - `y_mean`, `y_std`: target mean and population standard deviation.
/// - `grad_scale`: `σx / σy`, cached for the gradient maps.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StandardScaling {
    x_mean: Array1<f64>,
    x_std: Array1<f64>,
    y_mean: f64,
    y_std: f64,
    grad_scale: Array1<f64>,
}

impl StandardScaling {
    pub fn x_mean(&self) -> &Array1<f64> {
        &self.x_mean
    }

    pub fn x_std(&self) -> &Array1<f64> {
        &self.x_std
    }

    pub fn y_mean(&self) -> f64 {
        self.y_mean
    }

    pub fn y_std(&self) -> f64 {
        self.y_std
    }
}

impl Scaler for StandardScaling {
    type Config = ();

    /// Errors
    /// ------
    /// - `DegenerateScale { quantity: Feature, index }` for the first constant
    ///   input feature.
    /// - `DegenerateScale { quantity: Target, index: 0 }` if `y` is constant.
    fn calibrate(data: &RawDataset, _config: &()) -> PreprocessResult<Self> {
        let (x_mean, x_std) = column_moments(data.x().view());
        let x_magnitude = column_max_abs(data.x().view());
        let degenerate =
            x_std.iter().zip(x_magnitude.iter()).position(|(&s, &a)| is_degenerate_scale(s, a));
        if let Some(index) = degenerate {
            return Err(PreprocessError::DegenerateScale { quantity: ScaleQuantity::Feature, index });
        }
        let (y_mean, y_std) = moments(data.y().view());
        if is_degenerate_scale(y_std, max_abs(data.y().view())) {
            return Err(PreprocessError::DegenerateScale {
                quantity: ScaleQuantity::Target,
                index: 0,
            });
        }
        let grad_scale = &x_std / y_std;
        Ok(StandardScaling { x_mean, x_std, y_mean, y_std, grad_scale })
    }

    fn input_dim(&self) -> usize {
        self.x_mean.len()
    }

    fn output_dim(&self) -> usize {
        self.x_mean.len()
    }

    fn forward_input(&self, x: ArrayView2<'_, f64>) -> PreprocessResult<Array2<f64>> {
        check_features(x.ncols(), self.input_dim())?;
        Ok((&x - &self.x_mean) / &self.x_std)
    }

    fn forward_target(&self, y: ArrayView1<'_, f64>) -> Array1<f64> {
        y.mapv(|v| (v - self.y_mean) / self.y_std)
    }

    fn forward_gradient(&self, dydx: ArrayView2<'_, f64>) -> PreprocessResult<Array2<f64>> {
        check_features(dydx.ncols(), self.input_dim())?;
        Ok(&dydx * &self.grad_scale)
    }

    fn inverse_target(&self, y: ArrayView1<'_, f64>) -> Array1<f64> {
        y.mapv(|v| v * self.y_std + self.y_mean)
    }

    fn inverse_gradient(&self, dydx: ArrayView2<'_, f64>) -> PreprocessResult<Array2<f64>> {
        check_features(dydx.ncols(), self.output_dim())?;
        Ok(&dydx / &self.grad_scale)
    }
}
