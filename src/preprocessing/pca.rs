//! preprocessing::pca — differential principal-component analysis.
//!
//! Purpose
//! -------
//! Jointly orthogonalize and filter input features and their gradient labels.
//! Two sequential eigen-filter steps reduce the raw feature space:
//!
//! 1. **Input step.** Center `x` and whiten it along the retained eigen
//!    directions of its covariance `C = x1ᵗx1 / m`. Redundant or constant
//!    inputs fall below `τx²` and are dropped.
//! 2. **Gradient step.** Carry the gradients into the whitened space with the
//!    chain rule and rotate onto the retained eigen directions of their second
//!    moment `G = x2barᵗx2bar / m`. Directions the target does not depend on
//!    fall below `τdx²` and are dropped.
//!
//! Notation (row-vector convention, one sample per row)
//! ----------------------------------------------------
//! - `x1 = x − μx`, `dx1 = dydx / σy`.
//! - `P̃, D̃`: retained eigenvectors/eigenvalues of `C`.
//! - `Q̃`: retained eigenvectors of `G`.
//! - `x1→x3 = P̃ D̃^{-1/2} Q̃`, `x1bar→x3bar = P̃ D̃^{1/2} Q̃`.
//! - `x3bar→x1bar = Q̃ᵗ D̃^{-1/2} P̃ᵗ`, `x3→x1 = Q̃ᵗ D̃^{1/2} P̃ᵗ`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `output_dim() ≤ input_dim()`, with equality iff neither step filters.
//! - `forward_gradient(inverse_gradient(g3)) == g3` for every `g3` in the
//!   output space; `inverse_gradient(forward_gradient(g)) == g` when nothing
//!   was filtered.
//! - Targets round-trip exactly: `ỹ = (y − μy) / σy`.
//! - The input map is lossy; the trait never reconstructs inputs.
//!   [`DifferentialPca::reconstruct_input`] projects back through the
//!   retained subspace only.
use crate::{
    preprocessing::{
        data::RawDataset,
        eigen::eigen_filter,
        errors::{FilterStage, PreprocessError, PreprocessResult, ScaleQuantity},
        options::PcaThresholds,
        transform::{Scaler, check_features},
    },
    utils::{column_moments, gram, is_degenerate_scale, max_abs, moments},
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Calibrated differential PCA.
///
/// Holds the centering statistics, the retained eigenvalues of both steps
/// and the four composed linear maps between raw (`x1`, `x1bar`) and reduced
/// (`x3`, `x3bar`) spaces.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DifferentialPca {
    thresholds: PcaThresholds,
    x_mean: Array1<f64>,
    y_mean: f64,
    y_std: f64,
    input_eigenvalues: Array1<f64>,
    gradient_eigenvalues: Array1<f64>,
    x1_to_x3: Array2<f64>,
    x3_to_x1: Array2<f64>,
    x1bar_to_x3bar: Array2<f64>,
    x3bar_to_x1bar: Array2<f64>,
}

impl DifferentialPca {
    /// Thresholds the transform was calibrated with.
    pub fn thresholds(&self) -> PcaThresholds {
        self.thresholds
    }

    pub fn x_mean(&self) -> &Array1<f64> {
        &self.x_mean
    }

    pub fn y_mean(&self) -> f64 {
        self.y_mean
    }

    pub fn y_std(&self) -> f64 {
        self.y_std
    }

    /// Retained eigenvalues of the input covariance, ascending.
    pub fn input_eigenvalues(&self) -> &Array1<f64> {
        &self.input_eigenvalues
    }

    /// Retained eigenvalues of the whitened gradient second moment, ascending.
    pub fn gradient_eigenvalues(&self) -> &Array1<f64> {
        &self.gradient_eigenvalues
    }

    /// `n_input × n3` map applied to centered inputs.
    pub fn input_map(&self) -> &Array2<f64> {
        &self.x1_to_x3
    }

    /// `n_input × n3` map applied to gradients of the standardized target.
    pub fn gradient_map(&self) -> &Array2<f64> {
        &self.x1bar_to_x3bar
    }

    /// `n3 × n_input` left inverse of [`Self::gradient_map`] on its range.
    pub fn inverse_gradient_map(&self) -> &Array2<f64> {
        &self.x3bar_to_x1bar
    }

    /// reconstruct_input — map reduced coordinates back to raw input space.
    ///
    /// Parameters
    /// ----------
    /// - `x3`: `ArrayView2<f64>`
    ///   `samples × n3` matrix in the transform's output space.
    ///
    /// Returns
    /// -------
    /// `samples × n_input` raw-space points lying in the retained affine
    /// subspace `μx + span(x3→x1)`. Filtered directions come back as zero
    /// offsets from the mean, so `forward_input(reconstruct_input(z)) == z`
    /// but `reconstruct_input(forward_input(x)) != x` in general.
    ///
    /// Errors
    /// ------
    /// - `PreprocessError::FeatureDimMismatch` if `x3` does not have
    ///   `output_dim()` columns.
    pub fn reconstruct_input(&self, x3: ArrayView2<'_, f64>) -> PreprocessResult<Array2<f64>> {
        check_features(x3.ncols(), self.output_dim())?;
        Ok(x3.dot(&self.x3_to_x1) + &self.x_mean)
    }
}

impl Scaler for DifferentialPca {
    type Config = PcaThresholds;

    /// Errors
    /// ------
    /// - `DegenerateScale { quantity: Target, .. }` if `y` is constant.
    /// - `DegenerateInput { stage: Inputs, .. }` if every input direction is
    ///   filtered (constant inputs).
    /// - `DegenerateInput { stage: Gradients, .. }` if every gradient
    ///   direction is filtered (target insensitive to the inputs).
    fn calibrate(data: &RawDataset, thresholds: &PcaThresholds) -> PreprocessResult<Self> {
        let (y_mean, y_std) = moments(data.y().view());
        if is_degenerate_scale(y_std, max_abs(data.y().view())) {
            return Err(PreprocessError::DegenerateScale {
                quantity: ScaleQuantity::Target,
                index: 0,
            });
        }

        let (x_mean, _) = column_moments(data.x().view());
        let x1 = data.x() - &x_mean;
        let dx1 = data.dydx() / y_std;

        // Input step: whiten along retained principal directions.
        let inputs = eigen_filter(&gram(x1.view()), thresholds.inputs(), FilterStage::Inputs)?;
        let sqrt_d = inputs.eigenvalues.mapv(f64::sqrt);
        let x1_to_x2 = &inputs.eigenvectors / &sqrt_d;
        let x1bar_to_x2bar = &inputs.eigenvectors * &sqrt_d;

        // Gradient step: rotate onto directions the target varies along.
        let x2bar = dx1.dot(&x1bar_to_x2bar);
        let gradients =
            eigen_filter(&gram(x2bar.view()), thresholds.gradients(), FilterStage::Gradients)?;
        let q = &gradients.eigenvectors;

        let x1_to_x3 = x1_to_x2.dot(q);
        let x1bar_to_x3bar = x1bar_to_x2bar.dot(q);
        let x3_to_x1 = q.t().dot(&x1bar_to_x2bar.t());
        let x3bar_to_x1bar = q.t().dot(&x1_to_x2.t());

        tracing::debug!(
            n_input = data.n_features(),
            after_inputs = inputs.retained(),
            after_gradients = gradients.retained(),
            "differential PCA reduced feature space"
        );

        Ok(DifferentialPca {
            thresholds: *thresholds,
            x_mean,
            y_mean,
            y_std,
            input_eigenvalues: inputs.eigenvalues,
            gradient_eigenvalues: gradients.eigenvalues,
            x1_to_x3,
            x3_to_x1,
            x1bar_to_x3bar,
            x3bar_to_x1bar,
        })
    }

    fn input_dim(&self) -> usize {
        self.x_mean.len()
    }

    fn output_dim(&self) -> usize {
        self.x1_to_x3.ncols()
    }

    fn forward_input(&self, x: ArrayView2<'_, f64>) -> PreprocessResult<Array2<f64>> {
        check_features(x.ncols(), self.input_dim())?;
        Ok((&x - &self.x_mean).dot(&self.x1_to_x3))
    }

    fn forward_target(&self, y: ArrayView1<'_, f64>) -> Array1<f64> {
        y.mapv(|v| (v - self.y_mean) / self.y_std)
    }

    fn forward_gradient(&self, dydx: ArrayView2<'_, f64>) -> PreprocessResult<Array2<f64>> {
        check_features(dydx.ncols(), self.input_dim())?;
        Ok((&dydx / self.y_std).dot(&self.x1bar_to_x3bar))
    }

    fn inverse_target(&self, y: ArrayView1<'_, f64>) -> Array1<f64> {
        y.mapv(|v| v * self.y_std + self.y_mean)
    }

    fn inverse_gradient(&self, dydx: ArrayView2<'_, f64>) -> PreprocessResult<Array2<f64>> {
        check_features(dydx.ncols(), self.output_dim())?;
        Ok(dydx.dot(&self.x3bar_to_x1bar) * self.y_std)
    }
}
