//! loss::scaled — per-dimension gradient loss weights and the combined loss.
//!
//! Purpose
//! -------
//! Balance the gradient term of a differential training loss so that input
//! directions with naturally large derivatives do not dominate it. Weights are
//! the reciprocal root-mean-square of each scaled gradient column:
//!
//! `w_j = 1 / sqrt(mean_i(dydx[i, j]²))`.
//!
//! Key behaviors
//! -------------
//! - [`ScaledLossWeights::calibrate`] derives the weights once from gradients
//!   that have already been pushed through the chosen preprocessing transform.
//! - [`ScaledLossWeights::scaled_mse`] evaluates `mean(((t − p) · w)²)`.
//! - [`DifferentialLoss`] mixes the value MSE and the weighted gradient MSE
//!   with a fixed `α`: `α · mse(y) + (1 − α) · scaled_mse(dydx)`.
//!
//! Invariants & assumptions
//! ------------------------
//! - Weights are read-only after calibration and tied to one transform and one
//!   dataset; recalibrate whenever either changes.
//! - A zero-magnitude column carries no gradient signal and gets weight 0
//!   (with a `tracing::warn!`); only a non-finite mean square is an error.
use crate::loss::errors::{LossError, LossResult};
use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

/// Per-dimension multiplicative weights for the gradient loss.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScaledLossWeights {
    weights: Array1<f64>,
}

impl ScaledLossWeights {
    /// Calibrate weights from transform-space gradient labels.
    ///
    /// Parameters
    /// ----------
    /// - `dydx_scaled`: `samples × dims` gradients already mapped into the
    ///   output space of the preprocessing transform.
    ///
    /// Errors
    /// ------
    /// - `LossError::EmptyGradients` when there are no rows.
    /// - `LossError::DegenerateGradientScale { index }` for the first column
    ///   whose mean square is not finite.
    ///
    /// Notes
    /// -----
    /// - A column whose mean square is zero gets weight `0`: it has no
    ///   gradient signal to balance, and its squared error is dropped from
    ///   the weighted loss.
    pub fn calibrate(dydx_scaled: ArrayView2<'_, f64>) -> LossResult<Self> {
        let Some(mean_sq) = dydx_scaled.mapv(|g| g * g).mean_axis(Axis(0)) else {
            return Err(LossError::EmptyGradients);
        };
        if let Some(index) = mean_sq.iter().position(|ms| !ms.is_finite()) {
            return Err(LossError::DegenerateGradientScale { index });
        }
        let zero_columns: Vec<usize> =
            mean_sq.iter().enumerate().filter(|&(_, &ms)| ms == 0.0).map(|(j, _)| j).collect();
        if !zero_columns.is_empty() {
            tracing::warn!(
                columns = ?zero_columns,
                "gradient columns with zero magnitude get loss weight 0"
            );
        }
        let weights = mean_sq.mapv(|ms| if ms > 0.0 { 1.0 / ms.sqrt() } else { 0.0 });
        Ok(ScaledLossWeights { weights })
    }

    /// Build weights directly, e.g. when restoring persisted statistics.
    pub fn from_weights(weights: Array1<f64>) -> Self {
        ScaledLossWeights { weights }
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Weighted mean squared error `mean(((t − p) · w)²)` over all entries.
    pub fn scaled_mse(
        &self, dydx_true: ArrayView2<'_, f64>, dydx_pred: ArrayView2<'_, f64>,
    ) -> LossResult<f64> {
        if dydx_true.dim() != dydx_pred.dim() {
            return Err(LossError::ShapeMismatch {
                expected: dydx_true.dim(),
                found: dydx_pred.dim(),
            });
        }
        if dydx_true.ncols() != self.weights.len() {
            return Err(LossError::ShapeMismatch {
                expected: (dydx_true.nrows(), self.weights.len()),
                found: dydx_true.dim(),
            });
        }
        if dydx_true.is_empty() {
            return Err(LossError::EmptyGradients);
        }
        let weighted = (&dydx_true - &dydx_pred) * &self.weights;
        finite(weighted.mapv(|r| r * r).mean().unwrap_or(f64::NAN))
    }
}

/// Breakdown of a [`DifferentialLoss`] evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LossBreakdown {
    /// Plain MSE on the scalar target.
    pub value: f64,
    /// Weighted MSE on the gradient labels.
    pub gradient: f64,
    /// `α · value + (1 − α) · gradient`.
    pub total: f64,
}

/// Value-plus-gradient training loss with calibrated gradient weights.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DifferentialLoss {
    alpha: f64,
    weights: ScaledLossWeights,
}

impl DifferentialLoss {
    /// Default value/gradient mixing weight.
    pub const DEFAULT_ALPHA: f64 = 0.5;

    pub fn new(alpha: f64, weights: ScaledLossWeights) -> LossResult<Self> {
        if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
            return Err(LossError::InvalidAlpha { alpha });
        }
        Ok(DifferentialLoss { alpha, weights })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn weights(&self) -> &ScaledLossWeights {
        &self.weights
    }

    /// Evaluate the combined loss on transform-space targets and gradients.
    pub fn evaluate(
        &self, y_true: ArrayView1<'_, f64>, y_pred: ArrayView1<'_, f64>,
        dydx_true: ArrayView2<'_, f64>, dydx_pred: ArrayView2<'_, f64>,
    ) -> LossResult<LossBreakdown> {
        if y_true.len() != y_pred.len() {
            return Err(LossError::ShapeMismatch {
                expected: (y_true.len(), 1),
                found: (y_pred.len(), 1),
            });
        }
        if y_true.len() != dydx_true.nrows() {
            return Err(LossError::ShapeMismatch {
                expected: (y_true.len(), dydx_true.ncols()),
                found: dydx_true.dim(),
            });
        }
        let diff = &y_true - &y_pred;
        let value = finite(diff.mapv(|r| r * r).mean().ok_or(LossError::EmptyGradients)?)?;
        let gradient = self.weights.scaled_mse(dydx_true, dydx_pred)?;
        let total = self.alpha * value + (1.0 - self.alpha) * gradient;
        Ok(LossBreakdown { value, gradient, total })
    }
}

fn finite(value: f64) -> LossResult<f64> {
    if value.is_finite() { Ok(value) } else { Err(LossError::NonFiniteLoss { value }) }
}
