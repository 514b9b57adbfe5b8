//! loss — gradient-loss weighting for differential training.
//!
//! Purpose
//! -------
//! Provide the loss-side counterpart of preprocessing: per-dimension weights
//! that normalise the gradient term of a differential loss, plus a small
//! evaluator that mixes the value and gradient terms.
//!
//! Key behaviors
//! -------------
//! - [`ScaledLossWeights`]: calibrated once from transform-space gradients,
//!   read-only thereafter.
//! - [`DifferentialLoss`]: `α · mse(y) + (1 − α) · scaled_mse(dydx)`.
//! - [`LossError`] / [`LossResult`]: failures (overflowing columns, shape
//!   mismatches, invalid `α`).
//!
//! Downstream usage
//! ----------------
//! - The preprocessing factory calibrates a [`ScaledLossWeights`] next to each
//!   transform; training loops multiply per-dimension squared gradient errors
//!   by these weights before averaging.

pub mod errors;
pub mod scaled;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::errors::{LossError, LossResult};
pub use self::scaled::{DifferentialLoss, LossBreakdown, ScaledLossWeights};

pub mod prelude {
    pub use super::errors::{LossError, LossResult};
    pub use super::scaled::{DifferentialLoss, LossBreakdown, ScaledLossWeights};
}
