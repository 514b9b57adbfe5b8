//! Preprocessing options — eigenvalue thresholds and factory policy.
//!
//! Purpose
//! -------
//! Collect the configuration knobs of the preprocessing stage in one place so
//! that calibration is driven by explicit, validated values instead of shared
//! process state.
//!
//! Key behaviors
//! -------------
//! - [`PcaThresholds`] holds the two eigen-filter thresholds of the
//!   differential PCA (`τx` for inputs, `τdx` for gradients). An eigen
//!   direction survives when its eigenvalue exceeds the *square* of the
//!   threshold.
//! - [`UnknownNamePolicy`] decides what the factory does with an unrecognised
//!   transform name.
//! - [`PreprocessOptions`] bundles both for the factory.
//!
//! Conventions
//! -----------
//! - Defaults: `τx = 1e-4`, `τdx = 2e-2`, unknown names fall back to
//!   standardization with a warning.

use crate::preprocessing::errors::{PreprocessError, PreprocessResult};

/// Default input-eigenvalue threshold `τx`.
pub const DEFAULT_INPUT_THRESHOLD: f64 = 1e-4;

/// Default gradient-eigenvalue threshold `τdx`.
pub const DEFAULT_GRADIENT_THRESHOLD: f64 = 2e-2;

/// Eigen-filter thresholds for the differential PCA.
///
/// Fields
/// ------
/// - `inputs`: `τx`, applied to the covariance of the centered inputs.
/// - `gradients`: `τdx`, applied to the second moment of the whitened
///   gradient labels.
///
/// Invariants
/// ----------
/// - Both thresholds are finite and strictly positive. Fields are private so
///   every value goes through [`PcaThresholds::new`] (deserialization
///   included).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "ThresholdsRepr")
)]
pub struct PcaThresholds {
    inputs: f64,
    gradients: f64,
}

impl PcaThresholds {
    /// Construct validated thresholds.
    ///
    /// Errors
    /// ------
    /// - `PreprocessError::InvalidThreshold` if either value is non-finite or
    ///   not strictly positive.
    pub fn new(inputs: f64, gradients: f64) -> PreprocessResult<Self> {
        verify_threshold(inputs)?;
        verify_threshold(gradients)?;
        Ok(PcaThresholds { inputs, gradients })
    }

    /// Input-eigenvalue threshold `τx`.
    pub fn inputs(&self) -> f64 {
        self.inputs
    }

    /// Gradient-eigenvalue threshold `τdx`.
    pub fn gradients(&self) -> f64 {
        self.gradients
    }
}

// Unvalidated wire form; converted through `PcaThresholds::new`.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct ThresholdsRepr {
    inputs: f64,
    gradients: f64,
}

#[cfg(feature = "serde")]
impl TryFrom<ThresholdsRepr> for PcaThresholds {
    type Error = PreprocessError;

    fn try_from(repr: ThresholdsRepr) -> PreprocessResult<Self> {
        PcaThresholds::new(repr.inputs, repr.gradients)
    }
}

impl Default for PcaThresholds {
    fn default() -> Self {
        PcaThresholds { inputs: DEFAULT_INPUT_THRESHOLD, gradients: DEFAULT_GRADIENT_THRESHOLD }
    }
}

/// What the factory does when it does not recognise a transform name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnknownNamePolicy {
    /// Log a warning, calibrate standardization instead and report the
    /// substitution in the result.
    #[default]
    Fallback,
    /// Fail with `PreprocessError::UnknownTransform`.
    Reject,
}

/// Factory-level configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PreprocessOptions {
    pub thresholds: PcaThresholds,
    pub unknown_name: UnknownNamePolicy,
}

impl PreprocessOptions {
    pub fn new(thresholds: PcaThresholds, unknown_name: UnknownNamePolicy) -> Self {
        PreprocessOptions { thresholds, unknown_name }
    }
}

fn verify_threshold(value: f64) -> PreprocessResult<()> {
    if !value.is_finite() {
        return Err(PreprocessError::InvalidThreshold { value, reason: "must be finite" });
    }
    if value <= 0.0 {
        return Err(PreprocessError::InvalidThreshold { value, reason: "must be strictly positive" });
    }
    Ok(())
}
