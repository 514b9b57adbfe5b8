//! preprocessing::errors — error and warning types for calibration and scaling.
//!
//! Purpose
//! -------
//! Define [`PreprocessError`], the single error type returned by dataset
//! validation, eigen-filtering, transform calibration and transform
//! application, together with the non-fatal [`PreprocessWarning`] emitted by
//! the factory when it substitutes a transform.
//!
//! Key behaviors
//! -------------
//! - Group failures into input validation, degenerate-data conditions
//!   (`DegenerateInput`, `DegenerateScale`), configuration errors and
//!   application-time shape mismatches.
//! - Attach readable `Display` messages that embed the offending payload
//!   (index, value, threshold, stage).
//! - Absorb loss-weight calibration failures through `From<LossError>` so the
//!   factory can propagate them with `?`.
//!
//! Invariants & assumptions
//! ------------------------
//! - `DegenerateInput` and `DegenerateScale` are fatal: the dataset or
//!   configuration is unusable and calibration is aborted. No partially
//!   calibrated transform is ever returned.
//! - Indices are 0-based (rows = samples, columns = features).
use crate::loss::errors::LossError;

/// Result alias for preprocessing operations.
pub type PreprocessResult<T> = Result<T, PreprocessError>;

/// Which eigen-filter step of the differential PCA rejected every direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum FilterStage {
    /// Orthogonalization of the centered inputs.
    Inputs,
    /// Orthogonalization of the whitened gradient labels.
    Gradients,
}

impl std::fmt::Display for FilterStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterStage::Inputs => write!(f, "input"),
            FilterStage::Gradients => write!(f, "gradient"),
        }
    }
}

/// Quantity whose spread was zero when a transform needed to divide by it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleQuantity {
    /// Standard deviation of an input feature.
    Feature,
    /// Standard deviation of the scalar target.
    Target,
    /// Root-mean-square of a scaled gradient column.
    Gradient,
}

impl std::fmt::Display for ScaleQuantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScaleQuantity::Feature => write!(f, "feature"),
            ScaleQuantity::Target => write!(f, "target"),
            ScaleQuantity::Gradient => write!(f, "gradient"),
        }
    }
}

/// Unified error type for preprocessing.
#[derive(Debug, Clone, PartialEq)]
pub enum PreprocessError {
    // ---- Dataset validation ----
    /// Dataset has no samples.
    EmptyDataset,

    /// Dataset has no input features.
    NoFeatures,

    /// `y` does not have one entry per row of `x`.
    TargetLengthMismatch { expected: usize, actual: usize },

    /// `dydx` does not have the same shape as `x`.
    GradientShapeMismatch { expected: (usize, usize), found: (usize, usize) },

    /// A NaN/±inf entry was found in one of the dataset arrays.
    NonFiniteData { array: &'static str, row: usize, col: usize, value: f64 },

    // ---- Degenerate data ----
    /// An eigen-filter step discarded every direction.
    DegenerateInput { stage: FilterStage, threshold: f64, largest_eigenvalue: f64 },

    /// A variance needed as a divisor is zero.
    DegenerateScale { quantity: ScaleQuantity, index: usize },

    // ---- Configuration ----
    /// Eigenvalue threshold must be finite and strictly positive.
    InvalidThreshold { value: f64, reason: &'static str },

    /// Transform name not recognised and the policy forbids fallback.
    UnknownTransform { name: String },

    /// Eigen-filter input is not square.
    NonSquareMatrix { rows: usize, cols: usize },

    // ---- Application ----
    /// Data passed to a calibrated transform has the wrong number of columns.
    FeatureDimMismatch { expected: usize, found: usize },

    /// Paired arrays handed to a transform or post-processor disagree in length.
    SampleCountMismatch { expected: usize, found: usize },

    // ---- Loss weights ----
    /// Loss-weight calibration failed for a reason other than a zero scale.
    Loss(LossError),
}

impl std::error::Error for PreprocessError {}

impl std::fmt::Display for PreprocessError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            // ---- Dataset validation ----
            PreprocessError::EmptyDataset => write!(f, "Dataset must contain at least one sample"),
            PreprocessError::NoFeatures => write!(f, "Dataset must contain at least one feature"),
            PreprocessError::TargetLengthMismatch { expected, actual } => {
                write!(f, "Target length mismatch: expected {expected}, got {actual}")
            }
            PreprocessError::GradientShapeMismatch { expected, found } => {
                write!(f, "Gradient shape mismatch: expected {expected:?}, found {found:?}")
            }
            PreprocessError::NonFiniteData { array, row, col, value } => {
                write!(f, "Non-finite value in {array} at ({row}, {col}): {value}")
            }

            // ---- Degenerate data ----
            PreprocessError::DegenerateInput { stage, threshold, largest_eigenvalue } => write!(
                f,
                "Degenerate input: every {stage} direction is below threshold {threshold} \
                 (largest eigenvalue {largest_eigenvalue})"
            ),
            PreprocessError::DegenerateScale { quantity, index } => {
                write!(f, "Degenerate scale: {quantity} {index} has zero spread")
            }

            // ---- Configuration ----
            PreprocessError::InvalidThreshold { value, reason } => {
                write!(f, "Invalid eigenvalue threshold {value}: {reason}")
            }
            PreprocessError::UnknownTransform { name } => write!(
                f,
                "Unknown preprocessing transform '{name}': valid options are 'PCA', \
                 'Normalisation' or 'NoNormalisation'"
            ),
            PreprocessError::NonSquareMatrix { rows, cols } => {
                write!(f, "Eigen-filter needs a square matrix, found ({rows}, {cols})")
            }

            // ---- Application ----
            PreprocessError::FeatureDimMismatch { expected, found } => {
                write!(f, "Feature dimension mismatch: expected {expected}, found {found}")
            }
            PreprocessError::SampleCountMismatch { expected, found } => {
                write!(f, "Sample count mismatch: expected {expected}, found {found}")
            }

            // ---- Loss weights ----
            PreprocessError::Loss(err) => write!(f, "Loss weight calibration failed: {err}"),
        }
    }
}

impl From<LossError> for PreprocessError {
    fn from(err: LossError) -> Self {
        match err {
            LossError::DegenerateGradientScale { index } => {
                PreprocessError::DegenerateScale { quantity: ScaleQuantity::Gradient, index }
            }
            LossError::EmptyGradients => PreprocessError::EmptyDataset,
            other => PreprocessError::Loss(other),
        }
    }
}

/// Non-fatal conditions reported alongside a successful result.
#[derive(Debug, Clone, PartialEq)]
pub enum PreprocessWarning {
    /// The requested transform name was not recognised and `substituted` was
    /// calibrated instead.
    UnknownTransform { requested: String, substituted: &'static str },
}

impl std::fmt::Display for PreprocessWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PreprocessWarning::UnknownTransform { requested, substituted } => write!(
                f,
                "Unknown preprocessing transform '{requested}', using '{substituted}' instead"
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    // Purpose
    // -------
    // Display messages for degenerate-data errors embed the stage, threshold
    // and offending index so operators can diagnose the dataset.
    fn degenerate_errors_display_their_payload() {
        let input = PreprocessError::DegenerateInput {
            stage: FilterStage::Gradients,
            threshold: 0.02,
            largest_eigenvalue: 1e-9,
        };
        let scale = PreprocessError::DegenerateScale { quantity: ScaleQuantity::Feature, index: 3 };

        let input_msg = input.to_string();
        assert!(input_msg.contains("gradient"));
        assert!(input_msg.contains("0.02"));
        assert_eq!(scale.to_string(), "Degenerate scale: feature 3 has zero spread");
    }

    #[test]
    // Purpose
    // -------
    // A gradient column with a non-finite mean square found while calibrating
    // loss weights surfaces as a gradient `DegenerateScale` error.
    fn loss_degenerate_scale_maps_to_gradient_scale_error() {
        let err: PreprocessError = LossError::DegenerateGradientScale { index: 2 }.into();

        assert_eq!(
            err,
            PreprocessError::DegenerateScale { quantity: ScaleQuantity::Gradient, index: 2 }
        );
    }

    #[test]
    fn unknown_transform_warning_names_both_transforms() {
        let w = PreprocessWarning::UnknownTransform {
            requested: "Whitening".to_string(),
            substituted: "Normalisation",
        };

        let msg = w.to_string();
        assert!(msg.contains("Whitening"));
        assert!(msg.contains("Normalisation"));
    }
}
