//! Errors for scaled gradient-loss weighting and the combined differential loss.

/// Result alias for loss operations.
pub type LossResult<T> = Result<T, LossError>;

#[derive(Debug, Clone, PartialEq)]
pub enum LossError {
    /// No gradient samples were supplied for calibration.
    EmptyGradients,

    /// A scaled gradient column has a non-finite mean square (overflow), so
    /// its weight `1 / rms` is undefined.
    DegenerateGradientScale { index: usize },

    /// Paired arrays do not share a shape.
    ShapeMismatch { expected: (usize, usize), found: (usize, usize) },

    /// Value/gradient mixing weight must lie in `[0, 1]`.
    InvalidAlpha { alpha: f64 },

    /// A loss evaluated to NaN/±inf.
    NonFiniteLoss { value: f64 },
}

impl std::error::Error for LossError {}

impl std::fmt::Display for LossError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LossError::EmptyGradients => write!(f, "No gradient samples supplied"),
            LossError::DegenerateGradientScale { index } => {
                write!(f, "Gradient column {index} has a non-finite mean square; cannot derive a loss weight")
            }
            LossError::ShapeMismatch { expected, found } => {
                write!(f, "Shape mismatch: expected {expected:?}, found {found:?}")
            }
            LossError::InvalidAlpha { alpha } => {
                write!(f, "Invalid loss mixing weight {alpha}: must be finite and in [0, 1]")
            }
            LossError::NonFiniteLoss { value } => write!(f, "Non-finite loss value: {value}"),
        }
    }
}
