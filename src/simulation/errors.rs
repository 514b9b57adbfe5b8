//! simulation::errors — failures of the synthetic data generators.
//!
//! Parameter errors are raised when a generator is constructed; sampling
//! errors when a dataset is requested. Datasets produced by a generator pass
//! through [`RawDataset::new`](crate::preprocessing::RawDataset::new), whose
//! validation errors are wrapped in [`SimulationError::Dataset`].
use crate::preprocessing::errors::PreprocessError;
use statrs::distribution::NormalError;

/// Result alias for simulation routines.
pub type SimulationResult<T> = Result<T, SimulationError>;

#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    // ---- Parameters ----
    /// The basket has no assets.
    EmptyBasket,

    /// Weights and volatilities have different lengths.
    LengthMismatch { weights: usize, vols: usize },

    /// A basket weight is not finite.
    InvalidWeight { index: usize, value: f64 },

    /// A volatility is not finite or not strictly positive.
    InvalidVolatility { index: usize, value: f64 },

    /// Pairwise correlation outside `[-1, 1]` or not finite.
    InvalidCorrelation { value: f64 },

    /// The implied correlation matrix admits no Cholesky factor.
    CorrelationNotPositiveDefinite { value: f64, assets: usize },

    /// Times must satisfy `0 < t1 < t2`, both finite.
    InvalidMaturities { t1: f64, t2: f64 },

    /// Strike is not finite.
    InvalidStrike { value: f64 },

    /// The weighted basket has zero variance (e.g. all weights zero).
    DegenerateBasket,

    // ---- Sampling ----
    /// A dataset with zero samples was requested.
    ZeroSamples,

    /// Spot matrix width differs from the number of assets.
    AssetDimMismatch { expected: usize, found: usize },

    /// Invalid standard normal parameters (statrs).
    InvalidNormalParam,

    /// The generated arrays failed dataset validation.
    Dataset(PreprocessError),
}

impl std::error::Error for SimulationError {}

impl std::fmt::Display for SimulationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SimulationError::EmptyBasket => write!(f, "Basket must contain at least one asset"),
            SimulationError::LengthMismatch { weights, vols } => {
                write!(f, "Basket has {weights} weights but {vols} volatilities")
            }
            SimulationError::InvalidWeight { index, value } => {
                write!(f, "Weight {index} must be finite, got {value}")
            }
            SimulationError::InvalidVolatility { index, value } => {
                write!(f, "Volatility {index} must be finite and positive, got {value}")
            }
            SimulationError::InvalidCorrelation { value } => {
                write!(f, "Correlation must lie in [-1, 1], got {value}")
            }
            SimulationError::CorrelationNotPositiveDefinite { value, assets } => write!(
                f,
                "Uniform correlation {value} across {assets} assets is not positive definite"
            ),
            SimulationError::InvalidMaturities { t1, t2 } => {
                write!(f, "Times must satisfy 0 < t1 < t2, got t1 = {t1}, t2 = {t2}")
            }
            SimulationError::InvalidStrike { value } => {
                write!(f, "Strike must be finite, got {value}")
            }
            SimulationError::DegenerateBasket => write!(f, "Basket has zero variance"),
            SimulationError::ZeroSamples => write!(f, "Number of samples must be positive"),
            SimulationError::AssetDimMismatch { expected, found } => {
                write!(f, "Spot matrix has {found} columns, expected {expected} assets")
            }
            SimulationError::InvalidNormalParam => {
                write!(f, "Invalid parameters for the standard normal distribution")
            }
            SimulationError::Dataset(err) => write!(f, "Generated dataset is invalid: {err}"),
        }
    }
}

impl From<PreprocessError> for SimulationError {
    fn from(err: PreprocessError) -> SimulationError {
        SimulationError::Dataset(err)
    }
}

impl From<NormalError> for SimulationError {
    fn from(_: NormalError) -> SimulationError {
        SimulationError::InvalidNormalParam
    }
}
