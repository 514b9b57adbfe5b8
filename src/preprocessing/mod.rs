//! preprocessing — calibrated scaling of differential training data.
//!
//! Purpose
//! -------
//! Turn a raw differential dataset `(x, y, ∂y/∂x)` into the scaled tensors a
//! surrogate model trains on, and turn the model's predictions back into raw
//! units. Three interchangeable policies share one interface:
//!
//! - `"NoNormalisation"` → [`IdentityScaling`]
//! - `"Normalisation"` → [`StandardScaling`]
//! - `"PCA"` → [`DifferentialPca`]
//!
//! Key behaviors
//! -------------
//! - [`RawDataset::new`] validates shapes and finiteness once, up front.
//! - [`TransformKind::calibrate`] fits statistics and returns an immutable
//!   [`Transform`]; the [`Scaler`] trait exposes forward and inverse maps.
//! - [`select`] / [`select_with_options`] pick a policy by name and calibrate
//!   the matching [`ScaledLossWeights`](crate::loss::ScaledLossWeights).
//! - [`postprocess`] maps predicted targets and gradients back to raw units.
//!
//! Invariants & assumptions
//! ------------------------
//! - Calibration is one-shot. A calibrated transform is read-only and can be
//!   applied concurrently from several threads.
//! - Targets and gradients round-trip exactly through every transform;
//!   inputs are never reconstructed except by the explicitly lossy
//!   [`DifferentialPca::reconstruct_input`].
//! - Degenerate data (constant inputs, insensitive targets, zero variances)
//!   is a fatal calibration error, never a silent fallback.
//!
//! Conventions
//! -----------
//! - Matrices are `samples × features`, one sample per row.
//! - Standard deviations are population standard deviations.
//! - Diagnostics go through `tracing`; the crate never installs a subscriber.

pub mod data;
pub mod eigen;
pub mod errors;
pub mod factory;
pub mod identity;
pub mod options;
pub mod pca;
pub mod postprocess;
pub mod standardize;
pub mod transform;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::data::{RawDataset, ScaledDataset};
pub use self::eigen::{EigenFilter, eigen_filter};
pub use self::errors::{
    FilterStage, PreprocessError, PreprocessResult, PreprocessWarning, ScaleQuantity,
};
pub use self::factory::{Preprocessing, select, select_with_options};
pub use self::identity::IdentityScaling;
pub use self::options::{
    DEFAULT_GRADIENT_THRESHOLD, DEFAULT_INPUT_THRESHOLD, PcaThresholds, PreprocessOptions,
    UnknownNamePolicy,
};
pub use self::pca::DifferentialPca;
pub use self::postprocess::postprocess;
pub use self::standardize::StandardScaling;
pub use self::transform::{Scaler, Transform, TransformKind};

pub mod prelude {
    pub use super::data::{RawDataset, ScaledDataset};
    pub use super::errors::{PreprocessError, PreprocessResult, PreprocessWarning};
    pub use super::factory::{Preprocessing, select, select_with_options};
    pub use super::options::{PcaThresholds, PreprocessOptions, UnknownNamePolicy};
    pub use super::postprocess::postprocess;
    pub use super::transform::{Scaler, Transform, TransformKind};
}
