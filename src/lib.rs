//! rust_diffml — data preprocessing for differential machine learning.
//!
//! Purpose
//! -------
//! Prepare training data for surrogate models that learn a scalar target and
//! its gradient with respect to the inputs, using known gradients
//! ("differential labels") as extra supervision. The crate owns the numerical
//! core around the model: calibrated scaling and dimensionality reduction of
//! inputs, targets and gradients, gradient-loss weights, and post-processing
//! of predictions back into raw units.
//!
//! Key behaviors
//! -------------
//! - [`preprocessing`]: validated datasets, three interchangeable transforms
//!   (identity, standardization, differential PCA) behind the
//!   [`Scaler`](preprocessing::Scaler) trait, a name-based factory and the
//!   prediction post-processor.
//! - [`loss`]: per-dimension gradient-loss weights and the combined
//!   value/gradient loss.
//! - [`simulation`]: a seeded Bachelier basket generator with analytic labels
//!   for end-to-end checks.
//! - [`utils`]: `ndarray` ↔ `nalgebra` bridge and column moments.
//!
//! Invariants & assumptions
//! ------------------------
//! - All data is `f64`, laid out `samples × features`.
//! - Calibration happens once per dataset; calibrated objects are immutable
//!   and safe to share across threads.
//! - Fatal conditions are returned as typed errors; the crate does not panic
//!   on invalid input.
//!
//! Conventions
//! -----------
//! - Diagnostics are emitted through `tracing`; install a subscriber in the
//!   application to see them.
//! - With the `serde` feature, calibrated transforms, loss weights and options
//!   implement `Serialize`/`Deserialize`.
//!
//! Downstream usage
//! ----------------
//! Training loops call [`preprocessing::select`] once, train on
//! [`Scaler::apply`](preprocessing::Scaler::apply) output with
//! [`loss::DifferentialLoss`], and map predictions back with
//! [`preprocessing::postprocess`]. Network definitions and the training loop
//! itself live outside this crate.

pub mod loss;
pub mod preprocessing;
pub mod simulation;
pub mod utils;

pub use crate::loss::{DifferentialLoss, LossError, ScaledLossWeights};
pub use crate::preprocessing::{
    PreprocessError, PreprocessOptions, Preprocessing, RawDataset, Scaler, Transform,
    TransformKind, postprocess, select, select_with_options,
};
pub use crate::simulation::{BachelierBasket, SimulationError};
