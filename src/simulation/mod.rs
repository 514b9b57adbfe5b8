//! simulation — synthetic differential datasets with known ground truth.
//!
//! Purpose
//! -------
//! Generate `(x, y, ∂y/∂x)` training sets whose true pricing function is known
//! in closed form, so preprocessing and downstream training can be checked
//! against exact values.
//!
//! Key behaviors
//! -------------
//! - [`BachelierBasket`]: correlated arithmetic Brownian assets, a call on
//!   their weighted basket, sampled payoffs with pathwise differentials, and
//!   analytic prices/deltas.
//!
//! Conventions
//! -----------
//! - Generators are seeded explicitly; the same seed always yields the same
//!   dataset.
//! - Outputs are validated [`RawDataset`](crate::preprocessing::RawDataset)s.

pub mod bachelier;
pub mod errors;

// ---- Re-exports (primary surface) -----------------------------------------

pub use self::bachelier::BachelierBasket;
pub use self::errors::{SimulationError, SimulationResult};
