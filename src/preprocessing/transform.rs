//! preprocessing::transform — the uniform scaling interface and its variants.
//!
//! Purpose
//! -------
//! Define the capability set shared by every preprocessing policy
//! ([`Scaler`]), the uncalibrated choice of policy ([`TransformKind`]) and the
//! calibrated, immutable closed set of policies ([`Transform`]).
//!
//! Key behaviors
//! -------------
//! - [`Scaler`] exposes calibration, forward maps for inputs/targets/gradients,
//!   exact inverses for targets/gradients, and input/output dimensionality.
//! - [`TransformKind::calibrate`] consumes the uncalibrated choice and returns
//!   a [`Transform`]; a calibrated transform cannot be recalibrated, so a new
//!   dataset always means a new instance.
//! - [`Transform`] dispatches every call to the calibrated variant.
//!
//! Invariants & assumptions
//! ------------------------
//! - After calibration every method takes `&self` and performs no mutation;
//!   a `Transform` can be shared between threads and applied concurrently.
//! - Input and gradient matrices passed to forward maps must have
//!   `input_dim()` columns; gradient matrices passed to the inverse map must
//!   have `output_dim()` columns. Violations return
//!   `PreprocessError::FeatureDimMismatch`.
//! - Targets and gradients round-trip exactly through forward/inverse in the
//!   transform's output space. Inputs are never reconstructed by the trait.
use crate::preprocessing::{
    data::{RawDataset, ScaledDataset},
    errors::{PreprocessError, PreprocessResult},
    identity::IdentityScaling,
    options::PcaThresholds,
    pca::DifferentialPca,
    standardize::StandardScaling,
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Capability set of a preprocessing policy.
///
/// Required:
/// - `calibrate(&RawDataset, &Config) -> PreprocessResult<Self>`: fit the
///   statistics once.
/// - `input_dim` / `output_dim`: raw and transformed feature counts.
/// - `forward_input`, `forward_target`, `forward_gradient`: raw → scaled.
/// - `inverse_target`, `inverse_gradient`: scaled → raw.
///
/// Provided:
/// - `apply(&RawDataset) -> PreprocessResult<ScaledDataset>`: all three
///   forward maps at once.
pub trait Scaler {
    /// Calibration parameters (thresholds, etc.). `()` when there are none.
    type Config;

    fn calibrate(data: &RawDataset, config: &Self::Config) -> PreprocessResult<Self>
    where
        Self: Sized;

    fn input_dim(&self) -> usize;
    fn output_dim(&self) -> usize;

    fn forward_input(&self, x: ArrayView2<'_, f64>) -> PreprocessResult<Array2<f64>>;
    fn forward_target(&self, y: ArrayView1<'_, f64>) -> Array1<f64>;
    fn forward_gradient(&self, dydx: ArrayView2<'_, f64>) -> PreprocessResult<Array2<f64>>;

    fn inverse_target(&self, y: ArrayView1<'_, f64>) -> Array1<f64>;
    fn inverse_gradient(&self, dydx: ArrayView2<'_, f64>) -> PreprocessResult<Array2<f64>>;

    fn apply(&self, data: &RawDataset) -> PreprocessResult<ScaledDataset> {
        Ok(ScaledDataset {
            x: self.forward_input(data.x().view())?,
            y: self.forward_target(data.y().view()),
            dydx: self.forward_gradient(data.dydx().view())?,
        })
    }
}

/// Uncalibrated choice of preprocessing policy.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TransformKind {
    /// `"NoNormalisation"`: pass-through baseline.
    Identity,
    /// `"Normalisation"`: per-feature standardization.
    Standardize,
    /// `"PCA"`: differential PCA with the given eigen-filter thresholds.
    DifferentialPca(PcaThresholds),
}

impl TransformKind {
    /// Canonical factory name of this policy.
    pub fn name(&self) -> &'static str {
        match self {
            TransformKind::Identity => "NoNormalisation",
            TransformKind::Standardize => "Normalisation",
            TransformKind::DifferentialPca(_) => "PCA",
        }
    }

    /// Parse a factory name (case-insensitive). PCA picks up `thresholds`.
    ///
    /// Returns `None` for unrecognised names; the factory decides whether that
    /// is a fallback or an error.
    pub fn from_name(name: &str, thresholds: PcaThresholds) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "pca" => Some(TransformKind::DifferentialPca(thresholds)),
            "normalisation" => Some(TransformKind::Standardize),
            "nonormalisation" => Some(TransformKind::Identity),
            _ => None,
        }
    }

    /// Calibrate the chosen policy against `data`.
    pub fn calibrate(self, data: &RawDataset) -> PreprocessResult<Transform> {
        let transform = match self {
            TransformKind::Identity => Transform::Identity(IdentityScaling::calibrate(data, &())?),
            TransformKind::Standardize => {
                Transform::Standardize(StandardScaling::calibrate(data, &())?)
            }
            TransformKind::DifferentialPca(thresholds) => {
                Transform::DifferentialPca(DifferentialPca::calibrate(data, &thresholds)?)
            }
        };
        tracing::info!(
            transform = self.name(),
            input_dim = transform.input_dim(),
            output_dim = transform.output_dim(),
            samples = data.n_samples(),
            "preprocessing transform calibrated"
        );
        Ok(transform)
    }
}

/// Calibrated preprocessing transform.
///
/// A closed set of policies behind the [`Scaler`] interface; each variant owns
/// statistics of its own shape and meaning.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Transform {
    Identity(IdentityScaling),
    Standardize(StandardScaling),
    DifferentialPca(DifferentialPca),
}

impl Transform {
    /// Uncalibrated policy this transform was built from.
    pub fn kind(&self) -> TransformKind {
        match self {
            Transform::Identity(_) => TransformKind::Identity,
            Transform::Standardize(_) => TransformKind::Standardize,
            Transform::DifferentialPca(p) => TransformKind::DifferentialPca(p.thresholds()),
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

impl Scaler for Transform {
    type Config = TransformKind;

    fn calibrate(data: &RawDataset, config: &TransformKind) -> PreprocessResult<Self> {
        config.calibrate(data)
    }

    fn input_dim(&self) -> usize {
        match self {
            Transform::Identity(t) => t.input_dim(),
            Transform::Standardize(t) => t.input_dim(),
            Transform::DifferentialPca(t) => t.input_dim(),
        }
    }

    fn output_dim(&self) -> usize {
        match self {
            Transform::Identity(t) => t.output_dim(),
            Transform::Standardize(t) => t.output_dim(),
            Transform::DifferentialPca(t) => t.output_dim(),
        }
    }

    fn forward_input(&self, x: ArrayView2<'_, f64>) -> PreprocessResult<Array2<f64>> {
        match self {
            Transform::Identity(t) => t.forward_input(x),
            Transform::Standardize(t) => t.forward_input(x),
            Transform::DifferentialPca(t) => t.forward_input(x),
        }
    }

    fn forward_target(&self, y: ArrayView1<'_, f64>) -> Array1<f64> {
        match self {
            Transform::Identity(t) => t.forward_target(y),
            Transform::Standardize(t) => t.forward_target(y),
            Transform::DifferentialPca(t) => t.forward_target(y),
        }
    }

    fn forward_gradient(&self, dydx: ArrayView2<'_, f64>) -> PreprocessResult<Array2<f64>> {
        match self {
            Transform::Identity(t) => t.forward_gradient(dydx),
            Transform::Standardize(t) => t.forward_gradient(dydx),
            Transform::DifferentialPca(t) => t.forward_gradient(dydx),
        }
    }

    fn inverse_target(&self, y: ArrayView1<'_, f64>) -> Array1<f64> {
        match self {
            Transform::Identity(t) => t.inverse_target(y),
            Transform::Standardize(t) => t.inverse_target(y),
            Transform::DifferentialPca(t) => t.inverse_target(y),
        }
    }

    fn inverse_gradient(&self, dydx: ArrayView2<'_, f64>) -> PreprocessResult<Array2<f64>> {
        match self {
            Transform::Identity(t) => t.inverse_gradient(dydx),
            Transform::Standardize(t) => t.inverse_gradient(dydx),
            Transform::DifferentialPca(t) => t.inverse_gradient(dydx),
        }
    }
}

/// Reject a matrix whose column count differs from `expected`.
pub(crate) fn check_features(found: usize, expected: usize) -> PreprocessResult<()> {
    if found != expected {
        return Err(PreprocessError::FeatureDimMismatch { expected, found });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn small_dataset() -> RawDataset {
        RawDataset::new(
            array![[1.0, 0.0], [2.0, 1.0], [3.0, 0.0], [4.0, 1.0]],
            array![1.0, 3.0, 3.0, 5.0],
            array![[1.0, 2.0], [1.0, 2.0], [1.0, 2.0], [1.0, 2.0]],
        )
        .unwrap()
    }

    #[test]
    // Purpose
    // -------
    // Factory names parse case-insensitively into the matching policy and
    // unknown names are reported as `None`.
    fn from_name_parses_known_names_case_insensitively() {
        let t = PcaThresholds::default();

        assert_eq!(TransformKind::from_name("PCA", t), Some(TransformKind::DifferentialPca(t)));
        assert_eq!(TransformKind::from_name("normalisation", t), Some(TransformKind::Standardize));
        assert_eq!(TransformKind::from_name("NoNormalisation", t), Some(TransformKind::Identity));
        assert_eq!(TransformKind::from_name("whitening", t), None);
    }

    #[test]
    fn name_round_trips_through_from_name() {
        let t = PcaThresholds::default();
        for kind in [
            TransformKind::Identity,
            TransformKind::Standardize,
            TransformKind::DifferentialPca(t),
        ] {
            assert_eq!(TransformKind::from_name(kind.name(), t), Some(kind));
        }
    }

    #[test]
    // Purpose
    // -------
    // Calibrating through `TransformKind` yields the matching `Transform`
    // variant, and `Transform::kind` reports it back.
    fn calibrate_dispatches_to_matching_variant() {
        let data = small_dataset();

        let identity = TransformKind::Identity.calibrate(&data).unwrap();
        let standard = TransformKind::Standardize.calibrate(&data).unwrap();

        assert!(matches!(identity, Transform::Identity(_)));
        assert!(matches!(standard, Transform::Standardize(_)));
        assert_eq!(standard.kind(), TransformKind::Standardize);
        assert_eq!(identity.name(), "NoNormalisation");
    }

    #[test]
    // Purpose
    // -------
    // `apply` pushes all three arrays through the forward maps.
    fn apply_produces_output_space_dataset() {
        let data = small_dataset();
        let transform = <Transform as Scaler>::calibrate(&data, &TransformKind::Standardize).unwrap();

        let scaled = transform.apply(&data).unwrap();

        assert_eq!(scaled.x.dim(), (4, transform.output_dim()));
        assert_eq!(scaled.y.len(), 4);
        assert_eq!(scaled.dydx.dim(), (4, transform.output_dim()));
    }

    #[test]
    fn forward_input_rejects_wrong_feature_count() {
        let data = small_dataset();
        let transform = TransformKind::Identity.calibrate(&data).unwrap();
        let x = array![[1.0, 2.0, 3.0]];

        assert_eq!(
            transform.forward_input(x.view()).unwrap_err(),
            PreprocessError::FeatureDimMismatch { expected: 2, found: 3 }
        );
    }
}
