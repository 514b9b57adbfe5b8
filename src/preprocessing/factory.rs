//! preprocessing::factory — select and calibrate a transform by name.
//!
//! Purpose
//! -------
//! Map a configuration string (`"PCA"`, `"Normalisation"`,
//! `"NoNormalisation"`) to a transform policy, calibrate it on the training
//! set, and calibrate the matching gradient-loss weights in the transform's
//! output space.
//!
//! Key behaviors
//! -------------
//! - Names are matched case-insensitively.
//! - Unknown names follow [`UnknownNamePolicy`]: `Fallback` (the default)
//!   logs a `tracing::warn!`, calibrates the standardization transform, and
//!   records a [`PreprocessWarning`] in the result; `Reject` returns
//!   `PreprocessError::UnknownTransform`.
//! - Loss weights are always recalibrated together with the transform; they
//!   are never shared across datasets.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every error raised by calibration is fatal and propagates unchanged.
//! - `Preprocessing::loss_weights.len() == transform.output_dim()`.
use crate::{
    loss::ScaledLossWeights,
    preprocessing::{
        data::RawDataset,
        errors::{PreprocessError, PreprocessResult, PreprocessWarning},
        options::{PreprocessOptions, UnknownNamePolicy},
        transform::{Scaler, Transform, TransformKind},
    },
};

/// Outcome of [`select`]: a calibrated transform, its loss weights and any
/// non-fatal warning raised while choosing the transform.
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessing {
    pub transform: Transform,
    pub loss_weights: ScaledLossWeights,
    pub warning: Option<PreprocessWarning>,
}

/// select — calibrate the named transform with default options.
///
/// Equivalent to [`select_with_options`] with [`PreprocessOptions::default`]:
/// default PCA thresholds and fallback on unknown names.
pub fn select(name: &str, data: &RawDataset) -> PreprocessResult<Preprocessing> {
    select_with_options(name, data, &PreprocessOptions::default())
}

/// select_with_options — calibrate the named transform and its loss weights.
///
/// Parameters
/// ----------
/// - `name`: `&str`
///   Transform identifier, case-insensitive.
/// - `data`: `&RawDataset`
///   Validated training set.
/// - `options`: `&PreprocessOptions`
///   PCA thresholds and the unknown-name policy.
///
/// Returns
/// -------
/// [`Preprocessing`] whose `warning` is `Some` iff an unknown name was
/// replaced by the standardization transform.
///
/// Errors
/// ------
/// - `PreprocessError::UnknownTransform` under `UnknownNamePolicy::Reject`.
/// - Any calibration error of the chosen transform (`DegenerateInput`,
///   `DegenerateScale`).
/// - `PreprocessError::DegenerateScale { quantity: Gradient, .. }` if a
///   transformed gradient column has a non-finite mean square.
///
/// Notes
/// -----
/// - A transformed gradient column that is identically zero is valid and
///   gets loss weight `0`; selection does not fail on it.
pub fn select_with_options(
    name: &str, data: &RawDataset, options: &PreprocessOptions,
) -> PreprocessResult<Preprocessing> {
    let (kind, warning) = match TransformKind::from_name(name, options.thresholds) {
        Some(kind) => (kind, None),
        None => match options.unknown_name {
            UnknownNamePolicy::Reject => {
                return Err(PreprocessError::UnknownTransform { name: name.to_string() });
            }
            UnknownNamePolicy::Fallback => {
                let fallback = TransformKind::Standardize;
                tracing::warn!(
                    requested = name,
                    substituted = fallback.name(),
                    "unknown preprocessing transform, falling back"
                );
                let warning = PreprocessWarning::UnknownTransform {
                    requested: name.to_string(),
                    substituted: fallback.name(),
                };
                (fallback, Some(warning))
            }
        },
    };

    let transform = kind.calibrate(data)?;
    let scaled_dydx = transform.forward_gradient(data.dydx().view())?;
    let loss_weights = ScaledLossWeights::calibrate(scaled_dydx.view())?;

    Ok(Preprocessing { transform, loss_weights, warning })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::preprocessing::{errors::ScaleQuantity, options::PcaThresholds};
    use approx::assert_relative_eq;
    use ndarray::{Array2, array};

    // -------------------------------------------------------------------------
    // Scope
    // -----
    // These tests cover:
    // - Name dispatch for the three known transforms.
    // - Fallback (with warning) and rejection of unknown names.
    // - Loss weights sized and calibrated in the transform's output space.
    // - Propagation of fatal calibration errors.
    // -------------------------------------------------------------------------

    fn linear_dataset() -> RawDataset {
        let x = array![[0.0, 1.0], [1.0, -1.0], [2.0, 0.5], [3.0, 2.0], [4.0, -0.5]];
        let y = x.dot(&array![2.0, 1.0]);
        let dydx = Array2::from_shape_fn((5, 2), |(_, j)| if j == 0 { 2.0 } else { 1.0 });
        RawDataset::new(x, y, dydx).unwrap()
    }

    #[test]
    fn select_dispatches_known_names() {
        let data = linear_dataset();

        let pca = select("PCA", &data).unwrap();
        let standard = select("Normalisation", &data).unwrap();
        let identity = select("nonormalisation", &data).unwrap();

        assert!(matches!(pca.transform, Transform::DifferentialPca(_)));
        assert!(matches!(standard.transform, Transform::Standardize(_)));
        assert!(matches!(identity.transform, Transform::Identity(_)));
        assert!(pca.warning.is_none() && standard.warning.is_none() && identity.warning.is_none());
    }

    #[test]
    // Purpose
    // -------
    // An unrecognised name never fails under the default policy: it yields a
    // standardization transform and an observable warning.
    //
    // Given
    // -----
    // - name = "Whitening", default options.
    //
    // Expect
    // ------
    // - transform equals a directly calibrated `Standardize`.
    // - warning names the requested and substituted transforms.
    fn select_falls_back_to_standardize_on_unknown_name() {
        let data = linear_dataset();

        let out = select("Whitening", &data).unwrap();

        assert_eq!(out.transform, TransformKind::Standardize.calibrate(&data).unwrap());
        assert_eq!(
            out.warning,
            Some(PreprocessWarning::UnknownTransform {
                requested: "Whitening".to_string(),
                substituted: "Normalisation",
            })
        );
    }

    #[test]
    fn select_rejects_unknown_name_when_configured() {
        let data = linear_dataset();
        let options = PreprocessOptions::new(PcaThresholds::default(), UnknownNamePolicy::Reject);

        assert_eq!(
            select_with_options("Whitening", &data, &options).unwrap_err(),
            PreprocessError::UnknownTransform { name: "Whitening".to_string() }
        );
    }

    #[test]
    // Purpose
    // -------
    // Loss weights are calibrated on the transformed gradients, so their
    // length follows the output dimension and their values the output scale.
    //
    // Given
    // -----
    // - Constant gradients [2, 1] and the identity transform.
    //
    // Expect
    // ------
    // - weights = [1/2, 1] (reciprocal RMS of each raw column).
    // - Under PCA the weights have `output_dim()` entries.
    fn loss_weights_follow_transform_output_space() {
        let data = linear_dataset();

        let identity = select("NoNormalisation", &data).unwrap();
        let pca = select("PCA", &data).unwrap();

        let w = identity.loss_weights.weights();
        assert_relative_eq!(w[0], 0.5, epsilon = 1e-12);
        assert_relative_eq!(w[1], 1.0, epsilon = 1e-12);
        assert_eq!(pca.loss_weights.len(), pca.transform.output_dim());
    }

    #[test]
    // Purpose
    // -------
    // One-hot gradients (a column identically zero) are valid for every
    // transform name, including the unknown-name fallback.
    //
    // Given
    // -----
    // - Gradients one-hot at column 0.
    //
    // Expect
    // ------
    // - Every selection succeeds with finite loss weights.
    // - Non-PCA transforms give the zero column weight 0.
    fn select_accepts_zero_gradient_column_for_every_name() {
        let x = array![[0.0, 1.0], [1.0, 3.0], [2.0, 2.0]];
        let y = array![0.0, 1.0, 2.0];
        let dydx = array![[1.0, 0.0], [1.0, 0.0], [1.0, 0.0]];
        let data = RawDataset::new(x, y, dydx).unwrap();

        for name in ["PCA", "Normalisation", "NoNormalisation", "Whitening"] {
            let out = select(name, &data).unwrap();
            let w = out.loss_weights.weights();

            assert!(w.iter().all(|v| v.is_finite()), "{name}: {w:?}");
            if name != "PCA" {
                assert_eq!(w[1], 0.0, "{name}");
                assert!(w[0] > 0.0, "{name}");
            }
        }
    }

    #[test]
    fn select_maps_overflowing_gradient_column_to_degenerate_scale() {
        let x = array![[0.0, 1.0], [1.0, 3.0], [2.0, 2.0]];
        let y = array![0.0, 1.0, 2.0];
        let dydx = array![[1.0, 1e200], [1.0, 1e200], [1.0, 1e200]];
        let data = RawDataset::new(x, y, dydx).unwrap();

        assert_eq!(
            select("NoNormalisation", &data).unwrap_err(),
            PreprocessError::DegenerateScale { quantity: ScaleQuantity::Gradient, index: 1 }
        );
    }

    #[test]
    fn select_propagates_calibration_errors() {
        let x = array![[1.0], [2.0], [3.0]];
        let y = array![4.0, 4.0, 4.0];
        let dydx = array![[0.5], [0.5], [0.5]];
        let data = RawDataset::new(x, y, dydx).unwrap();

        assert_eq!(
            select("Normalisation", &data).unwrap_err(),
            PreprocessError::DegenerateScale { quantity: ScaleQuantity::Target, index: 0 }
        );
    }
}
