//! Convert model outputs from transform space back to raw units.
use crate::preprocessing::{
    errors::{PreprocessError, PreprocessResult},
    transform::Scaler,
};
use ndarray::{Array2, ArrayView1, ArrayView2, Axis};

/// postprocess — invert target and gradient predictions.
///
/// Parameters
/// ----------
/// - `scaled_y`: `ArrayView1<f64>`
///   Predicted targets in transform space, one per sample.
/// - `scaled_dydx`: `ArrayView2<f64>`
///   Predicted gradients in transform space, `samples × output_dim()`.
/// - `transform`: any calibrated [`Scaler`].
///
/// Returns
/// -------
/// `(y, dydx)` in raw units: `y` as a `samples × 1` column, `dydx` as
/// `samples × input_dim()`.
///
/// Errors
/// ------
/// - `PreprocessError::SampleCountMismatch` if the two predictions disagree on
///   the number of samples.
/// - `PreprocessError::FeatureDimMismatch` if `scaled_dydx` is not in the
///   transform's output space.
pub fn postprocess<S: Scaler + ?Sized>(
    scaled_y: ArrayView1<'_, f64>, scaled_dydx: ArrayView2<'_, f64>, transform: &S,
) -> PreprocessResult<(Array2<f64>, Array2<f64>)> {
    if scaled_dydx.nrows() != scaled_y.len() {
        return Err(PreprocessError::SampleCountMismatch {
            expected: scaled_y.len(),
            found: scaled_dydx.nrows(),
        });
    }
    let y = transform.inverse_target(scaled_y).insert_axis(Axis(1));
    let dydx = transform.inverse_gradient(scaled_dydx)?;
    Ok((y, dydx))
}
