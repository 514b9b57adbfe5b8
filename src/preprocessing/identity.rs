//! Pass-through preprocessing: records the feature count, scales nothing.
use crate::preprocessing::{
    data::RawDataset,
    errors::PreprocessResult,
    transform::{Scaler, check_features},
};
use ndarray::{Array1, Array2, ArrayView1, ArrayView2};

/// Identity transform. Every forward and inverse map returns its input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IdentityScaling {
    n_features: usize,
}

impl Scaler for IdentityScaling {
    type Config = ();

    fn calibrate(data: &RawDataset, _config: &()) -> PreprocessResult<Self> {
        Ok(IdentityScaling { n_features: data.n_features() })
    }

    fn input_dim(&self) -> usize {
        self.n_features
    }

    fn output_dim(&self) -> usize {
        self.n_features
    }

    fn forward_input(&self, x: ArrayView2<'_, f64>) -> PreprocessResult<Array2<f64>> {
        check_features(x.ncols(), self.n_features)?;
        Ok(x.to_owned())
    }

    fn forward_target(&self, y: ArrayView1<'_, f64>) -> Array1<f64> {
        y.to_owned()
    }

    fn forward_gradient(&self, dydx: ArrayView2<'_, f64>) -> PreprocessResult<Array2<f64>> {
        check_features(dydx.ncols(), self.n_features)?;
        Ok(dydx.to_owned())
    }

    fn inverse_target(&self, y: ArrayView1<'_, f64>) -> Array1<f64> {
        y.to_owned()
    }

    fn inverse_gradient(&self, dydx: ArrayView2<'_, f64>) -> PreprocessResult<Array2<f64>> {
        check_features(dydx.ncols(), self.n_features)?;
        Ok(dydx.to_owned())
    }
}
