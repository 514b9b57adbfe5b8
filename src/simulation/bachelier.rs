//! simulation::bachelier — correlated Bachelier basket option.
//!
//! Purpose
//! -------
//! Produce the reference differential dataset used to exercise the
//! preprocessing pipeline: a European call on a weighted basket of assets that
//! follow correlated arithmetic Brownian motions.
//!
//! Model
//! -----
//! - Assets start at `S(0) = 1` and evolve as `dS = L dW`, where
//!   `Σ = L Lᵗ`, `Σ_ij = σ_i σ_j ρ_ij`, and `ρ_ij = ρ` for `i ≠ j`.
//! - Features are the spots at `t1`; the option pays
//!   `max(w·S(t2) − K, 0)` at `t2`.
//! - The basket `b = w·S` is itself Gaussian with volatility
//!   `σ_b = sqrt(wᵗ Σ w)`, which gives closed-form prices and deltas.
//!
//! Key behaviors
//! -------------
//! - [`BachelierBasket::training_set`]: simulated spots, sampled payoffs and
//!   pathwise differentials `w · 1{w·S(t2) > K}` (unbiased, noisy labels).
//! - [`BachelierBasket::analytic`]: exact price
//!   `(b − K) N(d) + σ_b √τ n(d)` and delta `w · N(d)`,
//!   with `τ = t2 − t1` and `d = (b − K) / (σ_b √τ)`.
//! - [`BachelierBasket::test_set`]: simulated spots with analytic labels.
//!
//! Invariants & assumptions
//! ------------------------
//! - Every gradient label is a multiple of `w`, so the differential PCA of a
//!   basket dataset keeps a single direction.
//! - Sampling is deterministic for a given `seed`.
use crate::{
    preprocessing::data::RawDataset,
    simulation::errors::{SimulationError, SimulationResult},
    utils::{from_dmatrix, to_dmatrix},
};
use ndarray::{Array1, Array2, ArrayView2};
use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, StandardNormal};
use statrs::distribution::{Continuous, ContinuousCDF, Normal};

/// Basket call under correlated Bachelier dynamics.
#[derive(Debug, Clone, PartialEq)]
pub struct BachelierBasket {
    weights: Array1<f64>,
    vols: Array1<f64>,
    correlation: f64,
    t1: f64,
    t2: f64,
    strike: f64,
    // Transposed lower Cholesky factor of Σ, for row-vector sampling.
    chol_t: Array2<f64>,
    basket_vol: f64,
}

impl BachelierBasket {
    /// Build and validate a basket.
    ///
    /// Parameters
    /// ----------
    /// - `weights`: basket weights `w`, one per asset.
    /// - `vols`: per-unit-time normal volatilities `σ`, strictly positive.
    /// - `correlation`: uniform pairwise correlation `ρ ∈ [-1, 1]`.
    /// - `t1`, `t2`: feature and expiry times, `0 < t1 < t2`.
    /// - `strike`: `K`.
    ///
    /// Errors
    /// ------
    /// - Parameter variants of [`SimulationError`] for invalid inputs.
    /// - `CorrelationNotPositiveDefinite` when `Σ` has no Cholesky factor
    ///   (e.g. `ρ ≤ −1/(n − 1)` or `ρ = 1` with several assets).
    /// - `DegenerateBasket` when `wᵗ Σ w` is zero.
    pub fn new(
        weights: Array1<f64>, vols: Array1<f64>, correlation: f64, t1: f64, t2: f64, strike: f64,
    ) -> SimulationResult<Self> {
        let n = weights.len();
        if n == 0 {
            return Err(SimulationError::EmptyBasket);
        }
        if vols.len() != n {
            return Err(SimulationError::LengthMismatch { weights: n, vols: vols.len() });
        }
        if let Some(index) = weights.iter().position(|w| !w.is_finite()) {
            return Err(SimulationError::InvalidWeight { index, value: weights[index] });
        }
        if let Some(index) = vols.iter().position(|&v| !(v.is_finite() && v > 0.0)) {
            return Err(SimulationError::InvalidVolatility { index, value: vols[index] });
        }
        if !(correlation.is_finite() && (-1.0..=1.0).contains(&correlation)) {
            return Err(SimulationError::InvalidCorrelation { value: correlation });
        }
        if !(t1.is_finite() && t2.is_finite() && 0.0 < t1 && t1 < t2) {
            return Err(SimulationError::InvalidMaturities { t1, t2 });
        }
        if !strike.is_finite() {
            return Err(SimulationError::InvalidStrike { value: strike });
        }

        let cov = Array2::from_shape_fn((n, n), |(i, j)| {
            let rho = if i == j { 1.0 } else { correlation };
            vols[i] * vols[j] * rho
        });
        let chol = to_dmatrix(cov.view())
            .cholesky()
            .ok_or(SimulationError::CorrelationNotPositiveDefinite { value: correlation, assets: n })?;
        let chol_t = from_dmatrix(&chol.l()).reversed_axes();

        let basket_var = weights.dot(&cov.dot(&weights));
        if !(basket_var > 0.0) {
            return Err(SimulationError::DegenerateBasket);
        }

        Ok(BachelierBasket {
            weights,
            vols,
            correlation,
            t1,
            t2,
            strike,
            chol_t,
            basket_vol: basket_var.sqrt(),
        })
    }

    pub fn n_assets(&self) -> usize {
        self.weights.len()
    }

    pub fn weights(&self) -> &Array1<f64> {
        &self.weights
    }

    pub fn vols(&self) -> &Array1<f64> {
        &self.vols
    }

    pub fn correlation(&self) -> f64 {
        self.correlation
    }

    pub fn strike(&self) -> f64 {
        self.strike
    }

    /// Basket volatility per unit time, `sqrt(wᵗ Σ w)`.
    pub fn basket_vol(&self) -> f64 {
        self.basket_vol
    }

    /// training_set — spots at `t1` with sampled payoffs and pathwise deltas.
    ///
    /// Errors
    /// ------
    /// - `SimulationError::ZeroSamples` if `n == 0`.
    pub fn training_set(&self, n: usize, seed: u64) -> SimulationResult<RawDataset> {
        if n == 0 {
            return Err(SimulationError::ZeroSamples);
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let s1 = self.brownian_increments(n, self.t1, &mut rng) + 1.0;
        let s2 = &s1 + &self.brownian_increments(n, self.t2 - self.t1, &mut rng);

        let basket = s2.dot(&self.weights);
        let y = basket.mapv(|b| (b - self.strike).max(0.0));
        let dydx = Array2::from_shape_fn((n, self.n_assets()), |(i, j)| {
            if basket[i] > self.strike { self.weights[j] } else { 0.0 }
        });

        tracing::debug!(samples = n, assets = self.n_assets(), seed, "simulated basket training set");
        Ok(RawDataset::new(s1, y, dydx)?)
    }

    /// analytic — closed-form prices and deltas at `t1`.
    ///
    /// Parameters
    /// ----------
    /// - `spots`: `samples × n_assets` spots at `t1`.
    ///
    /// Returns
    /// -------
    /// `(prices, deltas)` with `prices.len() == samples` and
    /// `deltas.dim() == spots.dim()`.
    ///
    /// Errors
    /// ------
    /// - `SimulationError::AssetDimMismatch` for a wrong column count.
    pub fn analytic(
        &self, spots: ArrayView2<'_, f64>,
    ) -> SimulationResult<(Array1<f64>, Array2<f64>)> {
        if spots.ncols() != self.n_assets() {
            return Err(SimulationError::AssetDimMismatch {
                expected: self.n_assets(),
                found: spots.ncols(),
            });
        }
        let normal = Normal::new(0.0, 1.0)?;
        let sigma = self.basket_vol * (self.t2 - self.t1).sqrt();

        let moneyness = spots.dot(&self.weights) - self.strike;
        let d = moneyness.mapv(|m| m / sigma);
        let prices: Array1<f64> = moneyness
            .iter()
            .zip(d.iter())
            .map(|(&m, &d)| m * normal.cdf(d) + sigma * normal.pdf(d))
            .collect();
        let cdf = d.mapv(|d| normal.cdf(d));
        let deltas = Array2::from_shape_fn(spots.dim(), |(i, j)| self.weights[j] * cdf[i]);

        Ok((prices, deltas))
    }

    /// test_set — simulated spots at `t1` labelled with analytic values.
    pub fn test_set(&self, n: usize, seed: u64) -> SimulationResult<RawDataset> {
        if n == 0 {
            return Err(SimulationError::ZeroSamples);
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let spots = self.brownian_increments(n, self.t1, &mut rng) + 1.0;
        let (prices, deltas) = self.analytic(spots.view())?;
        Ok(RawDataset::new(spots, prices, deltas)?)
    }

    // `n × d` correlated Gaussian increments over `horizon`.
    fn brownian_increments(&self, n: usize, horizon: f64, rng: &mut StdRng) -> Array2<f64> {
        let z: Array2<f64> =
            Array2::from_shape_simple_fn((n, self.n_assets()), || StandardNormal.sample(&mut *rng));
        z.dot(&self.chol_t) * horizon.sqrt()
    }
}
