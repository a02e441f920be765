//! Simulated measurement noise, reproducible from a seed.

use rand::{SeedableRng, rngs::StdRng};
use rand_distr::{Distribution, Normal, Poisson};

use crate::container::DataContainer;
use crate::error::{ReconError, Result};

/// Copy of `data` with independent `Normal(mean, std_dev)` samples added to
/// every element.
///
/// Samples are drawn in row-major order from a generator seeded with `seed`,
/// so the same seed always gives the same noisy data.
pub fn add_gaussian<X: DataContainer>(data: &X, mean: f32, std_dev: f32, seed: u64) -> Result<X> {
    if !mean.is_finite() {
        return Err(ReconError::InvalidParameter(format!("noise mean must be finite, got {mean}")));
    }
    if !(std_dev.is_finite() && std_dev >= 0.0) {
        return Err(ReconError::InvalidParameter(format!(
            "noise standard deviation must be finite and non-negative, got {std_dev}")));
    }
    let normal = Normal::new(mean, std_dev)
        .map_err(|e| ReconError::InvalidParameter(format!("normal distribution: {e}")))?;
    let mut rng = StdRng::seed_from_u64(seed);
    let mut noisy = data.clone();
    for v in noisy.data_mut().iter_mut() {
        *v += normal.sample(&mut rng);
    }
    Ok(noisy)
}

/// Copy of `data` in which every element is replaced by a Poisson sample with
/// that element as its mean. Non-positive elements become zero.
pub fn add_poisson<X: DataContainer>(data: &X, seed: u64) -> Result<X> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut noisy = data.clone();
    for v in noisy.data_mut().iter_mut() {
        let mean = *v;
        *v = if mean > 0.0 {
            let poisson = Poisson::new(mean)
                .map_err(|e| ReconError::InvalidParameter(format!("poisson mean {mean}: {e}")))?;
            poisson.sample(&mut rng)
        } else {
            0.0
        };
    }
    Ok(noisy)
}

/// How measurement noise is simulated
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NoiseModel {
    Gaussian { mean: f32, std_dev: f32 },
    Poisson,
}

impl Default for NoiseModel {
    fn default() -> Self { Self::Gaussian { mean: 0.0, std_dev: 3.0 } }
}

impl NoiseModel {
    pub fn apply<X: DataContainer>(&self, data: &X, seed: u64) -> Result<X> {
        match *self {
            Self::Gaussian { mean, std_dev } => add_gaussian(data, mean, std_dev, seed),
            Self::Poisson                    => add_poisson (data, seed),
        }
    }
}
