use ndarray::Zip;

use crate::container::DataContainer;
use crate::error::{ReconError, Result};

use super::Function;

/// Kullback-Leibler divergence of `x + η` from non-negative data `b`:
///
/// `Σ b log(b / (x + η)) - b + (x + η)`
///
/// the natural fidelity for Poisson-distributed measurements. `η` is a
/// background (scatter, randoms) added to the model, one value per element.
#[derive(Clone, Debug)]
pub struct KullbackLeibler<X> {
    b: X,
    eta: X,
}

impl<X: DataContainer> KullbackLeibler<X> {

    pub fn new(b: X) -> Result<Self> {
        let eta = b.zeros_like();
        Self::with_background(b, eta)
    }

    pub fn with_background(b: X, eta: X) -> Result<Self> {
        if b.data().iter().any(|&v| v < 0.0 || !v.is_finite()) {
            return Err(ReconError::InvalidParameter("Kullback-Leibler data must be finite and non-negative".into()));
        }
        b.check_same_shape(&eta)?;
        if let Some(bad) = eta.data().iter().find(|v| !v.is_finite()) {
            return Err(ReconError::InvalidParameter(format!("background must be finite, got {bad}")));
        }
        Ok(Self { b, eta })
    }

    /// The same background `eta` in every element
    pub fn with_uniform_background(b: X, eta: f32) -> Result<Self> {
        let eta = b.mapped(|_| eta);
        Self::with_background(b, eta)
    }

    pub fn data(&self) -> &X { &self.b }
    pub fn background(&self) -> &X { &self.eta }

    /// `(x, b, η)` per element in logical order, in double precision
    fn terms<'a>(&'a self, x: &'a X) -> impl Iterator<Item = (f64, f64, f64)> + 'a {
        x.data().iter()
            .zip(self.b.data().iter())
            .zip(self.eta.data().iter())
            .map(|((&x, &b), &eta)| (x as f64, b as f64, eta as f64))
    }

}

/// One term of the divergence, with `0 log 0 = 0`
fn kl_term(b: f64, v: f64) -> f64 {
    if b > 0.0 && v > 0.0 { b * (b / v).ln() - b + v }
    else if b == 0.0 && v >= 0.0 { v }
    else { f64::INFINITY }
}

impl<X: DataContainer> Function<X> for KullbackLeibler<X> {

    /// Sum over the elements where `x + η ≥ 0`
    fn value(&self, x: &X) -> Result<f32> {
        self.b.check_same_shape(x)?;
        let total: f64 = self.terms(x)
            .map(|(x, b, eta)| (b, x + eta))
            .filter(|&(_, v)| v >= 0.0)
            .map(|(b, v)| kl_term(b, v))
            .sum();
        Ok(total as f32)
    }

    /// `1 - b / (x + η)` where `x + η > 0`, zero elsewhere
    fn gradient(&self, x: &X) -> Result<X> {
        self.b.check_same_shape(x)?;
        let mut g = x.clone();
        Zip::from(g.data_mut()).and(self.b.data()).and(self.eta.data())
            .for_each(|g, &b, &eta| {
                let v = *g + eta;
                *g = if v > 0.0 { 1.0 - b / v } else { 0.0 };
            });
        Ok(g)
    }

    /// `½ ((x - η - τ) + sqrt((x + η - τ)² + 4τb))`
    fn proximal(&self, x: &X, tau: f32) -> Result<X> {
        self.b.check_same_shape(x)?;
        let mut z = x.clone();
        Zip::from(z.data_mut()).and(self.b.data()).and(self.eta.data())
            .for_each(|z, &b, &eta| {
                let x = *z;
                let root = ((x + eta - tau).powi(2) + 4.0 * tau * b).sqrt();
                *z = 0.5 * ((x - eta - tau) + root);
            });
        Ok(z)
    }

    /// `-Σ b log(1 - x*) - ⟨x*, η⟩`, summed where `1 - x* > 0`
    fn convex_conjugate(&self, x: &X) -> Result<f32> {
        self.b.check_same_shape(x)?;
        let total: f64 = self.terms(x)
            .map(|(x, b, eta)| {
                let log_term = if 1.0 - x > 0.0 && b != 0.0 { -b * (1.0 - x).ln() } else { 0.0 };
                log_term - eta * x
            })
            .sum();
        Ok(total as f32)
    }

    fn name(&self) -> &'static str { "KullbackLeibler" }
}
