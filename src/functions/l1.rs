use crate::container::DataContainer;
use crate::error::{ReconError, Result};

use super::{Function, shifted};

/// Shrink `x` towards zero by `tau`, stopping at zero
#[inline]
pub fn soft_threshold(x: f32, tau: f32) -> f32 {
    if      x >  tau { x - tau }
    else if x < -tau { x + tau }
    else             { 0.0 }
}

/// `f(x) = ‖x - b‖₁`, or `‖x‖₁` without data `b`
#[derive(Clone, Debug)]
pub struct L1Norm<X> {
    pub b: Option<X>,
}

impl<X: DataContainer> L1Norm<X> {
    pub fn new() -> Self { Self { b: None } }
    pub fn with_data(b: X) -> Self { Self { b: Some(b) } }
}

impl<X: DataContainer> Default for L1Norm<X> {
    fn default() -> Self { Self::new() }
}

impl<X: DataContainer> Function<X> for L1Norm<X> {

    fn value(&self, x: &X) -> Result<f32> {
        let d = shifted(x, self.b.as_ref())?;
        Ok(d.data().iter().map(|&v| v.abs() as f64).sum::<f64>() as f32)
    }

    /// `b + soft_threshold(x - b, τ)`
    fn proximal(&self, x: &X, tau: f32) -> Result<X> {
        if tau < 0.0 {
            return Err(ReconError::InvalidParameter(format!("proximal step must be non-negative, got {tau}")));
        }
        match &self.b {
            Some(b) => x.zip_map(b, |x, b| b + soft_threshold(x - b, tau)),
            None    => Ok(x.mapped(|x| soft_threshold(x, tau))),
        }
    }

    /// `⟨x*, b⟩` inside the unit ∞-ball, infinite outside it
    fn convex_conjugate(&self, x: &X) -> Result<f32> {
        if x.max_abs() > 1.0 { return Ok(f32::INFINITY) }
        match &self.b {
            Some(b) => x.dot(b),
            None    => Ok(0.0),
        }
    }

    fn name(&self) -> &'static str { "L1Norm" }
}
