use crate::container::DataContainer;
use crate::error::{ReconError, Result};

use super::Function;

/// `c f`, for a positive constant `c`
#[derive(Clone, Debug)]
pub struct ScaledFunction<F> {
    pub scalar: f32,
    pub function: F,
}

impl<F> ScaledFunction<F> {
    pub fn new(function: F, scalar: f32) -> Self { Self { scalar, function } }
}

impl<X, F> Function<X> for ScaledFunction<F>
where
    X: DataContainer,
    F: Function<X>,
{
    fn value(&self, x: &X) -> Result<f32> {
        Ok(self.scalar * self.function.value(x)?)
    }

    fn gradient(&self, x: &X) -> Result<X> {
        let c = self.scalar;
        Ok(self.function.gradient(x)?.mapped(|v| c * v))
    }

    /// `prox_{τ c f} = prox_{(cτ) f}`
    fn proximal(&self, x: &X, tau: f32) -> Result<X> {
        self.function.proximal(x, self.scalar * tau)
    }

    /// `(c f)*(x*) = c f*(x* / c)`
    fn convex_conjugate(&self, x: &X) -> Result<f32> {
        let c = self.scalar;
        if !(c > 0.0) {
            return Err(ReconError::InvalidParameter(format!(
                "conjugate of a function scaled by {c} is not defined")));
        }
        Ok(c * self.function.convex_conjugate(&x.mapped(|v| v / c))?)
    }

    fn lipschitz(&self) -> Option<f32> {
        self.function.lipschitz().map(|l| l * self.scalar.abs())
    }

    fn name(&self) -> &'static str { "ScaledFunction" }
}
