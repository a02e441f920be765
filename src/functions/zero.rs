use crate::container::DataContainer;
use crate::error::Result;

use super::Function;

/// `f(x) = 0`: the regularizer of an unregularized least-squares problem
#[derive(Clone, Copy, Debug, Default)]
pub struct ZeroFunction;

impl<X: DataContainer> Function<X> for ZeroFunction {

    fn value(&self, _x: &X) -> Result<f32> { Ok(0.0) }

    fn gradient(&self, x: &X) -> Result<X> { Ok(x.zeros_like()) }

    fn proximal(&self, x: &X, _tau: f32) -> Result<X> { Ok(x.clone()) }

    /// Indicator of `{0}`
    fn convex_conjugate(&self, x: &X) -> Result<f32> {
        Ok(if x.max_abs() == 0.0 { 0.0 } else { f32::INFINITY })
    }

    fn lipschitz(&self) -> Option<f32> { Some(0.0) }

    fn name(&self) -> &'static str { "ZeroFunction" }
}
