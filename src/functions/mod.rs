//! Convex functions on data containers: the building blocks of the objectives
//! minimised by the solvers.
//!
//! Each function knows its value and, where they exist in closed form, its
//! gradient, proximal operator, convex conjugate and the Lipschitz constant
//! of its gradient. Anything a function cannot provide is reported as
//! [`ReconError::NotSupported`].

pub mod composition;
pub mod kl;
pub mod l1;
pub mod l2;
pub mod scaled;
pub mod zero;

pub use composition::FunctionOperatorComposition;
pub use kl::KullbackLeibler;
pub use l1::{L1Norm, soft_threshold};
pub use l2::L2NormSquared;
pub use scaled::ScaledFunction;
pub use zero::ZeroFunction;

pub trait Function<X: DataContainer> {

    fn value(&self, x: &X) -> Result<f32>;

    fn gradient(&self, _x: &X) -> Result<X> {
        Err(not_supported(self.name(), "gradient"))
    }

    /// `prox_{τf}(x) = argmin_z f(z) + ‖z - x‖² / 2τ`
    fn proximal(&self, _x: &X, _tau: f32) -> Result<X> {
        Err(not_supported(self.name(), "proximal operator"))
    }

    /// `f*(x*) = sup_x ⟨x*, x⟩ - f(x)`
    fn convex_conjugate(&self, _x: &X) -> Result<f32> {
        Err(not_supported(self.name(), "convex conjugate"))
    }

    /// Lipschitz constant of the gradient, if the function is smooth
    fn lipschitz(&self) -> Option<f32> { None }

    fn name(&self) -> &'static str;

    /// `c f`
    fn scaled(self, scalar: f32) -> ScaledFunction<Self>
    where
        Self: Sized,
    {
        ScaledFunction::new(self, scalar)
    }

}

/// Functions chosen at run time (eg. the regularizer named in a config file)
/// are passed around boxed.
impl<X, F> Function<X> for Box<F>
where
    X: DataContainer,
    F: Function<X> + ?Sized,
{
    fn value           (&self, x: &X) -> Result<f32> { (**self).value(x) }
    fn gradient        (&self, x: &X) -> Result<X>   { (**self).gradient(x) }
    fn proximal        (&self, x: &X, tau: f32) -> Result<X> { (**self).proximal(x, tau) }
    fn convex_conjugate(&self, x: &X) -> Result<f32> { (**self).convex_conjugate(x) }
    fn lipschitz       (&self) -> Option<f32> { (**self).lipschitz() }
    fn name            (&self) -> &'static str { (**self).name() }
}

pub(crate) fn not_supported(name: &str, what: &str) -> ReconError {
    ReconError::NotSupported(format!("{name} has no {what}"))
}

/// `x - b`, or `x` itself when there is no `b`
pub(crate) fn shifted<X: DataContainer>(x: &X, b: Option<&X>) -> Result<X> {
    match b {
        Some(b) => x.zip_map(b, |x, b| x - b),
        None    => Ok(x.clone()),
    }
}

// ----- Imports -----------------------------------------------------------------------------------------
use crate::{
    container::DataContainer,
    error::{ReconError, Result},
};
