//! Linear operators mapping between data containers: the tomographic
//! projector and the identity.

pub use siddon::ParallelBeamProjector;

pub mod siddon;

/// Number of power-method iterations used to estimate operator norms, unless
/// the caller asks for something else.
pub const POWER_METHOD_ITERATIONS: usize = 25;

/// A linear map `A` from `Domain` to `Range`, together with its adjoint `Aᵀ`
pub trait LinearOperator: Send + Sync {
    type Domain: DataContainer;
    type Range : DataContainer;

    /// `A x`
    fn direct (&self, x: &Self::Domain) -> Result<Self::Range>;

    /// `Aᵀ y`
    fn adjoint(&self, y: &Self::Range) -> Result<Self::Domain>;

    fn domain_zeros(&self) -> Self::Domain;
    fn range_zeros (&self) -> Self::Range;

    /// Largest singular value of `A`
    fn norm(&self) -> Result<f32> { power_method(self, POWER_METHOD_ITERATIONS) }
}

/// Estimate the largest singular value of `op` by power iteration on `AᵀA`.
///
/// Starts from a constant vector, so the estimate is reproducible. For
/// operators with non-negative elements (such as projectors) the dominant
/// eigenvector of `AᵀA` is non-negative, so the start vector is never
/// orthogonal to it.
pub fn power_method<A>(op: &A, iterations: usize) -> Result<f32>
where
    A: LinearOperator + ?Sized,
{
    let mut x = op.domain_zeros();
    if x.is_empty() { return Ok(0.0) }
    x.fill(1.0 / (x.len() as f32).sqrt());
    let mut eigenvalue = 0.0;
    for _ in 0..iterations {
        let ax = op.direct(&x)?;
        let mut atax = op.adjoint(&ax)?;
        eigenvalue = atax.norm();
        if eigenvalue == 0.0 { return Ok(0.0) }
        atax.map_inplace(|v| v / eigenvalue);
        x = atax;
    }
    Ok(eigenvalue.sqrt())
}

/// `I x = x` on containers shaped like the template it was built from
#[derive(Clone, Debug)]
pub struct Identity<X> {
    template: X,
}

impl<X: DataContainer> Identity<X> {
    pub fn new(like: &X) -> Self { Self { template: like.zeros_like() } }
}

impl<X: DataContainer> LinearOperator for Identity<X> {
    type Domain = X;
    type Range  = X;

    fn direct(&self, x: &X) -> Result<X> {
        self.template.check_same_shape(x)?;
        Ok(x.clone())
    }

    fn adjoint(&self, y: &X) -> Result<X> { self.direct(y) }

    fn domain_zeros(&self) -> X { self.template.clone() }
    fn range_zeros (&self) -> X { self.template.clone() }

    fn norm(&self) -> Result<f32> { Ok(1.0) }
}

pub fn elementwise_add(a: Vec<f32>, b: Vec<f32>) -> Vec<f32> {
    a.iter().zip(b.iter()).map(|(l,r)| l+r).collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use float_eq::assert_float_eq;
    use units::mm;
    use crate::image::{Image, ImageGeometry};

    /// Scales every element by a constant
    struct Scale(f32, Image);

    impl LinearOperator for Scale {
        type Domain = Image;
        type Range  = Image;
        fn direct (&self, x: &Image) -> Result<Image> { Ok(x.mapped(|v| v * self.0)) }
        fn adjoint(&self, y: &Image) -> Result<Image> { self.direct(y) }
        fn domain_zeros(&self) -> Image { self.1.zeros_like() }
        fn range_zeros (&self) -> Image { self.1.zeros_like() }
    }

    fn grid() -> Image { ImageGeometry::new((4, 3), (mm(1.0), mm(1.0))).unwrap().allocate() }

    #[test]
    fn identity_returns_its_input() -> Result<()> {
        let mut x = grid();
        x[[2, 1]] = 3.5;
        let id = Identity::new(&x);
        assert_eq!(id.direct(&x)?.data, x.data);
        assert_eq!(id.adjoint(&x)?.data, x.data);
        Ok(())
    }

    #[test]
    fn identity_norm_is_one() -> Result<()> {
        let id = Identity::new(&grid());
        assert_eq!(id.norm()?, 1.0);
        assert_float_eq!(power_method(&id, 5)?, 1.0, rel <= 1e-6);
        Ok(())
    }

    #[test]
    fn identity_rejects_wrongly_shaped_input() {
        let id = Identity::new(&grid());
        let other = ImageGeometry::square(3, mm(1.0)).unwrap().allocate();
        assert!(id.direct(&other).is_err());
    }

    #[test]
    fn power_method_finds_scale_factor() -> Result<()> {
        assert_float_eq!(Scale(-2.5, grid()).norm()?, 2.5, rel <= 1e-5);
        assert_eq!(Scale(0.0, grid()).norm()?, 0.0);
        Ok(())
    }
}

// ----- Imports -----------------------------------------------------------------------------------------
use crate::{
    container::DataContainer,
    error::Result,
};
