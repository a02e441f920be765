use crate::error::Result;
use crate::projector::LinearOperator;

use super::{Function, not_supported};

/// `x ↦ f(A x)`: a function of the data, pulled back to image space through
/// a forward operator.
///
/// The Lipschitz constant of the gradient, `L_f ‖A‖²`, is fixed at
/// construction, so the (possibly expensive) operator norm is estimated only
/// once.
#[derive(Debug)]
pub struct FunctionOperatorComposition<'a, F, A> {
    function: F,
    operator: &'a A,
    lipschitz: Option<f32>,
}

impl<'a, F, A> FunctionOperatorComposition<'a, F, A>
where
    A: LinearOperator,
    F: Function<A::Range>,
{
    pub fn new(function: F, operator: &'a A) -> Result<Self> {
        let lipschitz = match function.lipschitz() {
            Some(l) => Some(l * operator.norm()?.powi(2)),
            None    => None,
        };
        Ok(Self { function, operator, lipschitz })
    }

    pub fn function(&self) -> &F { &self.function }
    pub fn operator(&self) -> &'a A { self.operator }
}

impl<'a, F, A> Function<A::Domain> for FunctionOperatorComposition<'a, F, A>
where
    A: LinearOperator,
    F: Function<A::Range>,
{
    fn value(&self, x: &A::Domain) -> Result<f32> {
        self.function.value(&self.operator.direct(x)?)
    }

    /// `Aᵀ ∇f(A x)`
    fn gradient(&self, x: &A::Domain) -> Result<A::Domain> {
        let ax = self.operator.direct(x)?;
        self.operator.adjoint(&self.function.gradient(&ax)?)
    }

    fn proximal(&self, _x: &A::Domain, _tau: f32) -> Result<A::Domain> {
        Err(not_supported(self.name(), "closed-form proximal operator"))
    }

    fn lipschitz(&self) -> Option<f32> { self.lipschitz }

    fn name(&self) -> &'static str { "FunctionOperatorComposition" }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_eq::assert_float_eq;
    use units::mm;
    use crate::container::DataContainer;
    use crate::error::ReconError;
    use crate::functions::{L1Norm, L2NormSquared};
    use crate::image::{Image, ImageGeometry};
    use crate::projector::{Identity, ParallelBeamProjector};
    use crate::sinogram::{AcquisitionGeometry, linspace_angles};

    fn image(values: [f32; 4]) -> Image {
        Image::from_vec(ImageGeometry::square(2, mm(1.0)).unwrap(), values.to_vec()).unwrap()
    }

    #[test]
    fn composition_with_identity_is_the_function() -> Result<()> {
        let b = image([1., 2., 3., 4.]);
        let x = image([0., 2., 5., 3.]);
        let id = Identity::new(&b);
        let f = FunctionOperatorComposition::new(L2NormSquared::with_data(b.clone()), &id)?;
        let g = L2NormSquared::with_data(b);
        assert_eq!(f.value(&x)?, g.value(&x)?);
        assert_eq!(f.gradient(&x)?.data, g.gradient(&x)?.data);
        assert_eq!(f.lipschitz(), Some(2.0));
        assert!(matches!(f.proximal(&x, 1.0), Err(ReconError::NotSupported(_))));
        Ok(())
    }

    #[test]
    fn non_smooth_function_gives_no_lipschitz_constant() -> Result<()> {
        let id = Identity::new(&image([0.; 4]));
        let f = FunctionOperatorComposition::new(L1Norm::<Image>::new(), &id)?;
        assert_eq!(f.lipschitz(), None);
        Ok(())
    }

    #[test]
    fn gradient_matches_finite_differences() -> Result<()> {
        let image_geometry = ImageGeometry::square(6, mm(1.0))?;
        let acquisition = AcquisitionGeometry::parallel_2d(linspace_angles(5), 9, mm(1.0))?;
        let projector = ParallelBeamProjector::new(image_geometry, acquisition);
        let mut truth = image_geometry.allocate();
        truth[[2, 3]] = 1.0;
        truth[[4, 1]] = 2.0;
        let data = projector.direct(&truth)?;
        let f = FunctionOperatorComposition::new(L2NormSquared::with_data(data), &projector)?;

        let x = image_geometry.allocate().mapped(|_| 0.25);
        let gradient = f.gradient(&x)?;
        // The objective is quadratic, so central differences are exact up to
        // rounding
        let h = 0.5;
        for voxel in [0_usize, 15, 22, 35] {
            let mut plus  = x.clone(); plus [voxel] += h;
            let mut minus = x.clone(); minus[voxel] -= h;
            let numerical = (f.value(&plus)? - f.value(&minus)?) / (2.0 * h);
            assert_float_eq!(numerical, gradient[voxel], abs <= 1e-2 * (1.0 + gradient[voxel].abs()));
        }
        Ok(())
    }
}
