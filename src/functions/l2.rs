use crate::container::DataContainer;
use crate::error::Result;

use super::{Function, shifted};

/// `f(x) = ‖x - b‖²`, or `‖x‖²` without data `b`
#[derive(Clone, Debug)]
pub struct L2NormSquared<X> {
    pub b: Option<X>,
}

impl<X: DataContainer> L2NormSquared<X> {
    pub fn new() -> Self { Self { b: None } }
    pub fn with_data(b: X) -> Self { Self { b: Some(b) } }
}

impl<X: DataContainer> Default for L2NormSquared<X> {
    fn default() -> Self { Self::new() }
}

impl<X: DataContainer> Function<X> for L2NormSquared<X> {

    fn value(&self, x: &X) -> Result<f32> {
        Ok(shifted(x, self.b.as_ref())?.squared_norm())
    }

    fn gradient(&self, x: &X) -> Result<X> {
        Ok(shifted(x, self.b.as_ref())?.mapped(|v| 2.0 * v))
    }

    /// `(x + 2τ b) / (1 + 2τ)`
    fn proximal(&self, x: &X, tau: f32) -> Result<X> {
        let scale = 1.0 / (1.0 + 2.0 * tau);
        match &self.b {
            Some(b) => x.zip_map(b, |x, b| (x + 2.0 * tau * b) * scale),
            None    => Ok(x.mapped(|x| x * scale)),
        }
    }

    /// `¼‖x*‖² + ⟨x*, b⟩`
    fn convex_conjugate(&self, x: &X) -> Result<f32> {
        let quadratic = x.squared_norm() / 4.0;
        Ok(match &self.b {
            Some(b) => quadratic + x.dot(b)?,
            None    => quadratic,
        })
    }

    fn lipschitz(&self) -> Option<f32> { Some(2.0) }

    fn name(&self) -> &'static str { "L2NormSquared" }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_eq::assert_float_eq;
    use units::mm;
    use crate::image::{Image, ImageGeometry};

    fn image(values: [f32; 4]) -> Image {
        Image::from_vec(ImageGeometry::square(2, mm(1.0)).unwrap(), values.to_vec()).unwrap()
    }

    #[test]
    fn value_and_gradient() -> Result<()> {
        let f = L2NormSquared::with_data(image([1., 1., 1., 1.]));
        let x = image([1., 2., 3., -1.]);
        assert_float_eq!(f.value(&x)?, 0. + 1. + 4. + 4., ulps <= 1);
        assert_eq!(f.gradient(&x)?.data.into_raw_vec(), vec![0., 2., 4., -4.]);
        assert_eq!(L2NormSquared::<Image>::new().value(&x)?, 15.0);
        Ok(())
    }

    #[test]
    fn proximal_minimises_its_objective() -> Result<()> {
        // The prox of τf at v is where ∇f(z) + (z - v)/τ = 0
        let b = image([3., -1., 0.5, 2.]);
        let f = L2NormSquared::with_data(b);
        let v = image([0., 4., -2., 2.]);
        let tau = 0.7;
        let z = f.proximal(&v, tau)?;
        let residual = f.gradient(&z)?.zip_map(&z.zip_map(&v, |z, v| (z - v) / tau)?, |g, d| g + d)?;
        assert_float_eq!(residual.max_abs(), 0.0, abs <= 1e-5);
        Ok(())
    }

    #[test]
    fn conjugate_at_gradient_satisfies_fenchel_young_equality() -> Result<()> {
        // f(x) + f*(∇f(x)) = ⟨x, ∇f(x)⟩
        let f = L2NormSquared::with_data(image([1., -2., 0., 5.]));
        let x = image([0.5, 1., -3., 4.]);
        let g = f.gradient(&x)?;
        let lhs = f.value(&x)? + f.convex_conjugate(&g)?;
        assert_float_eq!(lhs, x.dot(&g)?, rel <= 1e-6);
        Ok(())
    }

    #[test]
    fn data_of_wrong_shape_is_an_error() {
        let f = L2NormSquared::with_data(image([0.; 4]));
        let x = ImageGeometry::square(3, mm(1.0)).unwrap().allocate();
        assert!(f.value(&x).is_err());
    }
}
