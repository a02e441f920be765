//! Comparing reconstructions with each other and with the ground truth

use crate::container::DataContainer;
use crate::error::Result;

/// Element-wise `|a - b|`
pub fn abs_difference<X: DataContainer>(a: &X, b: &X) -> Result<X> {
    a.zip_map(b, |a, b| (a - b).abs())
}

/// Root mean square difference between `a` and `b`
pub fn rmse<X: DataContainer>(a: &X, b: &X) -> Result<f32> {
    let difference = a.zip_map(b, |a, b| a - b)?;
    if difference.is_empty() { return Ok(0.0) }
    Ok((difference.squared_norm() / difference.len() as f32).sqrt())
}

/// Summary statistics of a (non-negative) difference image
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Comparison {
    pub max: f32,
    pub mean: f32,
    pub rmse: f32,
}

impl Comparison {
    pub fn of<X: DataContainer>(difference: &X) -> Self {
        let n = difference.len().max(1) as f32;
        Self {
            max: difference.max_abs(),
            mean: difference.sum() / n,
            rmse: (difference.squared_norm() / n).sqrt(),
        }
    }

    pub fn between<X: DataContainer>(a: &X, b: &X) -> Result<Self> {
        Ok(Self::of(&abs_difference(a, b)?))
    }
}

impl std::fmt::Display for Comparison {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "max {:.4}  mean {:.4}  rmse {:.4}", self.max, self.mean, self.rmse)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use float_eq::assert_float_eq;
    use units::mm;
    use crate::error::ReconError;
    use crate::image::{Image, ImageGeometry};
    use proptest::prelude::*;

    fn image(values: [f32; 4]) -> Image {
        Image::from_vec(ImageGeometry::square(2, mm(1.0)).unwrap(), values.to_vec()).unwrap()
    }

    #[test]
    fn difference_is_absolute() -> Result<()> {
        let d = abs_difference(&image([1., 5., -2., 0.]), &image([3., 5., 2., -1.]))?;
        assert_eq!(d.data.into_raw_vec(), vec![2., 0., 4., 1.]);
        Ok(())
    }

    #[test]
    fn mismatched_shapes_are_rejected() {
        let other = ImageGeometry::square(3, mm(1.0)).unwrap().allocate();
        assert!(matches!(abs_difference(&image([0.; 4]), &other), Err(ReconError::ShapeMismatch { .. })));
    }

    #[test]
    fn summary_statistics() -> Result<()> {
        let c = Comparison::between(&image([1., 5., -2., 0.]), &image([3., 5., 2., -1.]))?;
        assert_eq!(c.max, 4.0);
        assert_eq!(c.mean, 7.0 / 4.0);
        assert_float_eq!(c.rmse, (21.0_f32 / 4.0).sqrt(), rel <= 1e-6);
        assert_float_eq!(rmse(&image([1., 5., -2., 0.]), &image([3., 5., 2., -1.]))?, c.rmse, rel <= 1e-6);
        Ok(())
    }

    proptest! {
        #[test]
        fn difference_is_symmetric_non_negative_and_zero_on_self(
            a in proptest::array::uniform4(-100.0f32..100.0),
            b in proptest::array::uniform4(-100.0f32..100.0),
        ) {
            let (a, b) = (image(a), image(b));
            let ab = abs_difference(&a, &b).unwrap();
            let ba = abs_difference(&b, &a).unwrap();
            prop_assert_eq!(&ab.data, &ba.data);
            prop_assert!(ab.data.iter().all(|&v| v >= 0.0));
            prop_assert_eq!(abs_difference(&a, &a).unwrap().max_abs(), 0.0);
        }
    }
}
