use std::ops::{Add, Mul, Neg, Sub};
use units::{Angle, Area, Length, radian_};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Vector {
    pub x: Length,
    pub y: Length,
}

impl Vector {

    pub fn new(x: Length, y: Length) -> Self { Self { x, y } }

    pub fn from<T>(x: f32, y: f32) -> Self
    where
        T: units::uom::Conversion<f32, T = f32> + units::uom::si::length::Unit,
    {
        Self {
            x: Length::new::<T>(x),
            y: Length::new::<T>(y),
        }
    }

    /// Vector of the given `length`, at `angle` anticlockwise from the x-axis
    pub fn polar(length: Length, angle: Angle) -> Self {
        let (sin, cos) = radian_(angle).sin_cos();
        Self { x: length * cos, y: length * sin }
    }

    pub fn magnitude(&self) -> Length {
        let &Self { x, y } = self;
        (x*x + y*y).sqrt()
    }

    pub fn dot(self, other: Self) -> Area {
        self.x * other.x + self.y * other.y
    }

}

impl Add for Vector {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Vector { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub for Vector {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Vector { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Neg for Vector {
    type Output = Self;
    fn neg(self) -> Self::Output { Vector { x: -self.x, y: -self.y } }
}

impl Mul<f32> for Vector {
    type Output = Self;
    fn mul(self, rhs: f32) -> Self::Output {
        Vector { x: self.x * rhs, y: self.y * rhs }
    }
}

#[cfg(test)]
mod tests {
    use crate::Vector;
    use units::{assert_uom_eq, mm, cm, um, degree, uom::si::length::meter};
    use rstest::rstest;

    #[test]
    fn vector_components() {
        let v = Vector::new(mm(10.0), um(1000.0));
        assert_eq!(           v.x, mm(10.0));
        assert_uom_eq!(meter, v.y, cm( 0.1), ulps <= 2);
    }

    #[test]
    fn mul_f32_for_vector() {
        let v = Vector::new(mm(1.0), mm(2.0));
        let e = Vector::new(cm(1.0), cm(2.0));
        let r = v * 10.0;
        assert_uom_eq!(meter, r.x, e.x, ulps <= 2);
        assert_uom_eq!(meter, r.y, e.y, ulps <= 2);
    }

    #[rstest(/**/ x,    y,   magnitude,
             case(0.0,  0.0,  0.0),
             case(1.0,  0.0,  1.0),
             case(0.0, -1.0,  1.0),
             case(3.0,  4.0,  5.0),
             case(5.0, 12.0, 13.0),
    )]
    fn vector_magnitude(x: f32, y: f32, magnitude: f32) {
        let v = Vector::from::<meter>(x, y);
        assert_eq!(v.magnitude().get::<meter>(), magnitude);
    }

    #[rstest(/**/ angle,    x  ,   y  ,
             case(  0.0,   2.0,   0.0),
             case( 90.0,   0.0,   2.0),
             case(180.0,  -2.0,   0.0),
             case(270.0,   0.0,  -2.0),
    )]
    fn polar_vector(angle: f32, x: f32, y: f32) {
        let v = Vector::polar(mm(2.0), degree(angle));
        assert_uom_eq!(meter, v.x, mm(x), abs <= 1e-9);
        assert_uom_eq!(meter, v.y, mm(y), abs <= 1e-9);
    }

    #[test]
    fn perpendicular_vectors_have_zero_dot_product() {
        let a = Vector::polar(mm(3.0), degree(30.0));
        let b = Vector::polar(mm(5.0), degree(120.0));
        let d: f32 = a.dot(b).value;
        assert!(d.abs() < 1e-5, "dot product {d}");
    }

    #[test]
    fn components_in_mixed_units() {
        let v = Vector::from::<meter>(1.0, 2.0);
        assert_uom_eq!(meter, v.x, cm(100.0), ulps <= 1);
        assert_uom_eq!(meter, v.y, cm(200.0), ulps <= 1);
    }

}
