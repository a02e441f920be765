use std::ops::{Add, Sub};
use units::{Length, mm_, uom::ConstZero};
use units::todo::Lengthf32;
use crate::Vector;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: Length,
    pub y: Length,
}

impl Point {
    pub fn new(x: Length, y: Length) -> Self { Self { x, y } }
    pub fn origin() -> Self { Self { x: Length::ZERO, y: Length::ZERO } }

    /// Coordinates in mm, for use in inner loops
    pub fn mm(&self) -> [Lengthf32; 2] { [mm_(self.x), mm_(self.y)] }
}

impl Sub for Point {
    type Output = Vector;
    fn sub(self, rhs: Self) -> Self::Output {
        Vector { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl Add<Vector> for Point {
    type Output = Self;
    fn add(self, rhs: Vector) -> Self::Output {
        Point { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl Sub<Vector> for Point {
    type Output = Self;
    fn sub(self, rhs: Vector) -> Self::Output {
        Point { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use units::{mm, degree};
    #[allow(unused)] use pretty_assertions::{assert_eq, assert_ne};

    #[test]
    fn point_minus_point_is_vector() {
        let a = Point::new(mm(4.0), mm(6.0));
        let b = Point::new(mm(1.0), mm(2.0));
        assert_eq!(a - b, Vector::new(mm(3.0), mm(4.0)));
        assert_eq!((a - b).magnitude(), mm(5.0));
    }

    #[test]
    fn displace_and_return() {
        let p = Point::new(mm(-2.0), mm(7.5));
        let v = Vector::new(mm(0.5), mm(-1.5));
        assert_eq!(p + v - v, p);
        assert_eq!((p + v).mm(), [-1.5, 6.0]);
    }

    use proptest::prelude::*;
    proptest! {
        #[test]
        fn polar_displacement_preserves_distance(
            r     in 0.0..(300.0 as f32),
            angle in 0.0..(360.0 as f32),
        ) {
            let p = Point::origin() + Vector::polar(mm(r), degree(angle));
            let d = mm_((p - Point::origin()).magnitude());
            prop_assert!((d - r).abs() <= 1e-4 * r.max(1.0));
        }
    }
}
