//! Physical quantities used throughout the reconstruction code.
//!
//! Lengths are stored in millimetres, so that extracting the raw `f32` for the
//! inner loops (`mm_`) is free.

pub mod todo;

pub use uom;
pub use uom::si::Quantity;

pub mod mmps {

  pub mod f32 {
    use uom::{ISQ, system};
    ISQ!(uom::si, f32, (millimeter, kilogram, picosecond, ampere, kelvin, mole, candela));

    /// The full circle constant (τ) Equal to 2π.
    pub const TWOPI: Angle = Angle {
        dimension: std::marker::PhantomData,
        units: std::marker::PhantomData,
        value: std::f32::consts::TAU,
    };

    /// Half a turn: the extent of a parallel-beam scan.
    pub const PI: Angle = Angle {
        dimension: std::marker::PhantomData,
        units: std::marker::PhantomData,
        value: std::f32::consts::PI,
    };
  }

}

pub use mmps::f32::{Angle, Area, Length, Ratio, PI, TWOPI};

mod units {
  pub use uom::si::{length::{micrometer, millimeter, centimeter},
                    ratio ::ratio,
                    angle ::{radian, degree, revolution},
  };
}

// Making values from float literals is very long-winded, so provide some
// pithily-named convenience constructors.

/// Generate a function called NAME which returns QUANTITY by interpreting its
/// argument as UNIT
///
/// wrap!(NAME QUANTITY UNIT);
macro_rules! wrap {
  ($name:ident $quantity:ident $unit:ident ) => {
    pub fn $name(x: f32) -> $quantity { $quantity::new::<units::$unit>(x) }
  };
}

wrap!(um     Length  micrometer);
wrap!(mm     Length  millimeter);
wrap!(cm     Length  centimeter);
wrap!(ratio  Ratio        ratio);
wrap!(radian Angle       radian);
wrap!(degree Angle       degree);
wrap!(turn   Angle   revolution);

// Reverse direction of the above.
pub fn mm_(x: Length) -> f32 { x.get::<units::millimeter>() }
pub fn cm_(x: Length) -> f32 { x.get::<units::centimeter>() }

pub fn ratio_ (x: Ratio) -> f32 { x.get::<units::ratio>() }
pub fn radian_(x: Angle) -> f32 { x.get::<units::radian>() }
pub fn degree_(x: Angle) -> f32 { x.get::<units::degree>() }
pub fn turn_  (x: Angle) -> f32 { x.get::<units::revolution>() }

#[macro_export]
macro_rules! in_base_unit {
  ($value:expr) => {
    $crate::Quantity {
      dimension: std::marker::PhantomData,
      units: std::marker::PhantomData,
      value: $value,
    }
  };
}

#[macro_export]
macro_rules! assert_uom_eq {
  ($unit:ident, $lhs:expr, $rhs:expr, $algo:ident <= $tol:expr) => {
    float_eq::assert_float_eq!($lhs.get::<$unit>(), $rhs.get::<$unit>(), $algo <= $tol)
  };
}

#[cfg(test)]
mod tests {
  use super::*;
  use uom::si::length::micrometer;
  use uom::si::angle::degree;
  use float_eq::assert_float_eq;

  #[test]
  fn sum_of_lengths_in_mixed_units() {
    let v = vec![mm(1.0), cm(1.0)];
    let total: Length = v.into_iter().sum();
    assert_uom_eq!(micrometer, total, mm(11.0), ulps <= 1);
  }

  #[test]
  fn half_turn_is_pi() {
    assert_uom_eq!(degree, PI, turn(0.5), ulps <= 1);
    assert_uom_eq!(degree, TWOPI, radian(std::f32::consts::TAU), ulps <= 1);
  }

  #[test]
  fn parse_length_with_units() -> Result<(), Box<dyn std::error::Error>> {
    let l: Length = "2.5 mm".parse()?;
    assert_eq!(mm_(l), 2.5);
    let l: Length = "1 cm".parse()?;
    assert_uom_eq!(micrometer, l, mm(10.0), ulps <= 1);
    Ok(())
  }

  #[test]
  fn raw_value_is_in_millimetres() {
    let l: Length = in_base_unit!(3.0);
    assert_eq!(mm_(l), 3.0);
    assert_float_eq!(cm_(l), 0.3, ulps <= 2);
  }
}
