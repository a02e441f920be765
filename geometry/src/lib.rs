//! Points and displacements in the plane of a 2D slice, with `uom` lengths.

mod point;
mod vector;

pub use point::Point;
pub use vector::Vector;
