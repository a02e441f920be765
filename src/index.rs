use units::todo::Weightf32;

#[allow(non_camel_case_types)] pub type Index1_u = usize;
#[allow(non_camel_case_types)] pub type Index2_u = [usize; 2];
#[allow(non_camel_case_types)] pub type BoxDim_u = [usize; 2];

pub type Index1Weightf32 = (Index1_u, Weightf32);

// --------------------------------------------------------------------------------
//                  Conversion between 1d and 2d indices

use std::ops::{Add, Div, Mul, Rem};

/// `[ix, iy]` -> position in row-major storage of an image with `ny` rows of
/// `nx` voxels
pub fn index2_to_1<T>([ix, iy]: [T; 2], [nx, _ny]: [T; 2]) -> T
where
    T: Mul<Output = T> + Add<Output = T>
{
    ix + iy * nx
}

pub fn index1_to_2<T>(i: T, [nx, _ny]: [T; 2]) -> [T; 2]
where
    T: Div<Output = T> +
    Rem<Output = T> +
    Copy
{
    [i % nx, i / nx]
}
