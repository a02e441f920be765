//! The size and granularity of the reconstruction grid, and the images that
//! live on it.

use std::path::Path;

use ndarray::Array2;

use geometry::{Point, Vector};
use units::{Length, mm_, uom::ConstZero};
use units::todo::{Intensityf32, Lengthf32};

use crate::container::DataContainer;
use crate::error::{ReconError, Result};
use crate::index::{BoxDim_u, Index1_u, Index2_u, index1_to_2};
use crate::io;

pub type ImageData = Array2<Intensityf32>;

/// Voxel grid centred on the origin. Images are stored with one row per y
/// index, so the array shape is `[ny, nx]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageGeometry {
    pub n: BoxDim_u,
    pub voxel_size: [Length; 2],
    pub half_width: [Length; 2],
}

impl ImageGeometry {

    pub fn new(
        (nx, ny): (usize, usize),
        (dx, dy): (Length, Length),
    ) -> Result<Self> {
        if nx == 0 || ny == 0 {
            return Err(ReconError::InvalidGeometry(format!("image needs at least one voxel, got {nx} x {ny}")));
        }
        if !(dx > Length::ZERO && dy > Length::ZERO) {
            return Err(ReconError::InvalidGeometry(format!(
                "voxel size must be positive, got {} mm x {} mm", mm_(dx), mm_(dy))));
        }
        let half_width = [dx * (nx as f32 / 2.0), dy * (ny as f32 / 2.0)];
        Ok(Self { n: [nx, ny], voxel_size: [dx, dy], half_width })
    }

    pub fn square(n: usize, voxel_size: Length) -> Result<Self> {
        Self::new((n, n), (voxel_size, voxel_size))
    }

    /// Shape of the array holding an image on this grid
    pub fn shape(&self) -> [usize; 2] { let [nx, ny] = self.n; [ny, nx] }

    pub fn len(&self) -> usize { self.n[0] * self.n[1] }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Find centre of voxel with given 2D index
    pub fn voxel_centre(&self, [ix, iy]: Index2_u) -> Point {
        let [dx, dy] = self.voxel_size;
        let [hx, hy] = self.half_width;
        Point::new(dx * (ix as Lengthf32 + 0.5) - hx,
                   dy * (iy as Lengthf32 + 0.5) - hy)
    }

    /// Find centre of voxel with given 1D index
    pub fn voxel_centre1(&self, i: Index1_u) -> Point {
        self.voxel_centre(index1_to_2(i, self.n))
    }

    /// Length of the diagonal of the whole grid
    pub fn diagonal(&self) -> Length {
        let [hx, hy] = self.half_width;
        Vector::new(hx, hy).magnitude() * 2.0
    }

    /// A zero-filled image on this grid
    pub fn allocate(&self) -> Image { Image::zeros(*self) }

}

#[derive(Clone, Debug)]
pub struct Image {
    pub geometry: ImageGeometry,
    pub data: ImageData,
}

impl Image {

    pub fn new(geometry: ImageGeometry, data: ImageData) -> Result<Self> {
        let (rows, cols) = data.dim();
        if [rows, cols] != geometry.shape() {
            return Err(ReconError::shape_mismatch(&geometry.shape(), &[rows, cols]));
        }
        Ok(Image { geometry, data })
    }

    /// Build image from values in row-major order
    pub fn from_vec(geometry: ImageGeometry, data: Vec<Intensityf32>) -> Result<Self> {
        let [rows, cols] = geometry.shape();
        let actual = data.len();
        let data = Array2::from_shape_vec((rows, cols), data)
            .map_err(|_| ReconError::shape_mismatch(&[rows * cols], &[actual]))?;
        Ok(Image { geometry, data })
    }

    pub fn filled(geometry: ImageGeometry, value: Intensityf32) -> Self {
        let [rows, cols] = geometry.shape();
        Self { geometry, data: Array2::from_elem((rows, cols), value) }
    }

    pub fn zeros(geometry: ImageGeometry) -> Self { Self::filled(geometry, 0.0) }
    pub fn ones (geometry: ImageGeometry) -> Self { Self::filled(geometry, 1.0) }

    pub fn from_raw_file(path: &Path, geometry: ImageGeometry) -> Result<Self> {
        let data = io::raw::read(path)?.collect::<std::io::Result<_>>()?;
        Self::from_vec(geometry, data)
    }

    pub fn write_to_raw_file(&self, path: &Path) -> Result<()> {
        io::raw::write(self.data.iter().copied(), path)?;
        Ok(())
    }

}

impl DataContainer for Image {
    fn data(&self) -> &Array2<f32> { &self.data }
    fn data_mut(&mut self) -> &mut Array2<f32> { &mut self.data }
}

impl core::ops::IndexMut<Index1_u> for Image {
    #[inline]
    fn index_mut(&mut self, i: Index1_u) -> &mut Self::Output {
        let [ix, iy] = index1_to_2(i, self.geometry.n);
        &mut self.data[[iy, ix]]
    }
}

impl core::ops::Index<Index1_u> for Image {
    type Output = Intensityf32;
    #[inline]
    fn index(&self, i: Index1_u) -> &Self::Output {
        let [ix, iy] = index1_to_2(i, self.geometry.n);
        &self.data[[iy, ix]]
    }
}

impl core::ops::IndexMut<Index2_u> for Image {
    fn index_mut(&mut self, [ix, iy]: Index2_u) -> &mut Self::Output {
        &mut self.data[[iy, ix]]
    }
}

impl core::ops::Index<Index2_u> for Image {
    type Output = Intensityf32;
    fn index(&self, [ix, iy]: Index2_u) -> &Self::Output {
        &self.data[[iy, ix]]
    }
}
