//! Ray-driven parallel-beam projection, with the intersection lengths of each
//! ray with the voxels it crosses found by Siddon's algorithm.

/// Sparse row of the system matrix: the voxels crossed by one ray, and the
/// length of the ray inside each of them.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SystemMatrixRow(pub Vec<Index1Weightf32>);

impl SystemMatrixRow {
    pub fn iter(&self) -> std::slice::Iter<'_, Index1Weightf32> { self.0.iter() }
    pub fn len(&self) -> usize { self.0.len() }
    pub fn is_empty(&self) -> bool { self.0.is_empty() }
    pub fn clear(&mut self) { self.0.clear() }

    /// Total length of the ray inside the image
    pub fn chord(&self) -> Lengthf32 { self.iter().map(|(_, w)| w).sum() }

    /// Line integral of `image` (stored in row-major order) along the ray
    #[inline]
    pub fn forward_project(&self, image: &[Intensityf32]) -> Intensityf32 {
        self.iter().map(|&(i, w)| image[i] * w).sum()
    }

    /// Smear `value` back along the ray into `image`
    #[inline]
    pub fn back_project(&self, value: Intensityf32, image: &mut [Intensityf32]) {
        for &(i, w) in self.iter() {
            image[i] += value * w;
        }
    }
}

impl IntoIterator for SystemMatrixRow {
    type Item = Index1Weightf32;
    type IntoIter = std::vec::IntoIter<Self::Item>;
    fn into_iter(self) -> Self::IntoIter { self.0.into_iter() }
}

/// Forward and back projection between an image grid and a 2D parallel-beam
/// sinogram.
///
/// The system matrix is small for 2D problems, so it is computed once, at
/// construction, and reused by every projection.
#[derive(Debug)]
pub struct ParallelBeamProjector {
    image_geometry: ImageGeometry,
    acquisition_geometry: AcquisitionGeometry,
    system_matrix: Vec<SystemMatrixRow>,
    norm: OnceLock<f32>,
}

impl ParallelBeamProjector {

    pub fn new(image_geometry: ImageGeometry, acquisition_geometry: AcquisitionGeometry) -> Self {
        let rays: Vec<(usize, usize)> = (0..acquisition_geometry.n_angles())
            .flat_map(|a| (0..acquisition_geometry.n_detectors).map(move |k| (a, k)))
            .collect();

        #[cfg    (feature = "serial") ] let iter = rays.    iter();
        #[cfg(not(feature = "serial"))] let iter = rays.par_iter();

        let system_matrix: Vec<SystemMatrixRow> = iter
            .map(|&(a, k)| {
                let (p1, p2) = ray_endpoints(&image_geometry, &acquisition_geometry, a, k);
                system_matrix_row(p1, p2, &image_geometry)
            })
            .collect();

        let nonzero: usize = system_matrix.iter().map(SystemMatrixRow::len).sum();
        debug!(rays = system_matrix.len(), nonzero, "parallel-beam system matrix ready");

        Self { image_geometry, acquisition_geometry, system_matrix, norm: OnceLock::new() }
    }

    pub fn image_geometry(&self) -> &ImageGeometry { &self.image_geometry }
    pub fn acquisition_geometry(&self) -> &AcquisitionGeometry { &self.acquisition_geometry }

    /// The row of the system matrix belonging to detector `k` at angle `a`
    pub fn row(&self, a: usize, k: usize) -> &SystemMatrixRow {
        &self.system_matrix[a * self.acquisition_geometry.n_detectors + k]
    }

}

impl LinearOperator for ParallelBeamProjector {
    type Domain = Image;
    type Range  = Sinogram;

    fn direct(&self, x: &Image) -> Result<Sinogram> {
        let expected = self.image_geometry.shape();
        if x.shape() != expected {
            return Err(ReconError::shape_mismatch(&expected, &x.shape()));
        }
        // Logical iteration order is row-major whatever the memory layout
        let image: Vec<Intensityf32> = x.data.iter().copied().collect();

        #[cfg    (feature = "serial") ] let iter = self.system_matrix.    iter();
        #[cfg(not(feature = "serial"))] let iter = self.system_matrix.par_iter();

        let values = iter.map(|row| row.forward_project(&image)).collect();
        Sinogram::from_vec(self.acquisition_geometry.clone(), values)
    }

    fn adjoint(&self, y: &Sinogram) -> Result<Image> {
        let expected = self.acquisition_geometry.shape();
        if y.shape() != expected {
            return Err(ReconError::shape_mismatch(&expected, &y.shape()));
        }
        let n_voxels = self.image_geometry.len();

        // Closure preparing the state needed by `fold`: will be called by
        // `fold` at the start of every thread that is launched.
        let initial_thread_state = || vec![0.0; n_voxels];

        // Parallel fold takes a function which will return ID value;
        // serial fold takes the ID value itself.
        #[cfg (feature = "serial")]
        let initial_thread_state = initial_thread_state();

        let values: Vec<Intensityf32> = y.data.iter().copied().collect();

        #[cfg    (feature = "serial") ] let iter = self.system_matrix.    iter().zip(values.    iter());
        #[cfg(not(feature = "serial"))] let iter = self.system_matrix.par_iter().zip(values.par_iter());

        let fold_result = iter.fold(initial_thread_state, |mut backprojection, (row, &value)| {
            if value != 0.0 { row.back_project(value, &mut backprojection) }
            backprojection
        });

        // In the serial case, there is a single result ...
        #[cfg (feature = "serial")]
        let backprojection = fold_result;

        // ... in the parallel case, the results from each thread must be
        // combined
        #[cfg(not(feature = "serial"))]
        let backprojection = fold_result.reduce(|| vec![0.0; n_voxels], elementwise_add);

        Image::from_vec(self.image_geometry, backprojection)
    }

    fn domain_zeros(&self) -> Image { self.image_geometry.allocate() }
    fn range_zeros (&self) -> Sinogram { self.acquisition_geometry.allocate() }

    /// Power-method estimate, computed on first use and cached
    fn norm(&self) -> Result<f32> {
        if let Some(&norm) = self.norm.get() { return Ok(norm) }
        let norm = power_method(self, POWER_METHOD_ITERATIONS)?;
        debug!(norm, "estimated projector norm");
        Ok(*self.norm.get_or_init(|| norm))
    }
}

/// Two points, outside the image on either side, on the ray measured by
/// detector `k` at angle `a`.
///
/// The detector axis is `u = (cos θ, sin θ)` and rays travel along
/// `d = (-sin θ, cos θ)`, passing through `s_k u`.
pub fn ray_endpoints(
    image: &ImageGeometry,
    acquisition: &AcquisitionGeometry,
    a: usize,
    k: usize
) -> (Point, Point) {
    let theta = acquisition.angles[a];
    let s = acquisition.detector_offset(k);
    let through = Point::origin() + Vector::polar(s, theta);
    // Anything longer than half the diagonal reaches beyond the image
    let reach = Vector::polar(image.diagonal(), theta + PI / 2.0);
    (through - reach, through + reach)
}

/// Where and how a ray enters the image, in the form needed to start walking
/// along it.
#[derive(Clone, Copy, Debug)]
pub struct GridHit {
    /// Distance along the ray, from the entry point, to the next voxel
    /// boundary in each dimension
    pub next_boundary: [Length; 2],
    /// Distance along the ray needed to cross one voxel in each dimension.
    /// Infinite for any axis parallel to the ray.
    pub voxel_size: [Length; 2],
    /// Flat index of the first voxel crossed
    pub index: i32,
    /// Change in flat index on crossing a boundary in each dimension
    pub delta_index: [i32; 2],
    /// Voxel boundaries left to cross before leaving the image, per dimension
    pub remaining: [i32; 2],
}

const EPS: Ratiof32 = 1e-5;

// Direction components smaller than this are treated as exactly parallel to
// the axis. `cos(π/2)` in f32 is about 4e-8.
const PARALLEL: Ratiof32 = 1e-6;

/// Find where the ray from `p1` to `p2` enters the image, if it hits it at all
pub fn ray_grid_hit(p1: Point, p2: Point, geometry: &ImageGeometry) -> Option<GridHit> {
    let [x1, y1] = p1.mm();
    let [x2, y2] = p2.mm();
    let length = (x2 - x1).hypot(y2 - y1);
    if length == 0.0 { return None }

    let origin = [x1, y1];
    let direction = [(x2 - x1) / length, (y2 - y1) / length]
        .map(|c| if c.abs() < PARALLEL { 0.0 } else { c });
    let half_width = geometry.half_width.map(mm_);
    let voxel_size = geometry.voxel_size.map(mm_);
    let [nx, ny] = geometry.n;
    let n = [nx as i32, ny as i32];
    let stride = [1, nx as i32];

    // Clip the ray against each pair of parallel faces in turn
    let mut t_enter: Lengthf32 = 0.0;
    let mut t_exit = length;
    for d in 0..2 {
        if direction[d] == 0.0 {
            // Treat the image as half-open, so rays along internal voxel
            // boundaries belong to exactly one column (or row)
            if origin[d] < -half_width[d] || origin[d] >= half_width[d] { return None }
        } else {
            let a = (-half_width[d] - origin[d]) / direction[d];
            let b = ( half_width[d] - origin[d]) / direction[d];
            t_enter = t_enter.max(a.min(b));
            t_exit  = t_exit .min(a.max(b));
        }
    }
    if t_exit <= t_enter { return None }

    let mut next_boundary = [Length::ZERO; 2];
    let mut crossing      = [Length::ZERO; 2];
    let mut delta_index   = [0; 2];
    let mut remaining     = [0; 2];
    let mut index = 0;
    for d in 0..2 {
        // Work in a frame where the ray moves towards higher coordinates, with
        // the lower boundary of the image at zero.
        let flipped = direction[d] < 0.0;
        let position = origin[d] + t_enter * direction[d];
        let from_edge = if flipped { half_width[d] - position } else { position + half_width[d] };

        // Entry point in voxel coordinates: floor = index of voxel. Values
        // which should be zero usually miss slightly; if negative, `floor`
        // would pick the wrong voxel.
        let v = from_edge / voxel_size[d];
        let v = if v.abs() < EPS { 0.0 } else { v };
        let j = (v.floor() as i32).clamp(0, n[d] - 1);

        let i = if flipped { n[d] - 1 - j } else { j };
        index += i * stride[d];
        delta_index[d] = if flipped { -stride[d] } else { stride[d] };
        remaining[d] = n[d] - j;

        if direction[d] == 0.0 {
            next_boundary[d] = mm(f32::INFINITY);
            crossing     [d] = mm(f32::INFINITY);
        } else {
            let step = voxel_size[d] / direction[d].abs();
            let frac_done = v - j as f32;
            next_boundary[d] = mm((1.0 - frac_done) * step);
            crossing     [d] = mm(step);
        }
    }

    Some(GridHit { next_boundary, voxel_size: crossing, index, delta_index, remaining })
}

/// All the voxels crossed by the ray from `p1` to `p2`, with the length of the
/// ray in each one.
pub fn system_matrix_row(p1: Point, p2: Point, geometry: &ImageGeometry) -> SystemMatrixRow {
    let mut row = SystemMatrixRow::default();
    if let Some(hit) = ray_grid_hit(p1, p2, geometry) {
        update_smatrix_row(&mut row, hit);
    }
    row
}

/// Walk along the ray from voxel boundary to voxel boundary, placing the
/// indices and weights of the crossed voxels in `system_matrix_row`.
#[inline]
pub fn update_smatrix_row(
    system_matrix_row: &mut SystemMatrixRow,
    GridHit { mut next_boundary, voxel_size, mut index, delta_index, mut remaining }: GridHit,
) {
    // Throw away previous ray's values
    system_matrix_row.clear();

    // How far we have moved since entering the image
    let mut here = Length::ZERO;

    loop {
        // Which voxel boundary will be hit next, and its position
        let dimension = if next_boundary[0] <= next_boundary[1] { 0 } else { 1 };
        let boundary_position = next_boundary[dimension];

        // The weight is the length of the ray in this voxel
        let weight = boundary_position - here;

        // Store the index and weight of the voxel we have just crossed
        if weight > Length::ZERO {
            system_matrix_row.0.push((index as usize, mm_(weight)));
        }

        // Move along the ray until it leaves this voxel
        here = boundary_position;

        // Find the next boundary in this dimension
        next_boundary[dimension] += voxel_size[dimension];

        // Move index across the boundary we are crossing
        index += delta_index[dimension];
        remaining[dimension] -= 1;

        // If we have traversed the whole image, we're finished
        if remaining[dimension] == 0 { break; }
    }
}


// ----- Imports -----------------------------------------------------------------------------------------
use std::sync::OnceLock;

#[cfg(not(feature = "serial"))]
use rayon::prelude::*;
use tracing::debug;

use geometry::{Point, Vector};
use units::{Length, PI, mm, mm_, uom::ConstZero};
use units::todo::{Intensityf32, Lengthf32, Ratiof32};

use crate::{
    container::DataContainer,
    error::{ReconError, Result},
    image::{Image, ImageGeometry},
    index::Index1Weightf32,
    sinogram::{AcquisitionGeometry, Sinogram},
};

use super::{LinearOperator, POWER_METHOD_ITERATIONS, elementwise_add, power_method};
