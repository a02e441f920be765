//! Parallel-beam acquisition geometry and the sinograms measured with it.

pub mod angles;

pub use angles::linspace_angles;

use ndarray::Array2;

use units::{Angle, Length, mm_, radian_, uom::ConstZero};
use units::todo::Intensityf32;

use crate::container::DataContainer;
use crate::error::{ReconError, Result};

/// A 2D parallel-beam scan: a flat detector of `n_detectors` equal elements,
/// centred on the rotation axis, visiting each of `angles` in turn.
#[derive(Clone, Debug, PartialEq)]
pub struct AcquisitionGeometry {
    pub angles: Vec<Angle>,
    pub n_detectors: usize,
    pub detector_width: Length,
}

impl AcquisitionGeometry {

    pub fn parallel_2d(angles: Vec<Angle>, n_detectors: usize, detector_width: Length) -> Result<Self> {
        if angles.is_empty() {
            return Err(ReconError::InvalidGeometry("acquisition needs at least one angle".into()));
        }
        if n_detectors == 0 {
            return Err(ReconError::InvalidGeometry("acquisition needs at least one detector".into()));
        }
        if !(detector_width > Length::ZERO) {
            return Err(ReconError::InvalidGeometry(format!(
                "detector width must be positive, got {} mm", mm_(detector_width))));
        }
        if let Some(bad) = angles.iter().find(|a| !radian_(**a).is_finite()) {
            return Err(ReconError::InvalidGeometry(format!("non-finite angle {} rad", radian_(*bad))));
        }
        let half_turn = std::f32::consts::PI;
        if let Some(bad) = angles.iter().map(|a| radian_(*a)).find(|a| !(0.0..=half_turn).contains(a)) {
            return Err(ReconError::InvalidGeometry(format!("angle {bad} rad outside [0, π]")));
        }
        if angles.windows(2).any(|w| w[1] < w[0]) {
            return Err(ReconError::InvalidGeometry("angles must be in increasing order".into()));
        }
        Ok(Self { angles, n_detectors, detector_width })
    }

    pub fn n_angles(&self) -> usize { self.angles.len() }

    /// Shape of the array holding a sinogram: one row per angle
    pub fn shape(&self) -> [usize; 2] { [self.n_angles(), self.n_detectors] }

    pub fn len(&self) -> usize { self.n_angles() * self.n_detectors }

    pub fn is_empty(&self) -> bool { self.len() == 0 }

    /// Signed distance of the centre of detector element `k` from the
    /// rotation axis
    pub fn detector_offset(&self, k: usize) -> Length {
        self.detector_width * (k as f32 + 0.5 - self.n_detectors as f32 / 2.0)
    }

    pub fn allocate(&self) -> Sinogram { Sinogram::zeros(self.clone()) }

}

/// Acquisition data, indexed by `[angle, detector]`
#[derive(Clone, Debug)]
pub struct Sinogram {
    pub geometry: AcquisitionGeometry,
    pub data: Array2<Intensityf32>,
}

impl Sinogram {

    pub fn new(geometry: AcquisitionGeometry, data: Array2<Intensityf32>) -> Result<Self> {
        let (rows, cols) = data.dim();
        if [rows, cols] != geometry.shape() {
            return Err(ReconError::shape_mismatch(&geometry.shape(), &[rows, cols]));
        }
        Ok(Self { geometry, data })
    }

    /// Build sinogram from values ordered by angle, then detector
    pub fn from_vec(geometry: AcquisitionGeometry, data: Vec<Intensityf32>) -> Result<Self> {
        let [rows, cols] = geometry.shape();
        let actual = data.len();
        let data = Array2::from_shape_vec((rows, cols), data)
            .map_err(|_| ReconError::shape_mismatch(&[rows * cols], &[actual]))?;
        Ok(Self { geometry, data })
    }

    pub fn filled(geometry: AcquisitionGeometry, value: Intensityf32) -> Self {
        let [rows, cols] = geometry.shape();
        Self { geometry, data: Array2::from_elem((rows, cols), value) }
    }

    pub fn zeros(geometry: AcquisitionGeometry) -> Self { Self::filled(geometry, 0.0) }

    /// Projection measured at angle number `a`
    pub fn projection(&self, a: usize) -> ndarray::ArrayView1<'_, Intensityf32> {
        self.data.row(a)
    }

}

impl DataContainer for Sinogram {
    fn data(&self) -> &Array2<f32> { &self.data }
    fn data_mut(&mut self) -> &mut Array2<f32> { &mut self.data }
}
