pub use units::uom::si::Quantity;
pub use units::{Angle, Length, Ratio};
pub use units::todo::{Intensityf32, Lengthf32, Weightf32};

pub use geometry::{Point, Vector};

pub use crate::container::DataContainer;
pub use crate::error::{ReconError, Result};
pub use crate::image::{Image, ImageGeometry};
pub use crate::index::{BoxDim_u, Index1_u, Index2_u, Index1Weightf32};
pub use crate::sinogram::{AcquisitionGeometry, Sinogram};
