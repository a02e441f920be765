//! Vector-space operations shared by images and sinograms.
//!
//! Functions and algorithms are written against [`DataContainer`] so that the
//! same FISTA / CGLS code works in image space, in sinogram space, or in any
//! other space an operator maps between.

use ndarray::{Array2, Zip};

use crate::error::{ReconError, Result};

pub trait DataContainer: Clone + std::fmt::Debug + Send + Sync {

    fn data(&self) -> &Array2<f32>;
    fn data_mut(&mut self) -> &mut Array2<f32>;

    fn shape(&self) -> [usize; 2] {
        let (rows, cols) = self.data().dim();
        [rows, cols]
    }

    fn len(&self) -> usize { self.data().len() }

    fn is_empty(&self) -> bool { self.data().is_empty() }

    fn check_same_shape(&self, other: &Self) -> Result<()> {
        if self.shape() == other.shape() { Ok(()) }
        else { Err(ReconError::shape_mismatch(&self.shape(), &other.shape())) }
    }

    /// A container with the same geometry, filled with zeros
    fn zeros_like(&self) -> Self {
        let mut zeros = self.clone();
        zeros.data_mut().fill(0.0);
        zeros
    }

    fn fill(&mut self, value: f32) { self.data_mut().fill(value) }

    // Accumulate in f64: sinograms of 75 x 75 bins with values ~100 lose
    // noticeable precision in f32 sums.
    fn dot(&self, other: &Self) -> Result<f32> {
        self.check_same_shape(other)?;
        let mut sum = 0.0_f64;
        Zip::from(self.data()).and(other.data())
            .for_each(|&a, &b| sum += a as f64 * b as f64);
        Ok(sum as f32)
    }

    fn squared_norm(&self) -> f32 {
        self.data().iter().map(|&v| v as f64 * v as f64).sum::<f64>() as f32
    }

    fn norm(&self) -> f32 { self.squared_norm().sqrt() }

    fn sum(&self) -> f32 {
        self.data().iter().map(|&v| v as f64).sum::<f64>() as f32
    }

    /// `self = a * self + b * y`
    fn axpby(&mut self, a: f32, b: f32, y: &Self) -> Result<()> {
        self.check_same_shape(y)?;
        Zip::from(self.data_mut()).and(y.data())
            .for_each(|x, &y| *x = a * *x + b * y);
        Ok(())
    }

    fn map_inplace(&mut self, f: impl Fn(f32) -> f32) {
        self.data_mut().mapv_inplace(f)
    }

    fn mapped(&self, f: impl Fn(f32) -> f32) -> Self {
        let mut out = self.clone();
        out.map_inplace(f);
        out
    }

    /// Element-wise combination of two containers of the same shape
    fn zip_map(&self, other: &Self, f: impl Fn(f32, f32) -> f32) -> Result<Self> {
        self.check_same_shape(other)?;
        let mut out = self.clone();
        Zip::from(out.data_mut()).and(other.data())
            .for_each(|a, &b| *a = f(*a, b));
        Ok(out)
    }

    fn max_abs(&self) -> f32 {
        self.data().iter().fold(0.0_f32, |m, v| m.max(v.abs()))
    }

}
