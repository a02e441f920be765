//! Iterative tomographic reconstruction on a 2D parallel-beam geometry.
//!
//! The library provides the pieces needed to compare solvers on simulated
//! data: a phantom, a Siddon projector, noise models, convex functions, the
//! FISTA and CGLS solvers, and a figure writer. [`pipeline::Experiment`]
//! wires them together.

mod exports;
pub use exports::*;

pub mod error;
pub mod container;
pub mod index;
pub mod image;
pub mod io;
pub mod sinogram;
pub mod phantom;
pub mod projector;
pub mod noise;
pub mod functions;
pub mod algorithms;
pub mod compare;
pub mod visualize;
pub mod config;
pub mod pipeline;
