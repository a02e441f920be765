//! The FISTA vs CGLS experiment: simulate noisy parallel-beam data of the
//! two-rectangle phantom, reconstruct it with both solvers from the same
//! starting image, and compare the results.

use tracing::info;

use crate::algorithms::{Algorithm, Cgls, Fista};
use crate::compare::{abs_difference, Comparison};
use crate::config::Config;
use crate::config::recon::Regularizer;
use crate::functions::{Function, FunctionOperatorComposition, L1Norm, L2NormSquared, ZeroFunction};
use crate::image::{Image, ImageGeometry};
use crate::phantom;
use crate::projector::{LinearOperator, ParallelBeamProjector};
use crate::sinogram::{AcquisitionGeometry, Sinogram, linspace_angles};
use crate::error::Result;

/// Regularizer chosen at run time
pub type BoxedFunction = Box<dyn Function<Image> + Send + Sync>;

/// FISTA on `‖A x - b‖² + g(x)`
pub type DemoFista<'a> = Fista<
    Image,
    FunctionOperatorComposition<'a, L2NormSquared<Sinogram>, ParallelBeamProjector>,
    BoxedFunction,
>;

/// Ground truth and the data measured from it
#[derive(Clone, Debug)]
pub struct Simulation {
    pub phantom: Image,
    pub sinogram: Sinogram,
    pub noisy: Sinogram,
}

#[derive(Clone, Debug)]
pub struct Outcome {
    pub phantom: Image,
    pub sinogram: Sinogram,
    pub noisy: Sinogram,
    pub fista: Image,
    pub cgls: Image,
    /// `|fista - cgls|`
    pub difference: Image,
    pub fista_objective: Vec<(usize, f32)>,
    pub cgls_objective: Vec<(usize, f32)>,
}

impl Outcome {
    pub fn comparison(&self) -> Comparison { Comparison::of(&self.difference) }
}

pub struct Experiment {
    config: Config,
    projector: ParallelBeamProjector,
}

impl Experiment {

    pub fn from_config(config: Config) -> Result<Self> {
        config.validate()?;
        let image = ImageGeometry::square(config.size, config.voxel_size)?;
        let acquisition = AcquisitionGeometry::parallel_2d(
            linspace_angles(config.n_angles()),
            config.detectors(),
            config.detector_width,
        )?;
        let projector = ParallelBeamProjector::new(image, acquisition);
        Ok(Self { config, projector })
    }

    pub fn config(&self) -> &Config { &self.config }
    pub fn projector(&self) -> &ParallelBeamProjector { &self.projector }
    pub fn image_geometry(&self) -> ImageGeometry { *self.projector.image_geometry() }
    pub fn acquisition_geometry(&self) -> &AcquisitionGeometry { self.projector.acquisition_geometry() }

    /// Phantom, its exact sinogram, and the sinogram with noise added
    pub fn simulate(&self) -> Result<Simulation> {
        let phantom = phantom::two_rectangles(self.image_geometry());
        let sinogram = self.projector.direct(&phantom)?;
        let noisy = self.config.noise_model().apply(&sinogram, self.config.noise.seed)?;
        Ok(Simulation { phantom, sinogram, noisy })
    }

    pub fn regularizer(&self) -> BoxedFunction {
        match self.config.fista.regularizer {
            Regularizer::Zero        => Box::new(ZeroFunction),
            Regularizer::L1 { alpha } => Box::new(L1Norm::<Image>::new().scaled(alpha)),
        }
    }

    /// FISTA set up to fit `data`, starting from the zero image
    pub fn fista(&self, data: &Sinogram) -> Result<DemoFista<'_>> {
        let f = FunctionOperatorComposition::new(L2NormSquared::with_data(data.clone()), &self.projector)?;
        Fista::new(&self.image_geometry().allocate(), f, self.regularizer(), self.config.fista_options())
    }

    /// CGLS set up to fit `data`, starting from the zero image
    pub fn cgls(&self, data: &Sinogram) -> Result<Cgls<'_, ParallelBeamProjector>> {
        Cgls::new(&self.image_geometry().allocate(), &self.projector, data, self.config.cgls_options())
    }

    pub fn run(&self, verbose: bool) -> Result<Outcome> {
        self.run_with(verbose, |_, _| {})
    }

    /// Run the whole experiment, calling `progress(solver, iteration)` after
    /// each solver iteration
    pub fn run_with(&self, verbose: bool, mut progress: impl FnMut(&'static str, usize)) -> Result<Outcome> {
        let Simulation { phantom, sinogram, noisy } = self.simulate()?;
        let iterations = self.config.iterations;

        let mut fista = self.fista(&noisy)?;
        info!(step = fista.step_size(), iterations, "FISTA");
        solve(&mut fista, iterations, verbose, &mut progress)?;

        let mut cgls = self.cgls(&noisy)?;
        info!(iterations, "CGLS");
        solve(&mut cgls, iterations, verbose, &mut progress)?;
        info!(normal_residual = cgls.normal_residual(), "CGLS");

        let difference = abs_difference(fista.output(), cgls.output())?;
        Ok(Outcome {
            fista_objective: fista.state().objective.clone(),
            cgls_objective:  cgls .state().objective.clone(),
            fista: fista.output().clone(),
            cgls:  cgls .output().clone(),
            phantom, sinogram, noisy, difference,
        })
    }
}

/// Like [`Algorithm::run`], reporting each iteration to `progress`
fn solve<A: Algorithm>(
    algorithm: &mut A,
    iterations: usize,
    verbose: bool,
    progress: &mut impl FnMut(&'static str, usize),
) -> Result<()> {
    algorithm.start(verbose)?;
    for _ in 0..iterations {
        if !algorithm.step(verbose)? { break }
        progress(algorithm.name(), algorithm.state().iteration);
    }
    let state = algorithm.state();
    info!(algorithm = algorithm.name(),
          iterations = state.iteration,
          converged = state.converged,
          objective = ?state.last_objective(),
          "finished");
    Ok(())
}
