/// Command line interface for `fista_vs_cgls` executable
#[derive(clap::Parser, Debug, Clone)]
#[clap(
    name = "fista_vs_cgls",
    about = "Compare FISTA and CGLS reconstructions of a noisy parallel-beam sinogram",
)]
pub (super) struct Cli {
    /// TOML configuration file. Without one, the built-in defaults are used
    #[clap(short, long)]
    pub config: Option<PathBuf>,

    /// Number of voxels along each side of the image
    #[clap(short = 'n', long)]
    pub size: Option<usize>,

    /// Number of iterations given to each solver
    #[clap(short, long)]
    pub iterations: Option<usize>,

    /// Seed of the noise generator
    #[clap(long)]
    pub seed: Option<u64>,

    /// Standard deviation of the Gaussian noise
    #[clap(long)]
    pub std_dev: Option<f32>,

    /// Directory where images and the figure are written
    #[clap(short, long)]
    pub out: Option<PathBuf>,

    #[cfg(not(feature = "serial"))]
    /// Maximum number of rayon threads
    #[clap(short = 'j', long, default_value = "4")]
    pub threads: usize,

    /// Show progress bars instead of logging the objective of every iteration
    #[clap(short, long)]
    pub quiet: bool,

    /// Do not write the PNG figure
    #[clap(long)]
    pub no_figure: bool,
}

impl Cli {
    /// The configuration file (or defaults) with any command line overrides
    pub (super) fn config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => read_config_file(path)?,
            None       => Config::default(),
        };
        if let Some(size)       = self.size       { config.size = size }
        if let Some(iterations) = self.iterations { config.iterations = iterations }
        if let Some(seed)       = self.seed       { config.noise.seed = seed }
        if let Some(std_dev)    = self.std_dev    { config.noise.std_dev = std_dev }
        if let Some(out)        = &self.out       { config.output = out.clone() }
        config.validate()?;
        Ok(config)
    }
}

// ----- Imports -----------------------------------------------------------------------------------------
use std::path::PathBuf;

use ctrecon::config::{read_config_file, Config};
use ctrecon::error::Result;
