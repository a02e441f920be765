mod cli;
mod progress;

fn main() -> Result<(), Box<dyn Error>> {
    let args = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = args.config()?;

    #[cfg(not(feature = "serial"))]
    rayon::ThreadPoolBuilder::new().num_threads(args.threads).build_global()?;

    // Set up progress reporting and timing
    let mut now = Instant::now();
    let mut report_time = |message: &str| {
        info!("{}: {} ms", message, now.elapsed().as_millis());
        now = Instant::now();
    };

    // Before starting the computation, make sure that we can write the results
    let out = config.output.clone();
    let path = |name: &str| output_file(&out, name);
    let (fista_path, cgls_path, diff_path, figure_path) =
        (path("fista.raw")?, path("cgls.raw")?, path("difference.raw")?, path("fista_vs_cgls.png")?);
    info!("Writing results to {}", out.display());

    let iterations = config.iterations;
    let scale = config.figure_scale;
    let experiment = Experiment::from_config(config)?;
    report_time("Built system matrix");

    let progress = args.quiet.then(|| Progress::new(iterations));
    let outcome = experiment.run_with(!args.quiet, |solver, iteration| {
        if let Some(progress) = &progress { progress.iteration(solver, iteration) }
    })?;
    if let Some(progress) = &progress { progress.finish() }
    report_time("Reconstructed with FISTA and CGLS");

    let Outcome { phantom, fista, cgls, difference, .. } = &outcome;
    info!("FISTA vs CGLS:    {}", outcome.comparison());
    info!("FISTA vs phantom: rmse {:.4}", rmse(fista, phantom)?);
    info!("CGLS  vs phantom: rmse {:.4}", rmse(cgls , phantom)?);

    fista     .write_to_raw_file(&fista_path)?;
    cgls      .write_to_raw_file(&cgls_path)?;
    difference.write_to_raw_file(&diff_path)?;
    report_time("Wrote raw images");

    if !args.no_figure {
        Figure::fista_vs_cgls(fista, cgls, difference, scale).save(&figure_path)?;
        report_time("Wrote figure");
    }
    Ok(())
}

// ----- Imports -----------------------------------------------------------------------------------------
use std::error::Error;
use std::time::Instant;

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ctrecon::compare::rmse;
use ctrecon::io::output_file;
use ctrecon::pipeline::{Experiment, Outcome};
use ctrecon::visualize::Figure;

use cli::Cli;
use progress::Progress;
