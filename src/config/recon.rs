//! Configuration file parser for reconstruction experiments
//!
//! Every field has a default, so an empty file describes the FISTA vs CGLS
//! comparison on a 75 x 75 phantom.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Deserializer, de};

use units::{Length, mm, mm_};

use crate::algorithms::{CglsOptions, FistaOptions};
use crate::error::{ReconError, Result};
use crate::noise::NoiseModel;

fn deserialize_uom<'d, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'d>,
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    String::deserialize(deserializer)?
        .parse::<T>()
        .map_err(de::Error::custom)
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {

    /// Number of voxels along each side of the square image
    #[serde(default = "default_size")]
    pub size: usize,

    #[serde(default = "default_length")]
    #[serde(deserialize_with = "deserialize_uom")]
    pub voxel_size: Length,

    /// Number of detector elements. Defaults to `size`
    pub detectors: Option<usize>,

    /// Number of projection angles over `[0, π]`. Defaults to `size`
    pub angles: Option<usize>,

    #[serde(default = "default_length")]
    #[serde(deserialize_with = "deserialize_uom")]
    pub detector_width: Length,

    /// Number of iterations given to each solver
    #[serde(default = "default_iterations")]
    pub iterations: usize,

    /// Record the objective every this many iterations (0: never)
    #[serde(default = "default_interval")]
    pub update_objective_interval: usize,

    #[serde(default)]
    pub noise: Noise,

    #[serde(default)]
    pub fista: FistaConfig,

    #[serde(default)]
    pub cgls: CglsConfig,

    /// Directory where images and the figure are written
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Pixels per voxel side in the figure
    #[serde(default = "default_figure_scale")]
    pub figure_scale: u32,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Noise {
    #[serde(default)]
    pub model: NoiseKind,
    #[serde(default)]
    pub mean: f32,
    #[serde(default = "default_std_dev")]
    pub std_dev: f32,
    #[serde(default = "default_seed")]
    pub seed: u64,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum NoiseKind {
    #[default]
    Gaussian,
    Poisson,
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(deny_unknown_fields)]
pub struct FistaConfig {
    /// Relative change between iterates at which FISTA stops early
    pub tolerance: Option<f32>,
    #[serde(default)]
    pub regularizer: Regularizer,
}

/// The non-smooth term `g` handed to FISTA
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Regularizer {
    #[default]
    Zero,
    /// `alpha ‖x‖₁`
    L1 { alpha: f32 },
}

#[derive(Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct CglsConfig {
    #[serde(default = "default_cgls_tolerance")]
    pub tolerance: f32,
}

fn default_size          () -> usize   { 75 }
fn default_length        () -> Length  { mm(1.0) }
fn default_iterations    () -> usize   { 20 }
fn default_interval      () -> usize   { 1 }
fn default_std_dev       () -> f32     { 3.0 }
fn default_seed          () -> u64     { 10 }
fn default_cgls_tolerance() -> f32     { 1e-6 }
fn default_figure_scale  () -> u32     { 4 }
fn default_output        () -> PathBuf { "data/out/fista_vs_cgls".into() }

impl Default for Noise {
    fn default() -> Self {
        Self { model: NoiseKind::default(), mean: 0.0, std_dev: default_std_dev(), seed: default_seed() }
    }
}

impl Default for CglsConfig {
    fn default() -> Self { Self { tolerance: default_cgls_tolerance() } }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            size: default_size(),
            voxel_size: default_length(),
            detectors: None,
            angles: None,
            detector_width: default_length(),
            iterations: default_iterations(),
            update_objective_interval: default_interval(),
            noise: Noise::default(),
            fista: FistaConfig::default(),
            cgls: CglsConfig::default(),
            output: default_output(),
            figure_scale: default_figure_scale(),
        }
    }
}

impl Config {

    pub fn detectors(&self) -> usize { self.detectors.unwrap_or(self.size) }
    pub fn n_angles (&self) -> usize { self.angles   .unwrap_or(self.size) }

    pub fn noise_model(&self) -> NoiseModel {
        let Noise { model, mean, std_dev, .. } = self.noise;
        match model {
            NoiseKind::Gaussian => NoiseModel::Gaussian { mean, std_dev },
            NoiseKind::Poisson  => NoiseModel::Poisson,
        }
    }

    pub fn fista_options(&self) -> FistaOptions {
        FistaOptions {
            tolerance: self.fista.tolerance,
            max_iteration: self.iterations,
            update_objective_interval: self.update_objective_interval,
        }
    }

    pub fn cgls_options(&self) -> CglsOptions {
        CglsOptions {
            tolerance: self.cgls.tolerance,
            max_iteration: self.iterations,
            update_objective_interval: self.update_objective_interval,
        }
    }

    /// Reject values which parse but cannot describe an experiment
    pub fn validate(&self) -> Result<()> {
        let fail = |message: String| Err(ReconError::Config(message));
        if self.size == 0              { return fail("size must be positive".into()) }
        if self.detectors() == 0       { return fail("detectors must be positive".into()) }
        if self.n_angles() == 0        { return fail("angles must be positive".into()) }
        if !(mm_(self.voxel_size)     > 0.0) { return fail(format!("voxel_size must be positive, got {:?}", self.voxel_size)) }
        if !(mm_(self.detector_width) > 0.0) { return fail(format!("detector_width must be positive, got {:?}", self.detector_width)) }
        if self.figure_scale == 0      { return fail("figure_scale must be positive".into()) }
        let Noise { mean, std_dev, .. } = self.noise;
        if !mean.is_finite() || !(std_dev >= 0.0) || !std_dev.is_finite() {
            return fail(format!("noise needs finite mean and non-negative std_dev, got {mean} and {std_dev}"));
        }
        if let Regularizer::L1 { alpha } = self.fista.regularizer {
            if !(alpha >= 0.0) { return fail(format!("L1 regularizer alpha must be non-negative, got {alpha}")) }
        }
        if let Some(tolerance) = self.fista.tolerance {
            if !(tolerance >= 0.0) { return fail(format!("FISTA tolerance must be non-negative, got {tolerance}")) }
        }
        if !(self.cgls.tolerance >= 0.0) {
            return fail(format!("CGLS tolerance must be non-negative, got {}", self.cgls.tolerance));
        }
        Ok(())
    }
}

pub fn read_config_file(path: &Path) -> Result<Config> {
    let text = fs::read_to_string(path)?;
    let config: Config = toml::from_str(&text)
        .map_err(|e| ReconError::Config(format!("{}: {e}", path.display())))?;
    config.validate()?;
    Ok(config)
}
