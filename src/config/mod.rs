//! Configuration of reconstruction experiments

pub mod recon;

pub use recon::{read_config_file, Config};
