//! Reading and writing images and sinograms

pub mod raw;

use std::path::{Path, PathBuf};

/// Path of a file called `name` in directory `dir`, creating the directory if
/// it does not exist yet
pub fn output_file(dir: &Path, name: &str) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(dir)?;
    Ok(dir.join(name))
}
