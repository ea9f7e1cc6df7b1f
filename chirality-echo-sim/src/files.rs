//! File layout used by the `cep-sim` binary: JSON configs in, `.npy` grids
//! and CSV slices out.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use log::info;

use crate::error::{Result, SimError};
use crate::grid::VorticityGrid;
use crate::npy::{read_npy, write_npy};
use crate::simulation::CycleConfig;

/// Load and validate a cycle configuration. `None` gives the defaults.
///
/// Fields missing from the JSON object take their default values.
pub fn load_config(path: Option<&Path>) -> Result<CycleConfig> {
    let Some(path) = path else {
        return Ok(CycleConfig::default());
    };
    let text = fs::read_to_string(path)?;
    let config: CycleConfig =
        serde_json::from_str(&text).map_err(|source| SimError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
    config.validate()?;
    info!("loaded configuration from {}", path.display());
    Ok(config)
}

/// Path of the final grid of cycle `index` (0-based) inside `dir`.
/// Files are numbered from 1: `sample_cycle1.npy`, `sample_cycle2.npy`, ...
pub fn sample_cycle_path(dir: &Path, index: usize) -> PathBuf {
    dir.join(format!("sample_cycle{}.npy", index + 1))
}

/// Save each grid as `DIR/sample_cycle{c}.npy`, creating `dir` if needed.
pub fn save_grids(dir: &Path, grids: &[VorticityGrid]) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir)?;
    grids
        .iter()
        .enumerate()
        .map(|(i, grid)| -> Result<PathBuf> {
            let path = sample_cycle_path(dir, i);
            let mut writer = BufWriter::new(File::create(&path)?);
            write_npy(&mut writer, grid)?;
            writer.flush()?;
            info!("saved {}", path.display());
            Ok(path)
        })
        .collect()
}

/// Load a saved grid and take its middle `[n/2, :, :]` plane.
pub fn read_mid_slice(path: &Path) -> Result<Vec<Vec<f64>>> {
    let grid = read_npy(&mut BufReader::new(File::open(path)?))?;
    grid.mid_slice()
        .ok_or_else(|| SimError::Npy(format!("{} holds an empty grid", path.display())))
}
