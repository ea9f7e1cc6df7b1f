//! CEP simulator command-line interface.
//!
//! ```text
//! cep-sim run --cycles 5 --seed 42 [--json] [--save-npy out/]
//! cep-sim convergence --sizes 15,20,25,30
//! cep-sim slice --input out/sample_cycle1.npy --output slice.csv
//! ```

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use log::info;

use chirality_echo_sim::files::{load_config, read_mid_slice, save_grids};
use chirality_echo_sim::npy::write_slice_csv;
use chirality_echo_sim::report::{render_convergence_csv, render_table, EnsembleReport};
use chirality_echo_sim::simulation::{
    convergence_sweep, run_ensemble_with_grids, EnsembleConfig, DEFAULT_CONVERGENCE_SIZES,
};

#[derive(Parser, Debug)]
#[clap(author, version, about = "Chirality Echo Protocol 3D string network simulation", long_about = None)]
struct Args {
    #[clap(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run an ensemble of independent cycles
    Run {
        /// Number of cycles
        #[clap(long, default_value_t = 5)]
        cycles: usize,
        /// Seed of the first cycle
        #[clap(long, default_value_t = 42)]
        seed: u64,
        /// JSON file with a cycle configuration
        #[clap(long)]
        config: Option<PathBuf>,
        /// Print a JSON report instead of the table
        #[clap(long)]
        json: bool,
        /// Directory to save final grids as sample_cycle{c}.npy
        #[clap(long)]
        save_npy: Option<PathBuf>,
    },
    /// Rerun one cycle at several grid sizes
    Convergence {
        /// Comma-separated pre-inflation grid sizes
        #[clap(long, value_delimiter = ',')]
        sizes: Vec<usize>,
        #[clap(long, default_value_t = 42)]
        seed: u64,
        #[clap(long)]
        config: Option<PathBuf>,
    },
    /// Export the middle plane of a saved grid as CSV
    Slice {
        /// Input .npy file
        #[clap(long)]
        input: PathBuf,
        /// Output CSV (stdout if omitted)
        #[clap(long)]
        output: Option<PathBuf>,
    },
}

fn run(
    cycles: usize,
    seed: u64,
    config: Option<PathBuf>,
    json: bool,
    save_npy: Option<PathBuf>,
) -> Result<()> {
    let config = load_config(config.as_deref()).context("loading configuration")?;
    let ensemble = EnsembleConfig {
        cycles,
        base_seed: seed,
    };

    let (result, grids) = run_ensemble_with_grids(&config, &ensemble)?;
    if let Some(dir) = save_npy {
        save_grids(&dir, &grids).with_context(|| format!("saving grids to {}", dir.display()))?;
    }

    let report = EnsembleReport::new(&config, &ensemble, result);
    if json {
        println!("{}", report.to_json()?);
    } else {
        print!("{}", render_table(&report));
    }
    Ok(())
}

fn convergence(sizes: Vec<usize>, seed: u64, config: Option<PathBuf>) -> Result<()> {
    let config = load_config(config.as_deref()).context("loading configuration")?;
    let sizes = if sizes.is_empty() {
        DEFAULT_CONVERGENCE_SIZES.to_vec()
    } else {
        sizes
    };
    let points = convergence_sweep(&config, &sizes, seed)?;
    print!("{}", render_convergence_csv(&points));
    Ok(())
}

fn slice(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let plane = read_mid_slice(&input).with_context(|| format!("reading {}", input.display()))?;

    match output {
        Some(path) => {
            let file = File::create(&path).with_context(|| format!("creating {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_slice_csv(&mut writer, &plane)?;
            writer.flush()?;
            info!("wrote {}×{} slice to {}", plane.len(), plane.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut lock = stdout.lock();
            write_slice_csv(&mut lock, &plane)?;
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    match args.cmd {
        Command::Run {
            cycles,
            seed,
            config,
            json,
            save_npy,
        } => run(cycles, seed, config, json, save_npy),
        Command::Convergence {
            sizes,
            seed,
            config,
        } => convergence(sizes, seed, config),
        Command::Slice { input, output } => slice(input, output),
    }
}
