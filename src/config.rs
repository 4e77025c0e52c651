//! CLI argument structs for the two binaries, built with `clap`'s derive
//! API in the style of the teacher's `examples/mt_scaling.rs`.

use clap::Parser;
use log::LevelFilter;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "compile-mesh", about = "Derive and persist mesh geometry in place")]
pub struct CompileMeshArgs {
    /// Mesh files to compile.
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,

    /// Run in verbose mode.
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress all logging.
    #[arg(short, long)]
    pub silent: bool,
}

impl CompileMeshArgs {
    pub fn log_level(&self) -> LevelFilter {
        if self.silent {
            LevelFilter::Off
        } else if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "simulate", about = "Run TDGL simulations")]
pub struct SimulateArgs {
    /// Input mesh file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output file for the data.
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Run in verbose mode.
    #[arg(short, long)]
    pub verbose: bool,

    /// Initial current density.
    #[arg(short = 'j', long, default_value_t = 0.0)]
    pub current: f64,

    /// End current density (linear interpolation between initial and end).
    #[arg(short = 'J', long)]
    pub current_max: Option<f64>,

    /// Number of steps per current value.
    #[arg(long, default_value_t = 1)]
    pub steps_per_current: u64,

    /// External perpendicular magnetic field.
    #[arg(short = 'b', long, default_value_t = 0.0)]
    pub magnetic_field: f64,

    /// Time step.
    #[arg(short = 't', long, default_value_t = 1e-4)]
    pub time_step: f64,

    /// Number of simulation steps to run.
    #[arg(short = 's', long, default_value_t = 10_000)]
    pub steps: u64,

    /// Number of steps to wait before saving the state.
    #[arg(short = 'e', long, default_value_t = 100)]
    pub save_every: u64,

    /// Number of steps to skip at the start to thermalize the system.
    #[arg(long, default_value_t = 0)]
    pub skip: u64,

    /// Complex field time scale, u.
    #[arg(short = 'u', long, default_value_t = 5.79)]
    pub complex_time_scale: f64,

    /// Gamma.
    #[arg(short = 'g', long, default_value_t = 10.0)]
    pub gamma: f64,

    /// Steps between progress-bar updates.
    #[arg(long)]
    pub miniters: Option<u64>,
}

impl SimulateArgs {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}
