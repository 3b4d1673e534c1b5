use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser, Clone)]
#[clap(
    version = "0.1.0",
    author = "Alexander Heilmeier <alexander.heilmeier@tum.de>",
    name = "RS-HR",
    about = "A tick-based horse race simulator written in Rust"
)]
pub struct SimOpts {
    // FLAGS ---------------------------------------------------------------------------------------
    /// Activate debug printing
    #[clap(short, long)]
    pub debug: bool,

    /// Simulate without waiting for real-time (always the case for multiple runs)
    #[clap(short, long)]
    pub fast: bool,

    // OPTIONS -------------------------------------------------------------------------------------
    /// Set number of simulation runs, more than one run prints win statistics only
    #[clap(short, long, default_value = "1")]
    pub no_sim_runs: u32,

    /// Set path to the race parameter file (OPTIONAL: if not set, uses the default 6-horse race)
    #[clap(short, long)]
    pub parfile_path: Option<PathBuf>,

    /// Set number of horses, overrides the parameter file, should be in the range [2, 10]
    #[clap(short = 'c', long)]
    pub horse_count: Option<u32>,

    /// Set real-time factor (only relevant for real-time simulation)
    #[clap(short, long, default_value = "1.0")]
    pub realtime_factor: f64,

    /// Set tick duration in milliseconds, overrides the parameter file
    #[clap(short, long)]
    pub timestep_size: Option<u64>,

    /// Set seed of the random number generator (OPTIONAL: if not set, uses entropy)
    #[clap(short, long)]
    pub seed: Option<u64>,

    /// Set path of the CSV result file (single run only)
    #[clap(short, long)]
    pub output_path: Option<PathBuf>,
}
