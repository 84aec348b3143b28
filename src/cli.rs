use clap::Parser;

use fleet_route_optimizer::config::DEFAULT_TIME_SAFETY_FACTOR;
use fleet_route_optimizer::problem::request::{
    CALL_TO_START, DEFAULT_LATE_TIME, DEFAULT_REALISTIC_TIME,
};
use fleet_route_optimizer::problem::DEFAULT_SPEED;

#[derive(Parser, Debug)]
#[command(version)]
pub struct ProgramArguments {
    #[arg(long, help = "rng seed")]
    pub seed: Option<i128>,

    #[arg(
        short,
        long,
        help = "instance manifest (toml) path",
        required_unless_present = "generate",
        conflicts_with = "generate"
    )]
    pub instance: Option<String>,

    #[arg(long, help = "generate a random instance with the given number of requests")]
    pub generate: Option<usize>,

    #[command(flatten)]
    pub generator: GeneratorArguments,

    #[command(flatten)]
    pub optimizer: OptimizerArguments,

    #[arg(short, long, help = "route file path")]
    pub solution: Option<String>,

    #[arg(long, help = "json summary file path")]
    pub summary_json: Option<String>,

    #[arg(long, help = "print summary to stdout", default_value = "false")]
    pub print_summary_to_stdout: bool,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GeneratorArguments {
    #[arg(long, default_value = "20")]
    pub points: usize,
    #[arg(long, help = "seconds", default_value = "3600")]
    pub epoch_duration: i64,
    #[arg(long, help = "side length of the square", default_value = "1000.0")]
    pub area: f64,
}

#[derive(clap::Args, Clone, Debug)]
pub struct OptimizerArguments {
    #[arg(long, default_value = "0")]
    pub start_point: usize,
    #[arg(long, default_value_t = DEFAULT_TIME_SAFETY_FACTOR)]
    pub time_safety_factor: f64,
    #[arg(long, help = "distance units per second", default_value_t = DEFAULT_SPEED)]
    pub speed: f64,
    #[arg(long, default_value = "false")]
    pub no_sharing: bool,
    #[arg(long, help = "seconds between submit and pickup", default_value_t = CALL_TO_START)]
    pub call_to_start: i64,
    #[arg(long, default_value_t = DEFAULT_REALISTIC_TIME)]
    pub realistic_time: f64,
    #[arg(long, default_value_t = DEFAULT_LATE_TIME)]
    pub late_time: f64,
}
