use clap::Parser;
use std::path::PathBuf;

use crate::{constants::DASHBOARD_STATS_INTERVAL, task::RunnerMode};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
pub struct Cli {
    /// The path to the SQLite database holding the dashboard state
    #[clap(long)]
    pub db_path: PathBuf,

    /// How often the dashboard stats task runs, in seconds
    #[clap(long, default_value_t = DASHBOARD_STATS_INTERVAL.num_seconds())]
    pub stats_interval_seconds: i64,

    /// The mode to start the task runner in, either time based execution or
    /// manually triggered via a web server.
    #[clap(long, default_value = "timer")]
    pub task_runner_mode: RunnerMode,
}
