//! `barricade_to_wall`: headless server hosting the barricade-to-wall plugin.
//!
//! ```text
//! barricade_to_wall [--config-dir <dir>] [--data-dir <dir>]
//! ```
//!
//! Commands are read from stdin and responses written to stdout, one JSON
//! object per line. Logs go to stderr.

mod host_mode;
mod protocol;

use std::path::PathBuf;

use clap::Parser;

use host_mode::{run_host_mode, HostOptions};

#[derive(Parser, Debug)]
#[command(name = "barricade_to_wall")]
#[command(about = "Headless host for the barricade-to-wall plugin, driven over stdin/stdout JSON")]
struct Cli {
    /// Directory holding the plugin config file
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// Directory holding the per-player data file
    #[arg(long, default_value = "data")]
    data_dir: PathBuf,
}

impl From<Cli> for HostOptions {
    fn from(cli: Cli) -> Self {
        Self {
            config_dir: cli.config_dir,
            data_dir: cli.data_dir,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    run_host_mode(cli.into());
}
