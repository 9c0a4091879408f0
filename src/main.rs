// nblaunch - Remote-friendly Jupyter Notebook launcher
// Main entry point

use anyhow::Result;
use clap::Parser;

use nblaunch::config::LaunchConfig;
use nblaunch::jupyter::JupyterCli;
use nblaunch::launcher;

#[derive(Parser, Debug)]
#[command(
    name = "nblaunch",
    about = "Start a Jupyter Notebook server on a remote machine."
)]
struct Cli {
    /// Port to run the Jupyter Notebook server on
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    // Snapshot the environment once; nothing below reads it again
    let config = LaunchConfig::from_env(cli.port)?;

    launcher::start(&config, &JupyterCli::default())
}
