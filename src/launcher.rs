// Startup procedure for the notebook server
//
// Strictly linear: check the tool, prepare its config, set a password when
// one was supplied, launch the server, report how it exited.

use anyhow::{Context, Result};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::{debug, info};

use crate::config::LaunchConfig;
use crate::jupyter::JupyterCli;

const INSTALL_INSTRUCTION: &str =
    "Jupyter is not installed. Please install it using 'pip install jupyter' in terminal.";

/// Bring up a notebook server per `config`, blocking until it exits.
///
/// The only locally handled failure is a missing Jupyter installation, which
/// prints an install instruction and returns without error. Everything else
/// propagates.
pub fn start(config: &LaunchConfig, jupyter: &JupyterCli) -> Result<()> {
    // Check if Jupyter is installed
    let version = match jupyter.version() {
        Ok(version) => version,
        Err(e) => {
            println!("{}", INSTALL_INSTRUCTION);
            debug!(error = %e, "Version check failed");
            return Ok(());
        }
    };
    debug!(version = %version, "Found Jupyter");

    // Create the Jupyter config directory if it doesn't exist
    fs::create_dir_all(&config.config_dir).with_context(|| {
        format!(
            "Failed to create config directory: {}",
            config.config_dir.display()
        )
    })?;

    // Generate a config file if one doesn't exist
    if !config.config_file.exists() {
        jupyter.generate_config()?;
    }

    // Set a password for the notebook server when one was supplied
    if let Some(password) = &config.password {
        let hashed = jupyter.hash_password(password)?;
        append_password(&config.config_file, &hashed)?;
        info!("Notebook password set from environment");
    }

    // Run the notebook server
    println!("Starting Jupyter Notebook on {}:{}...", config.ip, config.port);
    let result = jupyter.serve(config.ip, config.port)?;

    if !result.success() {
        println!(
            "Jupyter Notebook server was shut down: {}",
            result.combined()
        );
    }
    Ok(())
}

/// Append the hashed-password directive to the config file, leaving prior
/// contents untouched.
fn append_password(config_file: &Path, hashed: &str) -> Result<()> {
    let mut file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config_file)
        .with_context(|| format!("Failed to open config file: {}", config_file.display()))?;

    writeln!(file, "\nc.NotebookApp.password = u'{}'", hashed)
        .with_context(|| format!("Failed to append to config file: {}", config_file.display()))?;
    Ok(())
}
