// Wrapper around the external Jupyter tooling
//
// Jupyter itself is opaque: everything here shells out to the `jupyter`
// executable, or to the Python interpreter hosting its password helper.

use anyhow::{bail, Context, Result};
use std::net::IpAddr;
use std::path::PathBuf;
use std::process::Command;
use thiserror::Error;
use tracing::{debug, warn};

use crate::process::{self, CommandOutput};

/// One-liner handed to the Python interpreter to reach Jupyter's own
/// password helper. Reads the plaintext on stdin, prints the salted hash.
const PASSWD_HELPER: &str =
    "import sys; from jupyter_server.auth import passwd; print(passwd(sys.stdin.readline().rstrip('\\n')))";

/// Errors from locating the external Jupyter tooling
#[derive(Debug, Error)]
pub enum JupyterError {
    /// The `jupyter` executable is missing or not runnable
    #[error("jupyter could not be run: {0}")]
    NotInstalled(String),
}

/// Invokes the external Jupyter tooling.
#[derive(Debug, Clone)]
pub struct JupyterCli {
    /// Program used for the version check, config generation and the server itself
    jupyter: PathBuf,

    /// Python interpreter hosting the `jupyter_server.auth` password helper
    python: PathBuf,
}

impl Default for JupyterCli {
    fn default() -> Self {
        Self::with_programs("jupyter", "python3")
    }
}

impl JupyterCli {
    /// Use explicit program paths. Tests substitute stub executables here.
    pub fn with_programs(jupyter: impl Into<PathBuf>, python: impl Into<PathBuf>) -> Self {
        Self {
            jupyter: jupyter.into(),
            python: python.into(),
        }
    }

    /// Check that Jupyter is installed by asking it for its version.
    ///
    /// A missing executable and a failing `--version` both count as "not
    /// installed"; the caller decides how to surface that.
    pub fn version(&self) -> Result<String, JupyterError> {
        let output = process::run_captured(Command::new(&self.jupyter).arg("--version"))
            .map_err(|e| JupyterError::NotInstalled(e.to_string()))?;

        if !output.success() {
            return Err(JupyterError::NotInstalled(format!(
                "'jupyter --version' exited with code {}",
                output.exit_code
            )));
        }
        Ok(output.stdout.trim().to_string())
    }

    /// Generate Jupyter's default config file.
    ///
    /// Best-effort: Jupyter decides where the file goes and whether to write
    /// it; a non-zero exit only costs the password step later on.
    pub fn generate_config(&self) -> Result<()> {
        let output = process::run_captured(
            Command::new(&self.jupyter).args(["notebook", "--generate-config"]),
        )
        .context("Failed to run 'jupyter notebook --generate-config'")?;

        if !output.success() {
            warn!(
                exit_code = output.exit_code,
                stderr = %output.stderr.trim(),
                "Config generation exited non-zero"
            );
        }
        Ok(())
    }

    /// Hash a plaintext password with Jupyter's own `passwd` helper.
    ///
    /// The plaintext travels over stdin only, so it never appears in the
    /// process list or in logs.
    pub fn hash_password(&self, plaintext: &str) -> Result<String> {
        let input = format!("{}\n", plaintext);
        let output = process::run_with_input(
            Command::new(&self.python).args(["-c", PASSWD_HELPER]),
            &input,
        )
        .context("Failed to run the Jupyter password helper")?;

        if !output.success() {
            bail!(
                "Jupyter password helper exited with code {}: {}",
                output.exit_code,
                output.stderr.trim()
            );
        }

        let hash = output.stdout.trim();
        if hash.is_empty() {
            bail!("Jupyter password helper produced no output");
        }
        debug!("Password hashed via jupyter_server.auth");
        Ok(hash.to_string())
    }

    /// Launch the notebook server, blocking until it exits.
    pub fn serve(&self, ip: IpAddr, port: u16) -> Result<CommandOutput> {
        let port_flag = format!("--port={}", port);
        let ip_flag = format!("--ip={}", ip);

        process::run_streamed(Command::new(&self.jupyter).args([
            "notebook",
            "--no-browser",
            port_flag.as_str(),
            ip_flag.as_str(),
            "--allow-root",
        ]))
        .context("Failed to launch the notebook server")
    }
}
