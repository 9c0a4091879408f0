// Launch configuration
// Built once at startup from CLI flags and a snapshot of the environment

use anyhow::{Context, Result};
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

/// Environment variable holding the optional plaintext notebook password.
pub const PASSWORD_ENV_VAR: &str = "JUPYTER_NOTEBOOK_PASSWORD";

/// Bind address for remote access (all interfaces).
pub const ALL_INTERFACES: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

/// Settings for a single launcher run
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Port the notebook server binds to
    pub port: u16,

    /// Interface the notebook server binds to
    pub ip: IpAddr,

    /// Jupyter configuration directory (normally ~/.jupyter)
    pub config_dir: PathBuf,

    /// Jupyter configuration file inside `config_dir`
    pub config_file: PathBuf,

    /// Plaintext password read from `PASSWORD_ENV_VAR`; `None` when unset or
    /// empty, in which case the server keeps its token-based access
    pub password: Option<String>,
}

impl LaunchConfig {
    /// Build the configuration for this run, reading the environment exactly once.
    pub fn from_env(port: u16) -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        let password = std::env::var(PASSWORD_ENV_VAR)
            .ok()
            .filter(|p| !p.is_empty());

        Ok(Self::with_config_dir(port, home.join(".jupyter"), password))
    }

    /// Build a configuration rooted at an explicit config directory, so tests
    /// never touch the real ~/.jupyter.
    pub fn with_config_dir(port: u16, config_dir: PathBuf, password: Option<String>) -> Self {
        let config_file = config_dir.join("jupyter_notebook_config.py");
        Self {
            port,
            ip: ALL_INTERFACES,
            config_dir,
            config_file,
            password,
        }
    }
}
