use std::{net::SocketAddr, path::PathBuf};

use clap::Parser;

/// Default configuration path, optional on disk
pub const DEFAULT_CONFIG: &str = "errs.toml";

/// Reference service for structured HTTP errors
#[derive(Debug, Parser)]
#[command(name = "errs-demo", about = "Serve the errs reference API")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG, env = "ERRS_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "ERRS_LISTEN")]
    pub listen: Option<SocketAddr>,
}
