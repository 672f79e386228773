use std::path::PathBuf;

use clap::Parser;

/// Zodica horoscope server
#[derive(Debug, Parser)]
#[command(name = "zodica", about = "AI-generated daily horoscope service")]
pub struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "zodica.toml", env = "ZODICA_CONFIG")]
    pub config: PathBuf,

    /// Override the listen address
    #[arg(long, env = "ZODICA_LISTEN")]
    pub listen: Option<std::net::SocketAddr>,
}
