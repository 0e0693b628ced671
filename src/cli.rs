use std::path::PathBuf;

use clap::Parser;

/// Multi-tenant portfolio analytics backend: cash-flow ledger, capital
/// performance calculator, and market-data ingestion clients.
#[derive(Parser)]
#[command(name = "vire-cashflow", version, about)]
pub struct Cli {
    /// Path to the JSON configuration file (client base URLs, rate
    /// limits, timeouts). Never carries the Navexa API key — that
    /// credential is injected per request.
    #[arg(long, default_value = "config.json")]
    pub config: PathBuf,

    /// Host to bind the HTTP server to.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to bind the HTTP server to.
    #[arg(long, default_value = "8080")]
    pub port: u16,

    /// Directory holding the sqlite-backed user-data store.
    #[arg(long, default_value = "~/.vire-cashflow")]
    pub data_dir: PathBuf,
}
