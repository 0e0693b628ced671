use clap::Parser;

use vire_cashflow::{api, config};

mod cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = cli::Cli::parse();

    let app_config = match config::AppConfig::load(&cli.config) {
        Ok(cfg) => cfg,
        Err(err) => {
            tracing::warn!(path = %cli.config.display(), %err, "no config file found, using defaults");
            config::AppConfig::default()
        }
    };

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(api::serve(&cli.host, cli.port, &cli.data_dir, &app_config))
}
