use anyhow::Context;
use clap::Parser;
use helpdesk_cli::Cli;
use helpdesk_core::{ClientConfig, ViewScope};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env().context("read configuration")?;
    cli.apply_overrides(&mut config);
    let state = helpdesk_cli::state::build_state(config).context("open session store")?;

    let scope = ViewScope::new();
    let on_interrupt = scope.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.close();
        }
    });

    helpdesk_cli::run(&state, cli, &scope).await
}
