use anyhow::{Context, Result};
use bc_client::api::BusinessCentralClient;
use bc_client::config::Settings;
use clap::Parser;
use log::info;

mod cli;

use cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    info!("Starting bc-client");

    let settings = match &cli.env_file {
        Some(path) => Settings::from_env_file(path),
        None => Settings::from_env(),
    }
    .context("Failed to load client settings")?;

    let client = BusinessCentralClient::connect(&settings)
        .await
        .context("Failed to connect to Business Central")?;

    let records = cli::commands::run(&client, &cli.command).await?;
    println!("{}", cli::commands::render(&records, cli.pretty)?);

    Ok(())
}
