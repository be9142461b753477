use super::app::Commands;
use anyhow::{Context, Result};
use bc_client::api::{BusinessCentralClient, QueryOptions};
use log::info;
use serde_json::Value;

/// Run a command and return the fetched records
pub async fn run(client: &BusinessCentralClient, command: &Commands) -> Result<Vec<Value>> {
    let records = match command {
        Commands::Customers(args) => client
            .get_customers(&args.to_query_options())
            .await
            .context("Failed to fetch customers")?,
        Commands::Products(args) => client
            .get_products(&args.to_query_options())
            .await
            .context("Failed to fetch products")?,
        Commands::Customer { number } => client
            .get_customer(number)
            .await
            .with_context(|| format!("Failed to fetch customer '{}'", number))?,
        Commands::Product { number } => client
            .get_product(number)
            .await
            .with_context(|| format!("Failed to fetch product '{}'", number))?,
    };

    info!("Fetched {} records", records.len());
    Ok(records)
}

pub fn render(records: &[Value], pretty: bool) -> Result<String> {
    let output = if pretty {
        serde_json::to_string_pretty(records)?
    } else {
        serde_json::to_string(records)?
    };
    Ok(output)
}
