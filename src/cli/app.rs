use bc_client::api::QueryOptions;
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bc-client")]
#[command(about = "Fetch customers and products from the Business Central OData API")]
pub struct Cli {
    /// Load credentials from this .env file instead of ./.env
    #[arg(long, global = true)]
    pub env_file: Option<PathBuf>,
    /// Pretty print the output
    #[arg(short, long, global = true)]
    pub pretty: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List customers
    Customers(CollectionArgs),
    /// List products
    Products(CollectionArgs),
    /// Look up customers by number
    Customer {
        /// Customer number (e.g., "C00010")
        number: String,
    },
    /// Look up products by number
    Product {
        /// Product number (e.g., "060.166.0574")
        number: String,
    },
}

#[derive(Args, Debug, Default)]
pub struct CollectionArgs {
    /// Only records created after this RFC 3339 instant
    #[arg(long)]
    pub created_after: Option<DateTime<Utc>>,
    /// Only records modified after this RFC 3339 instant
    #[arg(long)]
    pub modified_after: Option<DateTime<Utc>>,
    /// OData $orderby expression (e.g., "name desc")
    #[arg(long)]
    pub order_by: Option<String>,
    /// Comma separated fields to return
    #[arg(long)]
    pub select: Option<String>,
    /// Number of records to skip
    #[arg(long)]
    pub skip: Option<u32>,
    /// Maximum number of records to return
    #[arg(long)]
    pub top: Option<u32>,
    /// Raw OData $filter expression
    #[arg(long)]
    pub filter: Option<String>,
}

impl CollectionArgs {
    pub fn to_query_options(&self) -> QueryOptions {
        QueryOptions {
            created_after: self.created_after,
            modified_after: self.modified_after,
            order_by: self.order_by.clone(),
            select: self.select.clone(),
            offset: self.skip,
            limit: self.top,
            filter: self.filter.clone(),
        }
    }
}
