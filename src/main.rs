//! Astra Client - debugging CLI
//!
//! Fetches a path from the configured store through the caching client and
//! prints either the untouched upstream body or the normalized rows.

use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use astra_client::client::resource_of;
use astra_client::models::{FindOptions, Menu};
use astra_client::{spawn_cleanup_task, Config, HttpMethod, RemoteClient, NO_BODY};

#[derive(Parser)]
#[command(name = "astra_client")]
#[command(about = "Inspect rows of the store through the caching client")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the raw upstream body of a GET
    Raw {
        /// Path below the keyspace, e.g. /menu_makanan/rows
        path: String,
    },
    /// Print every row of a GET, normalized
    Rows {
        path: String,
        /// Map rows onto the menu entity
        #[arg(long)]
        menu: bool,
    },
    /// Print the single record of a GET, normalized
    One { path: String },
    /// Run a Data API find on a collection
    Find {
        collection: String,
        /// Filter document as JSON
        #[arg(long, default_value = "{}")]
        filter: String,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "astra_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config::from_env().context("loading configuration")?;
    info!(
        endpoint = %config.endpoint,
        keyspace = %config.keyspace,
        default_ttl_secs = config.default_ttl.as_secs(),
        "configuration loaded"
    );

    let client = RemoteClient::new(config)?;
    let cleanup_handle = spawn_cleanup_task(client.cache().clone(), client.config().cleanup_interval);

    let output = run(&client, cli.command).await;
    cleanup_handle.abort();

    println!("{}", output?);
    Ok(())
}

async fn run(client: &RemoteClient, command: Commands) -> Result<String> {
    let rendered = match command {
        Commands::Raw { path } => {
            let body = client.query(HttpMethod::Get, &path, NO_BODY).await?;
            String::from_utf8_lossy(&body).into_owned()
        }
        Commands::Rows { path, menu } => {
            let rows = client.fetch_rows(&path, ttl(client, &path)).await?;
            if menu {
                let menus: Vec<Menu> = rows.iter().map(Menu::from_row).collect();
                serde_json::to_string_pretty(&menus)?
            } else {
                serde_json::to_string_pretty(&rows)?
            }
        }
        Commands::One { path } => {
            let row = client.fetch_one(&path, ttl(client, &path)).await?;
            serde_json::to_string_pretty(&row)?
        }
        Commands::Find {
            collection,
            filter,
            limit,
        } => {
            let filter: Value = serde_json::from_str(&filter).context("parsing --filter")?;
            let options = FindOptions {
                limit,
                ..FindOptions::default()
            };
            let documents = client.find(&collection, filter, options).await?;
            serde_json::to_string_pretty(&documents)?
        }
    };
    Ok(rendered)
}

fn ttl(client: &RemoteClient, path: &str) -> Duration {
    client.ttl_for(resource_of(path))
}
