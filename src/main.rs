mod cli;
mod logging;

use std::io;
use std::process;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands, CountArgs, SearchArgs};
use colored::*;
use dotenv::dotenv;
use image_stash::config::{self, non_empty, AppConfig};
use image_stash::db::{resolve_database_url, PgImageStore};
use image_stash::utils::{prompt_confirm, prompt_line};
use image_stash::{BarReporter, Harvester, ImageStore, RoundOutcome, SearchClient, Session};
use reqwest::Client;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let config = match config::load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    match args.command {
        Some(Commands::Search(search_args)) => run_search(&config, search_args).await?,
        Some(Commands::InitDb) => {
            let mut store = open_store(&config);
            store.ensure_schema()?;
            info!("Table 'images' created successfully.");
        }
        Some(Commands::Count(count_args)) => run_count(&config, count_args)?,
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config.redacted());
        }
        Some(Commands::TruncateDb) => {
            match prompt_confirm("Are you SURE you want to delete ALL stored images?", Some(false)) {
                Ok(true) => {
                    let mut store = open_store(&config);
                    match store.truncate() {
                        Ok(()) => println!("Table 'images' truncated"),
                        Err(e) => error!("Error truncating table: {}", e),
                    }
                }
                _ => {
                    process::exit(0);
                }
            }
        }
        None => run_search(&config, SearchArgs::default()).await?,
    }

    Ok(())
}

/// Connect to PostgreSQL or exit: without a database nothing can be stored.
fn open_store(config: &AppConfig) -> PgImageStore {
    let connected = resolve_database_url(config, prompt_line)
        .and_then(|url| PgImageStore::connect(&url));

    match connected {
        Ok(store) => store,
        Err(err) => {
            error!("Error connecting to database: {}", err);
            process::exit(1);
        }
    }
}

fn resolve_api_key(config: &AppConfig) -> io::Result<String> {
    if let Some(key) = non_empty(&config.serpapi_api_key) {
        return Ok(key.to_string());
    }
    let key = prompt_line("Please enter your SerpApi API key: ")?;
    if key.is_empty() {
        warn!("No SerpApi API key given; searches will likely be rejected");
    }
    Ok(key)
}

async fn run_search(config: &AppConfig, args: SearchArgs) -> anyhow::Result<()> {
    println!("This tool searches for images and stores them in the database.");

    let mut store = open_store(config);
    store
        .ensure_schema()
        .context("Error creating table 'images'")?;
    info!("Table 'images' created successfully.");

    let api_key = resolve_api_key(config)?;

    let client = Client::builder()
        .build()
        .context("failed to build HTTP client")?;
    let session = Session::new(
        SearchClient::with_endpoint(client.clone(), config.search_endpoint.clone()),
        Harvester::new(client).with_timeout(config.download_timeout()),
        api_key,
    )
    .with_reporter(Arc::new(BarReporter::new()));

    match args.query {
        Some(query) => {
            let outcome = session
                .run_round(&query, usize::from(args.max_images), &mut store)
                .await?;
            match outcome {
                RoundOutcome::NoResults => info!("No result found!"),
                RoundOutcome::Completed(summary) => info!(
                    "{} requested, {} downloaded, {} stored",
                    format!("{}", summary.requested).cyan(),
                    format!("{}", summary.downloaded).green(),
                    format!("{}", summary.stored).green(),
                ),
            }
        }
        None => {
            let stdin = io::stdin();
            let rounds = session
                .run_interactive(&mut stdin.lock(), &mut io::stdout(), &mut store)
                .await?;
            info!("{} rounds completed", format!("{}", rounds).cyan());
        }
    }

    info!("Closing database connection");
    Ok(())
}

fn run_count(config: &AppConfig, args: CountArgs) -> anyhow::Result<()> {
    let mut store = open_store(config);
    let count = store.count().context("Error counting images")?;
    info!("{} images stored", format!("{}", count).green());

    for row in store.latest(args.latest).context("Error listing images")? {
        let size = row.data.as_ref().map_or(0, |d| d.len());
        println!(
            "{:>6}  {:<20} {} bytes",
            row.id,
            row.name.as_deref().unwrap_or("<unnamed>"),
            size
        );
    }

    Ok(())
}
