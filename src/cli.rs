use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)] // requires `derive` feature
#[command(name = "image-stash")]
#[command(about = "Search for images and store them in PostgreSQL", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Search for images and store them (interactive unless --query is given)
    Search(SearchArgs),
    /// Create the images table if it does not exist
    InitDb,
    /// Print the number of stored images and the most recent names
    Count(CountArgs),
    /// Print configuration values
    PrintConfig,
    /// Delete every stored image
    TruncateDb,
}

#[derive(Debug, Default, Args)]
pub struct SearchArgs {
    /// Run a single round for this query instead of prompting
    #[arg(short, long)]
    pub query: Option<String>,
    /// Number of images to fetch for --query, 1 to 100
    #[arg(short = 'n', long, default_value_t = 10, value_parser = clap::value_parser!(u16).range(1..=100))]
    pub max_images: u16,
}

#[derive(Debug, Args)]
pub struct CountArgs {
    /// How many of the latest image names to list
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(i64).range(0..=10_000))]
    pub latest: i64,
}
