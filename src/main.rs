use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use scryfall_rss::clock::SystemClock;
use scryfall_rss::config::Config;
use scryfall_rss::generator::{FeedRequest, GenerateError, Generator, RunOutcome};
use scryfall_rss::query::QueryError;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "scryfall-rss",
    about = "Create an RSS feed from Scryfall search results"
)]
struct Args {
    /// Scryfall search query
    query: Option<String>,

    /// Output file path (default: scryfall_feed.xml)
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// RSS feed title
    #[arg(short, long)]
    title: Option<String>,

    /// RSS feed description
    #[arg(short, long)]
    description: Option<String>,

    /// Full Scryfall search URL (alternative to query)
    #[arg(short, long)]
    url: Option<String>,

    /// Config file (default: ~/.config/scryfall-rss/config.toml)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn print_usage() -> std::io::Result<()> {
    Args::command().print_help()?;
    println!();
    println!("Example usage:");
    println!("  scryfall-rss 't:angel c=w'");
    println!("  scryfall-rss --url 'https://scryfall.com/search?q=t%3Aangel+c%3Dw'");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout carries only the run summary
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let config = match args.config.as_deref() {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config file: {}", path.display()))?,
        None => match Config::default_path() {
            Some(path) => Config::load(&path).context("Failed to load config file")?,
            None => Config::default(),
        },
    };
    tracing::debug!(?config, "Effective configuration");

    let request = FeedRequest {
        query: args.query,
        url: args.url,
        output: args.output.unwrap_or_else(|| config.output.clone()),
        title: args.title,
        description: args.description,
    };

    let generator = Generator::new(&config, SystemClock);
    match generator.run(&request).await {
        Ok(RunOutcome::Written {
            path,
            items,
            has_more,
            total_cards,
        }) => {
            println!("RSS feed created successfully: {}", path.display());
            println!("Feed contains {} cards", items);
            if has_more {
                println!(
                    "Note: This feed only contains the first page of results. Total cards matching query: {}",
                    total_cards.unwrap_or(0)
                );
            }
        }
        Ok(RunOutcome::NoResults { query }) => {
            println!("No cards found for query: {}", query);
        }
        Err(GenerateError::Query(QueryError::NoQuerySpecified)) => {
            print_usage().context("Failed to print usage")?;
            std::process::exit(1);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    Ok(())
}
