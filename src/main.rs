//! Hound-Relay command-line interface

use anyhow::Context;
use clap::{Parser, Subcommand};
use hound_relay::config::load_config_with_hash;
use hound_relay::dispatch::Dispatcher;
use hound_relay::intent::explain;
use hound_relay::stealth::IdentityPool;
use hound_relay::Config;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Characters of a fetched body shown by `search`
const PREVIEW_CHARS: usize = 300;

/// Hound-Relay: intent-driven search dispatch
///
/// Resolves free-text requests into a target search engine and fetches the
/// result with retries, bounded concurrency, and rotating client identities.
#[derive(Parser, Debug)]
#[command(name = "hound-relay")]
#[command(version)]
#[command(about = "Intent-driven search dispatch", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in defaults if omitted)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve text into an intent and explain the result
    Resolve {
        text: String,

        /// Print the intent as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show the engine and URL a search would use
    Plan { text: String },

    /// Resolve, plan, and fetch a search
    Search { text: String },

    /// Fetch URLs concurrently with retry
    Fetch {
        #[arg(required = true)]
        urls: Vec<String>,
    },

    /// Generate session configurations
    Identity {
        #[arg(short = 'n', long, default_value_t = 1)]
        count: usize,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    match cli.command {
        Command::Resolve { text, json } => handle_resolve(config, &text, json)?,
        Command::Plan { text } => handle_plan(config, &text)?,
        Command::Search { text } => handle_search(config, &text).await?,
        Command::Fetch { urls } => handle_fetch(config, &urls).await,
        Command::Identity { count } => handle_identity(&config, count)?,
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hound_relay=info,warn"),
            1 => EnvFilter::new("hound_relay=debug,info"),
            2 => EnvFilter::new("hound_relay=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

fn handle_resolve(config: Config, text: &str, json: bool) -> anyhow::Result<()> {
    let intent = Dispatcher::new(config).resolve(text);
    if json {
        println!("{}", serde_json::to_string_pretty(&intent)?);
    } else {
        print!("{}", explain(&intent));
    }
    Ok(())
}

fn handle_plan(config: Config, text: &str) -> anyhow::Result<()> {
    let (_, plan) = Dispatcher::new(config).plan(text)?;
    println!("Engine: {}", plan.engine);
    println!("Selection: {}", plan.mode);
    println!("Query: {}", plan.query);
    println!("URL: {}", plan.url);
    Ok(())
}

async fn handle_search(config: Config, text: &str) -> anyhow::Result<()> {
    let response = Dispatcher::new(config).search(text).await?;

    println!("Engine: {} ({})", response.plan.engine, response.plan.mode);
    println!("URL: {}", response.plan.url);
    println!("Attempts: {}", response.outcome.attempts());

    match response.outcome.payload() {
        Some(page) => {
            println!("Status: {}", page.status_code);
            println!("Final URL: {}", page.final_url);
            println!("Content-Type: {}", page.content_type);
            let preview: String = page.body.chars().take(PREVIEW_CHARS).collect();
            println!("\n{}", preview);
        }
        None => {
            println!(
                "✗ {}",
                response.outcome.failure_message().unwrap_or_default()
            );
        }
    }

    Ok(())
}

async fn handle_fetch(config: Config, urls: &[String]) {
    let results = Dispatcher::new(config).fetch_all(urls).await;

    for (url, result) in urls.iter().zip(results) {
        match result {
            Ok(outcome) => match outcome.payload() {
                Some(page) => println!(
                    "✓ {} {} ({} bytes, {} attempts)",
                    url,
                    page.status_code,
                    page.body.len(),
                    outcome.attempts()
                ),
                None => println!(
                    "✗ {} {}",
                    url,
                    outcome.failure_message().unwrap_or_default()
                ),
            },
            Err(failure) => println!("✗ {} {}", url, failure),
        }
    }
}

fn handle_identity(config: &Config, count: usize) -> anyhow::Result<()> {
    let pool = IdentityPool::new(&config.identity);
    let sessions: Vec<_> = (0..count).map(|_| pool.next_session()).collect();
    println!("{}", serde_json::to_string_pretty(&sessions)?);
    Ok(())
}
