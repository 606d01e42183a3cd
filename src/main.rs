//! linkscout command-line interface
//!
//! Thin shell over the crawl engine: parse flags, run the crawl, print the
//! report, map the outcome to an exit code.

use clap::Parser;
use linkscout::config::{load_config, validate, CrawlOptions};
use linkscout::report::print_report;
use linkscout::{crawl, LinkScoutError};
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Exit code when every checked link resolved
const EXIT_OK: i32 = 0;
/// Exit code when broken links were found
const EXIT_BROKEN: i32 = 1;
/// Exit code for configuration or internal errors
const EXIT_ERROR: i32 = 2;

/// Check websites for broken links and missing anchors
#[derive(Parser, Debug)]
#[command(name = "linkscout")]
#[command(version)]
#[command(about = "Check websites for broken links and missing anchors", long_about = None)]
struct Cli {
    /// Seed URLs to start crawling from
    #[arg(value_name = "URL")]
    seeds: Vec<String>,

    /// Glob patterns marking URLs as internal (default: each seed plus '**')
    #[arg(long = "hosts", value_name = "GLOB")]
    hosts: Vec<String>,

    /// Glob patterns for URLs to record but never fetch
    #[arg(long = "skip", value_name = "GLOB")]
    skip: Vec<String>,

    /// Number of concurrent connections
    #[arg(long, short = 'c', value_name = "N")]
    connections: Option<usize>,

    /// Per-request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Do not check external links at all
    #[arg(long = "no-external")]
    no_external: bool,

    /// Optional TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Emit the full crawl result as JSON instead of the text report
    #[arg(long)]
    json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    let exit_code = match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("Error: {}", e);
            EXIT_ERROR
        }
    };

    std::process::exit(exit_code);
}

async fn run(cli: Cli) -> Result<i32, LinkScoutError> {
    let mut options = CrawlOptions {
        skip: cli.skip.clone(),
        ..Default::default()
    };
    let mut seeds = cli.seeds.clone();
    let mut hosts = cli.hosts.clone();

    // File values fill in everything the CLI left unset
    if let Some(path) = &cli.config {
        tracing::info!("loading configuration from {}", path.display());
        let file = load_config(path)?;
        file.apply_to(&mut options);
        seeds.extend(file.seeds.iter().cloned());
        hosts.extend(file.hosts.iter().cloned());
    }

    // CLI flags win over the file
    if let Some(connections) = cli.connections {
        options.connections = connections;
    }
    if let Some(timeout) = cli.timeout {
        options.timeout = Duration::from_secs(timeout);
    }
    if cli.no_external {
        options.check_external = false;
    }

    validate(&options, &seeds, &hosts)?;

    let result = crawl(&seeds, &hosts, &options).await?;

    if cli.json {
        println!("{}", result.to_json()?);
    } else if !cli.quiet {
        print_report(&result);
    }

    if result.has_broken_links() {
        Ok(EXIT_BROKEN)
    } else {
        Ok(EXIT_OK)
    }
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkscout=warn"),
            1 => EnvFilter::new("linkscout=info"),
            2 => EnvFilter::new("linkscout=debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
