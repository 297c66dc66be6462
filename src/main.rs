//! Site-Scribe main entry point
//!
//! This is the command-line interface for the Site-Scribe site transcriber.

use clap::{Parser, ValueEnum};
use site_scribe::config::{load_config, resolve_output_path, validate, Config, DocumentFormat};
use site_scribe::crawler::Crawler;
use site_scribe::output::print_report;
use site_scribe::{ConfigError, ScribeError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Exit code for invalid arguments or configuration
const EXIT_USAGE: u8 = 2;

/// Site-Scribe: A polite same-domain site transcriber
///
/// Site-Scribe crawls one website breadth-first, staying on the start URL's
/// host, and writes the text of every page it visits into a single document.
#[derive(Parser, Debug)]
#[command(name = "site-scribe")]
#[command(version)]
#[command(about = "A polite same-domain site transcriber", long_about = None)]
struct Cli {
    /// URL the crawl starts from
    #[arg(long, value_name = "URL", required_unless_present = "config")]
    start_url: Option<String>,

    /// Path of the output document
    #[arg(long, value_name = "PATH", required_unless_present = "config")]
    output: Option<PathBuf>,

    /// Maximum number of pages to visit [default: 50]
    #[arg(long, value_name = "N")]
    max_pages: Option<u32>,

    /// Maximum link depth from the start URL [default: 2]
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Seconds to wait before every request [default: 1.0]
    #[arg(long, value_name = "SECONDS")]
    delay: Option<f64>,

    /// Per-request timeout in seconds [default: 10]
    #[arg(long, value_name = "SECONDS")]
    timeout: Option<u64>,

    /// Stop the crawl after this many seconds
    #[arg(long, value_name = "SECONDS")]
    time_limit: Option<u64>,

    /// Also crawl subdomains of the start host
    #[arg(long)]
    include_subdomains: bool,

    /// Output document format [default: markdown]
    #[arg(long, value_enum)]
    format: Option<FormatArg>,

    /// Path to TOML configuration file; flags override its values
    #[arg(long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Validate the configuration and show what would be crawled
    #[arg(long)]
    dry_run: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Markdown,
    Jsonl,
}

impl From<FormatArg> for DocumentFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Markdown => DocumentFormat::Markdown,
            FormatArg::Jsonl => DocumentFormat::Jsonl,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = match build_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::from(EXIT_USAGE);
        }
    };

    if cli.dry_run {
        return match validate(&config) {
            Ok(()) => {
                handle_dry_run(&config);
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!("Invalid configuration: {}", e);
                ExitCode::from(EXIT_USAGE)
            }
        };
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_scribe=info,warn"),
            1 => EnvFilter::new("site_scribe=debug,info"),
            2 => EnvFilter::new("site_scribe=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Layers defaults, the optional config file, and command-line flags
fn build_config(cli: &Cli) -> Result<Config, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    if let Some(start_url) = &cli.start_url {
        config.crawler.start_url = start_url.clone();
    }
    if let Some(output) = &cli.output {
        config.output.path = output.display().to_string();
    }
    if let Some(max_pages) = cli.max_pages {
        config.crawler.max_pages = max_pages;
    }
    if let Some(max_depth) = cli.max_depth {
        config.crawler.max_depth = max_depth;
    }
    if let Some(delay) = cli.delay {
        config.crawler.delay_seconds = delay;
    }
    if let Some(timeout) = cli.timeout {
        config.crawler.timeout_seconds = timeout;
    }
    if let Some(time_limit) = cli.time_limit {
        config.crawler.time_limit_seconds = Some(time_limit);
    }
    if cli.include_subdomains {
        config.crawler.include_subdomains = true;
    }
    if let Some(format) = cli.format {
        config.output.format = format.into();
    }

    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Site-Scribe Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Start URL: {}", config.crawler.start_url);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Delay: {}s", config.crawler.delay_seconds);
    println!("  Timeout: {}s", config.crawler.timeout_seconds);
    match config.crawler.time_limit_seconds {
        Some(limit) => println!("  Time limit: {}s", limit),
        None => println!("  Time limit: none"),
    }
    println!(
        "  Include subdomains: {}",
        config.crawler.include_subdomains
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Document: {}", resolve_output_path(config).display());
    println!("  Format: {:?}", config.output.format);

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config) -> ExitCode {
    let mut crawler = match Crawler::new(config) {
        Ok(crawler) => crawler,
        Err(e) => {
            tracing::error!("Failed to start crawl: {}", e);
            return match e {
                ScribeError::Config(_) | ScribeError::UrlError(_) => ExitCode::from(EXIT_USAGE),
                _ => ExitCode::FAILURE,
            };
        }
    };

    let listener = crawler.shutdown_signal().listen_for_ctrl_c();
    let result = crawler.run().await;
    listener.abort();

    match result {
        Ok(report) => {
            print_report(&report);
            if report.status.is_done() {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            ExitCode::FAILURE
        }
    }
}
