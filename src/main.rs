//! book-crawler - Browser-driven crawler for document library category trees

use anyhow::Result;
use book_crawler::commands::{CrawlCommand, Method, RequestCommand};
use book_crawler::config::Config;
use book_crawler::logging::log_filter;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "book-crawler",
    version,
    about = "Crawl a document library's category tree",
    long_about = "Drives Chromium through top categories, subcategories, and book listings, \
                  printing what it finds."
)]
struct Cli {
    /// Page the crawl starts from
    #[arg(long, global = true, env = "CRAWLER_START_URL")]
    start_url: Option<String>,

    /// Run the browser without a window
    #[arg(long, global = true)]
    headless: bool,

    /// Chromium executable to launch
    #[arg(long, global = true, env = "CRAWLER_CHROME_PATH")]
    chrome: Option<PathBuf>,

    /// Bound on subcategory and book list waits, in milliseconds
    #[arg(long, global = true)]
    selector_timeout: Option<u64>,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Crawl categories, subcategories, and books (default)
    Crawl,

    /// Send one JSON request and print the decoded response
    #[command(alias = "req")]
    Request {
        /// HTTP method
        #[arg(value_enum)]
        method: Method,

        /// Target URL
        url: String,

        /// JSON body, POST and PUT only (omit to send no body)
        #[arg(short, long)]
        data: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so the report on stdout stays clean
    let rust_log = std::env::var("RUST_LOG").ok();
    let filter = log_filter(cli.verbose, rust_log.as_deref());

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(url) = cli.start_url {
        config.start_url = url;
    }
    if cli.headless {
        config.headless = true;
    }
    if let Some(chrome) = cli.chrome {
        config.chrome_path = Some(chrome);
    }
    if let Some(timeout) = cli.selector_timeout {
        config.selector_timeout_ms = timeout;
    }

    match cli.command.unwrap_or(Commands::Crawl) {
        Commands::Crawl => {
            let cmd = CrawlCommand::new(config);
            cmd.execute(std::io::stdout()).await?;
        }

        Commands::Request { method, url, data } => {
            let cmd = RequestCommand::new()?;
            let response = cmd.execute(method, &url, data.as_deref()).await?;
            println!("{}", serde_json::to_string_pretty(&response)?);
        }
    }

    Ok(())
}
