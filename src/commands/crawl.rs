//! Crawl command implementation.

use crate::browser::{ChromiumSession, PageDriver};
use crate::config::Config;
use crate::crawler::{CrawlSummary, Crawler};
use crate::format::ReportWriter;
use anyhow::{Context, Result};
use std::io::Write;
use tracing::{error, info, warn};

/// Runs a full traversal and owns the browser session for its lifetime.
pub struct CrawlCommand {
    config: Config,
}

impl CrawlCommand {
    /// Creates a new crawl command.
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Launches Chromium and crawls, writing the report to `out`.
    pub async fn execute<W: Write>(&self, out: W) -> Result<CrawlSummary> {
        let session =
            ChromiumSession::launch(&self.config).await.context("Failed to launch browser")?;

        self.execute_with_driver(Box::new(session), out).await
    }

    /// Crawls with a provided driver (for testing).
    ///
    /// The driver is closed exactly once whether the crawl succeeds or not;
    /// a fatal crawl error is logged here and returned.
    pub async fn execute_with_driver<W: Write>(
        &self,
        mut driver: Box<dyn PageDriver>,
        out: W,
    ) -> Result<CrawlSummary> {
        let mut report = ReportWriter::new(out);
        let outcome = Crawler::new(driver.as_mut(), &self.config).run(&mut report).await;

        if let Err(e) = driver.close().await {
            warn!("Failed to release browser session: {}", e);
        }

        match &outcome {
            Ok(summary) => info!(
                "Crawl finished: {} categories, {} subcategories, {} books ({} failed steps)",
                summary.categories, summary.subcategories, summary.books, summary.failed_steps
            ),
            Err(e) => error!("Crawl aborted: {:#}", e),
        }

        outcome
    }
}
