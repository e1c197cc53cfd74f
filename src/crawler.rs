//! Depth-first traversal of the category → subcategory → book tree.
//!
//! Everything below the top level is fault-isolated: a failed navigation,
//! wait, or extraction turns into a [`Listing::Failed`] and the walk moves on.
//! Only top category discovery can abort the run.

use crate::browser::{BrowserError, PageDriver, WaitOptions};
use crate::config::Config;
use crate::format::ReportWriter;
use crate::site::selectors::{book, menu, subcategory};
use crate::site::{Book, Category, ExtractError, Parser, Subcategory};
use anyhow::{Context, Result};
use std::io::Write;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Why a single traversal step produced nothing.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Browser(#[from] BrowserError),

    #[error(transparent)]
    Extraction(#[from] ExtractError),
}

/// Outcome of a guarded listing step.
///
/// Callers that only print can use [`Listing::items`], which is empty for a
/// failure; callers that care can tell a genuinely empty page from a broken one.
#[derive(Debug)]
pub enum Listing<T> {
    /// The page was read; the list may legitimately be empty.
    Found(Vec<T>),
    /// Navigation, wait, or extraction failed.
    Failed(StepError),
}

impl<T> Listing<T> {
    pub fn items(&self) -> &[T] {
        match self {
            Listing::Found(items) => items,
            Listing::Failed(_) => &[],
        }
    }

    pub fn into_items(self) -> Vec<T> {
        match self {
            Listing::Found(items) => items,
            Listing::Failed(_) => Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Listing::Failed(_))
    }

    pub fn error(&self) -> Option<&StepError> {
        match self {
            Listing::Found(_) => None,
            Listing::Failed(e) => Some(e),
        }
    }
}

/// Counts gathered over one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CrawlSummary {
    pub categories: usize,
    pub subcategories: usize,
    pub books: usize,
    /// Listings that came back empty because of an error
    pub failed_steps: usize,
}

/// Walks the category tree on a single exclusively borrowed page.
pub struct Crawler<'a, D: PageDriver + ?Sized> {
    page: &'a mut D,
    start_url: String,
    selector_timeout: Duration,
    menu_timeout: Duration,
}

impl<'a, D: PageDriver + ?Sized> Crawler<'a, D> {
    /// Creates a crawler over `page` using the timeouts and start URL from `config`.
    pub fn new(page: &'a mut D, config: &Config) -> Self {
        Self {
            page,
            start_url: config.start_url.clone(),
            selector_timeout: config.selector_timeout(),
            menu_timeout: config.menu_timeout(),
        }
    }

    /// Opens the site menu and reads the top categories.
    ///
    /// Unguarded: a missing menu control, a menu that never shows, or a
    /// failed extraction is returned to the caller.
    pub async fn list_top_categories(&mut self) -> Result<Vec<Category>, StepError> {
        info!("Loading top categories from {}", self.start_url);

        self.page.goto(&self.start_url).await?;
        self.page.wait_for_selector(menu::TOGGLE, WaitOptions::visible(self.menu_timeout)).await?;
        self.page.click(menu::TOGGLE).await?;
        self.page
            .wait_for_selector(menu::LINK_CSS, WaitOptions::visible(self.menu_timeout))
            .await?;

        self.extract(Parser::parse_categories).await
    }

    /// Lists the subcategories of a top category page. Never fails.
    pub async fn list_subcategories(&mut self, url: &str) -> Listing<Subcategory> {
        self.guarded_listing(url, subcategory::LINK_CSS, Parser::parse_subcategories).await
    }

    /// Lists the books of a subcategory page. Never fails.
    pub async fn list_books(&mut self, url: &str) -> Listing<Book> {
        self.guarded_listing(url, book::TABLE_CSS, Parser::parse_books).await
    }

    /// Walks the whole tree, writing the report as it goes.
    pub async fn run<W: Write>(&mut self, report: &mut ReportWriter<W>) -> Result<CrawlSummary> {
        let categories =
            self.list_top_categories().await.context("Failed to load top categories")?;

        let mut summary = CrawlSummary { categories: categories.len(), ..Default::default() };

        for category in &categories {
            report.category(category)?;

            let subcategories = self.list_subcategories(&category.href).await;
            if let Some(e) = subcategories.error() {
                warn!("No subcategories for {}: {}", category.href, e);
                summary.failed_steps += 1;
            }

            report.subcategories_found(!subcategories.is_empty())?;

            for sub in subcategories.items() {
                summary.subcategories += 1;
                report.subcategory(sub)?;

                let books = self.list_books(&sub.href).await;
                if let Some(e) = books.error() {
                    warn!("No books for {}: {}", sub.href, e);
                    summary.failed_steps += 1;
                }

                summary.books += books.items().len();
                report.books(books.items())?;
            }
        }

        Ok(summary)
    }

    /// Navigate, wait (bounded), then extract regardless of how the wait went.
    async fn guarded_listing<T>(
        &mut self,
        url: &str,
        wait_for: &str,
        parse: fn(&Parser, &str) -> Result<Vec<T>, ExtractError>,
    ) -> Listing<T> {
        if let Err(e) = self.page.goto(url).await {
            return Listing::Failed(e.into());
        }

        let waited =
            self.page.wait_for_selector(wait_for, WaitOptions::present(self.selector_timeout)).await;
        match &waited {
            Err(e) if e.is_timeout() => debug!("{}; extracting anyway", e),
            Err(e) => warn!("Wait on {} failed: {}; extracting anyway", url, e),
            Ok(()) => {}
        }

        match self.extract(parse).await {
            Ok(items) if items.is_empty() => match waited {
                Ok(()) => Listing::Found(items),
                Err(e) => Listing::Failed(e.into()),
            },
            Ok(items) => Listing::Found(items),
            Err(e) => Listing::Failed(e),
        }
    }

    /// Snapshots the current page and runs `parse` over it.
    async fn extract<T>(
        &mut self,
        parse: fn(&Parser, &str) -> Result<Vec<T>, ExtractError>,
    ) -> Result<Vec<T>, StepError> {
        let page_url = self.page.url().await?;
        let html = self.page.content().await?;
        let parser = Parser::new(&page_url)?;
        Ok(parse(&parser, &html)?)
    }
}
