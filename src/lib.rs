//! book-crawler - Browser-driven crawler for document library category trees
//!
//! Walks a site's top categories, their subcategories, and the books listed
//! under each, printing a nested text report. A small JSON request helper
//! lives alongside it in [`request`].

pub mod browser;
pub mod commands;
pub mod config;
pub mod crawler;
pub mod format;
pub mod logging;
pub mod request;
pub mod site;

pub use config::Config;
pub use crawler::{CrawlSummary, Crawler, Listing, StepError};
pub use site::{Book, Category, Subcategory};
