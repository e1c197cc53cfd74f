//! HTML parser for menu, subcategory, and book listing snapshots.

use crate::site::models::{Book, Category, Subcategory};
use crate::site::selectors::{book, menu, subcategory};
use scraper::{ElementRef, Html};
use thiserror::Error;
use tracing::{debug, trace, warn};
use url::Url;

/// Errors raised while extracting records from a page snapshot.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("matched element has no `{child}` child (selector: {selector})")]
    MissingChild { selector: &'static str, child: &'static str },

    #[error("page URL is not a valid base URL: {0}")]
    InvalidBaseUrl(String),
}

/// Parser bound to the URL of the page being read, so relative links can be
/// resolved to absolute ones.
pub struct Parser {
    base: Url,
}

impl Parser {
    /// Creates a parser for a page loaded from `page_url`.
    pub fn new(page_url: &str) -> Result<Self, ExtractError> {
        let base =
            Url::parse(page_url).map_err(|e| ExtractError::InvalidBaseUrl(format!("{page_url}: {e}")))?;
        Ok(Self { base })
    }

    /// Extracts the top categories from the opened dropdown menu.
    pub fn parse_categories(&self, html: &str) -> Result<Vec<Category>, ExtractError> {
        let document = Html::parse_document(html);

        let categories: Vec<Category> = document
            .select(&menu::LINK)
            .filter_map(|link| {
                let href = self.link_href(link)?;
                Some(Category { text: text_of(link), href })
            })
            .collect();

        debug!("Parsed {} top categories", categories.len());
        Ok(categories)
    }

    /// Extracts subcategories. A link without its `h4` heading fails the whole page.
    pub fn parse_subcategories(&self, html: &str) -> Result<Vec<Subcategory>, ExtractError> {
        let document = Html::parse_document(html);
        let mut subcategories = Vec::new();

        for link in document.select(&subcategory::LINK) {
            let heading = link.select(&subcategory::TITLE).next().ok_or(
                ExtractError::MissingChild { selector: subcategory::LINK_CSS, child: "h4" },
            )?;

            let Some(href) = self.link_href(link) else {
                continue;
            };

            subcategories.push(Subcategory { title: text_of(heading), href });
        }

        debug!("Parsed {} subcategories", subcategories.len());
        Ok(subcategories)
    }

    /// Extracts books from the first column of the book table.
    pub fn parse_books(&self, html: &str) -> Result<Vec<Book>, ExtractError> {
        let document = Html::parse_document(html);

        let books: Vec<Book> = document
            .select(&book::LINK)
            .filter_map(|link| {
                let href = self.link_href(link)?;
                let cover = link
                    .select(&book::COVER)
                    .next()
                    .and_then(|img| img.value().attr("src"))
                    .and_then(|src| self.resolve(src))
                    .unwrap_or_default();

                let book = Book::new(href, cover);
                trace!("Parsed book: {} ({})", book.title, book.href);
                Some(book)
            })
            .collect();

        debug!("Parsed {} books", books.len());
        Ok(books)
    }

    /// Resolved `href` of an anchor, or `None` (logged) if it has none.
    fn link_href(&self, link: ElementRef) -> Option<String> {
        let Some(raw) = link.value().attr("href") else {
            trace!("Skipping anchor without href");
            return None;
        };

        let resolved = self.resolve(raw);
        if resolved.is_none() {
            warn!("Skipping unresolvable link: {}", raw);
        }
        resolved
    }

    /// Resolves a possibly relative reference against the page URL.
    fn resolve(&self, reference: &str) -> Option<String> {
        if reference.trim().is_empty() {
            return None;
        }
        self.base.join(reference).ok().map(String::from)
    }
}

fn text_of(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
