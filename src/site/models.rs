//! Records extracted at each level of the category tree.

use serde::{Deserialize, Serialize};

/// A top-level entry from the site's dropdown menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Link text, trimmed
    pub text: String,
    /// Absolute category URL
    pub href: String,
}

/// A grouping nested under a top category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subcategory {
    /// Heading text, trimmed
    pub title: String,
    /// Absolute subcategory URL
    pub href: String,
}

/// A leaf record from a subcategory's book table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Absolute book URL
    pub href: String,
    /// Absolute cover image URL, or empty when the link has no image
    pub cover_image: String,
    /// Title derived from the last URL segment
    pub title: String,
}

impl Book {
    /// Creates a book, deriving its title from `href`.
    pub fn new(href: impl Into<String>, cover_image: impl Into<String>) -> Self {
        let href = href.into();
        let title = Self::title_from_href(&href);
        Self { href, cover_image: cover_image.into(), title }
    }

    /// Takes the text after the last `/` and turns hyphens into spaces.
    ///
    /// No decoding happens: case, percent escapes, and any query string in
    /// the final segment are kept as they are.
    pub fn title_from_href(href: &str) -> String {
        href.rsplit('/').next().unwrap_or_default().replace('-', " ")
    }
}
