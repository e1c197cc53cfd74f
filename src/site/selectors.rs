//! CSS selectors for the document library's category pages.
//!
//! Raw selector strings are what the browser waits on and clicks; the parsed
//! `Selector`s are what the parser runs against page snapshots. Keep both in
//! sync when the site markup changes.
//!
//! **Update process**: when a listing comes back empty on a page that clearly
//! has entries, capture the HTML, update the selectors here, and add a fixture.

use scraper::Selector;
use std::sync::LazyLock;

/// Selectors for the site's main navigation menu.
pub mod menu {
    use super::*;

    /// Dropdown control that reveals the top categories.
    pub const TOGGLE: &str = ".active-trail.dropdown-toggle.active.has-submenu";

    /// Top category links inside the opened dropdown.
    pub const LINK_CSS: &str = ".dropdown-menu li a";

    pub static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse(LINK_CSS).unwrap());
}

/// Selectors for a top category page listing its subcategories.
pub mod subcategory {
    use super::*;

    /// Subcategory links. Also the wait target.
    pub const LINK_CSS: &str = ".view-list-sub-tags .views-row a";

    pub static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse(LINK_CSS).unwrap());

    /// Heading inside each link holding the subcategory title.
    pub static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h4").unwrap());
}

/// Selectors for a subcategory page listing its books.
pub mod book {
    use super::*;

    /// Book table container. Wait target.
    pub const TABLE_CSS: &str = ".view-taxonomy-term-details-books .view-content table";

    /// Book links in the first column of the table.
    pub static LINK: LazyLock<Selector> = LazyLock::new(|| {
        Selector::parse(".view-taxonomy-term-details-books .view-content table td.col-first a")
            .unwrap()
    });

    /// Cover image nested in a book link.
    pub static COVER: LazyLock<Selector> = LazyLock::new(|| Selector::parse("img").unwrap());
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    #[test]
    fn test_selectors_compile() {
        let _ = &*menu::LINK;
        let _ = &*subcategory::LINK;
        let _ = &*subcategory::TITLE;
        let _ = &*book::LINK;
        let _ = &*book::COVER;
    }

    #[test]
    fn test_raw_selectors_parse() {
        for css in [menu::TOGGLE, menu::LINK_CSS, subcategory::LINK_CSS, book::TABLE_CSS] {
            assert!(Selector::parse(css).is_ok(), "selector failed to parse: {}", css);
        }
    }

    #[test]
    fn test_book_link_only_matches_first_column() {
        let html = Html::parse_document(
            r#"<div class="view-taxonomy-term-details-books"><div class="view-content">
                <table><tr>
                    <td class="col-first"><a href="/a-book">A</a></td>
                    <td class="col-last"><a href="/author">Author</a></td>
                </tr></table>
            </div></div>"#,
        );

        let links: Vec<_> = html.select(&book::LINK).collect();
        assert_eq!(links.len(), 1);
        assert_eq!(links[0].value().attr("href"), Some("/a-book"));
    }
}
