//! Line-oriented text report of a crawl.

use crate::site::{Book, Category, Subcategory};
use std::io::{self, Write};

/// Writes the nested category / subcategory / book report as the crawl progresses.
pub struct ReportWriter<W: Write> {
    out: W,
}

impl<W: Write> ReportWriter<W> {
    /// Creates a report writer over any output stream.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Category header, preceded by a blank line.
    pub fn category(&mut self, category: &Category) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "=== Main Category: {} ===", category.text)?;
        writeln!(self.out, "URL: {}", category.href)?;
        self.out.flush()
    }

    /// Opens the subcategory section, or says there is none.
    pub fn subcategories_found(&mut self, found: bool) -> io::Result<()> {
        if found {
            writeln!(self.out, "Subcategories:")
        } else {
            writeln!(self.out, "No subcategories found")
        }
    }

    pub fn subcategory(&mut self, subcategory: &Subcategory) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "  --- {} ---", subcategory.title)?;
        writeln!(self.out, "  URL: {}", subcategory.href)?;
        self.out.flush()
    }

    /// Book entries for one subcategory, or the empty marker.
    pub fn books(&mut self, books: &[Book]) -> io::Result<()> {
        if books.is_empty() {
            writeln!(self.out, "  No books found")?;
        } else {
            writeln!(self.out, "  Books:")?;
            for book in books {
                writeln!(self.out, "    \u{2022} {}", book.title)?;
                writeln!(self.out, "      Link: {}", book.href)?;
                writeln!(self.out, "      Cover: {}", book.cover_image)?;
            }
        }
        self.out.flush()
    }

    /// Returns the underlying stream.
    pub fn into_inner(self) -> W {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(f: impl FnOnce(&mut ReportWriter<Vec<u8>>) -> io::Result<()>) -> String {
        let mut report = ReportWriter::new(Vec::new());
        f(&mut report).unwrap();
        String::from_utf8(report.into_inner()).unwrap()
    }

    #[test]
    fn test_category_header() {
        let out = render(|r| {
            r.category(&Category {
                text: "Theology".to_string(),
                href: "https://example.org/theology".to_string(),
            })
        });
        assert_eq!(out, "\n=== Main Category: Theology ===\nURL: https://example.org/theology\n");
    }

    #[test]
    fn test_subcategories_found() {
        assert_eq!(render(|r| r.subcategories_found(true)), "Subcategories:\n");
        assert_eq!(render(|r| r.subcategories_found(false)), "No subcategories found\n");
    }

    #[test]
    fn test_subcategory_header() {
        let out = render(|r| {
            r.subcategory(&Subcategory {
                title: "Prayer".to_string(),
                href: "https://example.org/prayer".to_string(),
            })
        });
        assert_eq!(out, "\n  --- Prayer ---\n  URL: https://example.org/prayer\n");
    }

    #[test]
    fn test_books() {
        let books = vec![
            Book::new("https://example.org/first-book", "https://example.org/1.jpg"),
            Book::new("https://example.org/second-book", ""),
        ];
        let out = render(|r| r.books(&books));

        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[0], "  Books:");
        assert_eq!(lines[1], "    \u{2022} first book");
        assert_eq!(lines[2], "      Link: https://example.org/first-book");
        assert_eq!(lines[3], "      Cover: https://example.org/1.jpg");
        assert_eq!(lines[4], "    \u{2022} second book");
        assert_eq!(lines[6], "      Cover: ");
        assert_eq!(lines.len(), 7);
    }

    #[test]
    fn test_no_books() {
        assert_eq!(render(|r| r.books(&[])), "  No books found\n");
    }
}
