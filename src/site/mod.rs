//! Site-specific modules: selectors, extracted records, and the snapshot parser.

pub mod models;
pub mod parser;
pub mod selectors;

pub use models::{Book, Category, Subcategory};
pub use parser::{ExtractError, Parser};
