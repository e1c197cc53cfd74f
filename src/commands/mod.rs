pub mod crawl;
pub mod request;

pub use crawl::CrawlCommand;
pub use request::{Method, RequestCommand};
