//! Browser automation seam.
//!
//! The crawler only needs five things from a browser: navigate, wait for a
//! selector, click, snapshot the DOM, and close. `PageDriver` captures exactly
//! that so the traversal can run against Chromium in production and against
//! canned pages in tests.

pub mod chromium;

pub use chromium::ChromiumSession;

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// How long and for what state a selector wait should poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Upper bound on the wait
    pub timeout: Duration,
    /// Also require the element to be rendered (non-zero box, not hidden)
    pub visible: bool,
}

impl WaitOptions {
    /// Waits for presence only.
    pub fn present(timeout: Duration) -> Self {
        Self { timeout, visible: false }
    }

    /// Waits for a rendered, visible element.
    pub fn visible(timeout: Duration) -> Self {
        Self { timeout, visible: true }
    }
}

/// A single exclusively-owned browser page.
#[async_trait]
pub trait PageDriver: Send {
    /// Navigates to `url` and waits for the load to finish.
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError>;

    /// Polls until `selector` matches, or fails with `SelectorTimeout`.
    async fn wait_for_selector(
        &mut self,
        selector: &str,
        options: WaitOptions,
    ) -> Result<(), BrowserError>;

    /// Clicks the first element matching `selector`.
    async fn click(&mut self, selector: &str) -> Result<(), BrowserError>;

    /// Serialized DOM of the current page.
    async fn content(&mut self) -> Result<String, BrowserError>;

    /// URL of the current page, after redirects.
    async fn url(&mut self) -> Result<String, BrowserError>;

    /// Releases the page and its browser.
    async fn close(self: Box<Self>) -> Result<(), BrowserError>;
}

/// Errors that can occur during browser operations.
#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("browser launch failed: {0}")]
    Launch(String),

    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("timed out after {}ms waiting for `{selector}`", timeout.as_millis())]
    SelectorTimeout { selector: String, timeout: Duration },

    #[error("no element matches `{0}`")]
    ElementNotFound(String),

    #[error("interaction with `{selector}` failed: {reason}")]
    Interaction { selector: String, reason: String },

    #[error("page evaluation failed: {0}")]
    Evaluation(String),

    #[error("browser shutdown failed: {0}")]
    Close(String),
}

impl BrowserError {
    /// Returns true for a selector wait that ran out of time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, BrowserError::SelectorTimeout { .. })
    }
}
