//! Chromium-backed page driver using chromiumoxide.

use super::{BrowserError, PageDriver, WaitOptions};
use crate::config::Config;
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

/// Delay between selector polls.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// A launched browser with the one page the crawl drives.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler: JoinHandle<()>,
    navigation_timeout: Duration,
}

impl ChromiumSession {
    /// Launches Chromium according to `config` and opens a blank page.
    pub async fn launch(config: &Config) -> Result<Self, BrowserError> {
        let browser_config = Self::build_browser_config(config)?;

        info!("Launching Chromium (headless: {})", config.headless);
        let (mut browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::Launch(e.to_string()))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    trace!("CDP handler event error: {}", e);
                }
            }
        });

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                // Don't leak the process when the first page can't be opened.
                let _ = browser.close().await;
                let _ = browser.wait().await;
                handler.abort();
                return Err(BrowserError::Launch(format!("failed to open page: {e}")));
            }
        };

        Ok(Self { browser, page, handler, navigation_timeout: config.navigation_timeout() })
    }

    /// Maps our config onto chromiumoxide's builder.
    fn build_browser_config(config: &Config) -> Result<BrowserConfig, BrowserError> {
        let mut builder = BrowserConfig::builder()
            .window_size(config.window_width, config.window_height)
            .args(config.chrome_args.iter().cloned());

        if !config.headless {
            builder = builder.with_head();
        }

        if let Some(path) = &config.chrome_path {
            debug!("Using Chromium executable: {}", path.display());
            builder = builder.chrome_executable(path);
        }

        builder.build().map_err(BrowserError::Launch)
    }

    /// Script returning whether `selector` currently matches (and is rendered).
    fn probe_script(selector: &str, visible: bool) -> String {
        // JSON string literals are valid JS string literals.
        let literal = serde_json::to_string(selector).unwrap_or_else(|_| "\"\"".to_string());
        format!(
            r#"(() => {{
                const el = document.querySelector({literal});
                if (!el) return false;
                if (!{visible}) return true;
                const style = window.getComputedStyle(el);
                const rect = el.getBoundingClientRect();
                return style.visibility !== 'hidden' && style.display !== 'none'
                    && rect.width > 0 && rect.height > 0;
            }})()"#
        )
    }
}

async fn probe(page: &Page, script: &str) -> bool {
    match page.evaluate(script).await {
        Ok(result) => result.into_value::<bool>().unwrap_or(false),
        Err(e) => {
            // The execution context is torn down mid-navigation; keep polling.
            trace!("Selector probe failed: {}", e);
            false
        }
    }
}

#[async_trait]
impl PageDriver for ChromiumSession {
    async fn goto(&mut self, url: &str) -> Result<(), BrowserError> {
        debug!("Navigating to {}", url);

        match tokio::time::timeout(self.navigation_timeout, self.page.goto(url)).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => {
                Err(BrowserError::Navigation { url: url.to_string(), reason: e.to_string() })
            }
            Err(_) => Err(BrowserError::Navigation {
                url: url.to_string(),
                reason: format!("timed out after {}ms", self.navigation_timeout.as_millis()),
            }),
        }
    }

    async fn wait_for_selector(
        &mut self,
        selector: &str,
        options: WaitOptions,
    ) -> Result<(), BrowserError> {
        debug!(
            "Waiting up to {}ms for `{}` (visible: {})",
            options.timeout.as_millis(),
            selector,
            options.visible
        );

        let script = Self::probe_script(selector, options.visible);
        let page = &self.page;
        let poll = async {
            while !probe(page, &script).await {
                tokio::time::sleep(POLL_INTERVAL).await;
            }
        };

        tokio::time::timeout(options.timeout, poll).await.map_err(|_| {
            BrowserError::SelectorTimeout { selector: selector.to_string(), timeout: options.timeout }
        })
    }

    async fn click(&mut self, selector: &str) -> Result<(), BrowserError> {
        debug!("Clicking `{}`", selector);

        let element = self
            .page
            .find_element(selector)
            .await
            .map_err(|_| BrowserError::ElementNotFound(selector.to_string()))?;

        element.click().await.map_err(|e| BrowserError::Interaction {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;

        Ok(())
    }

    async fn content(&mut self) -> Result<String, BrowserError> {
        self.page.content().await.map_err(|e| BrowserError::Evaluation(e.to_string()))
    }

    async fn url(&mut self) -> Result<String, BrowserError> {
        self.page
            .url()
            .await
            .map_err(|e| BrowserError::Evaluation(e.to_string()))?
            .ok_or_else(|| BrowserError::Evaluation("page has no URL".to_string()))
    }

    async fn close(self: Box<Self>) -> Result<(), BrowserError> {
        let Self { mut browser, page, handler, .. } = *self;

        debug!("Closing browser session");
        if let Err(e) = page.close().await {
            warn!("Failed to close page: {}", e);
        }

        let closed = browser.close().await.map_err(|e| BrowserError::Close(e.to_string()));
        if let Err(e) = browser.wait().await {
            warn!("Failed waiting for browser process: {}", e);
        }
        handler.abort();

        closed.map(|_| ())
    }
}
