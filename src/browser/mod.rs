//! Browser abstraction for driving note.com pages.
//!
//! Defines the `Browser` and `Tab` traits that abstract over the browser
//! engine (currently Chromium via chromiumoxide). The feed walker and the
//! field extractor only speak these traits, so tests drive them with a
//! scripted mock instead of a live browser.

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;

/// Default navigation timeout applied to every `goto`.
pub const NAV_TIMEOUT_MS: u64 = 30_000;

/// A browser engine that can open tabs.
#[async_trait]
pub trait Browser: Send + Sync {
    /// Open a new tab on `about:blank`.
    async fn new_tab(&self) -> Result<Box<dyn Tab>>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> Result<()>;
}

/// A single browser tab.
///
/// Queries against the page go through `html()` snapshots parsed with
/// `scraper`; only scrolling and height measurement run as in-page script.
#[async_trait]
pub trait Tab: Send + Sync {
    /// Navigate to a URL. Errors on network/load failure or timeout.
    async fn goto(&mut self, url: &str, timeout_ms: u64) -> Result<()>;
    /// Execute JavaScript in the page context and return the result.
    async fn evaluate(&self, script: &str) -> Result<serde_json::Value>;
    /// Full HTML of the current document.
    async fn html(&self) -> Result<String>;
    /// Close this tab.
    async fn close(self: Box<Self>) -> Result<()>;
}
