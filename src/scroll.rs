//! Infinite-scroll pagination driver.
//!
//! note.com feeds lazy-load entries as the viewport reaches the bottom.
//! The driver scrolls, waits a fixed settle interval for page-side loading,
//! and compares `document.body.scrollHeight` before and after: no growth
//! means no more content.

use crate::browser::Tab;
use anyhow::{Context, Result};
use std::time::Duration;
use tracing::debug;

/// Upper bound on scroll cycles in a full auto-scroll.
pub const MAX_SCROLLS: u32 = 100;

/// Fixed pause after each scroll to let lazy-loaded content settle.
pub const SETTLE_INTERVAL: Duration = Duration::from_millis(2000);

const SCROLL_TO_BOTTOM: &str = "window.scrollTo(0, document.body.scrollHeight)";

async fn page_height(tab: &dyn Tab) -> Result<i64> {
    let value = tab.evaluate("document.body.scrollHeight").await?;
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|f| f as i64))
        .context("scrollHeight was not a number")
}

/// Scroll to the bottom until the page height stops growing or
/// `max_scrolls` cycles have run.
pub async fn auto_scroll(tab: &dyn Tab, max_scrolls: u32, settle: Duration) -> Result<()> {
    let mut prev_height: i64 = -1;

    for cycle in 0..max_scrolls {
        tab.evaluate(SCROLL_TO_BOTTOM).await?;
        tokio::time::sleep(settle).await;

        let new_height = page_height(tab).await?;
        if new_height == prev_height {
            debug!(cycle, height = new_height, "page height settled");
            return Ok(());
        }
        prev_height = new_height;
    }

    debug!(max_scrolls, "scroll iteration bound reached");
    Ok(())
}

/// One scroll-and-measure cycle. Returns true if the page grew, i.e. more
/// content was loaded and another link-collection pass is worthwhile.
pub async fn scroll_step(tab: &dyn Tab, settle: Duration) -> Result<bool> {
    let before = page_height(tab).await?;
    tab.evaluate(SCROLL_TO_BOTTOM).await?;
    tokio::time::sleep(settle).await;
    let after = page_height(tab).await?;
    Ok(after > before)
}
