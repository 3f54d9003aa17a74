// Copyright 2026 Notecrawl Contributors
// SPDX-License-Identifier: Apache-2.0

//! Feed walking: enumerate article URLs from a creator page or a hashtag
//! feed and extract each one.
//!
//! One long-lived tab drives feed navigation and scrolling; every article
//! extraction opens its own short-lived tab so the feed's scroll state is
//! never disturbed. Tag feeds are consumed incrementally because the
//! since-date filter can terminate the walk early; creator pages are
//! scrolled to the end up front.

use crate::browser::{Browser, Tab, NAV_TIMEOUT_MS};
use crate::extract::{self, ArticleRecord};
use crate::ordered_set::OrderedSet;
use crate::probe::probe_all;
use crate::scroll::{self, auto_scroll, scroll_step};
use anyhow::Result;
use chrono::NaiveDate;
use scraper::Html;
use tracing::{debug, info};
use url::Url;

pub const BASE_URL: &str = "https://note.com";

/// Selectors for article links in a hashtag feed, newest layout first.
const TAG_FEED_LINKS: &[&str] = &[".m-largeNoteWrapper__link", ".o-noteItem__link"];

/// Filters applied while walking a tag feed.
#[derive(Debug, Clone, Default)]
pub struct WalkOptions {
    /// Earliest acceptable publish date. An older article terminates the
    /// walk, since the feed is sorted newest-first.
    pub since: Option<NaiveDate>,
    /// Records with fewer likes are discarded (non-terminal).
    pub min_likes: u32,
}

/// Collect every article a creator has published.
///
/// Scrolls the creator's article index to the end, gathers all links
/// matching the creator's article URL pattern, then extracts each.
pub async fn walk_creator(browser: &dyn Browser, creator_id: &str) -> Result<Vec<ArticleRecord>> {
    let index_url = format!("{BASE_URL}/{creator_id}/all");
    info!(url = %index_url, "navigating to creator page");

    let mut tab = browser.new_tab().await?;
    let collected = collect_creator_links(tab.as_mut(), creator_id, &index_url).await;
    let _ = tab.close().await;
    let links = collected?;

    info!(count = links.len(), "found articles");

    let mut records = Vec::new();
    for link in links {
        if let Some(record) = extract::extract(browser, &link).await {
            records.push(record);
        }
    }
    Ok(records)
}

async fn collect_creator_links(
    tab: &mut dyn Tab,
    creator_id: &str,
    index_url: &str,
) -> Result<Vec<String>> {
    tab.goto(index_url, NAV_TIMEOUT_MS).await?;
    auto_scroll(&*tab, scroll::MAX_SCROLLS, scroll::SETTLE_INTERVAL).await?;
    let html = tab.html().await?;
    Ok(creator_links_from_html(&html, creator_id))
}

/// All links matching `https://note.com/<creator>/n/...`, query and
/// fragment stripped, deduplicated in encounter order.
pub fn creator_links_from_html(html: &str, creator_id: &str) -> Vec<String> {
    let selector = format!(r#"a[href^="{BASE_URL}/{creator_id}/n/"]"#);
    let doc = Html::parse_document(html);
    let mut links = OrderedSet::new();
    for el in probe_all(doc.root_element(), &[selector.as_str()]) {
        if let Some(href) = el.value().attr("href") {
            links.insert(canonicalize(href));
        }
    }
    links.into_vec()
}

/// Strip query string and fragment so the same article is never visited
/// twice under different tracking parameters.
fn canonicalize(href: &str) -> String {
    let no_query = href.split('?').next().unwrap_or(href);
    no_query.split('#').next().unwrap_or(no_query).to_string()
}

/// Walk a hashtag feed sorted newest-first, applying the date and likes
/// filters. Records are returned in encounter order.
pub async fn walk_tag(
    browser: &dyn Browser,
    tag: &str,
    opts: &WalkOptions,
) -> Result<Vec<ArticleRecord>> {
    let feed_url = format!("{BASE_URL}/hashtag/{tag}?f=new");
    info!(url = %feed_url, "navigating to tag feed");

    let mut tab = browser.new_tab().await?;
    let walked = walk_tag_feed(browser, tab.as_mut(), &feed_url, opts).await;
    let _ = tab.close().await;
    walked
}

async fn walk_tag_feed(
    browser: &dyn Browser,
    tab: &mut dyn Tab,
    feed_url: &str,
    opts: &WalkOptions,
) -> Result<Vec<ArticleRecord>> {
    tab.goto(feed_url, NAV_TIMEOUT_MS).await?;

    let mut records = Vec::new();
    let mut seen = OrderedSet::new();

    'walk: loop {
        let html = tab.html().await?;
        let batch = new_feed_links(&html, &mut seen);

        if batch.is_empty() {
            // Nothing new in the current DOM; one scroll step decides
            // whether the feed is exhausted.
            if !scroll_step(&*tab, scroll::SETTLE_INTERVAL).await? {
                info!("no more articles in feed");
                break;
            }
            continue;
        }

        info!(count = batch.len(), "processing new articles");

        for link in batch {
            let Some(record) = extract::extract(browser, &link).await else {
                continue;
            };

            // The feed is chronologically descending, so the first
            // too-old article means everything after it is older too.
            if let Some(since) = opts.since {
                if let Some(day) = published_day(&record.date) {
                    if day < since {
                        info!(date = %record.date, since = %since, "article older than since-date, stopping");
                        break 'walk;
                    }
                }
            }

            if record.likes < opts.min_likes {
                debug!(url = %record.url, likes = record.likes, min = opts.min_likes, "below minimum likes, skipping");
                continue;
            }

            info!(title = %record.title, date = %record.date, likes = record.likes, "collected article");
            records.push(record);
        }

        if !scroll_step(&*tab, scroll::SETTLE_INTERVAL).await? {
            break;
        }
    }

    Ok(records)
}

/// Article links in the current feed DOM that have not been seen yet.
/// Relative hrefs are absolutized against the site base.
pub fn new_feed_links(html: &str, seen: &mut OrderedSet) -> Vec<String> {
    let doc = Html::parse_document(html);
    let mut batch = Vec::new();
    for el in probe_all(doc.root_element(), TAG_FEED_LINKS) {
        let Some(href) = el.value().attr("href") else {
            continue;
        };
        let Some(link) = absolutize(href) else {
            continue;
        };
        if seen.insert(link.clone()) {
            batch.push(link);
        }
    }
    batch
}

fn absolutize(href: &str) -> Option<String> {
    if href.starts_with("http://") || href.starts_with("https://") {
        return Some(href.to_string());
    }
    let base = Url::parse(BASE_URL).ok()?;
    base.join(href).ok().map(String::from)
}

/// The calendar day of an extracted date string ("2024-06-01T09:00:00+09:00"
/// or "2024-06-01"). Unparseable dates yield None and are not filtered on.
fn published_day(date: &str) -> Option<NaiveDate> {
    let day = date.split('T').next()?;
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creator_links_deduped_and_canonicalized() {
        let html = r#"<body>
            <a href="https://note.com/alice/n/n1">one</a>
            <a href="https://note.com/alice/n/n1?magazine_key=m1">one again</a>
            <a href="https://note.com/alice/n/n2#heading">two</a>
            <a href="https://note.com/bob/n/n3">someone else</a>
            <a href="https://note.com/alice/info">not an article</a>
        </body>"#;
        assert_eq!(
            creator_links_from_html(html, "alice"),
            vec![
                "https://note.com/alice/n/n1",
                "https://note.com/alice/n/n2",
            ]
        );
    }

    #[test]
    fn test_new_feed_links_absolutizes_and_tracks_seen() {
        let mut seen = OrderedSet::new();
        let html = r#"<body>
            <a class="m-largeNoteWrapper__link" href="/alice/n/n1">1</a>
            <a class="m-largeNoteWrapper__link" href="https://note.com/bob/n/n2">2</a>
        </body>"#;
        let batch = new_feed_links(html, &mut seen);
        assert_eq!(
            batch,
            vec!["https://note.com/alice/n/n1", "https://note.com/bob/n/n2"]
        );

        // Same DOM again: everything already seen.
        assert!(new_feed_links(html, &mut seen).is_empty());
    }

    #[test]
    fn test_new_feed_links_falls_back_to_alternate_layout() {
        let mut seen = OrderedSet::new();
        let html = r#"<body>
            <a class="o-noteItem__link" href="/alice/n/n9">old layout</a>
        </body>"#;
        assert_eq!(
            new_feed_links(html, &mut seen),
            vec!["https://note.com/alice/n/n9"]
        );
    }

    #[test]
    fn test_published_day_parsing() {
        assert_eq!(
            published_day("2024-06-01T09:00:00+09:00"),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(published_day("2023-12-31"), NaiveDate::from_ymd_opt(2023, 12, 31));
        assert_eq!(published_day(""), None);
        assert_eq!(published_day("不明"), None);
    }
}
