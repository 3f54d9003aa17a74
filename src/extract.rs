// Copyright 2026 Notecrawl Contributors
// SPDX-License-Identifier: Apache-2.0

//! Per-article field extraction.
//!
//! The parsing layer is synchronous over an HTML snapshot because the
//! `scraper` crate's types are `!Send`. Each field has its own extractor
//! with its own selector fallback chain, and each degrades to a default
//! (empty string / 0 / false / empty list) instead of failing — one broken
//! selector must never cost us the rest of the record. Only a page that
//! fails to load at all drops the whole record.

use crate::browser::{Browser, Tab, NAV_TIMEOUT_MS};
use crate::ordered_set::OrderedSet;
use crate::probe::{probe_all, probe_first};
use anyhow::Result;
use regex::Regex;
use scraper::{ElementRef, Html};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// The full-width vertical bar note.com appends before the author name in
/// page and OpenGraph titles ("記事タイトル｜作者").
const TITLE_SEPARATOR: char = '｜';

/// Text present in the body of articles behind a paywall.
const PAYWALL_MARKER: &str = "購入して";

/// One collected article. The only persisted entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArticleRecord {
    /// Canonical absolute link; deduplication key.
    pub url: String,
    pub title: String,
    /// ISO-8601-like publish date, empty if unavailable.
    pub date: String,
    pub likes: u32,
    /// Insertion-ordered, deduplicated.
    pub tags: Vec<String>,
    pub is_paid: bool,
    /// Plain-text body, empty if extraction fails.
    pub content: String,
}

/// Extract one article in a fresh tab.
///
/// The tab is scoped to this call and released on every exit path. A page
/// that fails to load is reported and dropped — no retry.
pub async fn extract(browser: &dyn Browser, url: &str) -> Option<ArticleRecord> {
    debug!(url, "extracting article");
    let mut tab = match browser.new_tab().await {
        Ok(tab) => tab,
        Err(e) => {
            warn!(url, error = %e, "failed to open tab");
            return None;
        }
    };

    let loaded = load_page(tab.as_mut(), url).await;
    if let Err(e) = tab.close().await {
        debug!(url, error = %e, "failed to close tab");
    }

    match loaded {
        Ok(html) => Some(parse_record(url, &html)),
        Err(e) => {
            warn!(url, error = %e, "failed to load article page, dropping");
            None
        }
    }
}

async fn load_page(tab: &mut dyn Tab, url: &str) -> Result<String> {
    tab.goto(url, NAV_TIMEOUT_MS).await?;
    tab.html().await
}

/// Build an `ArticleRecord` from a page snapshot. Every field extraction
/// is independent; a miss leaves the field at its default.
pub fn parse_record(url: &str, html: &str) -> ArticleRecord {
    let doc = Html::parse_document(html);
    ArticleRecord {
        url: url.to_string(),
        title: parse_title(&doc),
        date: parse_date(&doc),
        likes: parse_likes(&doc),
        tags: parse_tags(&doc),
        is_paid: parse_paid(&doc, html),
        content: parse_content(&doc),
    }
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>()
}

/// Drop everything from the first full-width vertical bar onward.
fn strip_author_suffix(title: &str) -> &str {
    title.split(TITLE_SEPARATOR).next().unwrap_or(title)
}

/// Title: OpenGraph meta first (most reliable), then the first non-empty
/// `h1`, then the raw page title trimmed the same way.
fn parse_title(doc: &Html) -> String {
    let root = doc.root_element();

    if let Some(meta) = probe_first(root, &[r#"meta[property="og:title"]"#]) {
        if let Some(content) = meta.value().attr("content") {
            return strip_author_suffix(content).to_string();
        }
    }

    if let Some(h1) = probe_first(root, &["h1"]) {
        let text = element_text(&h1).trim().to_string();
        if !text.is_empty() {
            return text;
        }
    }

    if let Some(title_el) = probe_first(root, &["title"]) {
        let raw = element_text(&title_el);
        return strip_author_suffix(raw.trim()).to_string();
    }

    String::new()
}

/// Content: first matching body container's text, empty if none match.
fn parse_content(doc: &Html) -> String {
    match probe_first(
        doc.root_element(),
        &[".p-article__content", "#main-article-content", "article"],
    ) {
        Some(body) => element_text(&body).trim().to_string(),
        None => String::new(),
    }
}

/// Date: the `datetime` attribute of the first `time` element.
fn parse_date(doc: &Html) -> String {
    probe_first(doc.root_element(), &["time"])
        .and_then(|el| el.value().attr("datetime"))
        .unwrap_or_default()
        .to_string()
}

/// Likes: the like button's aria-label carries "スキ <n>". Take the first
/// run of digits; if the label has none, fall back to the button's own
/// text when it is purely numeric.
fn parse_likes(doc: &Html) -> u32 {
    let Some(button) = probe_first(doc.root_element(), &[r#"button[aria-label^="スキ"]"#]) else {
        return 0;
    };

    if let Some(label) = button.value().attr("aria-label") {
        let digits = Regex::new(r"\d+").expect("digit regex is valid");
        if let Some(m) = digits.find(label) {
            if let Ok(n) = m.as_str().parse() {
                return n;
            }
        }
    }

    let text = element_text(&button);
    let text = text.trim();
    if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) {
        text.parse().unwrap_or(0)
    } else {
        0
    }
}

/// Tags: every tag-list link, hash marker stripped, deduplicated in
/// encounter order.
fn parse_tags(doc: &Html) -> Vec<String> {
    let mut tags = OrderedSet::new();
    for el in probe_all(doc.root_element(), &[".m-tagList__item a"]) {
        let text = element_text(&el);
        let tag = text.trim().trim_start_matches('#').trim();
        if !tag.is_empty() {
            tags.insert(tag);
        }
    }
    tags.into_vec()
}

/// Paid flag: paywall marker text anywhere in the page, or a paywall
/// container element.
fn parse_paid(doc: &Html, html: &str) -> bool {
    html.contains(PAYWALL_MARKER) || probe_first(doc.root_element(), &[".p-paywall"]).is_some()
}
