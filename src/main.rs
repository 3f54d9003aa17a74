// Copyright 2026 Notecrawl Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::{ArgGroup, Parser};
use std::path::Path;
use tracing::warn;
use tracing_subscriber::EnvFilter;

use notecrawl::browser::chromium::ChromiumBrowser;
use notecrawl::browser::Browser;
use notecrawl::extract::ArticleRecord;
use notecrawl::feed::{self, WalkOptions};
use notecrawl::output;

#[derive(Parser)]
#[command(
    name = "notecrawl",
    about = "Collect note.com article metadata and content by creator or hashtag",
    version
)]
#[command(group(ArgGroup::new("target").required(true).args(["creator", "tag"])))]
struct Cli {
    /// Creator ID to collect (e.g. "user_id")
    #[arg(long)]
    creator: Option<String>,

    /// Hashtag to collect (without the leading #)
    #[arg(long)]
    tag: Option<String>,

    /// Earliest acceptable publish date (YYYY-MM-DD); older articles stop
    /// the walk in tag mode
    #[arg(long)]
    since: Option<String>,

    /// Minimum like count in tag mode; records below it are discarded
    #[arg(long, default_value_t = 0)]
    min_likes: u32,

    /// Run with a visible browser window (headless by default)
    #[arg(long)]
    no_headless: bool,

    /// Enable verbose/debug logging
    #[arg(long, short)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli) -> Result<()> {
    let since = parse_since(cli.since.as_deref());

    let browser = ChromiumBrowser::launch(!cli.no_headless).await?;
    let walked = collect(&browser, &cli, since).await;
    let _ = browser.shutdown().await;

    let (records, target) = walked?;
    let path = output::write_records(&records, &target, Path::new("."))?;
    println!("Saved {} articles to {}", records.len(), path.display());
    Ok(())
}

async fn collect(
    browser: &dyn Browser,
    cli: &Cli,
    since: Option<NaiveDate>,
) -> Result<(Vec<ArticleRecord>, String)> {
    if let Some(creator) = &cli.creator {
        let records = feed::walk_creator(browser, creator).await?;
        Ok((records, creator.clone()))
    } else if let Some(tag) = &cli.tag {
        let opts = WalkOptions {
            since,
            min_likes: cli.min_likes,
        };
        let records = feed::walk_tag(browser, tag, &opts).await?;
        Ok((records, tag.clone()))
    } else {
        // clap's arg group guarantees one of the two is present
        bail!("specify --creator or --tag");
    }
}

/// Parse the --since filter. An invalid date is reported and the filter
/// is treated as absent.
fn parse_since(raw: Option<&str>) -> Option<NaiveDate> {
    let raw = raw?;
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            warn!(since = raw, error = %e, "invalid --since date, ignoring filter");
            None
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "notecrawl=debug"
    } else {
        "notecrawl=info"
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
