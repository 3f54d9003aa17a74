//! Result serialization.
//!
//! The accepted records are written as pretty-printed UTF-8 JSON;
//! serde_json leaves non-ASCII characters unescaped, so Japanese titles
//! and content stay readable in the output file.

use crate::extract::ArticleRecord;
use anyhow::{Context, Result};
use chrono::Utc;
use std::path::{Path, PathBuf};

/// Write records to `articles_<target>_<unix-ts>.json` under `dir`,
/// returning the path written.
pub fn write_records(
    records: &[ArticleRecord],
    target: &str,
    dir: &Path,
) -> Result<PathBuf> {
    let path = dir.join(format!("articles_{}_{}.json", target, Utc::now().timestamp()));
    let data =
        serde_json::to_string_pretty(records).context("failed to serialize records")?;
    std::fs::write(&path, data)
        .with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}
