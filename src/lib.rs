// Copyright 2026 Notecrawl Contributors
// SPDX-License-Identifier: Apache-2.0

//! notecrawl library — collect note.com article metadata and content.
//!
//! This library crate exposes the core modules so the feed walker and
//! extractor can be driven by integration tests through the browser seam.

pub mod browser;
pub mod extract;
pub mod feed;
pub mod ordered_set;
pub mod output;
pub mod probe;
pub mod scroll;
