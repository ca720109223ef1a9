//! Text search over a document's extracted page text.
//!
//! The engine concatenates each page's text-layer fragments once, memoizes
//! the result for the lifetime of the session, and scans for literal
//! case-insensitive matches. Extraction cost dominates the scan, so a page
//! is never extracted twice, even across many queries.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use async_trait::async_trait;
use regex::{Regex, RegexBuilder};

use super::result::{SearchResult, SearchState};
use crate::Error;

/// Bytes of context captured on each side of a match.
const CONTEXT_RADIUS: usize = 25;

/// Bytes of leading/trailing text kept for later disambiguation.
const DISAMBIGUATION_RADIUS: usize = 50;

/// Per-page text extraction, provided by the rendering engine.
#[async_trait]
pub trait PageTextSource: Send + Sync {
    /// Number of pages in the current document.
    fn page_count(&self) -> usize;

    /// Ordered text fragments of one rendered page.
    async fn page_fragments(&self, page: usize) -> Result<Vec<String>, Error>;
}

/// Search session over one document.
///
/// Owns the page-text memo; drop it (or call [`reset`](Self::reset)) when
/// the document changes.
pub struct DocumentSearch<S> {
    source: S,
    page_texts: HashMap<usize, String>,
    last_seq: u64,
}

impl<S: PageTextSource> DocumentSearch<S> {
    pub fn new(source: S) -> Self {
        Self { source, page_texts: HashMap::new(), last_seq: 0 }
    }

    /// Drop all memoized page text. Call when the document changes.
    pub fn reset(&mut self) {
        self.page_texts.clear();
    }

    /// Whether a state is the latest this engine produced.
    ///
    /// A new query supersedes any in-flight search; callers discard states
    /// for which this returns false.
    pub fn is_current(&self, state: &SearchState) -> bool {
        state.seq == self.last_seq
    }

    /// Run a query against every page in document order.
    ///
    /// An empty or whitespace-only query clears the results without a scan.
    /// Extraction or scan failures are logged and degrade to no results for
    /// the affected page; the operation itself never fails.
    pub async fn run(&mut self, query: &str) -> SearchState {
        self.last_seq += 1;
        let seq = self.last_seq;

        if query.trim().is_empty() {
            return SearchState::empty(seq);
        }

        let pattern = match literal_pattern(query) {
            Ok(pattern) => pattern,
            Err(e) => {
                tracing::warn!("search: could not build pattern: {e}");
                return SearchState::empty(seq);
            }
        };

        let mut results = Vec::new();
        for page in 0..self.source.page_count() {
            match self.page_text(page).await {
                Ok(text) => scan_page(text, &pattern, page, &mut results),
                Err(e) => tracing::warn!("search: extraction failed for page {page}: {e}"),
            }
        }

        SearchState::new(results, seq)
    }

    /// Memoized page text: fragments joined with a single separating space,
    /// extracted at most once per page.
    async fn page_text(&mut self, page: usize) -> Result<&str, Error> {
        match self.page_texts.entry(page) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let fragments = self.source.page_fragments(page).await?;
                Ok(entry.insert(fragments.join(" ")))
            }
        }
    }
}

/// Compile a query into a literal, case-insensitive pattern.
fn literal_pattern(query: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(&regex::escape(query)).case_insensitive(true).build()
}

/// Scan one page's text left to right, appending a result per
/// non-overlapping match.
fn scan_page(text: &str, pattern: &Regex, page: usize, results: &mut Vec<SearchResult>) {
    let mut match_count = 0;
    for m in pattern.find_iter(text) {
        let context_start = snap_forward(text, m.start().saturating_sub(CONTEXT_RADIUS));
        let context_end = snap_back(text, (m.end() + CONTEXT_RADIUS).min(text.len()));

        let before_start = snap_forward(text, m.start().saturating_sub(DISAMBIGUATION_RADIUS));
        let after_end = snap_back(text, (m.end() + DISAMBIGUATION_RADIUS).min(text.len()));

        results.push(SearchResult {
            text: m.as_str().to_string(),
            context: text[context_start..context_end].to_string(),
            match_start: m.start() - context_start,
            match_end: m.end() - context_start,
            before_match: text[before_start..m.start()].trim().to_string(),
            after_match: text[m.end()..after_end].trim().to_string(),
            match_count_on_page: match_count,
            page,
        });
        match_count += 1;
    }
}

/// Snap an offset forward to the nearest character boundary.
///
/// Window starts snap forward and window ends snap back, so context
/// windows shrink rather than grow past their nominal radius.
fn snap_forward(text: &str, mut index: usize) -> usize {
    while index < text.len() && !text.is_char_boundary(index) {
        index += 1;
    }
    index
}

/// Snap an offset back to the nearest character boundary.
fn snap_back(text: &str, mut index: usize) -> usize {
    while !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}
