//! Search result shape shared by the engine and the locator.

/// One match of a query against a page's extracted text.
///
/// Offsets are byte offsets into `context`, which is clipped to the page
/// text and snapped to character boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// The exact matched substring, case preserved from the source.
    pub text: String,
    /// Surrounding text window, up to 25 bytes on each side of the match.
    pub context: String,
    /// Offset of the match within `context`.
    pub match_start: usize,
    /// End offset of the match within `context`.
    pub match_end: usize,
    /// Up to 50 bytes of trimmed text immediately preceding the match.
    pub before_match: String,
    /// Up to 50 bytes of trimmed text immediately following the match.
    pub after_match: String,
    /// Zero-based ordinal of this match among all matches on its page,
    /// in scan order. Breaks ties between visually identical spans.
    pub match_count_on_page: usize,
    /// Zero-based page the match was found on.
    pub page: usize,
}

/// Outcome of one search run.
///
/// Fully replaces the previous state on every query change; nothing
/// persists across sessions.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchState {
    /// All matches, in page order then left-to-right within a page.
    pub results: Vec<SearchResult>,
    /// Selected result index: `Some(0)` when any results exist.
    pub current: Option<usize>,
    /// Supersession tag; compare against the engine's latest to discard
    /// late-arriving states from stale queries.
    pub seq: u64,
}

impl SearchState {
    pub(crate) fn empty(seq: u64) -> Self {
        Self { results: Vec::new(), current: None, seq }
    }

    pub(crate) fn new(results: Vec<SearchResult>, seq: u64) -> Self {
        let current = if results.is_empty() { None } else { Some(0) };
        Self { results, current, seq }
    }

    /// Select a result by index. Out-of-range indices are ignored.
    pub fn select(&mut self, index: usize) -> bool {
        if index >= self.results.len() {
            return false;
        }
        self.current = Some(index);
        true
    }

    /// The currently selected result, if any.
    pub fn selected(&self) -> Option<&SearchResult> {
        self.results.get(self.current?)
    }
}
