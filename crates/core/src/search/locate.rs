//! Re-locating a search result among the live rendered spans.
//!
//! The searched text (space-joined layout fragments) has no stable 1:1
//! mapping back to rendered elements: a match may span several elements,
//! partially overlap one, or recur in visually identical spans such as
//! repeated headers. Candidates are scored, and the per-page occurrence
//! ordinal recorded at search time breaks ties that context cannot.
//!
//! The bonus magnitudes are tunable; the contract is only their relative
//! ordering (exact > trimmed-equal > substring, with occurrence and
//! context as supplementary signals).

use std::sync::Arc;
use std::time::Duration;

use super::result::SearchResult;
use super::view::{PageView, TextSpan, centered_offset, fallback_offset};

/// Span text equals the match exactly.
pub const SCORE_EXACT: u32 = 100;
/// Span text equals the match after trimming whitespace.
pub const SCORE_TRIMMED: u32 = 90;
/// Span text merely contains the match.
pub const SCORE_CONTAINS: u32 = 50;
/// Candidate's occurrence ordinal equals the result's.
pub const OCCURRENCE_BONUS: u32 = 25;
/// Per context word found near the candidate.
pub const CONTEXT_WORD_BONUS: u32 = 15;
/// Candidate has nonzero rendered extent.
pub const VISIBLE_BONUS: u32 = 5;

/// Sibling spans gathered on each side for context scoring.
const NEIGHBOR_RANGE: usize = 5;
/// Context strings at most this long carry no signal.
const MIN_CONTEXT_LEN: usize = 3;
/// Words at most this long carry no signal.
const MIN_WORD_LEN: usize = 2;

/// How long the located span stays highlighted.
const HIGHLIGHT_DURATION: Duration = Duration::from_secs(5);

/// Score one candidate span against a result.
///
/// `occurrence` is the candidate's zero-based rank among spans containing
/// the match text, in document order. The caller guarantees containment.
pub fn span_score(spans: &[TextSpan], index: usize, occurrence: usize, result: &SearchResult) -> u32 {
    let span_text = spans[index].text.to_lowercase();
    let needle = result.text.to_lowercase();

    let mut score = if span_text == needle {
        SCORE_EXACT
    } else if span_text.trim() == needle {
        SCORE_TRIMMED
    } else {
        SCORE_CONTAINS
    };

    let before = result.before_match.to_lowercase();
    let after = result.after_match.to_lowercase();

    if before.len() > MIN_CONTEXT_LEN || after.len() > MIN_CONTEXT_LEN {
        let (before_near, after_near) = neighbor_text(spans, index);

        if before.len() > MIN_CONTEXT_LEN {
            score += context_word_matches(&before, &before_near) * CONTEXT_WORD_BONUS;
        }
        if after.len() > MIN_CONTEXT_LEN {
            score += context_word_matches(&after, &after_near) * CONTEXT_WORD_BONUS;
        }
    }

    if occurrence == result.match_count_on_page {
        score += OCCURRENCE_BONUS;
    }

    if spans[index].rect.is_visible() {
        score += VISIBLE_BONUS;
    }

    score
}

/// Count context words (longer than [`MIN_WORD_LEN`]) present in the
/// neighborhood text.
fn context_word_matches(context: &str, neighborhood: &str) -> u32 {
    context
        .split_whitespace()
        .filter(|word| word.len() > MIN_WORD_LEN)
        .filter(|word| neighborhood.contains(word))
        .count() as u32
}

/// Lowercased text of up to [`NEIGHBOR_RANGE`] spans before and after the
/// candidate.
fn neighbor_text(spans: &[TextSpan], index: usize) -> (String, String) {
    let before = spans[index.saturating_sub(NEIGHBOR_RANGE)..index]
        .iter()
        .map(|span| span.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    let after_end = (index + 1 + NEIGHBOR_RANGE).min(spans.len());
    let after = spans[index + 1..after_end]
        .iter()
        .map(|span| span.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    (before.trim().to_lowercase(), after.trim().to_lowercase())
}

/// Pick the best-matching span for a result, in document order.
///
/// Spans that do not contain the match text are skipped and do not advance
/// the occurrence counter. Ties keep the earliest candidate. Returns None
/// when nothing on the page contains the match.
pub fn best_span(spans: &[TextSpan], result: &SearchResult) -> Option<usize> {
    let needle = result.text.to_lowercase();

    let mut best: Option<(usize, u32)> = None;
    let mut occurrence = 0;

    for (index, span) in spans.iter().enumerate() {
        if !span.text.to_lowercase().contains(&needle) {
            continue;
        }

        let score = span_score(spans, index, occurrence, result);
        if best.is_none_or(|(_, top)| score > top) {
            best = Some((index, score));
        }

        occurrence += 1;
    }

    best.map(|(index, _)| index)
}

/// Scroll the view to a result and highlight it.
///
/// The winning span is centered in the container and highlighted for five
/// seconds; the reversal timer is per-invocation and never cancelled. When
/// the text layer is absent or nothing contains the match, the page itself
/// is scrolled into view instead; this operation always produces scroll
/// feedback and never fails.
pub fn go_to_result(view: &Arc<dyn PageView>, result: &SearchResult) {
    go_to_result_with(view, result, HIGHLIGHT_DURATION);
}

fn go_to_result_with(view: &Arc<dyn PageView>, result: &SearchResult, highlight_for: Duration) {
    let spans = match view.text_spans() {
        Some(spans) if !spans.is_empty() => spans,
        _ => {
            tracing::debug!("locate: no text layer, falling back to page scroll");
            scroll_to_page(view.as_ref());
            return;
        }
    };

    let Some(index) = best_span(&spans, result) else {
        tracing::debug!("locate: no span contains {:?}, falling back to page scroll", result.text);
        scroll_to_page(view.as_ref());
        return;
    };

    let offset = centered_offset(
        spans[index].rect,
        view.container_rect(),
        view.scroll_top(),
        view.visible_height(),
    );
    view.scroll_to(offset);

    view.set_highlight(index, true);
    let view = Arc::clone(view);
    tokio::spawn(async move {
        tokio::time::sleep(highlight_for).await;
        view.set_highlight(index, false);
    });
}

fn scroll_to_page(view: &dyn PageView) {
    let offset = fallback_offset(view.page_rect(), view.container_rect(), view.scroll_top());
    view.scroll_to(offset);
}
