//! In-document text search and on-screen result relocation.
//!
//! Search runs over plain text extracted once per page from the rendering
//! engine's text layer. Relocation maps a result back onto the live rendered
//! spans of its page with a scored heuristic, then scrolls and highlights
//! the winning span. The two halves share only the `SearchResult` shape.

pub mod engine;
pub mod locate;
pub mod result;
pub mod view;

pub use engine::{DocumentSearch, PageTextSource};
pub use locate::{best_span, go_to_result, span_score};
pub use result::{SearchResult, SearchState};
pub use view::{PageView, Rect, TextSpan};
