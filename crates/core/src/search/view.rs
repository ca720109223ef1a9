//! Rendered-page geometry and the viewport abstraction.
//!
//! The rendering engine is an external collaborator; the locator only needs
//! the rendered text spans, a handful of rectangles, and two side effects
//! (scroll, highlight). Tests implement [`PageView`] with synthetic data.

/// Axis-aligned rectangle in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// Whether the rectangle has any rendered extent.
    ///
    /// Zero-size spans are layout artifacts and score lower as candidates.
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// One rendered text-layer element: its text and where it sits on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpan {
    pub text: String,
    pub rect: Rect,
}

impl TextSpan {
    pub fn new(text: impl Into<String>, rect: Rect) -> Self {
        Self { text: text.into(), rect }
    }
}

/// A rendered page inside a scrollable container.
///
/// Implemented by the embedding shell over the live rendering engine, and
/// by synthetic fixtures in tests.
pub trait PageView: Send + Sync {
    /// Rendered text spans of the page in document order, or None when the
    /// text layer is absent.
    fn text_spans(&self) -> Option<Vec<TextSpan>>;

    /// Bounding rectangle of the scrolling container.
    fn container_rect(&self) -> Rect;

    /// Bounding rectangle of the page element inside the container.
    fn page_rect(&self) -> Rect;

    /// Current scroll offset of the container.
    fn scroll_top(&self) -> f64;

    /// Visible height of the container.
    fn visible_height(&self) -> f64;

    /// Smooth-scroll the container to an offset.
    fn scroll_to(&self, offset: f64);

    /// Toggle the background highlight on one span.
    fn set_highlight(&self, span_index: usize, on: bool);
}

/// Margin left above the page when falling back to a page-level scroll.
const FALLBACK_TOP_MARGIN: f64 = 100.0;

/// Offset that centers a target rectangle vertically in the container.
///
/// The target's midpoint minus half the visible height, clamped so the
/// container never scrolls to a negative offset.
pub fn centered_offset(target: Rect, container: Rect, scroll_top: f64, visible_height: f64) -> f64 {
    let target_top = scroll_top + (target.y - container.y);
    let midpoint = target_top + target.height / 2.0;
    (midpoint - visible_height / 2.0).max(0.0)
}

/// Offset that brings the page itself into view, used when no span can be
/// located.
pub fn fallback_offset(page: Rect, container: Rect, scroll_top: f64) -> f64 {
    (scroll_top + (page.y - container.y) - FALLBACK_TOP_MARGIN).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_offset() {
        let container = Rect::new(0.0, 0.0, 600.0, 800.0);
        let target = Rect::new(10.0, 500.0, 80.0, 20.0);

        // midpoint 510 at scroll 0, centered in an 800px viewport
        let offset = centered_offset(target, container, 0.0, 800.0);
        assert_eq!(offset, 110.0);
    }

    #[test]
    fn test_centered_offset_accounts_for_current_scroll() {
        let container = Rect::new(0.0, 100.0, 600.0, 800.0);
        let target = Rect::new(10.0, 500.0, 80.0, 20.0);

        let offset = centered_offset(target, container, 300.0, 800.0);
        assert_eq!(offset, 310.0);
    }

    #[test]
    fn test_centered_offset_clamps_at_zero() {
        let container = Rect::new(0.0, 0.0, 600.0, 800.0);
        let target = Rect::new(10.0, 20.0, 80.0, 20.0);

        assert_eq!(centered_offset(target, container, 0.0, 800.0), 0.0);
    }

    #[test]
    fn test_fallback_offset_clamps_at_zero() {
        let container = Rect::new(0.0, 0.0, 600.0, 800.0);
        let page = Rect::new(0.0, 40.0, 600.0, 790.0);

        assert_eq!(fallback_offset(page, container, 0.0), 0.0);
        assert_eq!(fallback_offset(page, container, 400.0), 340.0);
    }

    #[test]
    fn test_zero_size_rect_is_not_visible() {
        assert!(!Rect::new(0.0, 0.0, 0.0, 12.0).is_visible());
        assert!(!Rect::new(0.0, 0.0, 40.0, 0.0).is_visible());
        assert!(Rect::new(0.0, 0.0, 40.0, 12.0).is_visible());
    }
}
