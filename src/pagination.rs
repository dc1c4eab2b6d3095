//! # Pagination
//!
//! Tracks the active page index and the enabled/hidden state of the
//! prev/next controls. Exactly one page is visible at a time; documents
//! with fewer than two pages hide both controls permanently.

use serde::Serialize;

/// State of the prev/next controls as the host should present them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationControls {
    pub visible: bool,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

/// Active-page tracking with clamped transitions.
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    active: usize,
    count: usize,
}

impl Pagination {
    /// Start at page 0 of a `count`-page document.
    pub fn new(count: usize) -> Self {
        Self { active: 0, count }
    }

    pub fn active(&self) -> usize {
        self.active
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Step back one page, clamped at 0. Returns true when the index moved.
    pub fn prev(&mut self) -> bool {
        if self.active == 0 {
            return false;
        }
        self.active -= 1;
        true
    }

    /// Step forward one page, clamped at the last page. Returns true when
    /// the index moved.
    pub fn next(&mut self) -> bool {
        if self.count == 0 || self.active >= self.count - 1 {
            return false;
        }
        self.active += 1;
        true
    }

    pub fn controls(&self) -> PaginationControls {
        let visible = self.count >= 2;
        PaginationControls {
            visible,
            prev_enabled: visible && self.active > 0,
            next_enabled: visible && self.active + 1 < self.count,
        }
    }

    /// The page-count display string.
    pub fn label(&self) -> String {
        format!(
            "Displaying page {} of {} pages.",
            self.active + 1,
            self.count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_clamps_at_last_page() {
        let mut p = Pagination::new(3);
        assert!(p.next());
        assert!(p.next());
        assert!(!p.next());
        assert_eq!(p.active(), 2);
        assert!(!p.controls().next_enabled);
        assert!(p.controls().prev_enabled);
    }

    #[test]
    fn prev_from_zero_is_noop() {
        let mut p = Pagination::new(3);
        assert!(!p.prev());
        assert_eq!(p.active(), 0);
        assert!(!p.controls().prev_enabled);
        assert!(p.controls().next_enabled);
    }

    #[test]
    fn leaving_a_boundary_reenables_the_opposite_control() {
        let mut p = Pagination::new(3);
        p.next();
        let c = p.controls();
        assert!(c.prev_enabled && c.next_enabled);
    }

    #[test]
    fn single_page_hides_controls() {
        let p = Pagination::new(1);
        let c = p.controls();
        assert!(!c.visible && !c.prev_enabled && !c.next_enabled);
    }

    #[test]
    fn label_is_one_based() {
        let mut p = Pagination::new(2);
        assert_eq!(p.label(), "Displaying page 1 of 2 pages.");
        p.next();
        assert_eq!(p.label(), "Displaying page 2 of 2 pages.");
    }
}
