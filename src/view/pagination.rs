// Incremental "load more" window over a filtered result set
use serde::Serialize;
use std::ops::Range;

/// Number of results added per page
pub const PAGE_SIZE: usize = 20;

/// State of the "load more" control
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadMore {
    /// Everything fits on the first page
    Hidden,
    /// More results can be appended
    Available,
    /// All results are shown; disabled until the next reset
    Exhausted,
}

/// Zero-based page cursor with a terminal exhausted state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paginator {
    page_index: usize,
    page_size: usize,
    exhausted: bool,
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new()
    }
}

impl Paginator {
    pub fn new() -> Self {
        Self {
            page_index: 0,
            page_size: PAGE_SIZE,
            exhausted: false,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Back to the first page
    pub fn reset(&mut self) {
        self.page_index = 0;
        self.exhausted = false;
    }

    /// Range of the page at `page_index` clamped to `total`
    pub fn page_range(&self, page_index: usize, total: usize) -> Range<usize> {
        let start = page_index.saturating_mul(self.page_size).min(total);
        let end = start.saturating_add(self.page_size).min(total);
        start..end
    }

    /// Visible prefix: every page up to and including the current one
    pub fn window(&self, total: usize) -> Range<usize> {
        0..self.page_range(self.page_index, total).end
    }

    /// Move to the next page and return the newly visible slice.
    ///
    /// Returns `None` once the set is exhausted; the cursor stays put until
    /// [`reset`](Self::reset).
    pub fn advance(&mut self, total: usize) -> Option<Range<usize>> {
        if self.exhausted {
            return None;
        }

        let next = self.page_index + 1;
        let range = self.page_range(next, total);
        if range.is_empty() {
            self.exhausted = true;
            return None;
        }

        self.page_index = next;
        if range.end >= total {
            self.exhausted = true;
        }
        Some(range)
    }

    /// "Load more" control state for a set of `total` results
    pub fn load_more(&self, total: usize) -> LoadMore {
        if self.page_index == 0 && total <= self.page_size {
            LoadMore::Hidden
        } else if self.exhausted || self.window(total).end >= total {
            LoadMore::Exhausted
        } else {
            LoadMore::Available
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn non_empty_windows(total: usize) -> usize {
        let mut paginator = Paginator::new();
        let mut windows = usize::from(!paginator.page_range(0, total).is_empty());
        while paginator.advance(total).is_some() {
            windows += 1;
        }
        windows
    }

    #[test]
    fn test_window_count_is_ceiling() {
        assert_eq!(non_empty_windows(0), 0);
        assert_eq!(non_empty_windows(1), 1);
        assert_eq!(non_empty_windows(20), 1);
        assert_eq!(non_empty_windows(21), 2);
        assert_eq!(non_empty_windows(45), 3);
        assert_eq!(non_empty_windows(60), 3);
    }

    #[test]
    fn test_advance_slices() {
        let mut paginator = Paginator::new();
        assert_eq!(paginator.window(45), 0..20);
        assert_eq!(paginator.advance(45), Some(20..40));
        assert_eq!(paginator.window(45), 0..40);
        assert_eq!(paginator.load_more(45), LoadMore::Available);
        assert_eq!(paginator.advance(45), Some(40..45));
        assert!(paginator.is_exhausted());
        assert_eq!(paginator.load_more(45), LoadMore::Exhausted);
        assert_eq!(paginator.advance(45), None);
        assert_eq!(paginator.page_index(), 2);
    }

    #[test]
    fn test_exhaustion_is_terminal_until_reset() {
        let mut paginator = Paginator::new();
        assert_eq!(paginator.advance(20), None);
        assert!(paginator.is_exhausted());
        // even if the set grows, only a reset reactivates it
        assert_eq!(paginator.advance(100), None);

        paginator.reset();
        assert_eq!(paginator.advance(100), Some(20..40));
    }

    #[test]
    fn test_reset_is_idempotent() {
        let mut paginator = Paginator::new();
        paginator.advance(100);
        paginator.advance(100);

        paginator.reset();
        let once = paginator.clone();
        paginator.reset();
        assert_eq!(paginator, once);
        assert_eq!(paginator.window(100), 0..20);
    }

    #[test]
    fn test_load_more_hidden_for_single_page() {
        let paginator = Paginator::new();
        assert_eq!(paginator.load_more(0), LoadMore::Hidden);
        assert_eq!(paginator.load_more(20), LoadMore::Hidden);
        assert_eq!(paginator.load_more(21), LoadMore::Available);
    }
}
