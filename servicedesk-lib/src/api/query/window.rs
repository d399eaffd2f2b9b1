//! Row window for incremental loading.

use std::ops::Range;

use crate::error::ConfigError;

/// The half-open `[start, end)` row window a grid requests, its page size,
/// and the bookkeeping for in-flight fetches.
///
/// Two kinds of movement exist:
///
/// - [`advance`](Self::advance) slides the window forward by `step` for a
///   scroll-triggered append.
/// - [`reset`](Self::reset) rewinds to `[0, step + 1)` after a server sort or
///   filter change. The reset window is one row wider than a regular page;
///   servers and callers rely on this width, so it is kept.
///
/// Every reset starts a new generation. Fetches are tagged with the
/// generation current when they were issued so that results belonging to an
/// older window can be recognized and dropped.
///
/// A new generation also starts with its replace pending. Until that replace
/// completes the window refuses to load further pages, since an append
/// landing first would be wiped by the replace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationWindow {
    step: usize,
    start: usize,
    end: usize,
    loading: bool,
    replacing: bool,
    generation: u64,
    exhausted: bool,
}

impl PaginationWindow {
    /// Creates the initial window `[0, step)`.
    pub fn new(step: usize) -> Result<Self, ConfigError> {
        Self::with_range(step, 0, step)
    }

    /// Creates a window with an explicit initial range.
    pub fn with_range(step: usize, start: usize, end: usize) -> Result<Self, ConfigError> {
        if step == 0 {
            return Err(ConfigError::ZeroStep);
        }
        if end <= start {
            return Err(ConfigError::InvalidWindow { start, end });
        }
        Ok(Self {
            step,
            start,
            end,
            loading: false,
            replacing: true,
            generation: 0,
            exhausted: false,
        })
    }

    /// Returns the page size.
    pub fn step(&self) -> usize {
        self.step
    }

    /// Returns the first row index of the window.
    pub fn start(&self) -> usize {
        self.start
    }

    /// Returns the row index one past the window.
    pub fn end(&self) -> usize {
        self.end
    }

    /// Returns the window as a range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }

    /// Returns `true` while a scroll-triggered fetch is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Returns `true` until the first window of the current generation has
    /// been loaded (or failed to load).
    pub fn is_replacing(&self) -> bool {
        self.replacing
    }

    /// Returns the current generation.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` once a short page has been seen (only tracked when the
    /// grid opts into exhaustion tracking).
    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    /// Slides the window forward by one page: `start = end`,
    /// `end = start + step`.
    pub fn advance(&mut self) {
        self.start = self.end;
        self.end = self.start + self.step;
    }

    /// Rewinds to `[0, step + 1)` and starts a new generation.
    pub fn reset(&mut self) {
        self.start = 0;
        self.end = self.step + 1;
        self.restart();
    }

    /// Moves to an explicit range and starts a new generation.
    pub fn set_range(&mut self, start: usize, end: usize) -> Result<(), ConfigError> {
        if end <= start {
            return Err(ConfigError::InvalidWindow { start, end });
        }
        self.start = start;
        self.end = end;
        self.restart();
        Ok(())
    }

    /// Starts a new generation without moving the window.
    ///
    /// Clears the loading flag: a fetch from the previous generation no
    /// longer blocks pagination. The new generation waits for its replace.
    pub fn restart(&mut self) -> u64 {
        self.generation += 1;
        self.loading = false;
        self.replacing = true;
        self.exhausted = false;
        self.generation
    }

    /// Marks a scroll fetch as in flight. Returns `false` if one already is,
    /// or if the generation's replace has not completed.
    pub fn begin_load(&mut self) -> bool {
        if self.loading || self.replacing {
            return false;
        }
        self.loading = true;
        true
    }

    /// Clears the loading flag.
    pub fn finish_load(&mut self) {
        self.loading = false;
    }

    /// Marks the generation's replace as done.
    pub fn finish_replace(&mut self) {
        self.replacing = false;
    }

    /// Records the size of a fetched page; a page shorter than `step` marks
    /// the dataset as exhausted.
    pub fn record_page(&mut self, rows: usize) {
        if rows < self.step {
            self.exhausted = true;
        }
    }
}
