//! Scroll detection.

/// Where the grid's bottom edge sits relative to the viewport, in the same
/// units (pixels, terminal lines).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollPosition {
    /// Distance from the top of the viewport to the bottom of the grid.
    pub grid_bottom: f64,
    /// Height of the viewport.
    pub viewport_height: f64,
}

impl ScrollPosition {
    pub fn new(grid_bottom: f64, viewport_height: f64) -> Self {
        Self {
            grid_bottom,
            viewport_height,
        }
    }

    /// A position where the grid ends inside the viewport.
    pub fn at_bottom() -> Self {
        Self::new(0.0, 1.0)
    }
}

/// Decides when a scroll position counts as reaching the end of the grid.
///
/// The bottom is crossed when `grid_bottom - margin < viewport_height`. A
/// positive margin starts loading before the last row is visible.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollTrigger {
    margin: f64,
}

impl ScrollTrigger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_margin(margin: f64) -> Self {
        Self { margin }
    }

    pub fn margin(&self) -> f64 {
        self.margin
    }

    /// Returns `true` if the position crosses the bottom threshold.
    pub fn crossed(&self, position: ScrollPosition) -> bool {
        position.grid_bottom - self.margin < position.viewport_height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crossed() {
        let trigger = ScrollTrigger::new();
        assert!(trigger.crossed(ScrollPosition::new(799.0, 800.0)));
        assert!(!trigger.crossed(ScrollPosition::new(800.0, 800.0)));
        assert!(!trigger.crossed(ScrollPosition::new(2400.0, 800.0)));
        assert!(trigger.crossed(ScrollPosition::at_bottom()));
    }

    #[test]
    fn test_margin_triggers_early() {
        let trigger = ScrollTrigger::with_margin(100.0);
        assert!(trigger.crossed(ScrollPosition::new(850.0, 800.0)));
        assert!(!trigger.crossed(ScrollPosition::new(900.0, 800.0)));
    }
}
