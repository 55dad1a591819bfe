//! Scroll-to-top detection for the pull-to-refresh trigger.

/// Detects the list being scrolled back to its top edge.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScrollTracker {
    scrolled_away: bool,
}

impl ScrollTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current vertical offset; true exactly when it reaches 0 after being above 0.
    pub fn observe(&mut self, offset: f64) -> bool {
        if offset > 0.0 {
            self.scrolled_away = true;
            return false;
        }
        std::mem::take(&mut self.scrolled_away)
    }
}
