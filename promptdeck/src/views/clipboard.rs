//! Copy-to-clipboard feedback
//!
//! The browser performs the clipboard write, falling back to a hidden
//! text area and `execCommand("copy")` when the async clipboard API is
//! missing, and reports the outcome here.

use serde::Deserialize;
use std::time::{Duration, Instant};

/// Message shown when the browser could not copy
pub const COPY_FAILED_MESSAGE: &str = "Copy failed, please copy the text manually";

/// Result of a clipboard write reported by the browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CopyOutcome {
    /// Text is on the clipboard
    Copied,
    /// Neither clipboard mechanism worked
    Failed,
}

/// Transient "copied" indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CopyIndicator {
    window: Duration,
    shown_until: Option<Instant>,
}

impl CopyIndicator {
    /// Indicator that stays up for `window` after each successful copy
    #[must_use]
    pub const fn new(window: Duration) -> Self {
        Self {
            window,
            shown_until: None,
        }
    }

    /// How long the indicator stays visible
    #[must_use]
    pub const fn window(&self) -> Duration {
        self.window
    }

    /// Record a copy outcome at `now`
    ///
    /// Returns the alert to show for a failure.
    pub fn record(&mut self, outcome: CopyOutcome, now: Instant) -> Option<&'static str> {
        match outcome {
            CopyOutcome::Copied => {
                self.shown_until = Some(now + self.window);
                None
            }
            CopyOutcome::Failed => {
                self.shown_until = None;
                Some(COPY_FAILED_MESSAGE)
            }
        }
    }

    /// Whether the indicator is visible at `now`
    #[must_use]
    pub fn is_shown(&self, now: Instant) -> bool {
        self.shown_until.is_some_and(|until| now < until)
    }

    /// Hide the indicator
    pub fn reset(&mut self) {
        self.shown_until = None;
    }
}
