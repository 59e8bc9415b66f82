//! Scan progress accounting and the text progress bar.
//!
//! Progress is counted in (address, hostname) pairs across the whole scan,
//! not per provider. [`ScanProgress`] is a plain value that each provider
//! step takes in and hands back, so nothing here holds shared state.

use crate::dns::types::Provider;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Default bar width in glyphs.
pub const DEFAULT_BAR_WIDTH: usize = 40;

/// Glyph for the completed part of the bar.
pub const FILLED_GLYPH: char = '█';

/// Glyph for the remaining part of the bar.
pub const EMPTY_GLYPH: char = '░';

/// Completed and total (address, hostname) pairs of a scan.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScanProgress {
    pub completed: usize,
    pub total: usize,
}

impl ScanProgress {
    /// Fresh progress for a scan of `providers` over `hostname_count` names.
    #[must_use]
    pub fn start(providers: &[Provider], hostname_count: usize) -> Self {
        Self {
            completed: 0,
            total: total_pairs(providers, hostname_count),
        }
    }

    /// Progress after one more pair.
    #[must_use]
    pub fn advance(self) -> Self {
        Self {
            completed: self.completed + 1,
            ..self
        }
    }

    /// Whether every pair has been sampled.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.completed >= self.total
    }

    /// Render this progress as a bar of the given width.
    #[must_use]
    pub fn bar(&self, width: usize) -> ProgressBar {
        render_bar(self.completed, self.total, width)
    }
}

/// Number of (address, hostname) pairs in a scan.
#[must_use]
pub fn total_pairs(providers: &[Provider], hostname_count: usize) -> usize {
    providers
        .iter()
        .map(|p| p.address_count() * hostname_count)
        .sum()
}

/// Emitted after each hostname completes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProgressEvent {
    /// Provider being sampled
    pub provider: String,
    /// Resolver address being sampled
    pub address: String,
    /// Hostname that just completed
    pub hostname: String,
    /// Global progress including this hostname
    pub progress: ScanProgress,
}

/// A rendered progress bar.
///
/// Keeps the filled and empty segments apart so a front end can style them
/// differently; `Display` gives the plain form.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressBar {
    /// Number of filled glyphs
    pub filled: usize,
    /// Number of empty glyphs
    pub empty: usize,
    /// Completion percentage in `0.0..=100.0`
    pub percent: f64,
}

impl ProgressBar {
    /// The filled segment.
    #[must_use]
    pub fn filled_segment(&self) -> String {
        FILLED_GLYPH.to_string().repeat(self.filled)
    }

    /// The empty segment.
    #[must_use]
    pub fn empty_segment(&self) -> String {
        EMPTY_GLYPH.to_string().repeat(self.empty)
    }

    /// Percentage with one decimal place, e.g. `25.0%`.
    #[must_use]
    pub fn percent_label(&self) -> String {
        format!("{:.1}%", self.percent)
    }
}

impl fmt::Display for ProgressBar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}  {}",
            self.filled_segment(),
            self.empty_segment(),
            self.percent_label()
        )
    }
}

/// Render `current` out of `total` as a bar `width` glyphs wide.
///
/// The filled length is `round(current / total * width)`. A zero total
/// renders as an empty bar at 0%, and `current` is clamped to `total`.
///
/// # Example
///
/// ```ignore
/// let bar = render_bar(50, 200, 40);
/// assert_eq!(bar.filled, 10);
/// assert_eq!(bar.percent_label(), "25.0%");
/// ```
#[must_use]
pub fn render_bar(current: usize, total: usize, width: usize) -> ProgressBar {
    let ratio = if total == 0 {
        0.0
    } else {
        current.min(total) as f64 / total as f64
    };
    let filled = ((ratio * width as f64).round() as usize).min(width);

    ProgressBar {
        filled,
        empty: width - filled,
        percent: ratio * 100.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_quarter() {
        let bar = render_bar(50, 200, 40);
        assert_eq!(bar.filled, 10);
        assert_eq!(bar.empty, 30);
        assert_eq!(bar.percent_label(), "25.0%");
        assert_eq!(
            bar.to_string(),
            format!("{}{}  25.0%", "█".repeat(10), "░".repeat(30))
        );
    }

    #[test]
    fn test_render_rounding() {
        // 1/3 of 40 is 13.33
        let bar = render_bar(1, 3, 40);
        assert_eq!(bar.filled, 13);
        assert_eq!(bar.percent_label(), "33.3%");

        // 2/3 of 40 is 26.67
        assert_eq!(render_bar(2, 3, 40).filled, 27);
    }

    #[test]
    fn test_render_bounds() {
        let empty = render_bar(0, 0, 40);
        assert_eq!(empty.filled, 0);
        assert_eq!(empty.empty, 40);
        assert_eq!(empty.percent_label(), "0.0%");

        let full = render_bar(200, 200, 40);
        assert_eq!(full.filled, 40);
        assert_eq!(full.percent_label(), "100.0%");

        let over = render_bar(300, 200, 40);
        assert_eq!(over.filled, 40);
        assert_eq!(over.empty, 0);
    }

    #[test]
    fn test_progress_accumulator() {
        let providers = vec![
            Provider::from_fields("A", "1.1.1.1;1.0.0.1", "2606:4700:4700::1111"),
            Provider::from_fields("B", "", ""),
            Provider::from_fields("C", "9.9.9.9", ""),
        ];
        let progress = ScanProgress::start(&providers, 5);
        assert_eq!(progress.total, 20);
        assert_eq!(progress.completed, 0);
        assert!(!progress.is_done());

        let progress = (0..20).fold(progress, |p, _| p.advance());
        assert!(progress.is_done());
        assert_eq!(progress.bar(DEFAULT_BAR_WIDTH).filled, 40);
    }
}
