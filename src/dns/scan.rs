//! Scan orchestration.
//!
//! A [`Scanner`] walks the provider list in order, evaluates each provider,
//! threads the global progress from one provider to the next and ranks the
//! summaries once every provider is done.

#![allow(clippy::missing_errors_doc)]

use crate::dns::evaluator::ProviderEvaluator;
use crate::dns::progress::{ProgressEvent, ScanProgress};
use crate::dns::sampler::AddressSampler;
use crate::dns::trial::Resolve;
use crate::dns::types::{Provider, ProviderSummary, ScanReport, ScanSettings};
use crate::error::{Error, Result};
use chrono::Utc;
use std::cmp::Ordering;

/// Lifecycle of a [`Scanner`]. Transitions only move forward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// Not started
    #[default]
    Idle,
    /// Sampling providers
    Scanning,
    /// Every summary computed and ranked
    Complete,
}

/// Notifications emitted while a scan runs, in evaluation order.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanEvent {
    /// A hostname finished for the current address
    Progress(ProgressEvent),
    /// A provider finished
    ProviderFinished(ProviderSummary),
}

/// Sequential scan over a list of providers.
///
/// # Example
///
/// ```ignore
/// let mut scanner = Scanner::new(DirectResolver::default(), ScanSettings::default());
/// let report = scanner.run(&providers, &hostnames, |event| { /* redraw */ }).await?;
/// ```
pub struct Scanner<R> {
    resolver: R,
    settings: ScanSettings,
    state: ScanState,
}

impl<R: Resolve> Scanner<R> {
    /// Create an idle scanner.
    pub fn new(resolver: R, settings: ScanSettings) -> Self {
        Self {
            resolver,
            settings,
            state: ScanState::Idle,
        }
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Settings the scan runs with.
    #[must_use]
    pub fn settings(&self) -> &ScanSettings {
        &self.settings
    }

    /// Run the scan.
    ///
    /// Providers are evaluated one after another in the given order. Each
    /// provider produces exactly one summary, including providers where
    /// nothing resolved. `on_event` sees every progress step and every
    /// finished provider.
    ///
    /// # Errors
    ///
    /// Returns `Error::Scan` if this scanner was already started, and
    /// `Error::Config` for invalid settings or an empty provider or
    /// hostname list. Lookup failures never abort the scan.
    pub async fn run<F>(
        &mut self,
        providers: &[Provider],
        hostnames: &[String],
        mut on_event: F,
    ) -> Result<ScanReport>
    where
        F: FnMut(ScanEvent),
    {
        if self.state != ScanState::Idle {
            return Err(Error::scan("scanner has already been started"));
        }
        self.settings.validate()?;
        if providers.is_empty() {
            return Err(Error::config("no providers to scan"));
        }
        if hostnames.is_empty() {
            return Err(Error::config("no hostnames to resolve"));
        }

        self.state = ScanState::Scanning;
        let started_at = Utc::now();
        let mut progress = ScanProgress::start(providers, hostnames.len());
        tracing::info!(
            "Scanning {} providers, {} pairs x {} samples",
            providers.len(),
            progress.total,
            self.settings.sample_count
        );

        let evaluator =
            ProviderEvaluator::new(AddressSampler::new(&self.resolver, self.settings));
        let mut summaries = Vec::with_capacity(providers.len());

        for provider in providers {
            let mut forward = |event: ProgressEvent| on_event(ScanEvent::Progress(event));
            let (summary, next) = evaluator
                .evaluate(provider, hostnames, progress, &mut forward)
                .await;
            progress = next;

            on_event(ScanEvent::ProviderFinished(summary.clone()));
            summaries.push(summary);
        }

        rank(&mut summaries);
        self.state = ScanState::Complete;

        let report = ScanReport {
            summaries,
            hostname_count: hostnames.len(),
            sample_count: self.settings.sample_count,
            total_pairs: progress.total,
            started_at,
            finished_at: Utc::now(),
        };
        tracing::info!(
            "Scan complete: {}/{} providers answered",
            report.available_count(),
            report.summaries.len()
        );
        Ok(report)
    }
}

/// Sort summaries by ascending median, unavailable ones last.
///
/// The sort is stable, so providers with equal medians and unavailable
/// providers keep their evaluation order.
pub fn rank(summaries: &mut [ProviderSummary]) {
    summaries.sort_by(|a, b| compare_median(a.median_ms, b.median_ms));
}

fn compare_median(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::testing::{ScriptedResolver, Step};

    fn summary(name: &str, median: Option<f64>) -> ProviderSummary {
        ProviderSummary {
            name: name.to_string(),
            median_ms: median,
            min_ms: median,
            max_ms: median,
            samples: usize::from(median.is_some()),
        }
    }

    fn hosts(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn test_rank_unavailable_last() {
        let mut summaries = vec![
            summary("five", Some(5.0)),
            summary("down-a", None),
            summary("two", Some(2.0)),
            summary("down-b", None),
        ];
        rank(&mut summaries);

        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["two", "five", "down-a", "down-b"]);
    }

    #[test]
    fn test_rank_is_stable() {
        let mut summaries = vec![
            summary("first", Some(3.0)),
            summary("second", Some(3.0)),
            summary("fast", Some(1.0)),
        ];
        rank(&mut summaries);

        let names: Vec<&str> = summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, vec!["fast", "first", "second"]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_provider_scan() {
        let resolver = ScriptedResolver::new(vec![Step::ok(10), Step::ok(20), Step::fail(5)]);
        let mut scanner = Scanner::new(resolver, ScanSettings::new(3));
        let providers = vec![Provider::new("TestDNS", vec!["1.1.1.1".into()], vec![])];
        let hostnames = hosts(&["example.com"]);

        let report = scanner.run(&providers, &hostnames, |_| {}).await.unwrap();

        assert_eq!(report.summaries.len(), 1);
        let summary = &report.summaries[0];
        assert_eq!(summary.name, "TestDNS");
        assert_eq!(summary.samples, 1);
        let median = summary.median_ms.unwrap();
        assert!((median - 15.0).abs() < 1.0);
        assert_eq!(report.sample_count, 3);
        assert_eq!(report.total_pairs, 1);
        assert_eq!(scanner.state(), ScanState::Complete);
    }

    #[tokio::test]
    async fn test_scan_events_and_ranking() {
        let resolver = ScriptedResolver::new(vec![])
            .with_fallback(Step::ok(0))
            .with_failing_server("192.0.2.1");
        let mut scanner = Scanner::new(resolver, ScanSettings::new(2));
        let providers = vec![
            Provider::from_fields("Unreachable", "192.0.2.1", ""),
            Provider::from_fields("Cloudflare", "1.1.1.1", "2606:4700:4700::1111"),
            Provider::from_fields("Empty", "", ""),
        ];
        let hostnames = hosts(&["a.com", "b.com"]);

        let mut events = Vec::new();
        let report = scanner
            .run(&providers, &hostnames, |e| events.push(e))
            .await
            .unwrap();

        // 2 pairs for Unreachable, 4 for Cloudflare, none for Empty
        let progress: Vec<usize> = events
            .iter()
            .filter_map(|e| match e {
                ScanEvent::Progress(p) => Some(p.progress.completed),
                ScanEvent::ProviderFinished(_) => None,
            })
            .collect();
        assert_eq!(progress, vec![1, 2, 3, 4, 5, 6]);

        let finished: Vec<&str> = events
            .iter()
            .filter_map(|e| match e {
                ScanEvent::ProviderFinished(s) => Some(s.name.as_str()),
                ScanEvent::Progress(_) => None,
            })
            .collect();
        assert_eq!(finished, vec!["Unreachable", "Cloudflare", "Empty"]);

        let ranked: Vec<&str> = report.summaries.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(ranked, vec!["Cloudflare", "Unreachable", "Empty"]);
        assert_eq!(report.summaries[0].samples, 4);
        assert_eq!(report.summaries[1].median_display(), "N/A");
        assert_eq!(report.available_count(), 1);
        assert_eq!(report.total_pairs, 6);
    }

    #[tokio::test]
    async fn test_scan_runs_once() {
        let mut scanner = Scanner::new(ScriptedResolver::new(vec![]), ScanSettings::new(1));
        assert_eq!(scanner.state(), ScanState::Idle);

        let providers = vec![Provider::from_fields("A", "1.1.1.1", "")];
        let hostnames = hosts(&["a.com"]);
        scanner.run(&providers, &hostnames, |_| {}).await.unwrap();

        let again = scanner.run(&providers, &hostnames, |_| {}).await;
        assert!(matches!(again, Err(Error::Scan(_))));
        assert_eq!(scanner.state(), ScanState::Complete);
    }

    #[tokio::test]
    async fn test_scan_rejects_empty_input() {
        let hostnames = hosts(&["a.com"]);
        let mut scanner = Scanner::new(ScriptedResolver::new(vec![]), ScanSettings::new(1));
        let result = scanner.run(&[], &hostnames, |_| {}).await;
        assert!(matches!(result, Err(Error::Config(_))));
        assert_eq!(scanner.state(), ScanState::Idle);

        let providers = vec![Provider::from_fields("A", "1.1.1.1", "")];
        let result = scanner.run(&providers, &[], |_| {}).await;
        assert!(matches!(result, Err(Error::Config(_))));

        let mut scanner = Scanner::new(ScriptedResolver::new(vec![]), ScanSettings::new(0));
        let result = scanner.run(&providers, &hostnames, |_| {}).await;
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
