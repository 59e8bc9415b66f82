//! Provider evaluation.
//!
//! Samples every address of a provider against every hostname and reduces
//! the per-pair averages to a [`ProviderSummary`].

use crate::dns::progress::{ProgressEvent, ScanProgress};
use crate::dns::sampler::AddressSampler;
use crate::dns::trial::Resolve;
use crate::dns::types::{AddressAverage, Provider, ProviderSummary};

/// Evaluates one provider at a time.
pub struct ProviderEvaluator<'a, R: Resolve + ?Sized> {
    sampler: AddressSampler<'a, R>,
}

impl<'a, R: Resolve + ?Sized> ProviderEvaluator<'a, R> {
    /// Create an evaluator around `sampler`.
    pub fn new(sampler: AddressSampler<'a, R>) -> Self {
        Self { sampler }
    }

    /// Evaluate `provider` over `hostnames`.
    ///
    /// Addresses are visited IPv4 first, then IPv6, each family in declared
    /// order, and every address runs through all hostnames in order.
    /// `on_progress` is called after each hostname with the global progress
    /// of the scan, which starts from `progress` and is handed back updated.
    ///
    /// # Returns
    ///
    /// The provider summary and the progress after its last pair.
    pub async fn evaluate<F>(
        &self,
        provider: &Provider,
        hostnames: &[String],
        mut progress: ScanProgress,
        on_progress: &mut F,
    ) -> (ProviderSummary, ScanProgress)
    where
        F: FnMut(ProgressEvent) + ?Sized,
    {
        let mut averages = Vec::new();

        for address in provider.addresses() {
            for hostname in hostnames {
                if let Some(average) = self.sampler.sample(address, hostname).await {
                    averages.push(average);
                }

                progress = progress.advance();
                on_progress(ProgressEvent {
                    provider: provider.name.clone(),
                    address: address.to_string(),
                    hostname: hostname.clone(),
                    progress,
                });
            }
        }

        let summary = ProviderSummary::from_averages(&provider.name, &averages);
        tracing::debug!(
            "{}: median {} ms over {} pairs",
            summary.name,
            summary.median_display(),
            summary.samples
        );
        (summary, progress)
    }
}

impl ProviderSummary {
    /// Reduce per-pair averages to summary statistics.
    ///
    /// No averages yields the unavailable summary.
    #[must_use]
    pub fn from_averages(name: &str, averages: &[AddressAverage]) -> Self {
        let mut values: Vec<f64> = averages.iter().map(|a| a.average_ms).collect();
        values.sort_by(f64::total_cmp);

        match (values.first(), values.last(), median(&values)) {
            (Some(&min), Some(&max), Some(median)) => Self {
                name: name.to_string(),
                median_ms: Some(median),
                min_ms: Some(min),
                max_ms: Some(max),
                samples: values.len(),
            },
            _ => Self::unavailable(name),
        }
    }
}

/// Median of an ascending slice.
///
/// The middle element for an odd length, the mean of the two middle
/// elements for an even length, `None` when empty.
#[must_use]
pub fn median(sorted: &[f64]) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}
