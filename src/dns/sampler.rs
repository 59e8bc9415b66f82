//! Per-pair sampling.
//!
//! Runs the configured number of trials for one (address, hostname) pair,
//! one after another, and reduces the successful ones to their mean.

use crate::dns::trial::{run_trial, Resolve};
use crate::dns::types::{AddressAverage, AddressFamily, ScanSettings};
use std::net::IpAddr;

/// Samples one (address, hostname) pair at a time.
///
/// Trials run sequentially so that every measurement sees an otherwise idle
/// resolver.
pub struct AddressSampler<'a, R: Resolve + ?Sized> {
    resolver: &'a R,
    settings: ScanSettings,
}

impl<'a, R: Resolve + ?Sized> AddressSampler<'a, R> {
    /// Create a sampler over `resolver`.
    pub fn new(resolver: &'a R, settings: ScanSettings) -> Self {
        Self { resolver, settings }
    }

    /// Trials run per pair.
    #[must_use]
    pub fn sample_count(&self) -> usize {
        self.settings.sample_count
    }

    /// Sample `hostname` against `address`.
    ///
    /// # Returns
    ///
    /// The mean of the successful trials, or `None` when every trial failed
    /// or the address is not an IP address.
    pub async fn sample(&self, address: &str, hostname: &str) -> Option<AddressAverage> {
        let server: IpAddr = match address.parse() {
            Ok(ip) => ip,
            Err(_) => {
                tracing::warn!("Skipping invalid resolver address {address:?}");
                return None;
            }
        };
        let family = AddressFamily::detect(address);

        let mut timings = Vec::with_capacity(self.settings.sample_count);
        for _ in 0..self.settings.sample_count {
            let trial = run_trial(
                self.resolver,
                hostname,
                server,
                family,
                self.settings.trial_timeout,
            )
            .await;
            if trial.success {
                timings.push(trial.elapsed_ms);
            }
        }

        match mean(&timings) {
            Some(average_ms) => Some(AddressAverage {
                address: address.to_string(),
                hostname: hostname.to_string(),
                average_ms,
                successes: timings.len(),
            }),
            None => {
                tracing::debug!("No successful lookup of {hostname} via {address}");
                None
            }
        }
    }
}

/// Arithmetic mean, `None` for an empty slice.
#[must_use]
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}
