//! DNS types and data structures.
//!
//! This module provides the core types used for provider representation,
//! trial outcomes, per-pair averages and provider summaries.

use crate::error::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// Default number of trials per (address, hostname) pair.
pub const DEFAULT_SAMPLE_COUNT: usize = 200;

/// Placeholder shown for statistics of a provider without any data point.
pub const NOT_AVAILABLE: &str = "N/A";

/// Address family of a resolver address.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AddressFamily {
    /// IPv4, queried for A records
    V4,
    /// IPv6, queried for AAAA records
    V6,
}

impl AddressFamily {
    /// Classify an address string. Anything containing a colon is IPv6.
    ///
    /// # Example
    ///
    /// ```ignore
    /// assert_eq!(AddressFamily::detect("8.8.8.8"), AddressFamily::V4);
    /// ```
    #[must_use]
    pub fn detect(address: &str) -> Self {
        if address.contains(':') {
            Self::V6
        } else {
            Self::V4
        }
    }

    /// Family number as used by resolver APIs (4 or 6).
    #[must_use]
    pub fn number(self) -> u8 {
        match self {
            Self::V4 => 4,
            Self::V6 => 6,
        }
    }
}

impl fmt::Display for AddressFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "IPv{}", self.number())
    }
}

/// DNS provider information.
///
/// A named resolution service with its IPv4 and IPv6 server addresses,
/// each list kept in the order it was declared.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Provider {
    /// Provider name (e.g., "Cloudflare", "Quad9")
    pub name: String,
    /// IPv4 resolver addresses
    #[serde(default)]
    pub ipv4_addresses: Vec<String>,
    /// IPv6 resolver addresses
    #[serde(default)]
    pub ipv6_addresses: Vec<String>,
}

impl Provider {
    /// Create a new provider.
    pub fn new(
        name: impl Into<String>,
        ipv4_addresses: Vec<String>,
        ipv6_addresses: Vec<String>,
    ) -> Self {
        Self {
            name: name.into(),
            ipv4_addresses,
            ipv6_addresses,
        }
    }

    /// Build a provider from the three fields of a provider record.
    ///
    /// Address fields are `;`-delimited; blank entries are dropped, so an
    /// empty field yields no addresses for that family.
    #[must_use]
    pub fn from_fields(name: &str, ipv4_field: &str, ipv6_field: &str) -> Self {
        Self::new(
            name.trim(),
            split_addresses(ipv4_field),
            split_addresses(ipv6_field),
        )
    }

    /// All addresses, IPv4 first then IPv6, each in declared order.
    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.ipv4_addresses
            .iter()
            .chain(self.ipv6_addresses.iter())
            .map(String::as_str)
    }

    /// Total number of addresses across both families.
    #[must_use]
    pub fn address_count(&self) -> usize {
        self.ipv4_addresses.len() + self.ipv6_addresses.len()
    }

    /// Check if the provider has any IPv4 address.
    #[must_use]
    pub fn has_ipv4(&self) -> bool {
        !self.ipv4_addresses.is_empty()
    }

    /// Check if the provider has any IPv6 address.
    #[must_use]
    pub fn has_ipv6(&self) -> bool {
        !self.ipv6_addresses.is_empty()
    }
}

fn split_addresses(field: &str) -> Vec<String> {
    field
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Outcome of a single timed resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrialResult {
    /// Whether the lookup succeeded
    pub success: bool,
    /// Wall-clock duration of the lookup in milliseconds.
    /// Only meaningful when `success` is true.
    pub elapsed_ms: f64,
    /// Error message if the lookup failed
    pub error: Option<String>,
}

impl TrialResult {
    /// Create a successful result.
    #[must_use]
    pub fn success(elapsed_ms: f64) -> Self {
        Self {
            success: true,
            elapsed_ms,
            error: None,
        }
    }

    /// Create a failed result.
    pub fn failure(elapsed_ms: f64, error: impl Into<String>) -> Self {
        Self {
            success: false,
            elapsed_ms,
            error: Some(error.into()),
        }
    }
}

/// Mean latency of the successful trials for one (address, hostname) pair.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AddressAverage {
    /// Resolver address that was sampled
    pub address: String,
    /// Hostname that was resolved
    pub hostname: String,
    /// Arithmetic mean of the successful trials in milliseconds
    pub average_ms: f64,
    /// Number of trials that contributed to the mean
    pub successes: usize,
}

/// Per-provider summary statistics.
///
/// Statistics are computed over the provider's per-pair averages. A provider
/// without a single successful pair has `None` everywhere and a zero count.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderSummary {
    /// Provider name
    pub name: String,
    /// Median of the per-pair averages
    pub median_ms: Option<f64>,
    /// Smallest per-pair average
    pub min_ms: Option<f64>,
    /// Largest per-pair average
    pub max_ms: Option<f64>,
    /// Number of per-pair averages
    pub samples: usize,
}

impl ProviderSummary {
    /// Summary for a provider that produced no data point.
    pub fn unavailable(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            median_ms: None,
            min_ms: None,
            max_ms: None,
            samples: 0,
        }
    }

    /// Check if the summary carries statistics.
    #[must_use]
    pub fn is_available(&self) -> bool {
        self.median_ms.is_some()
    }

    /// Median formatted for display.
    #[must_use]
    pub fn median_display(&self) -> String {
        format_ms(self.median_ms)
    }

    /// Minimum formatted for display.
    #[must_use]
    pub fn min_display(&self) -> String {
        format_ms(self.min_ms)
    }

    /// Maximum formatted for display.
    #[must_use]
    pub fn max_display(&self) -> String {
        format_ms(self.max_ms)
    }
}

/// Format a latency with four decimal places, or `N/A`.
#[must_use]
pub fn format_ms(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.4}"))
}

/// Settings shared by every provider of a scan.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScanSettings {
    /// Trials per (address, hostname) pair
    pub sample_count: usize,
    /// Upper bound for a single trial; `None` leaves it to the resolver
    pub trial_timeout: Option<Duration>,
}

impl ScanSettings {
    /// Create settings with the given sample count and no trial bound.
    #[must_use]
    pub fn new(sample_count: usize) -> Self {
        Self {
            sample_count,
            trial_timeout: None,
        }
    }

    /// Set the per-trial timeout.
    #[must_use]
    pub fn with_trial_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.trial_timeout = timeout;
        self
    }

    /// Reject settings a scan cannot run with.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` for a zero sample count or a zero timeout.
    pub fn validate(&self) -> Result<()> {
        if self.sample_count == 0 {
            return Err(Error::config("sample count must be at least 1"));
        }
        if self.trial_timeout.is_some_and(|t| t.is_zero()) {
            return Err(Error::config("trial timeout must be greater than zero"));
        }
        Ok(())
    }
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self::new(DEFAULT_SAMPLE_COUNT)
    }
}

/// Final result of a complete scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanReport {
    /// Provider summaries ranked by median, unavailable last
    pub summaries: Vec<ProviderSummary>,
    /// Number of hostnames resolved against every address
    pub hostname_count: usize,
    /// Trials per (address, hostname) pair
    pub sample_count: usize,
    /// Total (address, hostname) pairs sampled
    pub total_pairs: usize,
    /// When the scan started
    pub started_at: DateTime<Utc>,
    /// When the scan finished
    pub finished_at: DateTime<Utc>,
}

impl ScanReport {
    /// Number of providers with at least one data point.
    #[must_use]
    pub fn available_count(&self) -> usize {
        self.summaries.iter().filter(|s| s.is_available()).count()
    }

    /// Scan duration.
    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_family_detection() {
        assert_eq!(
            AddressFamily::detect("2606:4700:4700::1111"),
            AddressFamily::V6
        );
        assert_eq!(AddressFamily::detect("8.8.8.8"), AddressFamily::V4);
        assert_eq!(AddressFamily::V4.number(), 4);
        assert_eq!(AddressFamily::V6.to_string(), "IPv6");
    }

    #[test]
    fn test_provider_from_fields() {
        let provider = Provider::from_fields(
            " Cloudflare ",
            "1.1.1.1;1.0.0.1",
            "2606:4700:4700::1111; 2606:4700:4700::1001;",
        );
        assert_eq!(provider.name, "Cloudflare");
        assert_eq!(provider.ipv4_addresses, vec!["1.1.1.1", "1.0.0.1"]);
        assert_eq!(provider.ipv6_addresses.len(), 2);
        assert_eq!(provider.address_count(), 4);

        let order: Vec<&str> = provider.addresses().collect();
        assert_eq!(order[0], "1.1.1.1");
        assert_eq!(order[2], "2606:4700:4700::1111");
    }

    #[test]
    fn test_provider_empty_field() {
        let provider = Provider::from_fields("V4Only", "9.9.9.9", "");
        assert!(provider.has_ipv4());
        assert!(!provider.has_ipv6());
        assert_eq!(provider.address_count(), 1);
    }

    #[test]
    fn test_trial_result() {
        let ok = TrialResult::success(12.5);
        assert!(ok.success);
        assert!(ok.error.is_none());

        let failed = TrialResult::failure(3.0, "NXDOMAIN");
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("NXDOMAIN"));
    }

    #[test]
    fn test_summary_display() {
        let summary = ProviderSummary {
            name: "Test".into(),
            median_ms: Some(2.5),
            min_ms: Some(1.0),
            max_ms: Some(4.123_456),
            samples: 4,
        };
        assert_eq!(summary.median_display(), "2.5000");
        assert_eq!(summary.max_display(), "4.1235");

        let empty = ProviderSummary::unavailable("Down");
        assert!(!empty.is_available());
        assert_eq!(empty.median_display(), "N/A");
        assert_eq!(empty.samples, 0);
    }

    #[test]
    fn test_settings_validation() {
        assert!(ScanSettings::default().validate().is_ok());
        assert_eq!(ScanSettings::default().sample_count, 200);
        assert!(ScanSettings::new(0).validate().is_err());
        assert!(ScanSettings::new(1)
            .with_trial_timeout(Some(Duration::ZERO))
            .validate()
            .is_err());
    }
}
