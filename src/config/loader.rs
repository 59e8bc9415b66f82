//! Provider table loader.
//!
//! This module provides functionality to load provider lists from a
//! delimited text table, command-line records, or default locations.
//!
//! The table has a header line followed by one provider per line:
//!
//! ```text
//! name,ipv4,ipv6
//! Cloudflare,1.1.1.1;1.0.0.1,2606:4700:4700::1111;2606:4700:4700::1001
//! ```

use crate::dns::types::{AddressFamily, Provider};
use crate::error::{Error, Result};
use std::net::IpAddr;
use std::path::{Path, PathBuf};

/// File name of the provider table.
pub const PROVIDERS_FILE: &str = "providers.csv";

/// Provider list configuration loader.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load providers from a table file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or any record is malformed.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let providers = ConfigLoader::load_from_file("providers.csv")?;
    /// for provider in &providers {
    ///     println!("{}: {} addresses", provider.name, provider.address_count());
    /// }
    /// ```
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Vec<Provider>> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Cannot read {}: {e}", path.display())))?;
        let providers = Self::parse_table(&content)?;
        tracing::debug!(
            "Loaded {} providers from {}",
            providers.len(),
            path.display()
        );
        Ok(providers)
    }

    /// Load providers from the default location.
    ///
    /// Searches in the following order:
    /// 1. `providers.csv` in the current directory
    /// 2. `$CONFIG_DIR/dnseval/providers.csv`
    ///
    /// # Errors
    ///
    /// Returns an error if no table is found or the one found is malformed.
    pub fn load_default() -> Result<Vec<Provider>> {
        let path = Self::default_paths()
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| {
                Error::config(format!(
                    "No {PROVIDERS_FILE} found in the current directory or {}",
                    Self::config_dir().display()
                ))
            })?;
        Self::load_from_file(path)
    }

    /// Candidate table locations, in search order.
    #[must_use]
    pub fn default_paths() -> Vec<PathBuf> {
        vec![
            PathBuf::from(PROVIDERS_FILE),
            Self::config_dir().join(PROVIDERS_FILE),
        ]
    }

    /// Get the config directory path.
    #[must_use]
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("dnseval")
    }

    /// Parse a whole provider table. The first line is a header.
    ///
    /// # Errors
    ///
    /// Returns a parse error naming the offending line, or a config error if
    /// the table has no providers.
    pub fn parse_table(content: &str) -> Result<Vec<Provider>> {
        let mut providers = Vec::new();

        for (idx, line) in content.lines().enumerate().skip(1) {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let provider = Self::parse_record(line)
                .map_err(|e| Error::parse(format!("line {}: {e}", idx + 1)))?;
            providers.push(provider);
        }

        if providers.is_empty() {
            return Err(Error::config("Provider table contains no providers"));
        }
        Ok(providers)
    }

    /// Parse one `name,ipv4list,ipv6list` record.
    ///
    /// Missing trailing fields are treated as empty.
    ///
    /// # Errors
    ///
    /// Returns an error for an empty name, extra fields, an invalid address
    /// or an address listed under the wrong family.
    pub fn parse_record(record: &str) -> Result<Provider> {
        let fields: Vec<&str> = record.split(',').collect();
        if fields.len() > 3 {
            return Err(Error::parse(format!(
                "expected at most 3 fields, found {}",
                fields.len()
            )));
        }

        let name = fields[0].trim();
        if name.is_empty() {
            return Err(Error::parse("provider name is empty"));
        }

        let provider = Provider::from_fields(
            name,
            fields.get(1).copied().unwrap_or_default(),
            fields.get(2).copied().unwrap_or_default(),
        );
        validate_family(&provider.ipv4_addresses, AddressFamily::V4)?;
        validate_family(&provider.ipv6_addresses, AddressFamily::V6)?;
        Ok(provider)
    }

    /// Create a provider list from command-line records.
    ///
    /// # Arguments
    ///
    /// * `records` - Strings in the table record format `name,ipv4,ipv6`
    ///
    /// # Errors
    ///
    /// Returns an error if any record is malformed.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let args = vec!["Quad9,9.9.9.9;149.112.112.112,2620:fe::fe".to_string()];
    /// let providers = ConfigLoader::from_args(args)?;
    /// ```
    pub fn from_args(records: Vec<String>) -> Result<Vec<Provider>> {
        records
            .iter()
            .map(|record| {
                Self::parse_record(record)
                    .map_err(|e| Error::parse(format!("--provider {record:?}: {e}")))
            })
            .collect()
    }
}

/// Every address must be an IP of the family its column declares, so that
/// family detection at scan time agrees with the table.
fn validate_family(addresses: &[String], family: AddressFamily) -> Result<()> {
    for address in addresses {
        let ip: IpAddr = address
            .parse()
            .map_err(|_| Error::parse(format!("invalid IP address: {address}")))?;
        let detected = AddressFamily::detect(address);
        let parsed = if ip.is_ipv6() {
            AddressFamily::V6
        } else {
            AddressFamily::V4
        };
        if detected != family || parsed != family {
            return Err(Error::parse(format!(
                "{address} listed as {family} but is {parsed}"
            )));
        }
    }
    Ok(())
}
