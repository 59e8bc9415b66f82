//! Timed resolution trials.
//!
//! A trial is one lookup of one hostname against one resolver address,
//! restricted to one address family. The lookup itself goes through the
//! [`Resolve`] trait so the measurement code can run against trust-dns in
//! production and against a scripted resolver in tests.

#![allow(clippy::missing_errors_doc)]

use crate::dns::types::{AddressFamily, TrialResult};
use crate::error::{Error, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::{timeout, Instant};
use trust_dns_resolver::config::{NameServerConfigGroup, ResolverConfig, ResolverOpts};
use trust_dns_resolver::TokioAsyncResolver;

/// Standard DNS port.
const DNS_PORT: u16 = 53;

/// A lookup capability directed at one specific resolver.
#[async_trait]
pub trait Resolve: Send + Sync {
    /// Set up whatever is needed to query `server`.
    ///
    /// Called before the trial clock starts, so setup cost never counts
    /// towards a measured latency.
    fn prepare(&self, _server: IpAddr) -> Result<()> {
        Ok(())
    }

    /// Resolve `hostname` for `family` by asking `server` directly.
    ///
    /// Succeeds only if the server answered with at least one record of the
    /// requested family.
    async fn lookup(&self, hostname: &str, server: IpAddr, family: AddressFamily) -> Result<()>;
}

/// Resolver that sends every query straight to the requested server.
///
/// One trust-dns resolver is kept per server address. Each has its answer
/// cache disabled and a single attempt per query, so repeated lookups hit
/// the network every time and are never retried.
pub struct DirectResolver {
    opts: ResolverOpts,
    resolvers: Mutex<HashMap<IpAddr, TokioAsyncResolver>>,
}

impl DirectResolver {
    /// Create a new `DirectResolver`.
    ///
    /// # Arguments
    ///
    /// * `timeout` - Per-query timeout; `None` keeps the trust-dns default
    #[must_use]
    pub fn new(timeout: Option<Duration>) -> Self {
        let mut opts = ResolverOpts::default();
        opts.cache_size = 0;
        opts.attempts = 1;
        opts.use_hosts_file = false;
        if let Some(timeout) = timeout {
            opts.timeout = timeout;
        }

        Self {
            opts,
            resolvers: Mutex::new(HashMap::new()),
        }
    }

    /// Get the resolver bound to `server`, creating it on first use.
    fn resolver_for(&self, server: IpAddr) -> Result<TokioAsyncResolver> {
        let mut resolvers = self
            .resolvers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(resolver) = resolvers.get(&server) {
            return Ok(resolver.clone());
        }

        let config = ResolverConfig::from_parts(
            None,
            vec![],
            NameServerConfigGroup::from_ips_clear(&[server], DNS_PORT, true),
        );
        let resolver = TokioAsyncResolver::tokio(config, self.opts.clone())?;
        tracing::debug!("Created resolver for {server}");
        resolvers.insert(server, resolver.clone());
        Ok(resolver)
    }
}

impl Default for DirectResolver {
    fn default() -> Self {
        Self::new(None)
    }
}

#[async_trait]
impl Resolve for DirectResolver {
    fn prepare(&self, server: IpAddr) -> Result<()> {
        self.resolver_for(server).map(drop)
    }

    async fn lookup(&self, hostname: &str, server: IpAddr, family: AddressFamily) -> Result<()> {
        let resolver = self.resolver_for(server)?;

        // Fully qualified, so no search domain is ever appended
        let name = if hostname.ends_with('.') {
            hostname.to_string()
        } else {
            format!("{hostname}.")
        };

        match family {
            AddressFamily::V4 => {
                resolver.ipv4_lookup(name.as_str()).await?;
            }
            AddressFamily::V6 => {
                resolver.ipv6_lookup(name.as_str()).await?;
            }
        }
        Ok(())
    }
}

/// Run one timed resolution.
///
/// The resolver is prepared for `server` first. The clock starts right
/// before the lookup is issued and stops right after it completes, whatever
/// the outcome. Failures are returned as a failed [`TrialResult`], never as
/// an error.
///
/// # Arguments
///
/// * `resolver` - Lookup capability
/// * `hostname` - Name to resolve
/// * `server` - Resolver address to query
/// * `family` - Record family to request
/// * `limit` - Optional upper bound for the whole trial
pub async fn run_trial<R: Resolve + ?Sized>(
    resolver: &R,
    hostname: &str,
    server: IpAddr,
    family: AddressFamily,
    limit: Option<Duration>,
) -> TrialResult {
    if let Err(e) = resolver.prepare(server) {
        tracing::trace!("Resolver setup for {server} failed: {e}");
        return TrialResult::failure(0.0, e.to_string());
    }

    let start = Instant::now();
    let outcome = match limit {
        Some(limit) => timeout(limit, resolver.lookup(hostname, server, family))
            .await
            .unwrap_or(Err(Error::Timeout)),
        None => resolver.lookup(hostname, server, family).await,
    };
    let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

    match outcome {
        Ok(()) => TrialResult::success(elapsed_ms),
        Err(e) => {
            tracing::trace!("Lookup of {hostname} via {server} failed: {e}");
            TrialResult::failure(elapsed_ms, e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dns::testing::{ScriptedResolver, Step};

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[tokio::test(start_paused = true)]
    async fn test_trial_measures_success() {
        let resolver = ScriptedResolver::new(vec![Step::ok(10)]);
        let result = run_trial(
            &resolver,
            "example.com",
            ip("1.1.1.1"),
            AddressFamily::V4,
            None,
        )
        .await;

        assert!(result.success);
        assert!((result.elapsed_ms - 10.0).abs() < 1.0);
        assert!(result.error.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_trial_records_failure() {
        let resolver = ScriptedResolver::new(vec![Step::fail(4)]);
        let result = run_trial(
            &resolver,
            "example.com",
            ip("1.1.1.1"),
            AddressFamily::V4,
            None,
        )
        .await;

        assert!(!result.success);
        assert!(result.error.is_some());
    }

    #[tokio::test(start_paused = true)]
    async fn test_trial_timeout() {
        let resolver = ScriptedResolver::new(vec![Step::ok(10_000)]);
        let result = run_trial(
            &resolver,
            "example.com",
            ip("1.1.1.1"),
            AddressFamily::V4,
            Some(Duration::from_secs(1)),
        )
        .await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Operation timed out"));
    }

    #[tokio::test]
    async fn test_trial_passes_family_and_server() {
        let resolver = ScriptedResolver::new(vec![Step::ok(0)]);
        let server = ip("2606:4700:4700::1111");
        run_trial(&resolver, "example.com", server, AddressFamily::V6, None).await;

        let calls = resolver.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0], ("example.com".to_string(), server, AddressFamily::V6));
    }

    /// Resolver with slow setup and an instant lookup.
    struct SlowSetupResolver {
        setup: Duration,
        prepared: Mutex<Vec<IpAddr>>,
    }

    #[async_trait]
    impl Resolve for SlowSetupResolver {
        fn prepare(&self, server: IpAddr) -> Result<()> {
            std::thread::sleep(self.setup);
            self.prepared.lock().unwrap().push(server);
            Ok(())
        }

        async fn lookup(&self, _: &str, server: IpAddr, _: AddressFamily) -> Result<()> {
            if self.prepared.lock().unwrap().contains(&server) {
                Ok(())
            } else {
                Err(Error::scan("lookup before setup"))
            }
        }
    }

    /// Resolver whose setup always fails.
    struct BrokenSetupResolver;

    #[async_trait]
    impl Resolve for BrokenSetupResolver {
        fn prepare(&self, _: IpAddr) -> Result<()> {
            Err(Error::config("no resolver"))
        }

        async fn lookup(&self, _: &str, _: IpAddr, _: AddressFamily) -> Result<()> {
            panic!("lookup must not run after failed setup");
        }
    }

    #[tokio::test]
    async fn test_trial_excludes_setup_time() {
        let resolver = SlowSetupResolver {
            setup: Duration::from_millis(200),
            prepared: Mutex::new(Vec::new()),
        };
        let server = ip("1.1.1.1");
        let result = run_trial(&resolver, "example.com", server, AddressFamily::V4, None).await;

        assert!(result.success);
        assert!(result.elapsed_ms < 200.0);
        assert_eq!(*resolver.prepared.lock().unwrap(), vec![server]);
    }

    #[tokio::test]
    async fn test_trial_setup_failure() {
        let result = run_trial(
            &BrokenSetupResolver,
            "example.com",
            ip("1.1.1.1"),
            AddressFamily::V4,
            None,
        )
        .await;

        assert!(!result.success);
        assert_eq!(result.error.as_deref(), Some("Config error: no resolver"));
    }

    #[test]
    fn test_direct_resolver_never_caches_or_retries() {
        let resolver = DirectResolver::new(None);
        assert_eq!(resolver.opts.cache_size, 0);
        assert_eq!(resolver.opts.attempts, 1);
        assert!(!resolver.opts.use_hosts_file);
        assert_eq!(resolver.opts.timeout, ResolverOpts::default().timeout);

        let resolver = DirectResolver::new(Some(Duration::from_secs(3)));
        assert_eq!(resolver.opts.timeout, Duration::from_secs(3));
        assert_eq!(resolver.opts.cache_size, 0);
        assert_eq!(resolver.opts.attempts, 1);
    }

    #[tokio::test]
    async fn test_direct_resolver_reuses_server_resolver() {
        let resolver = DirectResolver::default();
        let server = ip("9.9.9.9");
        resolver.prepare(server).unwrap();
        resolver.prepare(server).unwrap();
        resolver.prepare(ip("1.1.1.1")).unwrap();

        assert_eq!(resolver.resolvers.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    #[ignore = "needs outbound DNS"]
    async fn test_direct_resolver_real_lookup() {
        let resolver = DirectResolver::new(Some(Duration::from_secs(3)));
        let result = run_trial(
            &resolver,
            "example.com",
            ip("1.1.1.1"),
            AddressFamily::V4,
            None,
        )
        .await;

        assert!(result.success, "lookup failed: {:?}", result.error);
        assert!(result.elapsed_ms > 0.0);
    }
}
