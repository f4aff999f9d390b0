use anyhow::Result;
use hickory_resolver::Resolver;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::net::IpAddr;
use std::time::{Duration, Instant};

use super::sanitize_display;

/// Best-effort reverse DNS for responders.
///
/// Implementations never fail: an empty list means no names.
pub trait ReverseDns {
    fn reverse_names(&self, ip: IpAddr) -> Vec<String>;
}

/// Reverse DNS switched off (`--no-dns`)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoDns;

impl ReverseDns for NoDns {
    fn reverse_names(&self, _ip: IpAddr) -> Vec<String> {
        Vec::new()
    }
}

impl<T: ReverseDns + ?Sized> ReverseDns for &T {
    fn reverse_names(&self, ip: IpAddr) -> Vec<String> {
        (**self).reverse_names(ip)
    }
}

impl<T: ReverseDns + ?Sized> ReverseDns for Box<T> {
    fn reverse_names(&self, ip: IpAddr) -> Vec<String> {
        (**self).reverse_names(ip)
    }
}

/// DNS cache entry
struct CacheEntry {
    names: Vec<String>,
    cached_at: Instant,
}

/// Blocking PTR lookups with caching
pub struct DnsLookup {
    resolver: Resolver,
    cache: RwLock<HashMap<IpAddr, CacheEntry>>,
    cache_ttl: Duration,
}

impl DnsLookup {
    /// Resolver from the system configuration, falling back to public defaults
    pub fn new() -> Result<Self> {
        let resolver = match Resolver::from_system_conf() {
            Ok(resolver) => resolver,
            Err(e) => {
                tracing::warn!(error = %e, "system resolver config unavailable, using defaults");
                Resolver::new(ResolverConfig::default(), ResolverOpts::default())?
            }
        };

        Ok(Self {
            resolver,
            cache: RwLock::new(HashMap::new()),
            cache_ttl: Duration::from_secs(3600), // 1 hour
        })
    }

    fn lookup(&self, ip: IpAddr) -> Vec<String> {
        match self.resolver.reverse_lookup(ip) {
            Ok(lookup) => lookup
                .iter()
                .map(|name| clean_name(&name.to_string()))
                .filter(|name| !name.is_empty())
                .collect(),
            Err(e) => {
                tracing::debug!(%ip, error = %e, "reverse lookup failed");
                Vec::new()
            }
        }
    }
}

impl ReverseDns for DnsLookup {
    fn reverse_names(&self, ip: IpAddr) -> Vec<String> {
        // Check cache first
        {
            let cache = self.cache.read();
            if let Some(entry) = cache.get(&ip)
                && entry.cached_at.elapsed() < self.cache_ttl
            {
                return entry.names.clone();
            }
        }

        let names = self.lookup(ip);

        self.cache.write().insert(
            ip,
            CacheEntry {
                names: names.clone(),
                cached_at: Instant::now(),
            },
        );

        names
    }
}

/// Drop the trailing root dot and any control characters
fn clean_name(raw: &str) -> String {
    sanitize_display(raw.trim_end_matches('.'))
}
