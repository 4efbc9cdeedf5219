//! Read-through cache of the account's zone list.
//!
//! The whole list is refreshed at once when it is older than the configured TTL or empty;
//! entries never expire individually. Concurrent refreshes are harmless, the last one to
//! finish wins.

use crate::provider::{DynProvider, Zone};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

struct CacheState {
    zones: Arc<[Zone]>,
    refreshed_at: Option<Instant>,
}

impl Default for CacheState {
    fn default() -> Self {
        Self {
            zones: Arc::from(Vec::new()),
            refreshed_at: None,
        }
    }
}

impl CacheState {
    fn is_fresh(&self, ttl: Duration) -> bool {
        !self.zones.is_empty() && self.refreshed_at.map_or(false, |at| at.elapsed() <= ttl)
    }
}

pub struct ZoneCache {
    provider: DynProvider,
    ttl: Duration,
    state: RwLock<CacheState>,
}

impl ZoneCache {
    pub fn new(provider: DynProvider, ttl: Duration) -> Self {
        Self {
            provider,
            ttl,
            state: RwLock::default(),
        }
    }

    /// The cached zone list, refreshed first if stale or empty.
    pub async fn zones(&self) -> Arc<[Zone]> {
        {
            let state = self.state.read().await;
            if state.is_fresh(self.ttl) {
                return Arc::clone(&state.zones);
            }
        }
        self.refresh().await
    }

    /// Fetch the zone list from the provider unconditionally. A failed fetch is logged and
    /// cached as an empty list, which the next access will retry.
    pub async fn refresh(&self) -> Arc<[Zone]> {
        tracing::debug!("refreshing zone cache");
        let zones: Arc<[Zone]> = match self.provider.list_zones().await {
            Ok(zones) => zones.into(),
            Err(err) => {
                tracing::error!("failed to fetch zones: {err}");
                Arc::from(Vec::new())
            }
        };
        let mut state = self.state.write().await;
        state.zones = Arc::clone(&zones);
        state.refreshed_at = Some(Instant::now());
        zones
    }

    /// Display name for a zone ID, or `(ID: <id>)` when the account has no such zone.
    pub async fn zone_name(&self, zone_id: &str) -> String {
        self.zones()
            .await
            .iter()
            .find(|z| z.id == zone_id)
            .map_or_else(|| format!("(ID: {zone_id})"), |z| z.name.clone())
    }

    /// Find a zone by exact name. A miss forces one refresh so zones added since the last
    /// refresh are found.
    pub async fn find_by_name(&self, name: &str) -> Option<Zone> {
        let lookup = |zones: &[Zone]| zones.iter().find(|z| z.name == name).cloned();
        if let Some(zone) = lookup(&self.zones().await) {
            return Some(zone);
        }
        lookup(&self.refresh().await)
    }
}
