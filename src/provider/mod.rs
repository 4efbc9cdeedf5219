//! DNS provider access.
//!
//! The [`DnsProvider`] trait is the seam between the [event router][crate::bot] and the
//! provider's HTTP APIs. [`cloudflare::CloudflareClient`] implements it against the Cloudflare
//! v4 REST API and its GraphQL analytics endpoint.

use crate::error::Error;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub mod cloudflare;

pub use cloudflare::CloudflareClient;

/// `DynProvider` is a shared handle to a [`DnsProvider`] used by concurrent webhook deliveries.
pub type DynProvider = Arc<dyn DnsProvider + Send + Sync>;

/// TTL value the provider treats as "automatic".
pub const AUTO_TTL: u32 = 1;

/// A DNS zone managed under the provider account.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Zone {
    pub id: String,
    pub name: String,
}

/// A DNS record as returned by the provider.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct DnsRecord {
    #[serde(default)]
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub content: String,
    #[serde(default)]
    pub proxied: bool,
    pub ttl: u32,
}

/// Body of a record creation request.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct NewDnsRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub content: String,
    pub ttl: u32,
    pub proxied: bool,
}

/// Request and byte totals for a zone over the last 24 hours.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnalyticsSummary {
    pub total_requests: u64,
    pub cached_requests: u64,
    pub total_bytes: u64,
    pub cached_bytes: u64,
}

/// Operations the bot performs against a DNS provider. Every call is a single request; no
/// implementation is expected to retry.
#[async_trait::async_trait]
pub trait DnsProvider {
    /// List the active zones of the configured account (first 100).
    async fn list_zones(&self) -> Result<Vec<Zone>, Error>;

    /// List the DNS records of a zone (first 100) in the order the provider returns them.
    async fn list_dns_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, Error>;

    /// Create a record, returning it as stored by the provider.
    ///
    /// Refusals by the provider are reported as [`Error::RecordRejected`].
    async fn create_dns_record(
        &self,
        zone_id: &str,
        record: &NewDnsRecord,
    ) -> Result<DnsRecord, Error>;

    /// Aggregate the last 24 hours of traffic for a zone. `Ok(None)` when the provider has no
    /// data for the zone or the query was refused.
    async fn zone_analytics(&self, zone_id: &str) -> Result<Option<AnalyticsSummary>, Error>;
}
