//! Cloudflare v4 REST and GraphQL client.

use crate::config::Config;
use crate::error::Error;
use crate::provider::{AnalyticsSummary, DnsProvider, DnsRecord, NewDnsRecord, Zone};
use serde::Deserialize;
use serde_json::json;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::{debug, error};

const PER_PAGE: &str = "100";

const ZONE_ANALYTICS_QUERY: &str = r#"
query ZoneAnalytics($zoneTag: String!, $since: Time!, $until: Time!) {
  viewer {
    zones(filter: { zoneTag: $zoneTag }) {
      totalRequestsAndBytes: httpRequestsAdaptiveGroups(
        filter: { datetime_geq: $since, datetime_lt: $until },
        limit: 1
      ) {
        count
        sum { edgeResponseBytes }
      }
      cachedRequestsAndBytes: httpRequestsAdaptiveGroups(
        filter: { datetime_geq: $since, datetime_lt: $until, cacheStatus: "hit" },
        limit: 1
      ) {
        count
        sum { edgeResponseBytes }
      }
    }
  }
}"#;

/// A [`DnsProvider`] backed by the Cloudflare API, authenticated with a bearer API token.
#[derive(Debug, Clone)]
#[allow(clippy::module_name_repetitions)]
pub struct CloudflareClient {
    http: reqwest::Client,
    base: String,
    token: String,
    account_id: String,
}

#[derive(Deserialize, Debug)]
struct Envelope<T> {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    errors: Vec<ApiMessage>,
    result: Option<T>,
}

#[derive(Deserialize, Debug)]
struct ApiMessage {
    code: i64,
    message: String,
}

#[derive(Deserialize, Debug)]
struct GraphQlResponse {
    data: Option<AnalyticsData>,
    errors: Option<Vec<serde_json::Value>>,
}

#[derive(Deserialize, Debug)]
struct AnalyticsData {
    viewer: Viewer,
}

#[derive(Deserialize, Debug)]
struct Viewer {
    #[serde(default)]
    zones: Vec<ZoneGroups>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ZoneGroups {
    #[serde(default)]
    total_requests_and_bytes: Vec<Group>,
    #[serde(default)]
    cached_requests_and_bytes: Vec<Group>,
}

#[derive(Deserialize, Debug, Default)]
struct Group {
    #[serde(default)]
    count: u64,
    #[serde(default)]
    sum: GroupSum,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
struct GroupSum {
    #[serde(default)]
    edge_response_bytes: u64,
}

impl ZoneGroups {
    fn summary(&self) -> AnalyticsSummary {
        let total = self.total_requests_and_bytes.first();
        let cached = self.cached_requests_and_bytes.first();
        AnalyticsSummary {
            total_requests: total.map_or(0, |g| g.count),
            cached_requests: cached.map_or(0, |g| g.count),
            total_bytes: total.map_or(0, |g| g.sum.edge_response_bytes),
            cached_bytes: cached.map_or(0, |g| g.sum.edge_response_bytes),
        }
    }
}

/// Join the provider's error list as `(code: N) message, ...`, falling back to the HTTP status.
fn describe_errors(errors: &[ApiMessage], status: reqwest::StatusCode) -> String {
    if errors.is_empty() {
        return format!("HTTP {}", status.as_u16());
    }
    errors
        .iter()
        .map(|e| format!("(code: {}) {}", e.code, e.message))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The `[since, until)` window covering the 24 hours before `until`, in RFC 3339.
fn last_day_window(until: OffsetDateTime) -> Result<(String, String), time::error::Format> {
    let since = until - time::Duration::hours(24);
    Ok((since.format(&Rfc3339)?, until.format(&Rfc3339)?))
}

impl CloudflareClient {
    /// Build a client for the configured API token, account and API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Http`] if the underlying HTTP client can't be constructed.
    pub fn new(config: &Config) -> Result<Self, Error> {
        let http = reqwest::Client::builder()
            .timeout(config.http_timeout)
            .build()?;
        Ok(Self {
            http,
            base: config.cloudflare_api_base.trim_end_matches('/').to_string(),
            token: config.cloudflare_api_token.clone(),
            account_id: config.cloudflare_account_id.clone(),
        })
    }

    async fn get_list<T>(
        &self,
        operation: &'static str,
        url: String,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, Error>
    where
        T: for<'de> Deserialize<'de>,
    {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Cloudflare API error ({operation}): {status} {body}");
            return Err(Error::Provider { operation, status });
        }
        let envelope: Envelope<Vec<T>> = response.json().await?;
        Ok(envelope.result.unwrap_or_default())
    }
}

#[async_trait::async_trait]
impl DnsProvider for CloudflareClient {
    async fn list_zones(&self) -> Result<Vec<Zone>, Error> {
        if self.account_id.is_empty() {
            error!("Cloudflare account ID is not configured");
            return Ok(Vec::new());
        }
        self.get_list(
            "list zones",
            format!("{}/zones", self.base),
            &[
                ("account.id", self.account_id.as_str()),
                ("per_page", PER_PAGE),
                ("status", "active"),
            ],
        )
        .await
    }

    async fn list_dns_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>, Error> {
        self.get_list(
            "list DNS records",
            format!("{}/zones/{zone_id}/dns_records", self.base),
            &[("per_page", PER_PAGE)],
        )
        .await
    }

    async fn create_dns_record(
        &self,
        zone_id: &str,
        record: &NewDnsRecord,
    ) -> Result<DnsRecord, Error> {
        let response = self
            .http
            .post(format!("{}/zones/{zone_id}/dns_records", self.base))
            .bearer_auth(&self.token)
            .json(record)
            .send()
            .await?;
        let status = response.status();
        let envelope: Envelope<DnsRecord> = response.json().await?;
        match envelope {
            Envelope {
                success: true,
                result: Some(created),
                ..
            } if status.is_success() => {
                debug!("created {} record {}", created.record_type, created.name);
                Ok(created)
            }
            Envelope { errors, .. } => {
                let reason = describe_errors(&errors, status);
                error!("Cloudflare API error (create DNS record): {reason}");
                Err(Error::RecordRejected(reason))
            }
        }
    }

    async fn zone_analytics(&self, zone_id: &str) -> Result<Option<AnalyticsSummary>, Error> {
        let (since, until) = last_day_window(OffsetDateTime::now_utc())?;
        let body = json!({
            "query": ZONE_ANALYTICS_QUERY,
            "variables": { "zoneTag": zone_id, "since": since, "until": until },
        });
        let response = self
            .http
            .post(format!("{}/graphql", self.base))
            .bearer_auth(&self.token)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("GraphQL API error (zone analytics): {status} {body}");
            return Err(Error::Provider {
                operation: "zone analytics",
                status,
            });
        }

        let graphql: GraphQlResponse = response.json().await?;
        if let Some(errors) = graphql.errors.filter(|e| !e.is_empty()) {
            error!("GraphQL query errors (zone analytics): {errors:?}");
            return Ok(None);
        }
        let summary = graphql
            .data
            .and_then(|d| d.viewer.zones.into_iter().next())
            .map(|zone| zone.summary());
        if summary.is_none() {
            error!("no zone data in GraphQL analytics response for {zone_id}");
        }
        Ok(summary)
    }
}
