//! Discovery adapters — the two interchangeable candidate sources.
//!
//! The structured adapter returns fully parsed articles in one call. The web
//! adapter returns bare URLs from a search and pays a second network call per
//! new URL to fetch content; that cost is why dedup and outlet filtering run
//! before any scrape. Both adapters are best-effort: a provider failure is a
//! per-topic error, never a sweep abort.

use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rand::Rng;
use tokio::time::Instant;
use tracing::{info, warn};

use eventregistry_client::EventRegistryClient;
use firecrawl_client::FirecrawlClient;
use presswatch_common::{Candidate, ClusterHint, DiscoverySource};

/// Minimum spacing between successive scrape calls to the same provider.
/// An external rate-limit constraint, not a tunable.
const SCRAPE_SPACING: Duration = Duration::from_millis(1200);

/// Max attempts for a scrape call. Retries get a fixed backoff plus jitter.
const SCRAPE_MAX_ATTEMPTS: u32 = 2;
const SCRAPE_RETRY_BASE: Duration = Duration::from_secs(2);

/// A bare search result from the web adapter, before scraping.
#[derive(Debug, Clone)]
pub struct UrlResult {
    pub url: String,
    pub title: String,
    pub snippet: String,
}

/// Content fetched for one URL on the scrape path.
#[derive(Debug, Clone)]
pub struct ScrapedPage {
    pub html: String,
    pub markdown: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
}

#[async_trait]
pub trait ContentDiscovery: Send + Sync {
    /// One call against the structured provider: already-parsed articles.
    async fn search_structured(&self, query: &str, limit: u32) -> Result<Vec<Candidate>>;

    /// Web search returning bare URLs; content requires `scrape`.
    async fn search_web(&self, query: &str, limit: u32) -> Result<Vec<UrlResult>>;

    /// Fetch and extract one page. Callers must have passed the dedup and
    /// outlet checks first.
    async fn scrape(&self, url: &str) -> Result<ScrapedPage>;
}

/// Serializes scrape calls and enforces the minimum inter-call spacing.
pub struct RateGate {
    spacing: Duration,
    last: tokio::sync::Mutex<Option<Instant>>,
}

impl RateGate {
    pub fn new(spacing: Duration) -> Self {
        Self {
            spacing,
            last: tokio::sync::Mutex::new(None),
        }
    }

    /// Wait until the spacing since the previous call has elapsed. The lock
    /// is held across the sleep so concurrent callers queue up.
    pub async fn wait(&self) {
        let mut last = self.last.lock().await;
        if let Some(prev) = *last {
            let elapsed = prev.elapsed();
            if elapsed < self.spacing {
                tokio::time::sleep(self.spacing - elapsed).await;
            }
        }
        *last = Some(Instant::now());
    }
}

/// Production discovery over the two provider clients. Either client may be
/// absent (unconfigured); its adapter then returns no candidates.
pub struct ProviderDiscovery {
    structured: Option<EventRegistryClient>,
    web: Option<FirecrawlClient>,
    scrape_gate: RateGate,
}

impl ProviderDiscovery {
    pub fn new(structured: Option<EventRegistryClient>, web: Option<FirecrawlClient>) -> Self {
        if structured.is_none() {
            warn!("EVENT_REGISTRY_API_KEY not set, structured discovery disabled");
        }
        if web.is_none() {
            warn!("FIRECRAWL_API_KEY not set, web discovery disabled");
        }
        Self {
            structured,
            web,
            scrape_gate: RateGate::new(SCRAPE_SPACING),
        }
    }
}

#[async_trait]
impl ContentDiscovery for ProviderDiscovery {
    async fn search_structured(&self, query: &str, limit: u32) -> Result<Vec<Candidate>> {
        let Some(client) = &self.structured else {
            return Ok(Vec::new());
        };

        let articles = client
            .search_articles(query, limit)
            .await
            .context("Structured article search failed")?;

        let candidates: Vec<Candidate> = articles.iter().map(candidate_from_article).collect();
        info!(query, count = candidates.len(), "Structured discovery complete");
        Ok(candidates)
    }

    async fn search_web(&self, query: &str, limit: u32) -> Result<Vec<UrlResult>> {
        let Some(client) = &self.web else {
            return Ok(Vec::new());
        };

        let hits = client
            .search(query, limit)
            .await
            .context("Web search failed")?;

        Ok(hits
            .into_iter()
            .filter(|h| !h.url.is_empty())
            .map(|h| UrlResult {
                url: h.url,
                title: h.title,
                snippet: h.description,
            })
            .collect())
    }

    async fn scrape(&self, url: &str) -> Result<ScrapedPage> {
        let Some(client) = &self.web else {
            anyhow::bail!("Scrape provider not configured");
        };

        for attempt in 0..SCRAPE_MAX_ATTEMPTS {
            self.scrape_gate.wait().await;

            match client.scrape(url).await {
                Ok(doc) => {
                    return Ok(ScrapedPage {
                        published_at: doc
                            .metadata
                            .published_time
                            .as_deref()
                            .and_then(parse_timestamp),
                        title: doc.metadata.title.clone(),
                        author: doc.metadata.author.clone(),
                        html: doc.html,
                        markdown: doc.markdown,
                    });
                }
                Err(e) if attempt + 1 < SCRAPE_MAX_ATTEMPTS => {
                    let jitter = Duration::from_millis(rand::rng().random_range(0..1000));
                    warn!(url, attempt = attempt + 1, error = %e, "Scrape failed, retrying after backoff");
                    tokio::time::sleep(SCRAPE_RETRY_BASE + jitter).await;
                }
                Err(e) => return Err(e).context("Scrape failed"),
            }
        }

        unreachable!("scrape retry loop always returns")
    }
}

/// Map a structured-provider article to a Candidate. The continuous sentiment
/// score rides along raw; the dead-band mapping happens at persistence.
fn candidate_from_article(article: &eventregistry_client::Article) -> Candidate {
    let excerpt: String = article.body.chars().take(500).collect();
    Candidate {
        url: article.url.clone(),
        title: article.title.clone(),
        excerpt,
        body: (!article.body.is_empty()).then(|| article.body.clone()),
        raw_html: None,
        provider_sentiment: article.sentiment,
        cluster_hint: ClusterHint {
            event_id: article.event_uri.clone(),
            is_duplicate: article.is_duplicate,
        },
        published_at: article.date_time_pub.as_deref().and_then(parse_timestamp),
        authors: article
            .authors
            .iter()
            .map(|a| a.name.clone())
            .filter(|n| !n.is_empty())
            .collect(),
        source: DiscoverySource::Structured,
    }
}

/// Best-effort timestamp parse. Unparseable dates are simply dropped; the
/// mention defaults to its discovery time.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Some(naive.and_utc());
    }
    if let Ok(date) = chrono::NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_timestamp_rfc3339() {
        let dt = parse_timestamp("2026-03-01T08:30:00Z").unwrap();
        assert_eq!(dt.to_rfc3339(), "2026-03-01T08:30:00+00:00");
    }

    #[test]
    fn parse_timestamp_naive_and_date_only() {
        assert!(parse_timestamp("2026-03-01T08:30:00").is_some());
        assert!(parse_timestamp("2026-03-01").is_some());
    }

    #[test]
    fn parse_timestamp_garbage_is_none() {
        assert!(parse_timestamp("last tuesday").is_none());
        assert!(parse_timestamp("").is_none());
    }

    #[tokio::test]
    async fn rate_gate_spaces_calls() {
        let gate = RateGate::new(Duration::from_millis(50));
        let start = Instant::now();
        gate.wait().await;
        gate.wait().await;
        gate.wait().await;
        // Two gaps of at least 50ms each after the free first call.
        assert!(start.elapsed() >= Duration::from_millis(100));
    }

    #[tokio::test]
    async fn rate_gate_first_call_is_free() {
        let gate = RateGate::new(Duration::from_secs(5));
        let start = Instant::now();
        gate.wait().await;
        assert!(start.elapsed() < Duration::from_millis(100));
    }
}
