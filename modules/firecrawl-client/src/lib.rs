pub mod error;

pub use error::{FirecrawlError, Result};

use std::time::Duration;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct SearchHit {
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    data: Vec<SearchHit>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageMetadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub published_time: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapedDocument {
    #[serde(default)]
    pub markdown: String,
    #[serde(default)]
    pub html: String,
    #[serde(default)]
    pub metadata: PageMetadata,
}

#[derive(Debug, Clone, Deserialize)]
struct ScrapeResponse {
    data: ScrapedDocument,
}

pub struct FirecrawlClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl FirecrawlClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Web search. Returns bare URL results; content requires a scrape call.
    pub async fn search(&self, query: &str, limit: u32) -> Result<Vec<SearchHit>> {
        tracing::info!(query, limit, "Firecrawl search");

        let body = serde_json::json!({
            "query": query,
            "limit": limit,
        });

        let resp = self
            .client
            .post(format!("{}/v1/search", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(FirecrawlError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: SearchResponse = resp.json().await?;
        tracing::info!(query, count = data.data.len(), "Firecrawl search complete");
        Ok(data.data)
    }

    /// Fetch and extract one page: rendered HTML, markdown main content,
    /// and page metadata.
    pub async fn scrape(&self, url: &str) -> Result<ScrapedDocument> {
        tracing::info!(url, "Firecrawl scrape");

        let body = serde_json::json!({
            "url": url,
            "formats": ["markdown", "html"],
        });

        let resp = self
            .client
            .post(format!("{}/v1/scrape", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(FirecrawlError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let data: ScrapeResponse = resp.json().await?;
        tracing::info!(url, bytes = data.data.markdown.len(), "Scraped successfully");
        Ok(data.data)
    }
}
