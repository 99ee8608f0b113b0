pub mod error;
pub mod types;

pub use error::{EventRegistryError, Result};
pub use types::{Article, Author, GetArticlesResponse, Source};

use types::GetArticlesRequest;

const BASE_URL: &str = "https://eventregistry.org/api/v1";

pub struct EventRegistryClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl EventRegistryClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: BASE_URL.to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Search articles by keyword expression. Results come back fully parsed:
    /// title, body, sentiment, authors, event id, publish time.
    pub async fn search_articles(&self, query: &str, limit: u32) -> Result<Vec<Article>> {
        tracing::info!(query, limit, "Event Registry article search");

        let input = GetArticlesRequest {
            action: "getArticles".to_string(),
            keyword: query.to_string(),
            keyword_oper: "or".to_string(),
            lang: "eng".to_string(),
            articles_count: limit,
            articles_sort_by: "date".to_string(),
            include_article_sentiment: true,
            include_article_event_uri: true,
            include_article_duplicate_list: true,
            api_key: self.api_key.clone(),
        };

        let url = format!("{}/article/getArticles", self.base_url);
        let resp = self.client.post(&url).json(&input).send().await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EventRegistryError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let api_resp: GetArticlesResponse = resp.json().await?;
        tracing::info!(
            query,
            count = api_resp.articles.results.len(),
            total = api_resp.articles.total_results,
            "Event Registry search complete"
        );

        Ok(api_resp.articles.results)
    }
}
