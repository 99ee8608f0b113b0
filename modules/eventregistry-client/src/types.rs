use serde::{Deserialize, Serialize};

/// Request body for the getArticles endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetArticlesRequest {
    pub action: String,
    pub keyword: String,
    pub keyword_oper: String,
    pub lang: String,
    pub articles_count: u32,
    pub articles_sort_by: String,
    pub include_article_sentiment: bool,
    pub include_article_event_uri: bool,
    pub include_article_duplicate_list: bool,
    pub api_key: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GetArticlesResponse {
    #[serde(default)]
    pub articles: ArticlePage,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticlePage {
    #[serde(default)]
    pub results: Vec<Article>,
    #[serde(default)]
    pub total_results: u64,
}

/// One article as returned by the provider. Sentiment is a continuous score
/// in [-1, 1]; event_uri groups articles covering the same event.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    #[serde(default)]
    pub uri: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub date_time_pub: Option<String>,
    #[serde(default)]
    pub sentiment: Option<f64>,
    #[serde(default)]
    pub event_uri: Option<String>,
    #[serde(default)]
    pub is_duplicate: bool,
    #[serde(default)]
    pub authors: Vec<Author>,
    #[serde(default)]
    pub source: Option<Source>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Author {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Source {
    #[serde(default)]
    pub title: String,
}
