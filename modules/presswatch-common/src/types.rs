use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// --- Topics ---

/// A user-defined monitoring target. Created and edited outside the pipeline;
/// the sweep only reads topics and reports per-topic results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: Uuid,
    pub name: String,
    /// Two-letter jurisdiction code, e.g. "CA". Optional for federal topics.
    pub state: Option<String>,
    /// Ordered free-text keywords.
    pub keywords: Vec<String>,
    /// External bill identifiers, e.g. "SB-253".
    pub bill_numbers: Vec<String>,
    pub active: bool,
}

impl Topic {
    /// A topic with no keywords and no bill identifiers cannot produce a
    /// useful query and is skipped by the sweep.
    pub fn is_searchable(&self) -> bool {
        !self.keywords.is_empty() || !self.bill_numbers.is_empty()
    }
}

// --- Discovery ---

/// Which adapter surfaced a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoverySource {
    Structured,
    WebSearch,
}

/// Clustering information a discovery provider may supply. Both adapters
/// produce this shape so the clustering engine has a single code path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterHint {
    /// Provider-supplied event identifier, if any.
    pub event_id: Option<String>,
    /// Provider flagged this article as a duplicate of an existing one.
    pub is_duplicate: bool,
}

/// A URL surfaced by discovery, before persistence. Transient: either
/// promoted to a Mention or discarded during the sweep.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub url: String,
    pub title: String,
    pub excerpt: String,
    pub body: Option<String>,
    /// Raw page HTML. Only present on the scrape path.
    pub raw_html: Option<String>,
    /// Continuous sentiment score from the structured provider, in [-1, 1].
    pub provider_sentiment: Option<f64>,
    pub cluster_hint: ClusterHint,
    pub published_at: Option<DateTime<Utc>>,
    /// Author names from structured provider metadata.
    pub authors: Vec<String>,
    pub source: DiscoverySource,
}

// --- Mentions ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Unscored,
}

impl Sentiment {
    /// Numeric value used for journalist running averages.
    pub fn score(&self) -> f64 {
        match self {
            Sentiment::Positive => 1.0,
            Sentiment::Negative => -1.0,
            Sentiment::Neutral | Sentiment::Unscored => 0.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Unscored => "unscored",
        }
    }

    /// Parse a classifier label. Anything outside the enum maps to Neutral.
    pub fn parse_label(label: &str) -> Sentiment {
        match label.trim().to_lowercase().as_str() {
            "positive" => Sentiment::Positive,
            "negative" => Sentiment::Negative,
            _ => Sentiment::Neutral,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One persisted article for a topic. (topic_id, url) is unique; rediscovery
/// of the same URL is a no-op, not a new row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Mention {
    pub id: Uuid,
    pub topic_id: Uuid,
    pub url: String,
    pub title: String,
    /// Domain the article was published on.
    pub outlet: String,
    pub excerpt: String,
    pub content: Option<String>,
    pub sentiment: Sentiment,
    /// When the pipeline found the article.
    pub discovered_at: DateTime<Utc>,
    /// Best-effort publish time; defaults to discovered_at.
    pub published_at: DateTime<Utc>,
    /// Points at the first mention of this story, set by clustering.
    pub story_cluster: Option<Uuid>,
    pub first_seen_for_story: bool,
    pub journalist_id: Option<Uuid>,
    /// Provider event identifier carried through for event-id clustering.
    pub event_id: Option<String>,
}

impl Mention {
    /// Build an unclustered, unattributed mention from a surviving candidate.
    pub fn from_candidate(topic_id: Uuid, candidate: &Candidate, sentiment: Sentiment) -> Self {
        let now = Utc::now();
        Mention {
            id: Uuid::new_v4(),
            topic_id,
            url: candidate.url.clone(),
            title: candidate.title.clone(),
            outlet: crate::urls::extract_domain(&candidate.url),
            excerpt: candidate.excerpt.clone(),
            content: candidate.body.clone(),
            sentiment,
            discovered_at: now,
            published_at: candidate.published_at.unwrap_or(now),
            story_cluster: None,
            first_seen_for_story: false,
            journalist_id: None,
            event_id: candidate.cluster_hint.event_id.clone(),
        }
    }
}

// --- Journalists ---

/// Contact details extracted from an article page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Byline {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
}

/// Cross-topic identity keyed by (name, outlet). Contact fields are filled
/// when null and never overwritten; the sentiment average is an incremental
/// mean, not recomputed from raw samples.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journalist {
    pub id: Uuid,
    pub name: String,
    pub outlet: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub twitter: Option<String>,
    pub linkedin: Option<String>,
    pub article_count: i64,
    pub avg_sentiment: f64,
    /// Broad beat categories, deduplicated.
    pub beats: Vec<String>,
    pub last_article_at: DateTime<Utc>,
}
