//! Injectable interfaces the sweep depends on. Production wires Postgres and
//! Claude; tests wire in-memory fakes.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use presswatch_common::{Journalist, Mention, Sentiment, Topic};

/// Result of a mention insert. Duplicate-key conflicts are a success no-op,
/// not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted(Uuid),
    Duplicate,
}

#[async_trait]
pub trait MentionStore: Send + Sync {
    async fn active_topics(&self) -> Result<Vec<Topic>>;

    /// All URLs already persisted for a topic. Loaded once per topic-sweep
    /// and checked before any scrape call is paid for.
    async fn known_urls(&self, topic_id: Uuid) -> Result<HashSet<String>>;

    async fn insert_mention(&self, mention: &Mention) -> Result<InsertOutcome>;

    /// Mentions for a topic discovered since `since`, oldest first. Used by
    /// story clustering.
    async fn recent_mentions(&self, topic_id: Uuid, since: DateTime<Utc>) -> Result<Vec<Mention>>;

    async fn set_story(&self, mention_id: Uuid, cluster: Uuid, first_seen: bool) -> Result<()>;

    async fn set_sentiment(&self, mention_id: Uuid, sentiment: Sentiment) -> Result<()>;

    async fn set_journalist(&self, mention_id: Uuid, journalist_id: Uuid) -> Result<()>;

    async fn find_journalist(&self, name: &str, outlet: &str) -> Result<Option<Journalist>>;

    /// Write a journalist profile keyed by (name, outlet). The caller has
    /// already merged new data into the profile.
    async fn upsert_journalist(&self, journalist: &Journalist) -> Result<Uuid>;
}

/// Binary topical relevance. Errors are a transport concern; the sweep fails
/// open on them.
#[async_trait]
pub trait RelevanceClassifier: Send + Sync {
    async fn is_relevant(&self, topic_description: &str, title: &str, text: &str) -> Result<bool>;
}

/// Sentiment classification. Errors degrade to the keyword fallback at the
/// call site.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, topic_name: &str, title: &str, text: &str) -> Result<Sentiment>;
}
