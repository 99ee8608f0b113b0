//! In-memory MentionStore for tests. Mirrors the Postgres semantics that
//! matter to the sweep: (topic_id, url) uniqueness as a no-op duplicate,
//! oldest-first recent mentions, (name, outlet) journalist identity.

use std::collections::HashSet;
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use presswatch_common::{Journalist, Mention, Sentiment, Topic};

use crate::traits::{InsertOutcome, MentionStore};

#[derive(Default)]
struct Inner {
    topics: Vec<Topic>,
    mentions: Vec<Mention>,
    journalists: Vec<Journalist>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_topic(&self, topic: Topic) {
        self.inner.lock().expect("store lock").topics.push(topic);
    }

    /// Snapshot of all mentions, for assertions.
    pub fn mentions(&self) -> Vec<Mention> {
        self.inner.lock().expect("store lock").mentions.clone()
    }

    /// Snapshot of all journalists, for assertions.
    pub fn journalists(&self) -> Vec<Journalist> {
        self.inner.lock().expect("store lock").journalists.clone()
    }
}

#[async_trait]
impl MentionStore for MemoryStore {
    async fn active_topics(&self) -> Result<Vec<Topic>> {
        let inner = self.inner.lock().expect("store lock");
        Ok(inner.topics.iter().filter(|t| t.active).cloned().collect())
    }

    async fn known_urls(&self, topic_id: Uuid) -> Result<HashSet<String>> {
        let inner = self.inner.lock().expect("store lock");
        Ok(inner
            .mentions
            .iter()
            .filter(|m| m.topic_id == topic_id)
            .map(|m| m.url.clone())
            .collect())
    }

    async fn insert_mention(&self, mention: &Mention) -> Result<InsertOutcome> {
        let mut inner = self.inner.lock().expect("store lock");
        if inner
            .mentions
            .iter()
            .any(|m| m.topic_id == mention.topic_id && m.url == mention.url)
        {
            return Ok(InsertOutcome::Duplicate);
        }
        inner.mentions.push(mention.clone());
        Ok(InsertOutcome::Inserted(mention.id))
    }

    async fn recent_mentions(&self, topic_id: Uuid, since: DateTime<Utc>) -> Result<Vec<Mention>> {
        let inner = self.inner.lock().expect("store lock");
        let mut recent: Vec<Mention> = inner
            .mentions
            .iter()
            .filter(|m| m.topic_id == topic_id && m.discovered_at >= since)
            .cloned()
            .collect();
        recent.sort_by_key(|m| m.discovered_at);
        Ok(recent)
    }

    async fn set_story(&self, mention_id: Uuid, cluster: Uuid, first_seen: bool) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock");
        let mention = inner
            .mentions
            .iter_mut()
            .find(|m| m.id == mention_id)
            .ok_or_else(|| anyhow!("no mention {mention_id}"))?;
        mention.story_cluster = Some(cluster);
        mention.first_seen_for_story = first_seen;
        Ok(())
    }

    async fn set_sentiment(&self, mention_id: Uuid, sentiment: Sentiment) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock");
        let mention = inner
            .mentions
            .iter_mut()
            .find(|m| m.id == mention_id)
            .ok_or_else(|| anyhow!("no mention {mention_id}"))?;
        mention.sentiment = sentiment;
        Ok(())
    }

    async fn set_journalist(&self, mention_id: Uuid, journalist_id: Uuid) -> Result<()> {
        let mut inner = self.inner.lock().expect("store lock");
        let mention = inner
            .mentions
            .iter_mut()
            .find(|m| m.id == mention_id)
            .ok_or_else(|| anyhow!("no mention {mention_id}"))?;
        mention.journalist_id = Some(journalist_id);
        Ok(())
    }

    async fn find_journalist(&self, name: &str, outlet: &str) -> Result<Option<Journalist>> {
        let inner = self.inner.lock().expect("store lock");
        Ok(inner
            .journalists
            .iter()
            .find(|j| j.name == name && j.outlet == outlet)
            .cloned())
    }

    async fn upsert_journalist(&self, journalist: &Journalist) -> Result<Uuid> {
        let mut inner = self.inner.lock().expect("store lock");
        if let Some(existing) = inner
            .journalists
            .iter_mut()
            .find(|j| j.name == journalist.name && j.outlet == journalist.outlet)
        {
            let id = existing.id;
            *existing = Journalist {
                id,
                ..journalist.clone()
            };
            return Ok(id);
        }
        inner.journalists.push(journalist.clone());
        Ok(journalist.id)
    }
}
