//! The sweep orchestrator — one pass across all active topics.
//!
//! Topics advance independently; one topic failing never blocks the rest.
//! Per topic the structured adapter runs before the web adapter (the cheaper,
//! richer source first), and per candidate the follow-up steps — clustering,
//! byline attribution, sentiment — are each best effort: their failure is
//! counted and logged, the mention row stays.

use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};
use uuid::Uuid;

use presswatch_common::{
    extract_domain, sanitize_url, Candidate, ClusterHint, DiscoverySource, Mention, Sentiment,
    Topic,
};

use crate::byline;
use crate::cluster::{self, StoryAssignment, CLUSTER_WINDOW_HOURS};
use crate::dedup::SweepDedup;
use crate::discovery::{ContentDiscovery, UrlResult};
use crate::journalist;
use crate::outlet;
use crate::query;
use crate::relevance::MIN_RELEVANCE_TEXT;
use crate::sentiment::{self, keyword_sentiment};
use crate::traits::{InsertOutcome, MentionStore, RelevanceClassifier, SentimentClassifier};

const STRUCTURED_RESULT_LIMIT: u32 = 25;
const WEB_RESULT_LIMIT: u32 = 10;

/// Where a topic-sweep currently is. Terminal states are Done and Failed;
/// a topic skipped for the sweep deadline never leaves Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SweepPhase {
    Idle,
    QueryBuilt,
    Discovering,
    Filtering,
    Persisting,
    Attributing,
    Scoring,
    Done,
    Failed,
}

#[derive(Debug)]
pub struct TopicReport {
    pub topic_id: Uuid,
    pub topic: String,
    pub phase: SweepPhase,
    /// Candidates surfaced by the providers.
    pub searched: u32,
    /// Candidates dropped by outlet filtering, dedup, or the relevance gate.
    pub skipped: u32,
    pub new_mentions: u32,
    /// Inserts that hit an existing (topic, url) row — a success no-op.
    pub duplicates: u32,
    pub cluster_failures: u32,
    pub byline_failures: u32,
    pub sentiment_failures: u32,
    /// Non-fatal provider and per-candidate errors.
    pub errors: Vec<String>,
    /// Set when the topic walk itself failed.
    pub error: Option<String>,
}

impl TopicReport {
    fn new(topic: &Topic) -> Self {
        Self {
            topic_id: topic.id,
            topic: topic.name.clone(),
            phase: SweepPhase::Idle,
            searched: 0,
            skipped: 0,
            new_mentions: 0,
            duplicates: 0,
            cluster_failures: 0,
            byline_failures: 0,
            sentiment_failures: 0,
            errors: Vec::new(),
            error: None,
        }
    }

    fn fail(mut self, error: String) -> Self {
        self.phase = SweepPhase::Failed;
        self.error = Some(error);
        self
    }
}

#[derive(Debug)]
pub struct SweepReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub topics: Vec<TopicReport>,
}

impl SweepReport {
    pub fn total_new_mentions(&self) -> u32 {
        self.topics.iter().map(|t| t.new_mentions).sum()
    }

    pub fn total_searched(&self) -> u32 {
        self.topics.iter().map(|t| t.searched).sum()
    }

    pub fn failed_topics(&self) -> usize {
        self.topics.iter().filter(|t| t.error.is_some()).count()
    }
}

impl std::fmt::Display for SweepReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Sweep Complete ===")?;
        writeln!(f, "Topics swept:   {}", self.topics.len())?;
        writeln!(f, "Topics failed:  {}", self.failed_topics())?;
        writeln!(f, "Candidates:     {}", self.total_searched())?;
        writeln!(f, "New mentions:   {}", self.total_new_mentions())?;
        writeln!(
            f,
            "Duration:       {}s",
            (self.finished_at - self.started_at).num_seconds()
        )?;
        for t in &self.topics {
            writeln!(
                f,
                "  {}: searched={} skipped={} new={} dup={}{}",
                t.topic,
                t.searched,
                t.skipped,
                t.new_mentions,
                t.duplicates,
                t.error
                    .as_deref()
                    .map(|e| format!(" error={e}"))
                    .unwrap_or_default()
            )?;
        }
        Ok(())
    }
}

pub struct Sweeper {
    discovery: Arc<dyn ContentDiscovery>,
    relevance: Arc<dyn RelevanceClassifier>,
    sentiment: Arc<dyn SentimentClassifier>,
    store: Arc<dyn MentionStore>,
    topic_concurrency: usize,
    deadline: Option<DateTime<Utc>>,
}

impl Sweeper {
    pub fn new(
        discovery: Arc<dyn ContentDiscovery>,
        relevance: Arc<dyn RelevanceClassifier>,
        sentiment: Arc<dyn SentimentClassifier>,
        store: Arc<dyn MentionStore>,
    ) -> Self {
        Self {
            discovery,
            relevance,
            sentiment,
            store,
            topic_concurrency: 4,
            deadline: None,
        }
    }

    pub fn with_topic_concurrency(mut self, concurrency: usize) -> Self {
        self.topic_concurrency = concurrency.max(1);
        self
    }

    /// Soft deadline. Checked only between topics: a running topic is always
    /// allowed to finish, and topics not yet started are skipped with a
    /// report entry.
    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Run one sweep over all active topics.
    pub async fn run(&self) -> Result<SweepReport> {
        let topics = self
            .store
            .active_topics()
            .await
            .context("Failed to load active topics")?;
        info!(topics = topics.len(), "Sweep starting");
        Ok(self.run_topics(&topics).await)
    }

    /// Run one sweep over an explicit topic list.
    pub async fn run_topics(&self, topics: &[Topic]) -> SweepReport {
        let started_at = Utc::now();

        let reports: Vec<TopicReport> = stream::iter(topics.iter().map(|topic| async move {
            if let Some(deadline) = self.deadline {
                if Utc::now() >= deadline {
                    warn!(topic = topic.name.as_str(), "Sweep deadline reached, topic deferred to next run");
                    let mut report = TopicReport::new(topic);
                    report.error = Some("sweep deadline reached".to_string());
                    return report;
                }
            }
            self.sweep_topic(topic).await
        }))
        .buffer_unordered(self.topic_concurrency)
        .collect()
        .await;

        let report = SweepReport {
            started_at,
            finished_at: Utc::now(),
            topics: reports,
        };
        info!("{report}");
        report
    }

    /// Walk one topic through the sweep. Never returns an error: every
    /// failure lands in the report.
    pub async fn sweep_topic(&self, topic: &Topic) -> TopicReport {
        let mut report = TopicReport::new(topic);

        if !topic.is_searchable() {
            info!(topic = topic.name.as_str(), "Topic has no searchable terms, skipping");
            return report.fail("topic has no searchable terms".to_string());
        }
        report.phase = SweepPhase::QueryBuilt;

        let known = match self.store.known_urls(topic.id).await {
            Ok(known) => known,
            Err(e) => {
                warn!(topic = topic.name.as_str(), error = %e, "Failed to load known URLs");
                return report.fail(format!("known URLs unavailable: {e:#}"));
            }
        };
        let dedup = SweepDedup::new(known);

        report.phase = SweepPhase::Discovering;

        // Structured provider first: one call, fully parsed articles.
        if let Some(q) = query::structured_query(topic) {
            match self
                .discovery
                .search_structured(&q, STRUCTURED_RESULT_LIMIT)
                .await
            {
                Ok(candidates) => {
                    for candidate in candidates {
                        self.process_candidate(topic, candidate, &dedup, &mut report)
                            .await;
                    }
                }
                Err(e) => {
                    warn!(topic = topic.name.as_str(), error = %e, "Structured discovery failed");
                    report.errors.push(format!("structured discovery: {e:#}"));
                }
            }
        }

        // Web search second; every new URL costs a scrape.
        report.phase = SweepPhase::Discovering;
        if let Some(q) = query::web_query(topic) {
            match self.discovery.search_web(&q, WEB_RESULT_LIMIT).await {
                Ok(results) => {
                    for result in results {
                        self.process_url_result(topic, result, &dedup, &mut report)
                            .await;
                    }
                }
                Err(e) => {
                    warn!(topic = topic.name.as_str(), error = %e, "Web discovery failed");
                    report.errors.push(format!("web discovery: {e:#}"));
                }
            }
        }

        report.phase = SweepPhase::Done;
        info!(
            topic = topic.name.as_str(),
            searched = report.searched,
            skipped = report.skipped,
            new_mentions = report.new_mentions,
            "Topic sweep complete"
        );
        report
    }

    /// Structured-path candidate: already parsed and trusted as relevant.
    async fn process_candidate(
        &self,
        topic: &Topic,
        mut candidate: Candidate,
        dedup: &SweepDedup,
        report: &mut TopicReport,
    ) {
        report.searched += 1;
        report.phase = SweepPhase::Filtering;

        let url = sanitize_url(&candidate.url);
        if url.is_empty() {
            report.skipped += 1;
            return;
        }
        if !outlet::is_news_outlet(&extract_domain(&url)) {
            report.skipped += 1;
            return;
        }
        if !dedup.claim(&url) {
            report.skipped += 1;
            return;
        }
        candidate.url = url;

        self.persist_and_enrich(topic, candidate, report).await;
    }

    /// Web-path result: cheap filters run before the scrape is paid for.
    async fn process_url_result(
        &self,
        topic: &Topic,
        result: UrlResult,
        dedup: &SweepDedup,
        report: &mut TopicReport,
    ) {
        report.searched += 1;
        report.phase = SweepPhase::Filtering;

        let url = sanitize_url(&result.url);
        if url.is_empty() || !outlet::is_news_outlet(&extract_domain(&url)) {
            report.skipped += 1;
            return;
        }
        // The dedup claim must happen before the scrape — rediscovered URLs
        // cost nothing.
        if !dedup.claim(&url) {
            report.skipped += 1;
            return;
        }

        let page = match self.discovery.scrape(&url).await {
            Ok(page) => page,
            Err(e) => {
                warn!(url = url.as_str(), error = %e, "Scrape failed");
                report.errors.push(format!("scrape {url}: {e:#}"));
                return;
            }
        };

        let text = page.markdown.trim().to_string();
        let title = if result.title.trim().is_empty() {
            page.title.clone().unwrap_or_else(|| url.clone())
        } else {
            result.title.clone()
        };
        let excerpt: String = if text.is_empty() {
            result.snippet.clone()
        } else {
            text.chars().take(500).collect()
        };

        // Relevance gate, scrape path only. Too little text skips the gate;
        // a classifier outage fails open.
        if text.chars().count() >= MIN_RELEVANCE_TEXT {
            let description = topic_description(topic);
            match self.relevance.is_relevant(&description, &title, &text).await {
                Ok(true) => {}
                Ok(false) => {
                    info!(url = url.as_str(), topic = topic.name.as_str(), "Not relevant, skipping");
                    report.skipped += 1;
                    return;
                }
                Err(e) => {
                    warn!(url = url.as_str(), error = %e, "Relevance gate unavailable, keeping candidate");
                }
            }
        }

        let candidate = Candidate {
            url,
            title,
            excerpt,
            body: (!text.is_empty()).then_some(text),
            raw_html: (!page.html.is_empty()).then(|| page.html.clone()),
            provider_sentiment: None,
            cluster_hint: ClusterHint::default(),
            published_at: page.published_at,
            authors: page.author.clone().into_iter().collect(),
            source: DiscoverySource::WebSearch,
        };

        self.persist_and_enrich(topic, candidate, report).await;
    }

    /// Persist a surviving candidate, then run the best-effort follow-ups.
    async fn persist_and_enrich(
        &self,
        topic: &Topic,
        candidate: Candidate,
        report: &mut TopicReport,
    ) {
        report.phase = SweepPhase::Persisting;

        let initial_sentiment = match candidate.provider_sentiment {
            Some(score) => sentiment::from_score(score),
            None => Sentiment::Unscored,
        };
        let mention = Mention::from_candidate(topic.id, &candidate, initial_sentiment);

        let mention_id = match self.store.insert_mention(&mention).await {
            Ok(InsertOutcome::Inserted(id)) => id,
            Ok(InsertOutcome::Duplicate) => {
                report.duplicates += 1;
                return;
            }
            Err(e) => {
                warn!(url = mention.url.as_str(), error = %e, "Failed to insert mention");
                report.errors.push(format!("insert {}: {e:#}", mention.url));
                return;
            }
        };
        report.new_mentions += 1;

        if let Err(e) = self
            .cluster_mention(topic, &mention, mention_id, &candidate.cluster_hint)
            .await
        {
            warn!(url = mention.url.as_str(), error = %e, "Clustering failed (non-fatal)");
            report.cluster_failures += 1;
        }

        report.phase = SweepPhase::Attributing;
        if let Err(e) = self.attribute_journalist(topic, &mention, mention_id, &candidate).await {
            warn!(url = mention.url.as_str(), error = %e, "Byline attribution failed (non-fatal)");
            report.byline_failures += 1;
        }

        report.phase = SweepPhase::Scoring;
        if candidate.provider_sentiment.is_none() {
            if let Err(e) = self.score_sentiment(topic, &mention, mention_id, &candidate).await {
                warn!(url = mention.url.as_str(), error = %e, "Sentiment scoring failed (non-fatal)");
                report.sentiment_failures += 1;
            }
        }
    }

    async fn cluster_mention(
        &self,
        topic: &Topic,
        mention: &Mention,
        mention_id: Uuid,
        hint: &ClusterHint,
    ) -> Result<()> {
        let since = Utc::now() - Duration::hours(CLUSTER_WINDOW_HOURS);
        let recent: Vec<Mention> = self
            .store
            .recent_mentions(topic.id, since)
            .await?
            .into_iter()
            .filter(|m| m.id != mention_id)
            .collect();

        match cluster::assign_story(hint, &mention.title, &recent) {
            StoryAssignment::NewStory => {
                self.store.set_story(mention_id, mention_id, true).await
            }
            StoryAssignment::Joined { cluster } => {
                self.store.set_story(mention_id, cluster, false).await
            }
        }
    }

    async fn attribute_journalist(
        &self,
        topic: &Topic,
        mention: &Mention,
        mention_id: Uuid,
        candidate: &Candidate,
    ) -> Result<()> {
        let html = candidate.raw_html.as_deref().unwrap_or("");
        let text = candidate.body.as_deref().unwrap_or(&candidate.excerpt);
        let structured_author = candidate.authors.first().map(String::as_str);

        // An unextractable byline is not an error: the field stays null.
        let Some(byline) = byline::extract_byline(html, text, &mention.outlet, structured_author)
        else {
            return Ok(());
        };

        let existing = self
            .store
            .find_journalist(&byline.name, &mention.outlet)
            .await?;
        let beat = journalist::beat_from_topic(&topic.name);
        let profile = journalist::merge_profile(
            existing,
            &byline,
            &mention.outlet,
            mention.sentiment,
            &beat,
            Utc::now(),
        );
        let journalist_id = self.store.upsert_journalist(&profile).await?;
        self.store.set_journalist(mention_id, journalist_id).await
    }

    async fn score_sentiment(
        &self,
        topic: &Topic,
        mention: &Mention,
        mention_id: Uuid,
        candidate: &Candidate,
    ) -> Result<()> {
        let text = candidate.body.as_deref().unwrap_or(&candidate.excerpt);

        let verdict = match self
            .sentiment
            .classify(&topic.name, &mention.title, text)
            .await
        {
            Ok(sentiment) => sentiment,
            Err(e) => {
                warn!(url = mention.url.as_str(), error = %e, "Sentiment classifier failed, using keyword fallback");
                keyword_sentiment(&format!("{} {}", mention.title, text))
            }
        };

        self.store.set_sentiment(mention_id, verdict).await
    }
}

fn topic_description(topic: &Topic) -> String {
    let mut parts = vec![topic.name.clone()];
    if !topic.keywords.is_empty() {
        parts.push(format!("keywords: {}", topic.keywords.join(", ")));
    }
    if !topic.bill_numbers.is_empty() {
        parts.push(format!("bills: {}", topic.bill_numbers.join(", ")));
    }
    parts.join("; ")
}
