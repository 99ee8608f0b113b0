//! Postgres-backed MentionStore. Inserts are idempotent on (topic_id, url):
//! ON CONFLICT DO NOTHING, with the conflict reported as a duplicate no-op.

use std::collections::HashSet;

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row};
use uuid::Uuid;

use presswatch_common::{Journalist, Mention, Sentiment, Topic};

use crate::traits::{InsertOutcome, MentionStore};

pub struct PgMentionStore {
    pool: PgPool,
}

impl PgMentionStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .context("Failed to connect to Postgres")?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Create the pipeline's tables if they don't exist. Idempotent.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS topics (
                id            UUID         PRIMARY KEY,
                name          TEXT         NOT NULL,
                state         TEXT,
                keywords      TEXT[]       NOT NULL DEFAULT '{}',
                bill_numbers  TEXT[]       NOT NULL DEFAULT '{}',
                active        BOOLEAN      NOT NULL DEFAULT TRUE
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS mentions (
                id                    UUID         PRIMARY KEY,
                topic_id              UUID         NOT NULL REFERENCES topics(id),
                url                   TEXT         NOT NULL,
                title                 TEXT         NOT NULL,
                outlet                TEXT         NOT NULL,
                excerpt               TEXT         NOT NULL DEFAULT '',
                content               TEXT,
                sentiment             TEXT         NOT NULL DEFAULT 'unscored',
                discovered_at         TIMESTAMPTZ  NOT NULL,
                published_at          TIMESTAMPTZ  NOT NULL,
                story_cluster         UUID,
                first_seen_for_story  BOOLEAN      NOT NULL DEFAULT FALSE,
                journalist_id         UUID,
                event_id              TEXT,
                UNIQUE (topic_id, url)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS journalists (
                id               UUID              PRIMARY KEY,
                name             TEXT              NOT NULL,
                outlet           TEXT              NOT NULL,
                email            TEXT,
                phone            TEXT,
                twitter          TEXT,
                linkedin         TEXT,
                article_count    BIGINT            NOT NULL DEFAULT 0,
                avg_sentiment    DOUBLE PRECISION  NOT NULL DEFAULT 0,
                beats            TEXT[]            NOT NULL DEFAULT '{}',
                last_article_at  TIMESTAMPTZ       NOT NULL,
                UNIQUE (name, outlet)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

fn sentiment_from_db(value: &str) -> Sentiment {
    match value {
        "positive" => Sentiment::Positive,
        "negative" => Sentiment::Negative,
        "neutral" => Sentiment::Neutral,
        _ => Sentiment::Unscored,
    }
}

fn mention_from_row(row: &sqlx::postgres::PgRow) -> Result<Mention> {
    let sentiment: String = row.try_get("sentiment")?;
    Ok(Mention {
        id: row.try_get("id")?,
        topic_id: row.try_get("topic_id")?,
        url: row.try_get("url")?,
        title: row.try_get("title")?,
        outlet: row.try_get("outlet")?,
        excerpt: row.try_get("excerpt")?,
        content: row.try_get("content")?,
        sentiment: sentiment_from_db(&sentiment),
        discovered_at: row.try_get("discovered_at")?,
        published_at: row.try_get("published_at")?,
        story_cluster: row.try_get("story_cluster")?,
        first_seen_for_story: row.try_get("first_seen_for_story")?,
        journalist_id: row.try_get("journalist_id")?,
        event_id: row.try_get("event_id")?,
    })
}

#[async_trait]
impl MentionStore for PgMentionStore {
    async fn active_topics(&self) -> Result<Vec<Topic>> {
        let rows = sqlx::query(
            "SELECT id, name, state, keywords, bill_numbers, active
             FROM topics WHERE active ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await
        .context("Failed to load topics")?;

        rows.iter()
            .map(|row| {
                Ok(Topic {
                    id: row.try_get("id")?,
                    name: row.try_get("name")?,
                    state: row.try_get("state")?,
                    keywords: row.try_get("keywords")?,
                    bill_numbers: row.try_get("bill_numbers")?,
                    active: row.try_get("active")?,
                })
            })
            .collect()
    }

    async fn known_urls(&self, topic_id: Uuid) -> Result<HashSet<String>> {
        let rows = sqlx::query("SELECT url FROM mentions WHERE topic_id = $1")
            .bind(topic_id)
            .fetch_all(&self.pool)
            .await
            .context("Failed to load known URLs")?;

        rows.iter()
            .map(|row| Ok(row.try_get::<String, _>("url")?))
            .collect()
    }

    async fn insert_mention(&self, mention: &Mention) -> Result<InsertOutcome> {
        let result = sqlx::query(
            r#"
            INSERT INTO mentions (
                id, topic_id, url, title, outlet, excerpt, content, sentiment,
                discovered_at, published_at, story_cluster, first_seen_for_story,
                journalist_id, event_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (topic_id, url) DO NOTHING
            "#,
        )
        .bind(mention.id)
        .bind(mention.topic_id)
        .bind(&mention.url)
        .bind(&mention.title)
        .bind(&mention.outlet)
        .bind(&mention.excerpt)
        .bind(&mention.content)
        .bind(mention.sentiment.as_str())
        .bind(mention.discovered_at)
        .bind(mention.published_at)
        .bind(mention.story_cluster)
        .bind(mention.first_seen_for_story)
        .bind(mention.journalist_id)
        .bind(&mention.event_id)
        .execute(&self.pool)
        .await
        .context("Failed to insert mention")?;

        if result.rows_affected() == 0 {
            return Ok(InsertOutcome::Duplicate);
        }
        Ok(InsertOutcome::Inserted(mention.id))
    }

    async fn recent_mentions(&self, topic_id: Uuid, since: DateTime<Utc>) -> Result<Vec<Mention>> {
        let rows = sqlx::query(
            "SELECT * FROM mentions
             WHERE topic_id = $1 AND discovered_at >= $2
             ORDER BY discovered_at ASC",
        )
        .bind(topic_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .context("Failed to load recent mentions")?;

        rows.iter().map(mention_from_row).collect()
    }

    async fn set_story(&self, mention_id: Uuid, cluster: Uuid, first_seen: bool) -> Result<()> {
        sqlx::query(
            "UPDATE mentions SET story_cluster = $2, first_seen_for_story = $3 WHERE id = $1",
        )
        .bind(mention_id)
        .bind(cluster)
        .bind(first_seen)
        .execute(&self.pool)
        .await
        .context("Failed to set story cluster")?;
        Ok(())
    }

    async fn set_sentiment(&self, mention_id: Uuid, sentiment: Sentiment) -> Result<()> {
        sqlx::query("UPDATE mentions SET sentiment = $2 WHERE id = $1")
            .bind(mention_id)
            .bind(sentiment.as_str())
            .execute(&self.pool)
            .await
            .context("Failed to set sentiment")?;
        Ok(())
    }

    async fn set_journalist(&self, mention_id: Uuid, journalist_id: Uuid) -> Result<()> {
        sqlx::query("UPDATE mentions SET journalist_id = $2 WHERE id = $1")
            .bind(mention_id)
            .bind(journalist_id)
            .execute(&self.pool)
            .await
            .context("Failed to set journalist")?;
        Ok(())
    }

    async fn find_journalist(&self, name: &str, outlet: &str) -> Result<Option<Journalist>> {
        let row = sqlx::query("SELECT * FROM journalists WHERE name = $1 AND outlet = $2")
            .bind(name)
            .bind(outlet)
            .fetch_optional(&self.pool)
            .await
            .context("Failed to look up journalist")?;

        row.map(|row| {
            Ok(Journalist {
                id: row.try_get("id")?,
                name: row.try_get("name")?,
                outlet: row.try_get("outlet")?,
                email: row.try_get("email")?,
                phone: row.try_get("phone")?,
                twitter: row.try_get("twitter")?,
                linkedin: row.try_get("linkedin")?,
                article_count: row.try_get("article_count")?,
                avg_sentiment: row.try_get("avg_sentiment")?,
                beats: row.try_get("beats")?,
                last_article_at: row.try_get("last_article_at")?,
            })
        })
        .transpose()
    }

    async fn upsert_journalist(&self, journalist: &Journalist) -> Result<Uuid> {
        // The caller merged new data into the profile already; on conflict
        // the merged values win. RETURNING id yields the existing row's id.
        let row = sqlx::query(
            r#"
            INSERT INTO journalists (
                id, name, outlet, email, phone, twitter, linkedin,
                article_count, avg_sentiment, beats, last_article_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            ON CONFLICT (name, outlet) DO UPDATE SET
                email = EXCLUDED.email,
                phone = EXCLUDED.phone,
                twitter = EXCLUDED.twitter,
                linkedin = EXCLUDED.linkedin,
                article_count = EXCLUDED.article_count,
                avg_sentiment = EXCLUDED.avg_sentiment,
                beats = EXCLUDED.beats,
                last_article_at = EXCLUDED.last_article_at
            RETURNING id
            "#,
        )
        .bind(journalist.id)
        .bind(&journalist.name)
        .bind(&journalist.outlet)
        .bind(&journalist.email)
        .bind(&journalist.phone)
        .bind(&journalist.twitter)
        .bind(&journalist.linkedin)
        .bind(journalist.article_count)
        .bind(journalist.avg_sentiment)
        .bind(&journalist.beats)
        .bind(journalist.last_article_at)
        .fetch_one(&self.pool)
        .await
        .context("Failed to upsert journalist")?;

        Ok(row.try_get("id")?)
    }
}
