//! Relevance gate — is a scraped article actually about the topic?
//!
//! Only the scrape path is gated; structured-provider results are trusted as
//! already relevant. Ambiguous classifier output fails closed (not relevant);
//! a transport failure fails open at the call site — false positives cost
//! less than silently dropping coverage while the classifier is down.

use anyhow::Result;
use async_trait::async_trait;

use ai_client::Claude;

use crate::traits::RelevanceClassifier;

/// Minimum extracted text length before the gate runs. Shorter candidates
/// skip the gate and are kept.
pub const MIN_RELEVANCE_TEXT: usize = 150;

const RELEVANCE_SYSTEM: &str = "\
You decide whether a news article is about a specific policy topic.\n\
Answer with a single word: YES or NO.\n\
YES only if the article substantively covers the topic — the bill, program, \
or policy area described. Passing keyword coincidence is NO.";

pub struct ClaudeRelevance {
    claude: Claude,
}

impl ClaudeRelevance {
    pub fn new(claude: Claude) -> Self {
        Self { claude }
    }
}

#[async_trait]
impl RelevanceClassifier for ClaudeRelevance {
    async fn is_relevant(&self, topic_description: &str, title: &str, text: &str) -> Result<bool> {
        let excerpt: String = text.chars().take(1200).collect();
        let prompt = format!(
            "Topic: {topic_description}\n\nHeadline: {title}\n\nArticle:\n{excerpt}\n\nIs this article about the topic?"
        );

        let answer = self
            .claude
            .chat_completion(RELEVANCE_SYSTEM, &prompt)
            .await?;

        // Anything other than an affirmative is "not relevant".
        Ok(is_affirmative(&answer))
    }
}

fn is_affirmative(answer: &str) -> bool {
    answer.trim().to_lowercase().starts_with("yes")
}

/// Used when no classifier is configured: everything passes the gate.
pub struct PassThroughRelevance;

#[async_trait]
impl RelevanceClassifier for PassThroughRelevance {
    async fn is_relevant(&self, _topic: &str, _title: &str, _text: &str) -> Result<bool> {
        Ok(true)
    }
}
