//! Sentiment classification — LLM primary path with a deterministic keyword
//! fallback. The primary path is best effort: on any failure the caller
//! degrades to `keyword_sentiment`, never raises.

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::Deserialize;

use ai_client::Claude;
use presswatch_common::Sentiment;

use crate::traits::SentimentClassifier;

/// Continuous provider scores inside this band map to Neutral — weakly toned
/// text should not be over-classified.
const SCORE_DEAD_BAND: f64 = 0.1;

/// Map a continuous provider sentiment score to the three-way enum.
pub fn from_score(score: f64) -> Sentiment {
    if score.abs() < SCORE_DEAD_BAND {
        Sentiment::Neutral
    } else if score > 0.0 {
        Sentiment::Positive
    } else {
        Sentiment::Negative
    }
}

const POSITIVE_LEXICON: &[&str] = &[
    "pass", "passes", "passed", "approve", "approves", "approved", "approval",
    "advance", "advances", "advanced", "win", "wins", "won", "support",
    "supports", "supported", "backs", "boost", "boosts", "benefit", "benefits",
    "success", "successful", "victory", "celebrate", "celebrates", "praise",
    "praised", "progress", "improve", "improves", "improved", "expand",
    "expands", "growth",
];

const NEGATIVE_LEXICON: &[&str] = &[
    "fail", "fails", "failed", "veto", "vetoes", "vetoed", "kill", "kills",
    "killed", "oppose", "opposes", "opposed", "opposition", "reject",
    "rejects", "rejected", "block", "blocks", "blocked", "delay", "delays",
    "delayed", "concern", "concerns", "criticism", "criticized", "criticizes",
    "lawsuit", "sue", "sued", "crisis", "cut", "cuts", "defeat", "defeated",
    "risk", "risks", "threat", "threatens", "burden", "costly", "loss",
    "loses", "lost", "protest", "protests",
];

/// Deterministic fallback: count lexicon hits in the lower-cased text and
/// classify by majority. Pure, no network.
pub fn keyword_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let mut positive = 0usize;
    let mut negative = 0usize;

    for token in lower.split(|c: char| !c.is_alphanumeric()) {
        if token.is_empty() {
            continue;
        }
        if POSITIVE_LEXICON.contains(&token) {
            positive += 1;
        } else if NEGATIVE_LEXICON.contains(&token) {
            negative += 1;
        }
    }

    if positive > negative {
        Sentiment::Positive
    } else if negative > positive {
        Sentiment::Negative
    } else {
        Sentiment::Neutral
    }
}

// --- LLM classifier ---

#[derive(Debug, Deserialize, JsonSchema)]
struct SentimentVerdict {
    /// Exactly one of "positive", "negative", "neutral".
    sentiment: String,
    /// Brief reason for the verdict.
    #[allow(dead_code)]
    rationale: String,
}

const SENTIMENT_SYSTEM: &str = "\
You classify the sentiment of a news article toward the policy topic it \
covers.\n\n\
Answer with exactly one of: positive, negative, neutral.\n\
- positive: the coverage frames the topic favorably (passage, support, \
momentum, benefits)\n\
- negative: the coverage frames it unfavorably (defeat, opposition, \
lawsuits, harms)\n\
- neutral: procedural or balanced coverage with no clear lean\n\n\
Provide a one-sentence rationale.";

pub struct ClaudeSentiment {
    claude: Claude,
}

impl ClaudeSentiment {
    pub fn new(claude: Claude) -> Self {
        Self { claude }
    }
}

#[async_trait]
impl SentimentClassifier for ClaudeSentiment {
    async fn classify(&self, topic_name: &str, title: &str, text: &str) -> Result<Sentiment> {
        let excerpt: String = text.chars().take(1500).collect();
        let prompt = format!("Topic: {topic_name}\n\nHeadline: {title}\n\nArticle:\n{excerpt}");

        let verdict = self
            .claude
            .extract::<SentimentVerdict>(SENTIMENT_SYSTEM, &prompt)
            .await?;

        // Out-of-enum labels map to Neutral.
        Ok(Sentiment::parse_label(&verdict.sentiment))
    }
}

/// Fallback-only classifier used when no LLM is configured.
pub struct KeywordSentiment;

#[async_trait]
impl SentimentClassifier for KeywordSentiment {
    async fn classify(&self, _topic_name: &str, title: &str, text: &str) -> Result<Sentiment> {
        Ok(keyword_sentiment(&format!("{title} {text}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_dead_band_is_neutral() {
        assert_eq!(from_score(0.0), Sentiment::Neutral);
        assert_eq!(from_score(0.05), Sentiment::Neutral);
        assert_eq!(from_score(-0.09), Sentiment::Neutral);
    }

    #[test]
    fn score_outside_dead_band_classifies() {
        assert_eq!(from_score(0.3), Sentiment::Positive);
        assert_eq!(from_score(-0.5), Sentiment::Negative);
        assert_eq!(from_score(0.1), Sentiment::Positive);
    }

    #[test]
    fn two_positive_zero_negative_is_positive() {
        let s = keyword_sentiment("The bill passed after supporters approved the amendment");
        assert_eq!(s, Sentiment::Positive);
    }

    #[test]
    fn equal_counts_are_neutral() {
        let s = keyword_sentiment("The measure passed but opponents sued");
        assert_eq!(s, Sentiment::Neutral);
    }

    #[test]
    fn single_positive_token_is_positive() {
        let s = keyword_sentiment("California passes solar checkoff bill");
        assert_eq!(s, Sentiment::Positive);
    }

    #[test]
    fn negative_majority_is_negative() {
        let s = keyword_sentiment("Governor vetoed the bill after a lawsuit and fierce opposition");
        assert_eq!(s, Sentiment::Negative);
    }

    #[test]
    fn no_lexicon_hits_is_neutral() {
        assert_eq!(keyword_sentiment("The committee met on Tuesday"), Sentiment::Neutral);
        assert_eq!(keyword_sentiment(""), Sentiment::Neutral);
    }

    #[test]
    fn counting_is_case_insensitive_and_token_based() {
        assert_eq!(keyword_sentiment("PASSED Passed passed"), Sentiment::Positive);
        // "passage" is not a lexicon token; substring matches don't count.
        assert_eq!(keyword_sentiment("The passage was long"), Sentiment::Neutral);
    }

    #[test]
    fn out_of_enum_label_maps_to_neutral() {
        assert_eq!(Sentiment::parse_label("mixed"), Sentiment::Neutral);
        assert_eq!(Sentiment::parse_label(""), Sentiment::Neutral);
        assert_eq!(Sentiment::parse_label("Positive"), Sentiment::Positive);
    }
}
