//! Journalist attribution — cross-topic identity keyed by (name, outlet).
//!
//! `merge_profile` is the pure update rule: contact fields fill when null and
//! never overwrite, the sentiment average is an incremental mean, and beats
//! are a deduplicated union. The store only writes what this produces.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use presswatch_common::{Byline, Journalist, Sentiment};

/// Broad beat category for a mention, derived from its topic name.
pub fn beat_from_topic(topic_name: &str) -> String {
    topic_name.trim().to_lowercase()
}

/// Merge one attributed mention into a journalist profile. `existing` is the
/// current (name, outlet) record, if any.
pub fn merge_profile(
    existing: Option<Journalist>,
    byline: &Byline,
    outlet: &str,
    sentiment: Sentiment,
    beat: &str,
    now: DateTime<Utc>,
) -> Journalist {
    match existing {
        None => Journalist {
            id: Uuid::new_v4(),
            name: byline.name.clone(),
            outlet: outlet.to_string(),
            email: byline.email.clone(),
            phone: byline.phone.clone(),
            twitter: byline.twitter.clone(),
            linkedin: byline.linkedin.clone(),
            article_count: 1,
            avg_sentiment: sentiment.score(),
            beats: vec![beat.to_string()],
            last_article_at: now,
        },
        Some(mut journalist) => {
            let old_count = journalist.article_count;
            journalist.avg_sentiment = (journalist.avg_sentiment * old_count as f64
                + sentiment.score())
                / (old_count + 1) as f64;
            journalist.article_count = old_count + 1;

            // Contacts backfill only; an existing value is never overwritten.
            if journalist.email.is_none() {
                journalist.email = byline.email.clone();
            }
            if journalist.phone.is_none() {
                journalist.phone = byline.phone.clone();
            }
            if journalist.twitter.is_none() {
                journalist.twitter = byline.twitter.clone();
            }
            if journalist.linkedin.is_none() {
                journalist.linkedin = byline.linkedin.clone();
            }

            if !journalist.beats.iter().any(|b| b == beat) {
                journalist.beats.push(beat.to_string());
            }

            journalist.last_article_at = now;
            journalist
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn byline(name: &str, email: Option<&str>, twitter: Option<&str>) -> Byline {
        Byline {
            name: name.to_string(),
            email: email.map(String::from),
            phone: None,
            twitter: twitter.map(String::from),
            linkedin: None,
        }
    }

    #[test]
    fn first_byline_creates_profile() {
        let now = Utc::now();
        let j = merge_profile(
            None,
            &byline("Jane Doe", Some("jdoe@herald.com"), None),
            "herald.com",
            Sentiment::Positive,
            "solar policy",
            now,
        );
        assert_eq!(j.name, "Jane Doe");
        assert_eq!(j.outlet, "herald.com");
        assert_eq!(j.article_count, 1);
        assert!((j.avg_sentiment - 1.0).abs() < f64::EPSILON);
        assert_eq!(j.beats, vec!["solar policy"]);
        assert_eq!(j.last_article_at, now);
    }

    #[test]
    fn incremental_mean_matches_formula() {
        let now = Utc::now();
        let mut j = merge_profile(
            None,
            &byline("Jane Doe", None, None),
            "herald.com",
            Sentiment::Positive,
            "solar policy",
            now,
        );
        // 1 article at 1.0, add a negative: (1.0*1 + -1.0) / 2 = 0.0
        j = merge_profile(
            Some(j),
            &byline("Jane Doe", None, None),
            "herald.com",
            Sentiment::Negative,
            "solar policy",
            now,
        );
        assert_eq!(j.article_count, 2);
        assert!((j.avg_sentiment - 0.0).abs() < f64::EPSILON);

        // Add a neutral: (0.0*2 + 0.0) / 3 = 0.0
        j = merge_profile(
            Some(j),
            &byline("Jane Doe", None, None),
            "herald.com",
            Sentiment::Neutral,
            "solar policy",
            now,
        );
        assert_eq!(j.article_count, 3);
        assert!((j.avg_sentiment - 0.0).abs() < f64::EPSILON);

        // Add a positive: (0.0*3 + 1.0) / 4 = 0.25
        j = merge_profile(
            Some(j),
            &byline("Jane Doe", None, None),
            "herald.com",
            Sentiment::Positive,
            "solar policy",
            now,
        );
        assert_eq!(j.article_count, 4);
        assert!((j.avg_sentiment - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn contacts_fill_when_null_never_overwrite() {
        let now = Utc::now();
        let mut j = merge_profile(
            None,
            &byline("Jane Doe", Some("jdoe@herald.com"), None),
            "herald.com",
            Sentiment::Neutral,
            "solar policy",
            now,
        );
        assert_eq!(j.twitter, None);

        // Later byline backfills twitter but must not replace the email.
        j = merge_profile(
            Some(j),
            &byline("Jane Doe", Some("other@herald.com"), Some("jdoe_reports")),
            "herald.com",
            Sentiment::Neutral,
            "solar policy",
            now,
        );
        assert_eq!(j.email.as_deref(), Some("jdoe@herald.com"));
        assert_eq!(j.twitter.as_deref(), Some("jdoe_reports"));
    }

    #[test]
    fn beats_are_a_deduplicated_union() {
        let now = Utc::now();
        let mut j = merge_profile(
            None,
            &byline("Jane Doe", None, None),
            "herald.com",
            Sentiment::Neutral,
            "solar policy",
            now,
        );
        j = merge_profile(
            Some(j),
            &byline("Jane Doe", None, None),
            "herald.com",
            Sentiment::Neutral,
            "solar policy",
            now,
        );
        j = merge_profile(
            Some(j),
            &byline("Jane Doe", None, None),
            "herald.com",
            Sentiment::Neutral,
            "water rights",
            now,
        );
        assert_eq!(j.beats, vec!["solar policy", "water rights"]);
    }

    #[test]
    fn beat_from_topic_normalizes() {
        assert_eq!(beat_from_topic("  Solar Policy "), "solar policy");
    }
}
