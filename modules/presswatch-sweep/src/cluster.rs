//! Story clustering — group mentions that cover the same real-world event.
//!
//! Provider event identifiers are the strong signal; the scrape path falls
//! back to title-word overlap against a recent window. `assign_story` is the
//! pure decision function; the orchestrator applies its verdict through the
//! store. The "first seen for story" flag lands on exactly the earliest
//! mention in a cluster and later joins never move it.

use presswatch_common::{ClusterHint, Mention};
use uuid::Uuid;

/// Recency window for the title-similarity fallback.
pub const CLUSTER_WINDOW_HOURS: i64 = 48;

/// Minimum share of the smaller title's significant words that must appear
/// in the compared title to join its story.
const SIMILARITY_THRESHOLD: f64 = 0.4;

/// The clustering decision for one new mention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoryAssignment {
    /// No match — the mention starts its own story (cluster = own id,
    /// first seen = true).
    NewStory,
    /// Join an existing story. First seen stays with the original holder.
    Joined { cluster: Uuid },
}

/// Decide the story assignment for a new mention against the topic's recent
/// mentions, which must be ordered oldest first so the earliest candidate is
/// always evaluated first.
pub fn assign_story(hint: &ClusterHint, title: &str, recent: &[Mention]) -> StoryAssignment {
    if let Some(event_id) = hint.event_id.as_deref() {
        let matches: Vec<&Mention> = recent
            .iter()
            .filter(|m| m.event_id.as_deref() == Some(event_id))
            .collect();

        if hint.is_duplicate {
            // Attach to whichever mention in the cluster already carries a
            // cluster id. A duplicate whose cluster lookup finds nothing
            // becomes its own story — provider verdict trusted as-is.
            return match matches.iter().find(|m| m.story_cluster.is_some()) {
                Some(m) => StoryAssignment::Joined {
                    cluster: m.story_cluster.expect("filtered on story_cluster"),
                },
                None => StoryAssignment::NewStory,
            };
        }

        return match matches.first() {
            Some(m) => StoryAssignment::Joined {
                cluster: m.story_cluster.unwrap_or(m.id),
            },
            None => StoryAssignment::NewStory,
        };
    }

    // No event identifier: recency-windowed title similarity, oldest first.
    for m in recent {
        if title_overlap(title, &m.title) >= SIMILARITY_THRESHOLD {
            return StoryAssignment::Joined {
                cluster: m.story_cluster.unwrap_or(m.id),
            };
        }
    }

    StoryAssignment::NewStory
}

/// Word-overlap ratio between two titles: share of the smaller title's
/// significant words (lowercased whitespace tokens longer than 3 chars) that
/// also appear in the other title.
pub fn title_overlap(a: &str, b: &str) -> f64 {
    let words_a = significant_words(a);
    let words_b = significant_words(b);

    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let (smaller, larger) = if words_a.len() <= words_b.len() {
        (&words_a, &words_b)
    } else {
        (&words_b, &words_a)
    };

    let shared = smaller.iter().filter(|w| larger.contains(*w)).count();
    shared as f64 / smaller.len() as f64
}

fn significant_words(title: &str) -> std::collections::HashSet<String> {
    title
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.len() > 3)
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use presswatch_common::Sentiment;

    fn mention(title: &str, event_id: Option<&str>, cluster: Option<Uuid>) -> Mention {
        Mention {
            id: Uuid::new_v4(),
            topic_id: Uuid::new_v4(),
            url: format!("https://example.com/{}", Uuid::new_v4()),
            title: title.to_string(),
            outlet: "example.com".to_string(),
            excerpt: String::new(),
            content: None,
            sentiment: Sentiment::Unscored,
            discovered_at: Utc::now(),
            published_at: Utc::now(),
            story_cluster: cluster,
            first_seen_for_story: cluster.is_some(),
            journalist_id: None,
            event_id: event_id.map(String::from),
        }
    }

    fn no_hint() -> ClusterHint {
        ClusterHint::default()
    }

    fn event_hint(event_id: &str, is_duplicate: bool) -> ClusterHint {
        ClusterHint {
            event_id: Some(event_id.to_string()),
            is_duplicate,
        }
    }

    // --- title overlap ---

    #[test]
    fn overlap_ignores_short_words_and_case() {
        // Significant words of the smaller set: {solar, checkoff, bill}
        let sim = title_overlap(
            "CA OKs solar checkoff bill",
            "Solar checkoff bill heads to the governor's desk",
        );
        assert!(sim >= 0.99, "expected full overlap, got {sim}");
    }

    #[test]
    fn overlap_uses_smaller_titles_word_set() {
        // Smaller: {solar, checkoff} — both present in the longer title.
        let sim = title_overlap(
            "Solar checkoff",
            "State lawmakers advance solar checkoff program for growers",
        );
        assert!((sim - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn disjoint_titles_have_zero_overlap() {
        assert_eq!(title_overlap("Solar checkoff bill", "School lunch funding"), 0.0);
    }

    #[test]
    fn empty_title_has_zero_overlap() {
        assert_eq!(title_overlap("", "Solar checkoff bill"), 0.0);
        assert_eq!(title_overlap("a an the", "Solar checkoff bill"), 0.0);
    }

    // --- fallback clustering ---

    #[test]
    fn first_mention_starts_its_own_story() {
        let assignment = assign_story(&no_hint(), "California passes solar checkoff bill", &[]);
        assert_eq!(assignment, StoryAssignment::NewStory);
    }

    #[test]
    fn similar_title_joins_existing_story() {
        let a = mention("California passes solar checkoff bill", None, None);
        let assignment = assign_story(
            &no_hint(),
            "Solar checkoff bill passes California legislature",
            &[a.clone()],
        );
        assert_eq!(assignment, StoryAssignment::Joined { cluster: a.id });
    }

    #[test]
    fn dissimilar_title_starts_new_story() {
        let a = mention("California passes solar checkoff bill", None, None);
        let assignment = assign_story(&no_hint(), "School lunch funding stalls again", &[a]);
        assert_eq!(assignment, StoryAssignment::NewStory);
    }

    #[test]
    fn joins_clustered_mentions_existing_cluster_id() {
        let root = Uuid::new_v4();
        let b = mention("Solar checkoff bill advances", None, Some(root));
        let assignment =
            assign_story(&no_hint(), "Solar checkoff bill advances to senate", &[b]);
        assert_eq!(assignment, StoryAssignment::Joined { cluster: root });
    }

    #[test]
    fn earliest_match_wins_when_recent_is_oldest_first() {
        let a = mention("Solar checkoff bill passes", None, None);
        let b = mention("Solar checkoff bill passes committee", None, Some(a.id));
        let assignment = assign_story(
            &no_hint(),
            "Solar checkoff bill passes final vote",
            &[a.clone(), b],
        );
        // A is evaluated first; the new mention lands in A's cluster.
        assert_eq!(assignment, StoryAssignment::Joined { cluster: a.id });
    }

    #[test]
    fn three_mentions_chain_into_one_cluster_with_first_seen_on_a() {
        // B and C each overlap A above threshold; both land in A's cluster
        // because A is the earliest and is evaluated first.
        let mut a = mention("Solar checkoff measure wins approval", None, None);
        let a_assignment = assign_story(&no_hint(), &a.title, &[]);
        assert_eq!(a_assignment, StoryAssignment::NewStory);
        a.story_cluster = Some(a.id);
        a.first_seen_for_story = true;

        let mut b = mention("Solar checkoff measure clears hurdle", None, None);
        let b_assignment = assign_story(&no_hint(), &b.title, &[a.clone()]);
        assert_eq!(b_assignment, StoryAssignment::Joined { cluster: a.id });
        b.story_cluster = Some(a.id);

        let c = mention("Growers hail solar checkoff measure", None, None);
        let c_assignment = assign_story(&no_hint(), &c.title, &[a.clone(), b.clone()]);
        assert_eq!(c_assignment, StoryAssignment::Joined { cluster: a.id });

        assert!(a.first_seen_for_story);
        assert!(!b.first_seen_for_story);
    }

    // --- event-id clustering ---

    #[test]
    fn event_id_match_joins_cluster() {
        let a = mention("Checkoff vote", Some("evt-1"), None);
        let assignment = assign_story(&event_hint("evt-1", false), "Unrelated headline", &[a.clone()]);
        assert_eq!(assignment, StoryAssignment::Joined { cluster: a.id });
    }

    #[test]
    fn event_id_without_match_starts_new_story() {
        let a = mention("Checkoff vote", Some("evt-1"), None);
        let assignment = assign_story(&event_hint("evt-2", false), "Other event coverage", &[a]);
        assert_eq!(assignment, StoryAssignment::NewStory);
    }

    #[test]
    fn event_id_present_skips_title_fallback() {
        // Same words as an existing title, but a different event id: no join.
        let a = mention("Solar checkoff bill passes", None, None);
        let assignment = assign_story(
            &event_hint("evt-9", false),
            "Solar checkoff bill passes",
            &[a],
        );
        assert_eq!(assignment, StoryAssignment::NewStory);
    }

    #[test]
    fn duplicate_attaches_to_clustered_mention() {
        let root = Uuid::new_v4();
        let unclustered = mention("Checkoff vote", Some("evt-1"), None);
        let clustered = mention("Checkoff vote wire copy", Some("evt-1"), Some(root));
        let assignment = assign_story(
            &event_hint("evt-1", true),
            "Checkoff vote syndicated",
            &[unclustered, clustered],
        );
        assert_eq!(assignment, StoryAssignment::Joined { cluster: root });
    }

    #[test]
    fn duplicate_without_match_self_clusters() {
        // Provider says duplicate, but nothing in the window matches: the
        // mention becomes its own story. Current behavior, kept as-is.
        let assignment = assign_story(&event_hint("evt-1", true), "Checkoff vote", &[]);
        assert_eq!(assignment, StoryAssignment::NewStory);
    }

    #[test]
    fn duplicate_with_only_unclustered_matches_self_clusters() {
        let unclustered = mention("Checkoff vote", Some("evt-1"), None);
        let assignment =
            assign_story(&event_hint("evt-1", true), "Checkoff vote copy", &[unclustered]);
        assert_eq!(assignment, StoryAssignment::NewStory);
    }
}
