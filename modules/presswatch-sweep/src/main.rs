use std::sync::Arc;

use anyhow::Result;
use chrono::{Duration, Utc};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use ai_client::Claude;
use eventregistry_client::EventRegistryClient;
use firecrawl_client::FirecrawlClient;
use presswatch_common::Config;
use presswatch_sweep::discovery::ProviderDiscovery;
use presswatch_sweep::query;
use presswatch_sweep::relevance::{ClaudeRelevance, PassThroughRelevance};
use presswatch_sweep::sentiment::{ClaudeSentiment, KeywordSentiment};
use presswatch_sweep::store::PgMentionStore;
use presswatch_sweep::sweep::Sweeper;
use presswatch_sweep::traits::{MentionStore, RelevanceClassifier, SentimentClassifier};

#[derive(Parser, Debug)]
#[command(name = "presswatch-sweep", about = "Run one media-mention sweep")]
struct Args {
    /// Sweep a single topic instead of all active topics.
    #[arg(long)]
    topic: Option<Uuid>,

    /// Print the queries each topic would run, then exit.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("presswatch=info".parse()?))
        .init();

    let args = Args::parse();

    info!("PressWatch sweep starting...");
    let config = Config::from_env();
    config.log_redacted();

    let store = PgMentionStore::connect(&config.database_url).await?;
    store.migrate().await?;
    let store: Arc<dyn MentionStore> = Arc::new(store);

    let mut topics = store.active_topics().await?;
    if let Some(topic_id) = args.topic {
        topics.retain(|t| t.id == topic_id);
        anyhow::ensure!(!topics.is_empty(), "No active topic with id {topic_id}");
    }

    if args.dry_run {
        for topic in &topics {
            println!("{} ({})", topic.name, topic.id);
            println!("  structured: {:?}", query::structured_query(topic));
            println!("  web:        {:?}", query::web_query(topic));
        }
        return Ok(());
    }

    let structured = (!config.event_registry_api_key.is_empty())
        .then(|| EventRegistryClient::new(config.event_registry_api_key.clone()));
    let web = (!config.firecrawl_api_key.is_empty())
        .then(|| FirecrawlClient::new(&config.firecrawl_base_url, &config.firecrawl_api_key));
    let discovery = Arc::new(ProviderDiscovery::new(structured, web));

    let (relevance, sentiment): (Arc<dyn RelevanceClassifier>, Arc<dyn SentimentClassifier>) =
        if config.anthropic_api_key.is_empty() {
            info!("ANTHROPIC_API_KEY not set, relevance gate open and keyword sentiment only");
            (Arc::new(PassThroughRelevance), Arc::new(KeywordSentiment))
        } else {
            let claude = Claude::new(&config.anthropic_api_key, &config.claude_model);
            (
                Arc::new(ClaudeRelevance::new(claude.clone())),
                Arc::new(ClaudeSentiment::new(claude)),
            )
        };

    let mut sweeper = Sweeper::new(discovery, relevance, sentiment, store)
        .with_topic_concurrency(config.topic_concurrency);
    if let Some(minutes) = config.sweep_deadline_minutes {
        sweeper = sweeper.with_deadline(Utc::now() + Duration::minutes(minutes));
    }

    let report = sweeper.run_topics(&topics).await;
    println!("{report}");

    Ok(())
}
