//! One-shot analytics report for a single Moltbook profile
//!
//! Usage: profile_report <username> [limit]
//!
//! Prints the full set of served query shapes as one JSON document. Reads
//! the same environment as the service: set FIXTURE_DIR to run against
//! on-disk captures instead of live profile markup.

use std::sync::Arc;

use moltlytics::config::Config;
use moltlytics::retrieval::{FixtureSource, HtmlSource, InMemoryHistoryStore, ProfileSource};
use moltlytics::service::AnalyticsService;

const DEFAULT_LIMIT: usize = 10;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let username = match args.next() {
        Some(u) => u,
        None => {
            eprintln!("usage: profile_report <username> [limit]");
            std::process::exit(2);
        }
    };
    let limit: usize = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_LIMIT);

    let config = Config::from_env();
    let source: Arc<dyn ProfileSource> = match &config.fixture_dir {
        Some(dir) => Arc::new(FixtureSource::new(dir.as_str())),
        None => Arc::new(HtmlSource::new(
            &config.base_url,
            std::time::Duration::from_secs(config.fetch_timeout_secs),
        )?),
    };

    let service = AnalyticsService::new(
        source,
        Arc::new(InMemoryHistoryStore::new()),
        chrono::Duration::seconds(config.cache_ttl_secs),
    );

    let profile = service.profile_stats(&username).await?;
    let growth = service.growth_stats(&username).await?;
    let top_posts = service.top_posts(&username, limit).await?;
    let submolts = service.submolt_breakdown(&username).await?;
    let heatmap = service.timing_heatmap(&username).await?;
    let mentions = service.mentions(&username).await?;
    let activity = service.activity_feed(&username).await?;

    let report = serde_json::json!({
        "profile": profile,
        "growth": growth,
        "top_posts": top_posts,
        "submolts": submolts,
        "timing": heatmap,
        "mentions": mentions,
        "activity": activity,
    });
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
