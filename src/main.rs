
pub mod aggregate;
pub mod cache;
pub mod compare;
pub mod config;
pub mod error;
pub mod extractor;
pub mod growth;
pub mod metrics;
pub mod model;
pub mod retrieval;
pub mod service;

use {
    chrono::Duration,
    config::Config,
    retrieval::{FixtureSource, HtmlSource, InMemoryHistoryStore, ProfileSource},
    service::AnalyticsService,
    std::sync::Arc,
};

#[tokio::main]
pub async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    let config = Config::from_env();

    let mut builder = if config.rust_log.is_some() {
        env_logger::Builder::from_default_env()
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
    };
    builder.target(env_logger::Target::Stderr).init();

    log::info!("🚀 Starting Moltlytics...");
    log::info!("📊 Configuration:");
    log::info!("   MOLTBOOK_BASE_URL: {}", config.base_url);
    log::info!("   CACHE_TTL_SECS: {}", config.cache_ttl_secs);

    let username = std::env::args()
        .nth(1)
        .ok_or("usage: moltlytics <username>")?;

    let source: Arc<dyn ProfileSource> = match &config.fixture_dir {
        Some(dir) => {
            log::info!("   FIXTURE_DIR: {}", dir);
            Arc::new(FixtureSource::new(dir.as_str()))
        }
        None => Arc::new(HtmlSource::new(
            &config.base_url,
            std::time::Duration::from_secs(config.fetch_timeout_secs),
        )?),
    };

    let service = AnalyticsService::new(
        source,
        Arc::new(InMemoryHistoryStore::new()),
        Duration::seconds(config.cache_ttl_secs),
    );

    let profile = service.profile_stats(&username).await?;
    println!("{}", serde_json::to_string_pretty(&profile)?);

    let growth = service.growth_stats(&username).await?;
    println!("{}", serde_json::to_string_pretty(&growth)?);

    let posts = service.top_posts(&username, 10).await?;
    println!("{}", serde_json::to_string_pretty(&posts)?);

    Ok(())
}
