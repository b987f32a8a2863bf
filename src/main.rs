// Command-line smoke check for the Overseas.ai API client.
// Fetches the first job page and reference lists through the shared cache.

use std::sync::Arc;

use overseas_api::api::JobQuery;
use overseas_api::{ApiClient, ApiConfig, CachedApi, RequestCache, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    if let Err(err) = run().await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let config = ApiConfig::from_env()?;
    tracing::info!(base_url = %config.base_url, "Using Overseas API");

    let cache = Arc::new(RequestCache::new(config.cache));
    let api = CachedApi::new(ApiClient::new(&config)?, Arc::clone(&cache));

    let jobs = api.jobs(&JobQuery::default()).await?;
    tracing::info!(
        count = jobs.data.len(),
        total = jobs.total,
        more = jobs.has_more(),
        "Fetched jobs"
    );
    for job in &jobs.data {
        println!(
            "{:>8}  {}  ({})",
            job.id,
            job.title,
            job.country.as_deref().unwrap_or("-")
        );
    }

    let countries = api.countries().await?;
    let occupations = api.occupations().await?;
    tracing::info!(
        countries = countries.len(),
        occupations = occupations.len(),
        "Fetched reference lists"
    );

    // Second read is served from memory.
    api.jobs(&JobQuery::default()).await?;

    let stats = cache.stats();
    tracing::info!(
        entries = stats.entries,
        endpoints = stats.tracked_endpoints,
        rate_limit = ?api.client().rate_limit(),
        "Cache state"
    );

    Ok(())
}
