use anyhow::Result;
use dotenvy::dotenv;
use std::env;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

fn check_env() -> Result<()> {
    let required = ["TMDB_BEARER_TOKEN"];
    for key in required {
        if env::var(key).is_err() {
            anyhow::bail!("Missing required environment variable: {}", key);
        }
    }
    info!("All required environment variables are set");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    match dotenv() {
        Ok(path) => info!("Loaded environment from {:?}", path),
        Err(e) => warn!("No .env file loaded ({}) - relying on environment", e),
    }
    init_tracing();
    check_env()?;

    let ctx = cinescout::app::AppContext::from_env()?;
    ctx.load_trending().await;

    let trending = ctx.trending().borrow().clone();
    info!("Trending today ({} movies):", trending.len());
    for item in &trending {
        info!("  {:>4.1}  {}", item.vote_average, item.display_title());
    }
    info!("{} favorites saved locally", ctx.favorites.items().len());
    Ok(())
}
