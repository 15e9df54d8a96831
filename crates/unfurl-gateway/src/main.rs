use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use jiff::SignedDuration;
use tracing::info;
use unfurl_core::LinkStore;
use unfurl_gateway::app::router;
use unfurl_gateway::cli::{SelectionArg, StorageBackendArg, CLI};
use unfurl_gateway::state::AppState;
use unfurl_gateway::visit::LogVisitSink;
use unfurl_resolver::{
    InstagramProvider, PoolSettings, ResolverPool, SelectionPolicy, TikTokProvider,
    TwitterResolver,
};
use unfurl_service::{LinkResolutionService, RandomIdGenerator, ServiceSettings};
use unfurl_store::{InMemoryLinkStore, RedisLinkStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = CLI::try_parse()?;

    info!(
        listen_addr = %config.listen_addr,
        base_url = %config.base_url,
        storage_backend = %config.storage,
        selection = %config.selection,
        "starting unfurl gateway"
    );

    let pool = build_pool(&config)?;
    let settings = ServiceSettings::builder()
        .retention(SignedDuration::from_hours(config.retention_days * 24))
        .build();

    match config.storage {
        StorageBackendArg::InMemory => {
            run_server(
                config.listen_addr,
                &config.base_url,
                InMemoryLinkStore::new(),
                pool,
                settings,
            )
            .await
        }
        StorageBackendArg::Redis => {
            let redis_url = config
                .redis_url
                .context("redis url is required when storage backend is redis")?;
            let client = redis::Client::open(redis_url.as_str())
                .context("invalid redis url")?;
            let conn = client
                .get_multiplexed_async_connection()
                .await
                .context("failed to connect to redis")?;
            run_server(
                config.listen_addr,
                &config.base_url,
                RedisLinkStore::new(conn),
                pool,
                settings,
            )
            .await
        }
    }
}

fn build_pool(config: &CLI) -> anyhow::Result<ResolverPool> {
    let timeout = Duration::from_secs(config.provider_timeout_secs);
    let selection = match config.selection {
        SelectionArg::Priority => SelectionPolicy::Priority,
        SelectionArg::Shuffled => SelectionPolicy::Shuffled,
    };

    let mut pool = ResolverPool::new(
        PoolSettings::builder()
            .provider_timeout(timeout)
            .selection(selection)
            .build(),
    );

    for endpoint in &config.tiktok_endpoints {
        pool.register(Arc::new(
            TikTokProvider::new(endpoint, timeout)
                .with_context(|| format!("bad tiktok endpoint: {endpoint}"))?,
        ));
    }
    for endpoint in &config.instagram_endpoints {
        pool.register(Arc::new(
            InstagramProvider::new(endpoint, timeout)
                .with_context(|| format!("bad instagram endpoint: {endpoint}"))?,
        ));
    }
    pool.register(Arc::new(
        TwitterResolver::with_mirror(&config.twitter_mirror, timeout)
            .context("bad twitter mirror")?,
    ));

    Ok(pool)
}

async fn run_server<S: LinkStore>(
    listen_addr: SocketAddr,
    base_url: &str,
    store: S,
    pool: ResolverPool,
    settings: ServiceSettings,
) -> anyhow::Result<()> {
    let service = LinkResolutionService::new(store, pool, RandomIdGenerator::new(), settings);
    let state = AppState::new(Arc::new(service), Arc::new(LogVisitSink), base_url);

    let listener = tokio::net::TcpListener::bind(listen_addr)
        .await
        .with_context(|| format!("failed to bind {listen_addr}"))?;
    axum::serve(listener, router(state))
        .await
        .context("server error")
}
