use std::sync::Arc;

use anyhow::Context;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

use movie_curator::{
    config::Config,
    db::{self, ListStore, PgListStore},
    routes::{create_router, AppState},
    services::{
        providers::{HttpRecommendationProvider, RecommendationProvider},
        resolve_owner, CuratedListGenerator, CuratorSettings,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_curator=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let pool = db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .context("Failed to connect to database")?;
    db::run_migrations(&pool).await?;

    let store: Arc<dyn ListStore> = Arc::new(PgListStore::new(pool));
    let provider: Arc<dyn RecommendationProvider> = Arc::new(HttpRecommendationProvider::new(
        &config.recommendation_service_url,
        config.provider_timeout(),
    )?);

    let owner = resolve_owner(store.as_ref(), config.system_owner_id, &config.admin_role).await;
    tracing::info!(?owner, "Curated list owner resolved");

    let cancel = CancellationToken::new();
    let generator = CuratedListGenerator::new(
        Arc::clone(&provider),
        Arc::clone(&store),
        CuratorSettings::from_config(&config, owner.owner_id()),
    );
    let generator_task = tokio::spawn(generator.run(cancel.clone()));

    let app = create_router(AppState {
        store,
        provider,
        curator_owner_id: owner.owner_id(),
    });

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!(%addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel.clone()))
        .await?;

    // The server may also stop on its own; make sure the generator follows
    cancel.cancel();
    if let Err(e) = generator_task.await {
        tracing::error!(error = %e, "Curated list generator task failed");
    }

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C or SIGTERM and cancels background work
async fn shutdown_signal(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    cancel.cancel();
}
