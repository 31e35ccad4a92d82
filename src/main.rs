use std::sync::Arc;

use sticky_notes::{
    config::{self, StorageConfig},
    repository::{MemoryNoteStore, NoteStore, PgNoteStore},
    service::NoteService,
};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    // Log setup
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Load config
    let cfg = config::load_config().unwrap_or_else(|e| {
        tracing::error!("Failed to load config: {e}");
        panic!("failed to load config: {e}");
    });
    tracing::info!("Successfully loaded notes config");

    // Store creation and migration
    let store: Arc<dyn NoteStore> = match cfg.storage {
        StorageConfig::Postgres { dsn } => {
            let mut store = PgNoteStore::connect(&dsn).await.unwrap_or_else(|e| {
                tracing::error!("Failed to establish database connection: {e}");
                panic!("failed to establish database connection: {e}");
            });
            store.migrate().await.unwrap_or_else(|e| {
                tracing::error!("Failed to migrate database: {e}");
                panic!("failed to migrate database: {e}");
            });
            Arc::new(store)
        }
        StorageConfig::Memory => {
            tracing::warn!("Using in-memory storage, notes will not survive a restart");
            Arc::new(MemoryNoteStore::new())
        }
    };

    // Service and router
    let service = Arc::new(NoteService::new(store));
    let router = sticky_notes::router(service);

    let listener = tokio::net::TcpListener::bind(cfg.listen_addr)
        .await
        .unwrap_or_else(|e| {
            tracing::error!("Failed to bind to {}: {e}", cfg.listen_addr);
            panic!("failed to bind to {}: {e}", cfg.listen_addr);
        });

    tracing::info!("Notes server starting, listening on {}", cfg.listen_addr);

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!("HTTP server error: {e}");
        panic!("failed to start HTTP server: {e}");
    }

    tracing::info!("Notes server stopped");
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
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
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
