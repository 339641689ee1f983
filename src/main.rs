use std::sync::Arc;

use clap::Parser;
use fb_resolver::config::{Cli, Config, default_config_path};
use fb_resolver::handler::{AppState, build_router};
use fb_resolver::lookup::GraphClient;
use fb_resolver::resolver::Resolver;
use fb_resolver::unpack_error;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Cli::parse();

    // .env is optional; values already in the environment win
    let _ = dotenvy::dotenv();

    let config_path = match args.config_path {
        Some(path) => std::path::PathBuf::from(path),
        None => default_config_path(),
    };

    tracing_subscriber::fmt()
        .json()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
    tracing::info!("fb-resolver.svc starting");

    let cfg = if config_path.exists() {
        Config::new(&config_path.to_string_lossy()).unwrap_or_else(|e| {
            tracing::error!(error = %e, path = ?config_path, "failed to load config file");
            std::process::exit(1);
        })
    } else {
        tracing::warn!(path = ?config_path, "config file not found, reading settings from environment");
        Config::from_env().unwrap_or_else(|e| {
            tracing::error!(error = %e, "failed to build config from environment");
            std::process::exit(1);
        })
    };

    let resolver_config = cfg.resolver_config();
    if resolver_config.credentials().is_empty() {
        tracing::warn!("facebook app credentials are not set, graph lookups will fail");
    }

    let overrides = if resolver_config.dev_mode_enabled {
        let table = cfg.override_table().unwrap_or_else(|e| {
            tracing::error!(error = %e, "invalid override table");
            std::process::exit(1);
        });
        tracing::warn!(entries = table.len(), "dev mode enabled, override table active");
        Some(table)
    } else {
        None
    };

    let lookup = GraphClient::new(&cfg.facebook).unwrap_or_else(|e| {
        tracing::error!(error = %unpack_error(&e), "failed to setup graph client");
        std::process::exit(1);
    });

    let resolver = Arc::new(Resolver::new(Arc::new(lookup), resolver_config, overrides));
    let app = build_router(AppState { resolver });

    let address = format!("0.0.0.0:{}", cfg.app.get_port());
    let cancellation_token = CancellationToken::new();

    let listener = tokio::net::TcpListener::bind(&address).await.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to setup tcp listener");
        std::process::exit(1);
    });

    let shutdown_token = cancellation_token.clone();
    tokio::spawn(async move {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl+c");
            return;
        }
        tracing::info!("ctrl+c signal received, preparing to shutdown");
        shutdown_token.cancel();
    });

    tracing::info!("fb-resolver.svc running on {}", &address);
    let result = axum::serve(listener, app)
        .with_graceful_shutdown(cancellation_token.cancelled_owned())
        .await;

    if let Err(err) = result {
        tracing::error!(error = %err, "server error");
        std::process::exit(1);
    }

    tracing::info!("fb-resolver.svc going off, graceful shutdown complete");
}
