mod api;
mod middleware;

use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

use mukka_core::MatcherPolicy;
use mukka_exdata::{ExdataClient, SnapshotStore};
use mukka_kakao::KakaoClient;
use mukka_routes::RoutePlanner;

use crate::api::{build_app, default_rate_limit_state, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = mukka_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, addr = %config.bind_addr, "starting mukka-server");

    let kakao = KakaoClient::new(&config.kakao_rest_api_key, config.http_timeout_secs)?
        .with_retry(config.http_max_retries, config.http_retry_backoff_base_ms);
    let exdata = ExdataClient::new(&config.expressway_api_key, config.http_timeout_secs)?;
    let snapshot = SnapshotStore::new(
        &config.snapshot_path,
        Duration::from_secs(config.snapshot_ttl_secs),
    );
    let planner = RoutePlanner::new(kakao, exdata, snapshot, MatcherPolicy::default());

    let app = build_app(
        AppState {
            planner: Arc::new(planner),
        },
        default_rate_limit_state(),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
