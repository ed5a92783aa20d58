//! Content authorization gateway.
//!
//! - `GET /{resource}/{contentId}` behind a bearer token
//! - Policy file hot reload (`cas-app-config.yaml`)
//! - Graceful shutdown: readiness flips to draining, in-flight requests finish

use std::net::SocketAddr;

use tracing_subscriber::{fmt, EnvFilter};

use cas_core::error::{CasError, Result};
use cas_gateway::{app_state::AppState, config, policy, router};

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).init();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "cas-gateway stopped");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cfg = config::load_from_env()?;
    let listen: SocketAddr = cfg
        .listen
        .parse()
        .map_err(|e| CasError::Config(format!("invalid listen address {}: {e}", cfg.listen)))?;

    let source = policy::PolicySource::from_config(&cfg);
    let state = AppState::new(cfg, &source)?;

    let watcher = policy::watch(
        state.policy(),
        source,
        state.cfg().policy_reload_interval(),
        |p| tracing::debug!(drm_id = %p.required_drm_id(), "policy reload applied"),
    );

    let app = router::build_router(state.clone());

    tracing::info!(%listen, resource = %state.cfg().resource, "cas-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen)
        .await
        .map_err(|e| CasError::Internal(format!("failed to bind {listen}: {e}")))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(state))
        .await
        .map_err(|e| CasError::Internal(format!("server failed: {e}")))?;

    watcher.stop();
    Ok(())
}

async fn shutdown_signal(state: AppState) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "ctrl-c handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "SIGTERM handler unavailable");
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

    tracing::info!("shutdown requested, draining");
    state.metrics().set_draining();
}
