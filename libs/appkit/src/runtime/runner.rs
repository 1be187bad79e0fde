//! Runner: init → db → rest → serve → stop.
//!
//! One `ModuleCtx` is built up front and reused for every phase; each module
//! sees it scoped to its own name. Shutdown is driven by OS signals or by an
//! external `CancellationToken`.

use axum::{routing::get, Router};
use sea_orm::DatabaseConnection;
use std::{net::SocketAddr, path::PathBuf, sync::Arc, time::Duration};
use tokio_util::sync::CancellationToken;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
};

use crate::context::{ConfigProvider, ModuleCtx, ModuleCtxBuilder};
use crate::http::request_id;
use crate::registry::ModuleRegistry;
use crate::runtime::shutdown;

pub enum ShutdownOptions {
    /// Ctrl+C / SIGTERM.
    Signals,
    /// An external owner cancels the token.
    Token(CancellationToken),
}

pub struct RunOptions {
    pub registry: ModuleRegistry,
    pub modules_cfg: Arc<dyn ConfigProvider>,
    pub db: Option<DatabaseConnection>,
    pub home_dir: PathBuf,
    pub bind_addr: SocketAddr,
    /// Zero or None disables the per-request timeout.
    pub request_timeout: Option<Duration>,
    pub shutdown: ShutdownOptions,
}

/// Run init, db and rest phases and wrap the result in the common HTTP layers.
pub async fn build_router(
    registry: &ModuleRegistry,
    ctx: &ModuleCtx,
    request_timeout: Option<Duration>,
) -> anyhow::Result<Router> {
    tracing::info!("Phase: init");
    registry.run_init_phase(ctx).await?;

    tracing::info!("Phase: db");
    registry.run_db_phase(ctx).await?;

    tracing::info!("Phase: rest");
    let base = Router::new().route("/healthz", get(|| async { "ok" }));
    let mut router = registry.run_rest_phase(ctx, base)?;

    if let Some(t) = request_timeout.filter(|t| !t.is_zero()) {
        router = router.layer(TimeoutLayer::new(t));
    }

    Ok(router
        .layer(request_id::create_trace_layer())
        .layer(PropagateRequestIdLayer::new(request_id::header()))
        .layer(SetRequestIdLayer::new(
            request_id::header(),
            request_id::MakeReqId,
        )))
}

pub async fn run(opts: RunOptions) -> anyhow::Result<()> {
    let cancel = match &opts.shutdown {
        ShutdownOptions::Token(t) => t.clone(),
        ShutdownOptions::Signals => CancellationToken::new(),
    };

    if let ShutdownOptions::Signals = opts.shutdown {
        let c = cancel.clone();
        tokio::spawn(async move {
            if let Err(e) = shutdown::wait_for_shutdown().await {
                tracing::warn!(error = %e, "shutdown: signal waiter failed; falling back to ctrl_c()");
                let _ = tokio::signal::ctrl_c().await;
            }
            tracing::info!("shutdown: signal received");
            c.cancel();
        });
    }

    let mut ctx_builder = ModuleCtxBuilder::new(cancel.clone())
        .with_config_provider(opts.modules_cfg.clone())
        .with_home_dir(opts.home_dir.clone());
    if let Some(db) = opts.db.clone() {
        ctx_builder = ctx_builder.with_db(db);
    }
    let ctx = ctx_builder.build();

    let router = build_router(&opts.registry, &ctx, opts.request_timeout).await?;

    let listener = tokio::net::TcpListener::bind(opts.bind_addr).await?;
    tracing::info!(addr = %opts.bind_addr, "Phase: serve");

    axum::serve(listener, router)
        .with_graceful_shutdown(cancel.clone().cancelled_owned())
        .await?;

    tracing::info!("Phase: stop");
    if let Some(db) = opts.db {
        if let Err(e) = db.close().await {
            tracing::warn!(error = %e, "closing database failed");
        }
    }
    Ok(())
}
