use std::net::SocketAddr;

use anyhow::Context;
use dotenvy::dotenv;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use academy::academy_config::DatabaseConfig;
use academy::academy_db::{init_db_pool, run_migrations};
use academy::logging::{init_tracing, shutdown_tracer};
use academy::metrics::{init_metrics, metrics_app};
use academy::router::init_router;
use academy::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    init_tracing()?;

    let database_config = DatabaseConfig::from_env().context("DATABASE_URL must be set")?;
    let db = init_db_pool(&database_config)
        .await
        .context("Failed to connect to database")?;

    if database_config.run_migrations {
        run_migrations(&db).await.context("Failed to run migrations")?;
    }

    let state = AppState::from_env(db);

    if state.server_config.is_production() && state.jwt_config.is_default_secret() {
        warn!("JWT_SECRET is not set; tokens are signed with the development secret");
    }

    if let Some(handle) = init_metrics()? {
        let metrics_addr = format!("{}:{}", state.server_config.host, state.server_config.metrics_port);
        let metrics_listener = TcpListener::bind(&metrics_addr)
            .await
            .with_context(|| format!("Failed to bind metrics listener on {metrics_addr}"))?;
        info!(address = %metrics_addr, "Metrics server listening");

        tokio::spawn(async move {
            if let Err(e) = axum::serve(metrics_listener, metrics_app(handle)).await {
                error!(error = %e, "Metrics server stopped");
            }
        });
    }

    let bind_address = state.server_config.bind_address();
    let app = init_router(state);

    let listener = TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("Failed to bind {bind_address}"))?;
    info!(address = %bind_address, "🚀 Server running");
    info!("📚 Swagger UI available at /swagger-ui, Scalar at /scalar");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    shutdown_tracer().await;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(error = %e, "Failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => error!(error = %e, "Failed to listen for SIGTERM"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
