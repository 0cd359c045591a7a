use std::net::SocketAddr;

use aula::aula_config::AppConfig;
use aula::aula_db::{init_db_pool, run_migrations};
use aula::logging::{init_tracing, shutdown_tracer};
use aula::metrics::{init_metrics, metrics_router};
use aula::router::init_router;
use aula::state::AppState;
use dotenvy::dotenv;
use tracing::{error, info, warn};

fn abort(message: &str, err: impl std::fmt::Display) -> ! {
    error!(error = %err, "{}", message);
    eprintln!("❌ {}: {}", message, err);
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    dotenv().ok();
    init_tracing();

    let config = AppConfig::from_env().unwrap_or_else(|e| abort("Invalid configuration", e));
    let address = config.server.address();

    let db = init_db_pool(&config.database)
        .await
        .unwrap_or_else(|e| abort("Failed to connect to database", e));

    if config.database.run_migrations {
        if let Err(e) = run_migrations(&db).await {
            abort("Failed to run migrations", e);
        }
    }

    let state = AppState::init(db, config)
        .unwrap_or_else(|e| abort("Failed to wire application services", e));

    let mut app = init_router(state);
    match init_metrics() {
        Ok(Some(handle)) => app = app.merge(metrics_router(handle)),
        Ok(None) => info!("Metrics disabled"),
        Err(e) => warn!(error = %e, "Failed to initialize metrics, continuing without them"),
    }

    let listener = tokio::net::TcpListener::bind(&address)
        .await
        .unwrap_or_else(|e| abort("Failed to bind listener", e));

    info!(%address, "Server running");
    info!("Swagger UI available at http://{}/swagger-ui", address);
    info!("Scalar UI available at http://{}/scalar", address);

    if let Err(e) = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    {
        error!(error = %e, "Server error");
    }

    shutdown_tracer();
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to install Ctrl+C handler");
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
                warn!(error = %e, "Failed to install SIGTERM handler");
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

    info!("Shutdown signal received");
}
