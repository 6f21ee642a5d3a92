use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use caseflow_api::AppStateInner;

/// Default topic vocabulary served at /topics when CASEFLOW_TOPICS is unset.
/// The filter engine itself is independent of this list.
const DEFAULT_TOPICS: &[&str] = &[
    "Logo design",
    "Website development",
    "Website markup",
    "Website design",
    "Print design",
    "Web development",
    "Mobile app development",
    "Packaging design",
    "Illustration",
    "Presentation design",
    "Infographic design",
    "Social media design",
    "3D modeling and visualization",
    "Merch design",
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "caseflow=debug,tower_http=debug".into()),
        )
        .init();

    // Config
    let jwt_secret =
        std::env::var("CASEFLOW_JWT_SECRET").unwrap_or_else(|_| "dev-secret-change-me".into());
    let db_path = std::env::var("CASEFLOW_DB_PATH").unwrap_or_else(|_| "caseflow.db".into());
    let storage_dir: PathBuf = std::env::var("CASEFLOW_STORAGE_DIR")
        .unwrap_or_else(|_| "./uploads".into())
        .into();
    let host = std::env::var("CASEFLOW_HOST").unwrap_or_else(|_| "0.0.0.0".into());
    let port: u16 = std::env::var("CASEFLOW_PORT")
        .unwrap_or_else(|_| "3001".into())
        .parse()?;
    let topics = match std::env::var("CASEFLOW_TOPICS") {
        Ok(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect(),
        Err(_) => DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect(),
    };

    // Init database and blob storage
    let db = caseflow_db::Database::open(&PathBuf::from(&db_path))?;
    let storage = caseflow_storage::Storage::new(storage_dir).await?;

    let state = Arc::new(AppStateInner {
        db,
        storage,
        jwt_secret,
        topics,
    });

    let app = caseflow_api::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Caseflow server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = tokio::signal::ctrl_c();
    #[cfg(unix)]
    {
        let mut sigterm =
            tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
            _ = sigterm.recv() => info!("Received SIGTERM, shutting down..."),
        }
    }
    #[cfg(not(unix))]
    {
        ctrl_c.await.ok();
        info!("Received Ctrl+C, shutting down...");
    }
}
