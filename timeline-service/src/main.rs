use std::net::SocketAddr;

use timeline_core::config::CoreConfig;
use timeline_core::errors::TimelineError;
use timeline_core::logging;
use timeline_service::http::{router, AppState};
use timeline_service::repository::TimelineRepository;
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), ServerError> {
    if let Err(err) = logging::init_tracing(None) {
        eprintln!("failed to initialise tracing: {err}");
    }

    let config = load_service_config()?;
    let bind_addr: SocketAddr = config
        .http_bind
        .clone()
        .unwrap_or_else(|| "0.0.0.0:10002".to_string())
        .parse()?;

    let repository = TimelineRepository::from_config(&config).await?;
    let state = AppState { repository };
    let app = router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    let actual_addr = listener.local_addr()?;
    info!(%actual_addr, "starting timeline service");
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

fn load_service_config() -> Result<CoreConfig, TimelineError> {
    CoreConfig::from_env_with_prefix("TIMELINE_")
        .or_else(|_| CoreConfig::from_env())
        .map_err(Into::into)
}

#[derive(Debug, thiserror::Error)]
enum ServerError {
    #[error("failed to bind timeline service: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid bind address: {0}")]
    Addr(#[from] std::net::AddrParseError),
    #[error("startup error: {0}")]
    Startup(#[from] TimelineError),
    #[error("http server error: {0}")]
    Server(#[from] hyper::Error),
}
