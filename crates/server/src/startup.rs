use std::{env, net::SocketAddr};

use axum::Router;
use common::utils::logging::init_logging_default;
use dotenvy::dotenv;
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::routes::{self, ServerState};
use service::lines::LineStore;

/// Initialize logging via shared common utils
fn init_logging() {
    init_logging_default();
}

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

/// Load config from TOML, falling back to env vars and defaults.
fn load_config() -> configs::AppConfig {
    match configs::AppConfig::load_and_validate() {
        Ok(cfg) => cfg,
        Err(_) => {
            let mut cfg = configs::AppConfig::default();
            if let Ok(host) = env::var("SERVER_HOST") {
                cfg.server.host = host;
            }
            if let Some(port) = env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
                cfg.server.port = port;
            }
            cfg.storage.normalize_from_env();
            cfg
        }
    }
}

fn bind_addr(cfg: &configs::AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Public entry: build the app and run the HTTP server
pub async fn run() -> anyhow::Result<()> {
    dotenv().ok();
    init_logging();

    let cfg = load_config();

    common::env::ensure_env(&cfg.storage.data_dir).await?;

    // Line store persisted under the data directory
    let lines = LineStore::new(cfg.lines_path()).await?;
    let state = ServerState { lines };

    // Build router
    let cors = build_cors();
    let app: Router = routes::build_router(cors, state);

    // Bind and serve
    let addr = bind_addr(&cfg)?;
    info!(%addr, "starting lines server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
