use clap::Parser;
use krishi_gateway::api;
use krishi_gateway::config::{GatewayConfig, DEFAULT_BACKEND_ORIGIN};
use krishi_gateway::state::AppState;
use krishi_gateway::storage;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Origin of the claims backend that /api/claims/* is forwarded to
    #[arg(long, env = "BACKEND_ORIGIN", default_value = DEFAULT_BACKEND_ORIGIN)]
    backend_origin: String,

    /// Data directory for the durable key-value store
    #[arg(short, long, env = "DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Directory containing static frontend files (for production)
    #[arg(long, env = "STATIC_DIR")]
    static_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let config = match GatewayConfig::new(&args.backend_origin) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("{}", e);
            std::process::exit(1);
        }
    };
    tracing::info!("Forwarding /api/claims/* to {}", config.backend_origin());

    // Storage backend is picked once here; select() logs which one.
    let store = storage::select(args.data_dir);
    let state = Arc::new(AppState::new(config, store));

    let app = api::build_routes(state)
        .layer(CorsLayer::permissive())
        .layer(axum::middleware::from_fn(api::common::request_logger));

    // Add static file serving if STATIC_DIR is provided (production mode)
    let app = if let Some(static_dir) = &args.static_dir {
        let index_path = static_dir.join("index.html");
        if static_dir.exists() && index_path.exists() {
            tracing::info!("Serving static files from {:?}", static_dir);
            // ServeDir with fallback to index.html for SPA routing
            let serve_dir =
                ServeDir::new(static_dir).not_found_service(ServeFile::new(&index_path));
            app.fallback_service(serve_dir)
        } else {
            tracing::warn!("Static directory {:?} or index.html not found", static_dir);
            app
        }
    } else {
        app
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("Gateway listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind port");
    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
