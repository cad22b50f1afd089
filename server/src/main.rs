use std::net::SocketAddr;
use std::path::PathBuf;

use axum::http::{header, HeaderValue};
use axum::Router;
use clap::Parser;
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

const DEFAULT_PORT: u16 = 3000;

/// Serve the map viewer page, its wasm bundle and the map image.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Directory holding index.html, pkg/ and the map image.
    #[arg(long)]
    public_dir: Option<PathBuf>,
    /// Port to listen on; falls back to $PORT, then 3000.
    #[arg(long)]
    port: Option<u16>,
}

impl Args {
    fn public_dir(&self) -> PathBuf {
        self.public_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../public"))
    }

    fn port(&self) -> u16 {
        self.port
            .or_else(|| {
                std::env::var("PORT")
                    .ok()
                    .and_then(|value| value.parse().ok())
            })
            .unwrap_or(DEFAULT_PORT)
    }
}

fn app(public_dir: PathBuf) -> Router {
    Router::new()
        .fallback_service(ServeDir::new(public_dir).append_index_html_on_directories(true))
        // Rebuilt wasm bundles must not be served stale.
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache"),
        ))
        .layer(TraceLayer::new_for_http())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let public_dir = args.public_dir();
    if !public_dir.is_dir() {
        tracing::warn!("Public dir {} does not exist", public_dir.display());
    }
    let port = args.port();
    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!("Failed to bind {addr}: {error}");
            std::process::exit(1);
        }
    };
    tracing::info!(
        "Map viewer running at http://localhost:{port} (serving {})",
        public_dir.display()
    );
    if let Err(error) = axum::serve(listener, app(public_dir)).await {
        tracing::error!("Server stopped: {error}");
        std::process::exit(1);
    }
}
