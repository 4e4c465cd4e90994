//! PCBuilderAI Server - HTTP invocation API for the PCBuilderAI graph

mod handlers;
mod types;

use axum::{routing::{get, post}, Router};
use clap::Parser;
use pcbuilder::{Graph, ModelConfig};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use handlers::{info, invoke, AppState};

/// PCBuilderAI Server - run the PC builder graph behind HTTP
#[derive(Parser, Debug)]
#[command(name = "pcbuilder-server")]
#[command(about = "Serve the PCBuilderAI graph over HTTP")]
struct Args {
    /// Port to listen on
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Model to use for completions (defaults to PCBUILDER_MODEL, then gpt-4.1-nano)
    #[arg(short, long)]
    model: Option<String>,

    /// Backend LLM URL (e.g., http://localhost:11434/v1 for Ollama)
    #[arg(short = 'u', long)]
    backend_url: Option<String>,

    /// Backend API key (optional, uses OPENAI_API_KEY env var if not provided)
    #[arg(short = 'k', long)]
    backend_key: Option<String>,

    /// Temperature for sampling
    #[arg(short, long, default_value = "0.7")]
    temperature: f32,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut model_config = ModelConfig::from_env().with_temperature(args.temperature);
    if let Some(model) = &args.model {
        model_config.model = model.clone();
    }
    if let Some(url) = &args.backend_url {
        model_config = model_config.with_base_url(url);
    }
    if let Some(key) = &args.backend_key {
        model_config = model_config.with_api_key(key);
    }

    let model = model_config.model.clone();
    let graph = match Graph::openai(model_config) {
        Ok(g) => g,
        Err(e) => {
            tracing::error!("Failed to create model client: {}", e);
            std::process::exit(1);
        }
    };

    let state = Arc::new(AppState {
        graph,
        model: model.clone(),
    });

    // CORS configuration for browser clients
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/invoke", post(invoke))
        .route("/info", get(info))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], args.port));
    tracing::info!("PCBuilderAI Server starting on {}", addr);
    tracing::info!("Model: {}", model);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
