use anyhow::Result;
use std::net::SocketAddr;
use std::path::Path;
use tokio::signal;
use tracing_subscriber::EnvFilter;

use vigil_model::registry::ModelRegistry;
use vigil_server::config::ServerConfig;
use vigil_server::state::AppState;
use vigil_server::{app, simulator};

#[allow(clippy::print_stderr)]
fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  vigil-server [config.toml]    Start the server (defaults apply when the file is absent)");
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("vigil=info".parse()?))
        .init();

    let args: Vec<String> = std::env::args().collect();
    match args.get(1).map(|s| s.as_str()) {
        Some("--help" | "-h") => {
            print_usage();
            Ok(())
        }
        arg => {
            let config_path = arg.unwrap_or("config/server.toml");
            run_server(config_path).await
        }
    }
}

async fn run_server(config_path: &str) -> Result<()> {
    let config = ServerConfig::load_or_default(config_path)?;

    tracing::info!(
        http_port = config.http_port,
        data_dir = %config.data_dir,
        models_dir = %config.models_dir,
        "vigil-server starting"
    );

    let registry = ModelRegistry::load_all(Path::new(&config.models_dir));
    if registry.is_empty() {
        tracing::warn!(
            models_dir = %config.models_dir,
            "No model artifacts loaded, serving placeholder keys with random fallback scoring"
        );
    } else {
        tracing::info!(count = registry.len(), "Model registry loaded");
    }

    let simulator_config = config.simulator.clone();
    let state = AppState::build(config, registry)?;

    let simulator_handle = if simulator_config.enabled {
        simulator::spawn(state.store.clone(), simulator_config.interval_secs)
    } else {
        tracing::info!("Synthetic traffic generator disabled");
        None
    };

    let http_addr: SocketAddr = format!("0.0.0.0:{}", state.config.http_port).parse()?;
    let app = app::build_http_app(state.clone());
    let listener = tokio::net::TcpListener::bind(http_addr).await?;
    let http_server = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    );

    tracing::info!(http = %http_addr, "Server started");

    tokio::select! {
        result = http_server.with_graceful_shutdown(async { signal::ctrl_c().await.ok(); }) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "HTTP server error");
            }
        }
        _ = signal::ctrl_c() => {
            tracing::info!("Shutting down gracefully");
        }
    }

    if let Some(h) = simulator_handle {
        h.abort();
    }
    tracing::info!("Server stopped");

    Ok(())
}
