use clap::Parser;
use mlx_runtime::MockEngine;
use mlx_server::{AppState, ServerConfig};
use std::sync::Arc;

/// mlx-server — OpenAI-compatible local inference server
#[derive(Parser)]
#[command(name = "mlx-server", version)]
struct Cli {
    /// Model to pre-load at startup (registered under the id "default").
    #[arg(long)]
    model: Option<String>,

    /// Interface to bind.
    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    /// Port to bind.
    #[arg(long, default_value_t = 8000)]
    port: u16,

    /// Log level filter (trace/debug/info/warn/error).
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Ceiling on simultaneously loaded models.
    #[arg(long, default_value_t = 1)]
    max_loaded_models: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&cli.log_level)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig {
        host: cli.host,
        port: cli.port,
        log_level: cli.log_level,
        max_loaded_models: cli.max_loaded_models,
        ..ServerConfig::default()
    };

    // The mock backend ships until the native MLX bindings land; it
    // implements the same MlxEngine trait.
    let engine = Arc::new(MockEngine::new());
    let state = AppState::new(engine, config.clone());

    if let Some(path) = cli.model {
        let message = state.models.load_model(&path, "default").await?;
        tracing::info!(%message, "pre-loaded model");
    }

    let addr = format!("{}:{}", config.host, config.port).parse()?;
    mlx_server::run_server(state, addr).await
}
