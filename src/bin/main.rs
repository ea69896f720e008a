use anyhow::{Context, Result};
use emby_cover::core::renderer::CoverRenderer;
use emby_cover::settings::get_config;
use emby_cover::{AppState, init_route};
use poem::listener::TcpListener;
use tracing::Level;

use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let (config, source) = get_config()?;

    let log_level: Level = config
        .log_level
        .parse()
        .with_context(|| format!("invalid LOG_LEVEL: {}", config.log_level))?;
    // Logging to File
    let file_appender = tracing_appender::rolling::daily(&config.log_dir, "app.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_writer(non_blocking)
        .with_max_level(log_level)
        .init();

    tracing::info!("Initializing Cover Service...");
    tracing::info!("{}", source);
    tracing::info!("run with config: {:?}", config);

    let renderer = Arc::new(CoverRenderer::from_config(&config)?);

    // Init App State
    let app_state = Arc::new(AppState { renderer });

    tracing::info!("Cover renderer initialized, font family: {}", app_state.renderer.font_family());

    let app = init_route(app_state);
    tracing::info!("run server on {}:{}", config.host, config.port);
    poem::Server::new(TcpListener::bind(format!("{}:{}", config.host, config.port)))
        .run(app)
        .await?;

    Ok(())
}
