mod api_error;
mod app;
mod handlers;
mod process_request;
mod process_response;

use anyhow::Context;
use app::{router, AppState};
use pdf_search::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize environment variables and logging
    let config = Config::from_env()?;
    env_logger::init();

    if config.api_key.is_none() {
        log::error!("GEMINI_API_KEY environment variable not set; /api/process will answer 500");
    }

    let state = AppState::from_config(&config)?;
    let app = router(state, &config.public_dir);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    log::info!(
        "Listening on {} (model {}, PDF limit {} bytes)",
        listener.local_addr()?,
        config.model,
        config.max_pdf_bytes
    );
    axum::serve(listener, app).await?;

    Ok(())
}
