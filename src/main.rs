use anyhow::Context;
use image_rating::{config::Config, routes::create_router, startup::init_resources};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing (logging)
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "image_rating=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = Config::load().context("Failed to load configuration")?;
    tracing::info!(
        capacity = config.store_capacity,
        max_upload_bytes = config.max_upload_bytes,
        uploads_dir = %config.uploads_dir.display(),
        "Configuration loaded"
    );

    // --- Application State ---
    let state = init_resources(&config)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize resources: {}", e))?;

    // --- Router Definition ---
    let app = create_router(state, &config);

    // --- Server Startup ---
    tracing::info!("Server listening on http://{}", config.bind_address);

    let listener = tokio::net::TcpListener::bind(config.bind_address)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_address))?;
    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
