use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Main entry point for the Quill application
///
/// Loads configuration and content, then serves the REST API and Swagger UI.
///
/// # Environment Variables
/// - `QUILL_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `QUILL_SUBMIT_DELAY_MS`: simulated submission delay (default: 500)
/// - `QUILL_SITE_URL`: public base URL for share links (default: "http://localhost:3000")
/// - `QUILL_CONTENT_FILE`: optional YAML content file
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, content loading or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quill_run=info".parse()?)
                .add_directive("api_rest=info".parse()?)
                .add_directive("quill_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = api_rest::rest_addr_from_env();
    let cfg = api_rest::config_from_env()?;
    let state = api_rest::build_state(cfg)?;

    tracing::info!(
        articles = state.blog.store().articles().len(),
        site_url = state.blog.config().site_url(),
        "Content loaded"
    );
    tracing::info!("++ Starting Quill REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, api_rest::router(state)).await?;

    Ok(())
}
