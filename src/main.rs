use anyhow::Result;

use coffee_shop_api::{app, auth, config, db, logging};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let settings = config::Settings::from_env()?;

    logging::init_logging(&settings.env);

    tracing::info!(
        env = ?settings.env,
        server_addr = %settings.server_addr,
        issuer = %settings.auth.issuer(),
        audience = %settings.auth.audience,
        jwks_cache_ttl_secs = settings.auth.jwks_cache_ttl.as_secs(),
        "Starting coffee shop API"
    );

    let drinks = db::create_store(&settings).await?;
    tracing::info!(backend = drinks.backend_name(), "Drink store initialized");

    let authorizer = auth::Authorizer::new(&settings.auth)?;

    let state = app::AppState::new(settings.clone(), authorizer, drinks);
    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&settings.server_addr).await?;
    tracing::info!("Listening on {}", settings.server_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
}
