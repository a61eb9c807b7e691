use std::sync::Arc;

use commuter_api::config::AppConfig;
use commuter_api::AppState;
use commuter_shared::clients::supabase::SupabaseClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    commuter_shared::middleware::init_tracing("commuter-api");

    // Load configuration
    let config = AppConfig::load()?;
    let port = config.port;

    // Backend client, shared by every request
    let backend = SupabaseClient::new(
        &config.supabase_url,
        &config.supabase_anon_key,
        config.request_timeout(),
    )?;
    tracing::info!(url = %backend.url(), "supabase client ready");

    // Initialize Prometheus metrics
    let metrics_handle = commuter_shared::middleware::init_metrics()?;

    let state = Arc::new(AppState {
        config,
        backend: Arc::new(backend),
        metrics_handle: Some(metrics_handle),
    });

    let app = commuter_api::create_router(state);

    let addr = format!("0.0.0.0:{port}");
    tracing::info!(addr = %addr, "commuter-api starting");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
