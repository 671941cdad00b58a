use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use storeai::services::chat::{ChatDispatcher, FallbackPolicy};
use storeai::services::sweeper::SweepConfig;
use storeai::store::{StoreApiClient, StoreApiConfig};
use storeai::{llm, routes, services, state};

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let port: u16 = std::env::var("PORT")
        .unwrap_or_else(|_| "3000".into())
        .parse()
        .expect("invalid PORT");

    let store_config = StoreApiConfig::from_env().expect("invalid store API config");
    let store = Arc::new(StoreApiClient::new(&store_config).expect("store API client init failed"));

    // Missing completion config is not fatal: chat falls back to the agent endpoint.
    let completion = llm::from_env_optional().expect("invalid completion config");

    let policy = FallbackPolicy::from_env().expect("invalid CHAT_FALLBACK_POLICY");
    tracing::info!(?policy, store_api = store.is_configured(), "chat dispatcher ready");

    let chat = ChatDispatcher::new(completion, store.clone(), store.clone(), policy);
    if !chat.has_completion() {
        tracing::info!("chat replies come from the store agent endpoint");
    }
    let state = state::AppState::new(store, chat);
    let _sweeper = services::sweeper::spawn_session_sweeper(state.clone(), SweepConfig::from_env());

    let app = routes::app(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}"))
        .await
        .expect("failed to bind");

    tracing::info!(%port, "storeai listening");
    axum::serve(listener, app).await.expect("server failed");
}
