use std::{env, sync::Arc};

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_redoc::{Redoc, Servable};
use vantage_core::ai::config::AiConfig;
use vantage_core::ai::handler::AI;
use vantage_core::guards::handler::RateLimiter;
use vantage_core::storage::handler::Documents;

use crate::{
    analyze::handler::analyze,
    docs::{dto::ApiDoc, handler::api_docs},
    documents::handler::{get_macro_views, get_portfolio, put_macro_views, put_portfolio},
    follow_up_questions::handler::follow_up_questions,
    info::handler::info,
    state::ServerState,
};

pub async fn router() -> Router {
    let config = AiConfig::from_env();

    let sled_path = env::var("SLED_URL").unwrap_or_else(|_| "vantage_db".to_string());
    let db = sled::open(&sled_path).expect("Failed to open sled DB");
    let documents = Documents::new(&db).expect("Failed to open the documents tree");

    let limiter = RateLimiter::new(config.rate_limit_per_minute, config.rate_limit_per_day);
    let ai = AI::new(config);

    let state = Arc::new(ServerState::from((ai, limiter, documents)));

    routes(state)
}

pub fn routes(state: Arc<ServerState>) -> Router {
    let doc = ApiDoc::openapi();

    Router::new()
        .merge(Redoc::with_url("/redoc", doc))
        .route("/", get(info))
        .route("/docs", get(api_docs))
        .route("/analyze", post(analyze))
        .route("/follow-up-questions", post(follow_up_questions))
        .route("/portfolio", get(get_portfolio).put(put_portfolio))
        .route("/macro-views", get(get_macro_views).put(put_macro_views))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
