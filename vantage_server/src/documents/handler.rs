use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::StatusCode,
};
use vantage_core::portfolio::dto::{MacroViews, Portfolio};

use crate::{error::ErrorServer, state::ServerState};

// The wholesale-JSON document boundary. These endpoints sit outside the
// admission-guarded AI proxy.

#[utoipa::path(
    get,
    path = "/portfolio",
    description = "Fetch the stored portfolio, creating the default document when absent",
    responses(
        (status = 200, description = "Success", body = Portfolio),
        (status = 500, description = "Internal Server Error"),
    )
)]
#[axum::debug_handler]
pub async fn get_portfolio(
    State(server_state): State<Arc<ServerState>>,
) -> Result<Json<Portfolio>, ErrorServer> {
    let portfolio = server_state
        .documents()
        .get_or_create_portfolio()
        .map_err(|e| ErrorServer::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(portfolio))
}

#[utoipa::path(
    put,
    path = "/portfolio",
    request_body = Portfolio,
    description = "Replace the stored portfolio",
    responses(
        (status = 200, description = "Success", body = Portfolio),
        (status = 500, description = "Internal Server Error"),
    )
)]
#[axum::debug_handler]
pub async fn put_portfolio(
    State(server_state): State<Arc<ServerState>>,
    Json(portfolio): Json<Portfolio>,
) -> Result<Json<Portfolio>, ErrorServer> {
    server_state
        .documents()
        .save_portfolio(&portfolio)
        .map_err(|e| ErrorServer::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(portfolio))
}

#[utoipa::path(
    get,
    path = "/macro-views",
    description = "Fetch the stored macro views, creating the default document when absent",
    responses(
        (status = 200, description = "Success", body = MacroViews),
        (status = 500, description = "Internal Server Error"),
    )
)]
#[axum::debug_handler]
pub async fn get_macro_views(
    State(server_state): State<Arc<ServerState>>,
) -> Result<Json<MacroViews>, ErrorServer> {
    let macro_views = server_state
        .documents()
        .get_or_create_macro_views()
        .map_err(|e| ErrorServer::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(macro_views))
}

#[utoipa::path(
    put,
    path = "/macro-views",
    request_body = MacroViews,
    description = "Replace the stored macro views",
    responses(
        (status = 200, description = "Success", body = MacroViews),
        (status = 500, description = "Internal Server Error"),
    )
)]
#[axum::debug_handler]
pub async fn put_macro_views(
    State(server_state): State<Arc<ServerState>>,
    Json(macro_views): Json<MacroViews>,
) -> Result<Json<MacroViews>, ErrorServer> {
    server_state
        .documents()
        .save_macro_views(&macro_views)
        .map_err(|e| ErrorServer::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()))?;

    Ok(Json(macro_views))
}
