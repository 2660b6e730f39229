use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
};
use vantage_core::ai::handler::AiError;
use vantage_core::guards::dto::RateLimitDecision;
use vantage_core::guards::handler::{
    MISSING_INPUTS, is_body_too_large, validate_analysis_inputs, validate_questions,
};
use vantage_core::portfolio::dto::{AnalysisRequest, AnalysisResponse};

use crate::{error::ErrorServer, middlewares::handler::client_ip, state::ServerState};

#[utoipa::path(
    post,
    path = "/analyze",
    request_body = AnalysisRequest,
    description = "Analyze a portfolio against the stated macro views",
    responses(
        (status = 200, description = "Success", body = AnalysisResponse),
        (status = 400, description = "Bad Request"),
        (status = 413, description = "Payload Too Large"),
        (status = 429, description = "Too Many Requests"),
        (status = 500, description = "Internal Server Error"),
    )
)]
#[axum::debug_handler]
pub async fn analyze(
    State(server_state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(request): Json<AnalysisRequest>,
) -> Result<Json<AnalysisResponse>, ErrorServer> {
    let config = server_state.config();

    log::info!(
        "Received analyze request with {} assets",
        request
            .portfolio
            .as_ref()
            .map(|portfolio| portfolio.assets.len())
            .unwrap_or(0)
    );

    if is_body_too_large(&request, config) {
        return Err(ErrorServer::new(
            StatusCode::PAYLOAD_TOO_LARGE,
            format!(
                "Request exceeds the maximum of {} characters.",
                config.max_body_chars
            ),
        ));
    }

    if let Some(reason) = validate_analysis_inputs(
        request.portfolio.as_ref(),
        request.macro_views.as_ref(),
        config,
    ) {
        return Err(ErrorServer::new(StatusCode::BAD_REQUEST, reason));
    }

    if let Some(reason) = validate_questions(request.specific_questions.as_deref(), config) {
        return Err(ErrorServer::new(StatusCode::BAD_REQUEST, reason));
    }

    let ip = client_ip(&headers);
    if let RateLimitDecision::Denied {
        retry_after_secs,
        message,
    } = server_state.limiter().enforce("ai", &ip)
    {
        log::warn!("Denied analyze request from {}: {}", ip, message);
        return Err(ErrorServer::too_many_requests(message, retry_after_secs));
    }

    // Validation already established presence of both inputs.
    let (portfolio, macro_views) = match (
        request.portfolio.as_ref(),
        request.macro_views.as_ref(),
    ) {
        (Some(portfolio), Some(macro_views)) => (portfolio, macro_views),
        _ => return Err(ErrorServer::new(StatusCode::BAD_REQUEST, MISSING_INPUTS)),
    };

    let result = server_state
        .ai()
        .analyze(
            portfolio,
            macro_views,
            request.specific_questions.as_deref(),
        )
        .await
        .map_err(|e| match e {
            AiError::MissingApiKey => {
                ErrorServer::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AiError::Upstream(message) => ErrorServer::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to analyze portfolio: {}", message),
            ),
        })?;

    Ok(Json(result))
}
