use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::{HeaderMap, StatusCode},
};
use vantage_core::ai::handler::AiError;
use vantage_core::guards::dto::RateLimitDecision;
use vantage_core::guards::handler::{MISSING_INPUTS, is_body_too_large, validate_analysis_inputs};
use vantage_core::portfolio::dto::FollowUpQuestionsRequest;

use crate::{error::ErrorServer, middlewares::handler::client_ip, state::ServerState};

#[utoipa::path(
    post,
    path = "/follow-up-questions",
    request_body = FollowUpQuestionsRequest,
    description = "Generate follow-up questions for a previous analysis",
    responses(
        (status = 200, description = "Success", body = [String]),
        (status = 400, description = "Bad Request"),
        (status = 413, description = "Payload Too Large"),
        (status = 429, description = "Too Many Requests"),
        (status = 500, description = "Internal Server Error"),
    )
)]
#[axum::debug_handler]
pub async fn follow_up_questions(
    State(server_state): State<Arc<ServerState>>,
    headers: HeaderMap,
    Json(request): Json<FollowUpQuestionsRequest>,
) -> Result<Json<Vec<String>>, ErrorServer> {
    let config = server_state.config();

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

    let previous_analysis = request.previous_analysis.as_ref().ok_or_else(|| {
        ErrorServer::new(StatusCode::BAD_REQUEST, "Previous analysis is required.")
    })?;

    let ip = client_ip(&headers);
    if let RateLimitDecision::Denied {
        retry_after_secs,
        message,
    } = server_state.limiter().enforce("ai", &ip)
    {
        log::warn!("Denied follow-up-questions request from {}: {}", ip, message);
        return Err(ErrorServer::too_many_requests(message, retry_after_secs));
    }

    let (portfolio, macro_views) = match (
        request.portfolio.as_ref(),
        request.macro_views.as_ref(),
    ) {
        (Some(portfolio), Some(macro_views)) => (portfolio, macro_views),
        _ => return Err(ErrorServer::new(StatusCode::BAD_REQUEST, MISSING_INPUTS)),
    };

    let questions = server_state
        .ai()
        .generate_follow_up_questions(portfolio, macro_views, previous_analysis)
        .await
        .map_err(|e| match e {
            AiError::MissingApiKey => {
                ErrorServer::new(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
            AiError::Upstream(message) => ErrorServer::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to generate follow-up questions: {}", message),
            ),
        })?;

    Ok(Json(questions))
}
