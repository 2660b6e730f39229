use crate::{analyze, documents, follow_up_questions, info};
use utoipa::OpenApi;
use vantage_core::portfolio::dto::{
    AnalysisRequest, AnalysisResponse, Asset, AssetKind, FollowUpQuestionsRequest, MacroViews,
    Portfolio,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        info::handler::info,
        analyze::handler::analyze,
        follow_up_questions::handler::follow_up_questions,
        documents::handler::get_portfolio,
        documents::handler::put_portfolio,
        documents::handler::get_macro_views,
        documents::handler::put_macro_views,
    ),
    components(schemas(
        info::dto::Info,
        Asset,
        AssetKind,
        Portfolio,
        MacroViews,
        AnalysisRequest,
        AnalysisResponse,
        FollowUpQuestionsRequest,
    ))
)]
pub struct ApiDoc;
