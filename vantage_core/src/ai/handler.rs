use reqwest::Client;
use thiserror::Error;

use crate::ai::config::AiConfig;
use crate::ai::dto::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage};
use crate::ai::prompt::{
    build_follow_up_prompt, build_initial_analysis_prompt, build_question_generation_prompt,
    FOLLOW_UP_SYSTEM_PROMPT, INITIAL_ANALYSIS_SYSTEM_PROMPT, QUESTION_GENERATION_SYSTEM_PROMPT,
};
use crate::portfolio::dto::{AnalysisResponse, MacroViews, Portfolio};
use crate::portfolio::handler::calculate_portfolio_summary;

const TEMPERATURE_INITIAL: f32 = 0.7;
const TEMPERATURE_FOLLOW_UP: f32 = 0.8;
const TEMPERATURE_QUESTIONS: f32 = 0.7;

pub const FALLBACK_QUESTIONS: [&str; 3] = [
    "What specific data supports your view on economic growth?",
    "How would your portfolio perform in a different interest rate environment?",
    "What evidence contradicts your investment thesis?",
];

#[derive(Debug, Error)]
pub enum AiError {
    #[error("OpenAI API key is not configured")]
    MissingApiKey,
    #[error("{0}")]
    Upstream(String),
}

/// Gateway to the completion service. One outbound call per request, no retry,
/// no backoff; every failure is wrapped into [`AiError::Upstream`] with the
/// underlying message.
#[derive(Clone)]
pub struct AI {
    http: Client,
    config: AiConfig,
}

impl AI {
    pub fn new(config: AiConfig) -> Self {
        Self {
            http: Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &AiConfig {
        &self.config
    }

    /// Routes to the follow-up conversation when a question is present,
    /// otherwise runs the initial committee analysis.
    pub async fn analyze(
        &self,
        portfolio: &Portfolio,
        macro_views: &MacroViews,
        specific_questions: Option<&[String]>,
    ) -> Result<AnalysisResponse, AiError> {
        let summary = calculate_portfolio_summary(portfolio);

        let raw_text = match specific_questions.and_then(|questions| questions.first()) {
            Some(question) => {
                log::info!("Sending follow-up question to the completion service");
                let prompt = build_follow_up_prompt(&summary, macro_views, question);
                self.complete(
                    FOLLOW_UP_SYSTEM_PROMPT,
                    &prompt,
                    TEMPERATURE_FOLLOW_UP,
                    self.config.max_tokens_followup,
                )
                .await?
            }
            None => {
                log::info!(
                    "Sending initial analysis request for {} assets",
                    portfolio.assets.len()
                );
                let prompt = build_initial_analysis_prompt(portfolio, &summary, macro_views);
                self.complete(
                    INITIAL_ANALYSIS_SYSTEM_PROMPT,
                    &prompt,
                    TEMPERATURE_INITIAL,
                    self.config.max_tokens_initial,
                )
                .await?
            }
        };

        Ok(AnalysisResponse::from(raw_text))
    }

    pub async fn generate_follow_up_questions(
        &self,
        portfolio: &Portfolio,
        macro_views: &MacroViews,
        previous_analysis: &AnalysisResponse,
    ) -> Result<Vec<String>, AiError> {
        let summary = calculate_portfolio_summary(portfolio);
        let prompt =
            build_question_generation_prompt(portfolio, &summary, macro_views, previous_analysis);

        let raw_text = self
            .complete(
                QUESTION_GENERATION_SYSTEM_PROMPT,
                &prompt,
                TEMPERATURE_QUESTIONS,
                self.config.max_tokens_questions,
            )
            .await?;

        let questions = extract_questions(&raw_text);
        if questions.is_empty() {
            log::warn!("Question generation returned no usable lines, serving fallbacks");
            return Ok(fallback_questions());
        }

        Ok(questions)
    }

    async fn complete(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> Result<String, AiError> {
        let api_key = self.config.api_key.as_deref().ok_or(AiError::MissingApiKey)?;

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage::system(system_prompt),
                ChatMessage::user(user_prompt),
            ],
            temperature,
            max_tokens,
        };

        let response = self
            .http
            .post(format!("{}/chat/completions", self.config.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| AiError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AiError::Upstream(format!(
                "completion service returned {}: {}",
                status, detail
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| AiError::Upstream(e.to_string()))?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default();

        Ok(content)
    }
}

pub fn fallback_questions() -> Vec<String> {
    FALLBACK_QUESTIONS
        .iter()
        .map(|question| question.to_string())
        .collect()
}

/// Keeps lines that look like list items (`-`, `•`, `*`, or `1.` prefixes)
/// and strips the prefix. Everything else in the model's text is prose.
pub fn extract_questions(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| {
            line.starts_with('-')
                || line.starts_with('•')
                || line.starts_with('*')
                || has_numbered_prefix(line)
        })
        .map(strip_list_prefix)
        .filter(|question| !question.is_empty())
        .collect()
}

fn has_numbered_prefix(line: &str) -> bool {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    rest.len() < line.len() && rest.starts_with('.')
}

fn strip_list_prefix(line: &str) -> String {
    line.trim_start_matches(|c: char| {
        c == '-' || c == '•' || c == '*' || c == '.' || c.is_ascii_digit()
    })
    .trim()
    .to_string()
}
