use std::env;

pub const DEFAULT_MODEL: &str = "gpt-4-turbo-preview";
pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

/// Tuning knobs for the AI proxy, read from the environment with documented
/// defaults. A variable that is unset, empty, or not a positive integer falls
/// back to its default.
#[derive(Debug, Clone)]
pub struct AiConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: String,
    pub max_tokens_initial: u32,
    pub max_tokens_followup: u32,
    pub max_tokens_questions: u32,
    pub rate_limit_per_minute: u32,
    pub rate_limit_per_day: u32,
    pub max_assets: usize,
    pub max_body_chars: usize,
    pub max_macro_chars: usize,
    pub max_question_chars: usize,
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tokens_initial: 2000,
            max_tokens_followup: 1500,
            max_tokens_questions: 500,
            rate_limit_per_minute: 10,
            rate_limit_per_day: 200,
            max_assets: 200,
            max_body_chars: 20000,
            max_macro_chars: 5000,
            max_question_chars: 500,
        }
    }
}

fn env_int(name: &str, fallback: u64) -> u64 {
    match env::var(name) {
        Ok(raw) => match raw.trim().parse::<u64>() {
            Ok(value) if value > 0 => value,
            _ => fallback,
        },
        Err(_) => fallback,
    }
}

impl AiConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            model: env::var("OPENAI_MODEL").unwrap_or(defaults.model),
            api_key: env::var("OPENAI_API_KEY")
                .ok()
                .filter(|key| !key.trim().is_empty()),
            base_url: env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            max_tokens_initial: env_int(
                "OPENAI_MAX_TOKENS_INITIAL",
                defaults.max_tokens_initial as u64,
            ) as u32,
            max_tokens_followup: env_int(
                "OPENAI_MAX_TOKENS_FOLLOWUP",
                defaults.max_tokens_followup as u64,
            ) as u32,
            max_tokens_questions: env_int(
                "OPENAI_MAX_TOKENS_QUESTIONS",
                defaults.max_tokens_questions as u64,
            ) as u32,
            rate_limit_per_minute: env_int(
                "AI_RATE_LIMIT_PER_MINUTE",
                defaults.rate_limit_per_minute as u64,
            ) as u32,
            rate_limit_per_day: env_int(
                "AI_RATE_LIMIT_PER_DAY",
                defaults.rate_limit_per_day as u64,
            ) as u32,
            max_assets: env_int("AI_MAX_ASSETS", defaults.max_assets as u64) as usize,
            max_body_chars: env_int("AI_MAX_BODY_CHARS", defaults.max_body_chars as u64) as usize,
            max_macro_chars: env_int("AI_MAX_MACRO_CHARS", defaults.max_macro_chars as u64)
                as usize,
            max_question_chars: env_int(
                "AI_MAX_QUESTION_CHARS",
                defaults.max_question_chars as u64,
            ) as usize,
        }
    }
}
