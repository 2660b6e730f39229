use vantage_core::ai::config::AiConfig;
use vantage_core::ai::handler::AI;
use vantage_core::guards::handler::RateLimiter;
use vantage_core::storage::handler::Documents;

#[derive(Clone)]
pub struct ServerState {
    ai: AI,
    limiter: RateLimiter,
    documents: Documents,
}

impl From<(AI, RateLimiter, Documents)> for ServerState {
    fn from(states: (AI, RateLimiter, Documents)) -> Self {
        let (ai, limiter, documents) = states;
        Self {
            ai,
            limiter,
            documents,
        }
    }
}

impl ServerState {
    pub fn ai(&self) -> &AI {
        &self.ai
    }

    pub fn config(&self) -> &AiConfig {
        self.ai.config()
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn documents(&self) -> &Documents {
        &self.documents
    }
}
