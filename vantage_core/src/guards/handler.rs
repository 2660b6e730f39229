use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use dashmap::DashMap;
use serde::Serialize;

use crate::ai::config::AiConfig;
use crate::portfolio::dto::{MacroViews, Portfolio};

use super::dto::{RateLimitDecision, RateLimitState};

const MINUTE_WINDOW_MS: u64 = 60_000;
const DAY_WINDOW_MS: u64 = 86_400_000;

pub const MISSING_INPUTS: &str = "Portfolio and macro views are required.";

pub trait Clock: Send + Sync {
    fn now_ms(&self) -> u64;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.as_millis() as u64)
            .unwrap_or_default()
    }
}

/// Fixed-window request counter keyed by `{scope}:{window}:{client}`.
///
/// Counters live for the whole process; expired entries are overwritten on the
/// next request for the same key but never evicted, so memory grows with
/// distinct-client cardinality. Each instance enforces its own limits, there is
/// no cross-process coordination.
#[derive(Clone)]
pub struct RateLimiter {
    entries: Arc<DashMap<String, RateLimitState>>,
    per_minute: u32,
    per_day: u32,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(per_minute: u32, per_day: u32) -> Self {
        Self::with_clock(per_minute, per_day, Arc::new(SystemClock))
    }

    pub fn with_clock(per_minute: u32, per_day: u32, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            per_minute,
            per_day,
            clock,
        }
    }

    /// The minute window is checked first; a request admitted there still
    /// consumes against the day counter before it proceeds.
    pub fn enforce(&self, scope: &str, client: &str) -> RateLimitDecision {
        if let Some(reset_at_ms) = self.check(
            format!("{}:minute:{}", scope, client),
            self.per_minute,
            MINUTE_WINDOW_MS,
        ) {
            let retry_after_secs = self.retry_after_secs(reset_at_ms);
            return RateLimitDecision::Denied {
                retry_after_secs,
                message: format!(
                    "Rate limit exceeded. Try again in {} seconds.",
                    retry_after_secs
                ),
            };
        }

        if let Some(reset_at_ms) = self.check(
            format!("{}:day:{}", scope, client),
            self.per_day,
            DAY_WINDOW_MS,
        ) {
            let retry_after_secs = self.retry_after_secs(reset_at_ms);
            return RateLimitDecision::Denied {
                retry_after_secs,
                message: format!(
                    "Daily usage limit reached. Try again in {} seconds.",
                    retry_after_secs
                ),
            };
        }

        RateLimitDecision::Allowed
    }

    // Some(reset_at_ms) when the window budget is exhausted. The entry API
    // locks the key for the whole read-modify-write, so concurrent requests
    // from the same client cannot lose increments.
    fn check(&self, key: String, max: u32, window_ms: u64) -> Option<u64> {
        let now = self.clock.now_ms();

        let mut entry = self.entries.entry(key).or_insert(RateLimitState {
            count: 0,
            reset_at_ms: 0,
        });

        if entry.reset_at_ms <= now {
            *entry = RateLimitState {
                count: 1,
                reset_at_ms: now + window_ms,
            };
            return None;
        }

        if entry.count >= max {
            return Some(entry.reset_at_ms);
        }

        entry.count += 1;
        None
    }

    fn retry_after_secs(&self, reset_at_ms: u64) -> u64 {
        let remaining_ms = reset_at_ms.saturating_sub(self.clock.now_ms());
        remaining_ms.div_ceil(1000).max(1)
    }
}

pub fn validate_analysis_inputs(
    portfolio: Option<&Portfolio>,
    macro_views: Option<&MacroViews>,
    config: &AiConfig,
) -> Option<String> {
    let (portfolio, macro_views) = match (portfolio, macro_views) {
        (Some(portfolio), Some(macro_views)) => (portfolio, macro_views),
        _ => return Some(MISSING_INPUTS.to_string()),
    };

    if portfolio.assets.is_empty() {
        return Some("Portfolio assets are required.".to_string());
    }

    if portfolio.assets.len() > config.max_assets {
        return Some(format!(
            "Portfolio exceeds the maximum of {} assets.",
            config.max_assets
        ));
    }

    if macro_views.combined_text().chars().count() > config.max_macro_chars {
        return Some(format!(
            "Macro views exceed {} characters.",
            config.max_macro_chars
        ));
    }

    None
}

pub fn is_body_too_large<T: Serialize>(body: &T, config: &AiConfig) -> bool {
    match serde_json::to_string(body) {
        Ok(serialized) => serialized.chars().count() > config.max_body_chars,
        Err(_) => true,
    }
}

pub fn validate_questions(questions: Option<&[String]>, config: &AiConfig) -> Option<String> {
    let questions = match questions {
        Some(questions) if !questions.is_empty() => questions,
        _ => return None,
    };

    if questions.len() > 1 {
        return Some("Only one follow-up question is allowed per request.".to_string());
    }

    if questions[0].chars().count() > config.max_question_chars {
        return Some(format!(
            "Question exceeds the maximum of {} characters.",
            config.max_question_chars
        ));
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portfolio::dto::{Asset, AssetKind};
    use std::sync::atomic::{AtomicU64, Ordering};

    struct ManualClock {
        now_ms: AtomicU64,
    }

    impl ManualClock {
        fn new(start_ms: u64) -> Arc<Self> {
            Arc::new(Self {
                now_ms: AtomicU64::new(start_ms),
            })
        }

        fn advance(&self, ms: u64) {
            self.now_ms.fetch_add(ms, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now_ms(&self) -> u64 {
            self.now_ms.load(Ordering::SeqCst)
        }
    }

    fn sample_portfolio(asset_count: usize) -> Portfolio {
        let assets = (0..asset_count)
            .map(|i| Asset {
                id: format!("asset_{}", i),
                ticker: format!("TK{}", i),
                name: format!("Ticker {}", i),
                kind: AssetKind::Stock,
                quantity: 1.0,
                purchase_price: 100.0,
                current_price: None,
                purchase_date: None,
                notes: None,
            })
            .collect();

        Portfolio {
            id: "portfolio_test".to_string(),
            name: "Test".to_string(),
            assets,
            created_at: "2024-01-01T00:00:00Z".to_string(),
            updated_at: "2024-01-01T00:00:00Z".to_string(),
        }
    }

    #[test]
    fn test_minute_window_denies_over_threshold() {
        let clock = ManualClock::new(1_000_000);
        let limiter = RateLimiter::with_clock(10, 200, clock.clone());

        for _ in 0..10 {
            assert!(limiter.enforce("ai", "1.2.3.4").is_allowed());
        }

        match limiter.enforce("ai", "1.2.3.4") {
            RateLimitDecision::Denied {
                retry_after_secs,
                message,
            } => {
                assert!(retry_after_secs >= 1 && retry_after_secs <= 60);
                assert!(message.starts_with("Rate limit exceeded."));
            }
            RateLimitDecision::Allowed => panic!("11th request must be denied"),
        }
    }

    #[test]
    fn test_distinct_clients_do_not_share_counters() {
        let clock = ManualClock::new(0);
        let limiter = RateLimiter::with_clock(1, 200, clock.clone());

        assert!(limiter.enforce("ai", "1.2.3.4").is_allowed());
        assert!(!limiter.enforce("ai", "1.2.3.4").is_allowed());
        assert!(limiter.enforce("ai", "5.6.7.8").is_allowed());
    }

    #[test]
    fn test_window_reset_readmits_with_fresh_count() {
        let clock = ManualClock::new(0);
        let limiter = RateLimiter::with_clock(2, 200, clock.clone());

        assert!(limiter.enforce("ai", "1.2.3.4").is_allowed());
        assert!(limiter.enforce("ai", "1.2.3.4").is_allowed());
        assert!(!limiter.enforce("ai", "1.2.3.4").is_allowed());

        clock.advance(60_001);

        // Fresh window: the old count is gone, both slots are available again.
        assert!(limiter.enforce("ai", "1.2.3.4").is_allowed());
        assert!(limiter.enforce("ai", "1.2.3.4").is_allowed());
    }

    #[test]
    fn test_day_window_denies_after_minute_windows_pass() {
        let clock = ManualClock::new(0);
        let limiter = RateLimiter::with_clock(10, 15, clock.clone());

        for _ in 0..2 {
            for _ in 0..7 {
                assert!(limiter.enforce("ai", "1.2.3.4").is_allowed());
            }
            clock.advance(61_000);
        }

        // 14 consumed so far; one left in the day budget.
        assert!(limiter.enforce("ai", "1.2.3.4").is_allowed());
        match limiter.enforce("ai", "1.2.3.4") {
            RateLimitDecision::Denied { message, .. } => {
                assert!(message.starts_with("Daily usage limit reached."));
            }
            RateLimitDecision::Allowed => panic!("day budget must be exhausted"),
        }
    }

    #[test]
    fn test_retry_after_is_at_least_one_second() {
        let clock = ManualClock::new(0);
        let limiter = RateLimiter::with_clock(1, 200, clock.clone());

        assert!(limiter.enforce("ai", "1.2.3.4").is_allowed());
        clock.advance(59_900);

        match limiter.enforce("ai", "1.2.3.4") {
            RateLimitDecision::Denied {
                retry_after_secs, ..
            } => assert_eq!(retry_after_secs, 1),
            RateLimitDecision::Allowed => panic!("must be denied inside the window"),
        }
    }

    #[test]
    fn test_scopes_are_independent() {
        let clock = ManualClock::new(0);
        let limiter = RateLimiter::with_clock(1, 200, clock);

        assert!(limiter.enforce("ai", "1.2.3.4").is_allowed());
        assert!(limiter.enforce("export", "1.2.3.4").is_allowed());
    }

    #[test]
    fn test_validation_requires_both_inputs() {
        let config = AiConfig::default();

        assert_eq!(
            validate_analysis_inputs(None, Some(&MacroViews::default()), &config),
            Some(MISSING_INPUTS.to_string())
        );
        assert_eq!(
            validate_analysis_inputs(Some(&sample_portfolio(1)), None, &config),
            Some(MISSING_INPUTS.to_string())
        );
    }

    #[test]
    fn test_validation_rejects_empty_portfolio() {
        let config = AiConfig::default();
        let portfolio = sample_portfolio(0);

        assert_eq!(
            validate_analysis_inputs(Some(&portfolio), Some(&MacroViews::default()), &config),
            Some("Portfolio assets are required.".to_string())
        );
    }

    #[test]
    fn test_validation_rejects_too_many_assets() {
        let config = AiConfig::default();
        let portfolio = sample_portfolio(config.max_assets + 1);

        assert_eq!(
            validate_analysis_inputs(Some(&portfolio), Some(&MacroViews::default()), &config),
            Some(format!(
                "Portfolio exceeds the maximum of {} assets.",
                config.max_assets
            ))
        );
    }

    #[test]
    fn test_validation_rejects_oversized_macro_text() {
        let config = AiConfig::default();
        let portfolio = sample_portfolio(1);
        let macro_views = MacroViews {
            economic_growth: "x".repeat(config.max_macro_chars + 1),
            ..MacroViews::default()
        };

        assert_eq!(
            validate_analysis_inputs(Some(&portfolio), Some(&macro_views), &config),
            Some(format!(
                "Macro views exceed {} characters.",
                config.max_macro_chars
            ))
        );
    }

    #[test]
    fn test_question_length_boundary() {
        let config = AiConfig::default();

        let at_limit = vec!["q".repeat(config.max_question_chars)];
        assert_eq!(validate_questions(Some(&at_limit), &config), None);

        let over_limit = vec!["q".repeat(config.max_question_chars + 1)];
        assert_eq!(
            validate_questions(Some(&over_limit), &config),
            Some(format!(
                "Question exceeds the maximum of {} characters.",
                config.max_question_chars
            ))
        );
    }

    #[test]
    fn test_only_one_question_is_allowed() {
        let config = AiConfig::default();
        let questions = vec!["first?".to_string(), "second?".to_string()];

        assert_eq!(
            validate_questions(Some(&questions), &config),
            Some("Only one follow-up question is allowed per request.".to_string())
        );
        assert_eq!(validate_questions(None, &config), None);
        assert_eq!(validate_questions(Some(&[]), &config), None);
    }

    #[test]
    fn test_body_size_guard() {
        let config = AiConfig::default();

        assert!(!is_body_too_large(&sample_portfolio(1), &config));
        assert!(is_body_too_large(
            &"x".repeat(config.max_body_chars + 1),
            &config
        ));
    }
}
