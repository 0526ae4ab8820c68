//! Prompt → generator → validator, with retries and a deterministic fallback.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, error, instrument, warn};

use super::error::NormalizationError;
use super::fallback::FallbackSentenceGenerator;
use super::gateway::GenerativeTextGateway;
use super::prompt::PromptBuilder;
use super::types::{
    NormalizationOutcome, NormalizationRequest, NormalizationResult, PipelineState,
};
use super::validator::ResponseValidator;
use crate::constants::{DEFAULT_BACKOFF_BASE, DEFAULT_MAX_RETRIES};

/// How many calls to make and how long to wait between them.
///
/// The wait after failed attempt `n` (0-indexed) is `backoff_base^n` seconds. No jitter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RetryPolicy {
    /// Total gateway calls, including the first. Values below 1 are treated as 1.
    pub max_retries: u32,
    pub backoff_base: f64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            backoff_base: DEFAULT_BACKOFF_BASE,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_retries: u32, backoff_base: f64) -> Self {
        Self {
            max_retries,
            backoff_base,
        }
    }

    pub fn attempts(&self) -> u32 {
        self.max_retries.max(1)
    }

    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let secs = self.backoff_base.powi(exponent);
        Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX)
    }
}

/// Normalizes free-form dog descriptions into exactly three sentences.
///
/// Never fails: exhausted retries yield [`FallbackSentenceGenerator`] output. Dropping
/// the returned future cancels any pending call or backoff.
pub struct NormalizationPipeline {
    gateway: Arc<dyn GenerativeTextGateway>,
    prompts: PromptBuilder,
    validator: ResponseValidator,
    fallback: FallbackSentenceGenerator,
    policy: RetryPolicy,
}

impl NormalizationPipeline {
    pub fn new(gateway: Arc<dyn GenerativeTextGateway>, policy: RetryPolicy) -> Self {
        Self {
            gateway,
            prompts: PromptBuilder::new(),
            validator: ResponseValidator::new(),
            fallback: FallbackSentenceGenerator::new(),
            policy,
        }
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    pub async fn normalize(&self, request: &NormalizationRequest) -> NormalizationResult {
        self.run(request).await.result
    }

    #[instrument(skip(self, request), fields(max_retries = self.policy.attempts()))]
    pub async fn run(&self, request: &NormalizationRequest) -> NormalizationOutcome {
        let max_attempts = self.policy.attempts();
        let mut last_error: Option<NormalizationError> = None;

        for attempt in 0..max_attempts {
            debug!(
                state = %PipelineState::Building,
                attempt = attempt + 1,
                "building normalization prompt"
            );
            let prompt = self.prompts.build_for(request);

            match self.attempt(&prompt).await {
                Ok(result) => {
                    debug!(
                        state = %PipelineState::Succeeded,
                        attempt = attempt + 1,
                        "normalization succeeded"
                    );
                    return NormalizationOutcome {
                        result,
                        attempts: attempt + 1,
                        state: PipelineState::Succeeded,
                        last_error,
                    };
                }
                Err(err) => {
                    warn!(
                        attempt = attempt + 1,
                        max_attempts,
                        kind = err.kind(),
                        error = %err,
                        "normalization attempt failed"
                    );
                    last_error = Some(err);

                    if attempt + 1 < max_attempts {
                        let delay = self.policy.delay_for(attempt);
                        debug!(state = %PipelineState::Retrying, ?delay, "backing off");
                        sleep(delay).await;
                    }
                }
            }
        }

        debug!(state = %PipelineState::Exhausted, "retries exhausted");
        error!(
            attempts = max_attempts,
            error = last_error.as_ref().map(ToString::to_string).unwrap_or_default(),
            "normalization failed, using fallback sentences"
        );

        NormalizationOutcome {
            result: self.fallback.generate(),
            attempts: max_attempts,
            state: PipelineState::Fallback,
            last_error,
        }
    }

    async fn attempt(&self, prompt: &str) -> Result<NormalizationResult, NormalizationError> {
        debug!(state = %PipelineState::Calling, "calling generative gateway");
        let raw = self.gateway.call(prompt).await?;

        debug!(state = %PipelineState::Validating, "validating generated sentences");
        self.validator.validate(&raw)
    }
}
