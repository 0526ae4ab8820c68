use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::time::Instant;

use super::error::NormalizationError;
use super::gateway::GenerativeTextGateway;
use super::types::RawGenerativeResponse;

/// Scripted gateway for tests.
///
/// Replies are consumed in order; once the script runs out the last reply repeats.
/// An empty script always answers with `Transport`.
#[derive(Default)]
pub struct MockTextGateway {
    script: Mutex<VecDeque<Result<RawGenerativeResponse, NormalizationError>>>,
    last: Mutex<Option<Result<RawGenerativeResponse, NormalizationError>>>,
    calls: Mutex<Vec<MockCall>>,
}

#[derive(Debug, Clone)]
pub struct MockCall {
    pub prompt: String,
    pub at: Instant,
}

impl MockTextGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replies with a JSON object holding the three sentences.
    pub fn with_sentences(s1: &str, s2: &str, s3: &str) -> Self {
        let text = serde_json::json!({
            "sentence1": s1,
            "sentence2": s2,
            "sentence3": s3,
        })
        .to_string();
        Self::new().then_text(text)
    }

    pub fn always_failing() -> Self {
        Self::new().then_err(NormalizationError::Transport {
            reason: "connection refused".to_string(),
        })
    }

    pub fn then_text(self, text: impl Into<String>) -> Self {
        self.then(Ok(RawGenerativeResponse::from_text(text)))
    }

    pub fn then_err(self, err: NormalizationError) -> Self {
        self.then(Err(err))
    }

    pub fn then(self, reply: Result<RawGenerativeResponse, NormalizationError>) -> Self {
        self.script.lock().push_back(reply);
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl GenerativeTextGateway for MockTextGateway {
    async fn call(&self, prompt: &str) -> Result<RawGenerativeResponse, NormalizationError> {
        self.calls.lock().push(MockCall {
            prompt: prompt.to_string(),
            at: Instant::now(),
        });

        let next = self.script.lock().pop_front();
        let reply = match next {
            Some(reply) => {
                *self.last.lock() = Some(reply.clone());
                reply
            }
            None => self.last.lock().clone().unwrap_or_else(|| {
                Err(NormalizationError::Transport {
                    reason: "mock gateway has no scripted reply".to_string(),
                })
            }),
        };

        if let Ok(raw) = &reply
            && raw.first_text().is_none()
        {
            return Err(NormalizationError::EmptyResponse);
        }
        reply
    }
}
