//! Resilient Inference Client - retries, credential rotation and fallback.
//!
//! Wraps one [`AIProvider`] per credential and implements the
//! [`InferenceClient`] port, which never fails:
//!
//! 1. Credentials are tried in order; placeholders are skipped.
//! 2. Transport failures (network, timeout, unreadable body) are retried on
//!    the same credential with exponential backoff.
//! 3. Any non-success status abandons the credential.
//! 4. When every credential is spent, text is synthesized from the prompt.
//!
//! # Example
//!
//! ```ignore
//! let client = ResilientInferenceClient::from_config(&config.ai)?;
//! let completion = client.complete(&prompt, &CancelSignal::never()).await;
//! ```

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use super::credential::Credential;
use super::fallback;
use super::mistral_provider::{MistralConfig, MistralProvider};
use crate::config::AiConfig;
use crate::ports::{
    AIError, AIProvider, CancelSignal, Completion, CompletionRequest, FallbackReason,
    InferenceClient, MessageRole,
};

/// Retry and sampling parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceSettings {
    /// Attempts per credential, including the first.
    pub max_attempts: u32,
    /// Delay before the second attempt; doubles after each failure.
    pub backoff_base: Duration,
    /// Bound on a single request.
    pub attempt_timeout: Duration,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for InferenceSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            backoff_base: Duration::from_secs(1),
            attempt_timeout: Duration::from_secs(10),
            temperature: 0.3,
            max_tokens: 1000,
        }
    }
}

impl InferenceSettings {
    /// `backoff_base * 2^attempt`, saturating.
    pub fn backoff_delay(&self, attempt: u32) -> Duration {
        self.backoff_base
            .saturating_mul(2u32.saturating_pow(attempt))
    }
}

impl From<&AiConfig> for InferenceSettings {
    fn from(config: &AiConfig) -> Self {
        Self {
            max_attempts: config.max_retries,
            backoff_base: config.backoff_base(),
            attempt_timeout: config.timeout(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        }
    }
}

struct CredentialSlot {
    credential: Credential,
    provider: Arc<dyn AIProvider>,
}

/// [`InferenceClient`] over an ordered list of credentials.
pub struct ResilientInferenceClient {
    slots: Vec<CredentialSlot>,
    settings: InferenceSettings,
}

impl ResilientInferenceClient {
    /// Creates a client with no credentials. Every call degrades to fallback
    /// until [`with_credential`](Self::with_credential) adds one.
    pub fn new(settings: InferenceSettings) -> Self {
        Self {
            slots: Vec::new(),
            settings,
        }
    }

    /// Appends a credential served by `provider`.
    pub fn with_credential(
        mut self,
        credential: Credential,
        provider: Arc<dyn AIProvider>,
    ) -> Self {
        self.slots.push(CredentialSlot {
            credential,
            provider,
        });
        self
    }

    /// Builds one Mistral provider per configured credential.
    ///
    /// Placeholder keys are dropped here so no HTTP client is built for them.
    pub fn from_config(config: &AiConfig) -> Result<Self, AIError> {
        let mut client = Self::new(InferenceSettings::from(config));

        for credential in config.credentials() {
            if credential.is_placeholder() {
                tracing::debug!(credential = credential.label(), "Skipping placeholder credential");
                continue;
            }
            let provider = MistralProvider::new(
                MistralConfig::new(credential.secret().clone())
                    .with_model(&config.model)
                    .with_base_url(&config.base_url)
                    .with_timeout(config.timeout()),
            )?;
            client = client.with_credential(credential, Arc::new(provider));
        }

        if client.usable_credentials() == 0 {
            tracing::warn!("No usable inference credentials configured; analyses will use offline defaults");
        }
        Ok(client)
    }

    pub fn settings(&self) -> &InferenceSettings {
        &self.settings
    }

    /// Number of configured credentials that are not placeholders.
    pub fn usable_credentials(&self) -> usize {
        self.slots
            .iter()
            .filter(|slot| !slot.credential.is_placeholder())
            .count()
    }

    async fn attempt(&self, slot: &CredentialSlot, prompt: &str) -> Result<String, AIError> {
        let request = CompletionRequest::new()
            .with_message(MessageRole::User, prompt)
            .with_temperature(self.settings.temperature)
            .with_max_tokens(self.settings.max_tokens);

        match timeout(self.settings.attempt_timeout, slot.provider.complete(request)).await {
            Ok(result) => result.map(|response| response.content),
            Err(_) => Err(AIError::timeout(self.settings.attempt_timeout)),
        }
    }

    fn degrade(prompt: &str, reason: FallbackReason) -> Completion {
        tracing::warn!(reason = %reason, "Inference unavailable; synthesizing fallback text");
        Completion::fallback(fallback::synthesize(prompt), reason)
    }
}

#[async_trait]
impl InferenceClient for ResilientInferenceClient {
    async fn complete(&self, prompt: &str, cancel: &CancelSignal) -> Completion {
        let mut tried = 0usize;

        for (index, slot) in self.slots.iter().enumerate() {
            let label = slot.credential.label();
            if slot.credential.is_placeholder() {
                tracing::debug!(credential = label, "Skipping placeholder credential");
                continue;
            }
            tried += 1;

            for attempt in 0..self.settings.max_attempts {
                if cancel.is_cancelled() {
                    return Self::degrade(prompt, FallbackReason::Cancelled);
                }

                tracing::debug!(credential = label, attempt = attempt + 1, "Sending completion request");
                match self.attempt(slot, prompt).await {
                    Ok(text) => {
                        tracing::info!(credential = label, attempts = attempt + 1, "Completion succeeded");
                        return Completion::from_model(text, index, attempt + 1);
                    }
                    Err(err) if err.is_transient() => {
                        tracing::warn!(
                            credential = label,
                            attempt = attempt + 1,
                            error = %err,
                            "Transient inference failure"
                        );
                        if attempt + 1 < self.settings.max_attempts {
                            tokio::select! {
                                _ = sleep(self.settings.backoff_delay(attempt)) => {}
                                _ = cancel.cancelled() => {}
                            }
                        }
                    }
                    Err(err) => {
                        tracing::warn!(
                            credential = label,
                            error = %err,
                            retry_after_secs = err.retry_after_secs(),
                            "Credential rejected; trying next credential"
                        );
                        break;
                    }
                }
            }
        }

        if cancel.is_cancelled() {
            return Self::degrade(prompt, FallbackReason::Cancelled);
        }
        let reason = if tried == 0 {
            FallbackReason::NoUsableCredentials
        } else {
            FallbackReason::Exhausted {
                credentials_tried: tried,
            }
        };
        Self::degrade(prompt, reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::ports::CompletionSource;
    use tokio::sync::watch;

    fn fast_settings() -> InferenceSettings {
        InferenceSettings {
            max_attempts: 3,
            backoff_base: Duration::from_millis(1),
            attempt_timeout: Duration::from_millis(200),
            ..InferenceSettings::default()
        }
    }

    fn network() -> MockError {
        MockError::Network {
            message: "connection reset".into(),
        }
    }

    fn client_with(providers: &[&MockAIProvider]) -> ResilientInferenceClient {
        providers
            .iter()
            .enumerate()
            .fold(ResilientInferenceClient::new(fast_settings()), |client, (i, p)| {
                client.with_credential(
                    Credential::new(format!("key-{}", i + 1), format!("sk-test-{}", i + 1)),
                    Arc::new((*p).clone()),
                )
            })
    }

    #[test]
    fn backoff_doubles_from_base() {
        let settings = InferenceSettings::default();
        assert_eq!(settings.backoff_delay(0), Duration::from_secs(1));
        assert_eq!(settings.backoff_delay(1), Duration::from_secs(2));
        assert_eq!(settings.backoff_delay(2), Duration::from_secs(4));
        assert!(settings.backoff_delay(64) >= settings.backoff_delay(31));
    }

    #[tokio::test]
    async fn first_success_is_returned() {
        let provider = MockAIProvider::new().with_response("model text");
        let client = client_with(&[&provider]);

        let completion = client.complete("prompt", &CancelSignal::never()).await;

        assert_eq!(completion.text, "model text");
        assert_eq!(
            completion.source,
            CompletionSource::Model {
                credential_index: 0,
                attempts: 1
            }
        );
        let calls = provider.get_calls();
        assert_eq!(calls[0].messages[0].content, "prompt");
        assert_eq!(calls[0].temperature, Some(0.3));
        assert_eq!(calls[0].max_tokens, Some(1000));
    }

    #[tokio::test]
    async fn transient_failures_retry_on_same_credential() {
        let provider = MockAIProvider::new()
            .with_error(network())
            .with_error(MockError::Parse {
                message: "truncated".into(),
            })
            .with_response("third time lucky");
        let client = client_with(&[&provider]);

        let completion = client.complete("prompt", &CancelSignal::never()).await;

        assert_eq!(completion.text, "third time lucky");
        assert_eq!(provider.call_count(), 3);
        assert!(matches!(
            completion.source,
            CompletionSource::Model { attempts: 3, .. }
        ));
    }

    #[tokio::test]
    async fn status_failure_moves_to_next_credential() {
        let rejected = MockAIProvider::new().with_error(MockError::Status { status: 500 });
        let healthy = MockAIProvider::new().with_response("from key two");
        let client = client_with(&[&rejected, &healthy]);

        let completion = client.complete("prompt", &CancelSignal::never()).await;

        assert_eq!(completion.text, "from key two");
        assert_eq!(rejected.call_count(), 1);
        assert!(matches!(
            completion.source,
            CompletionSource::Model { credential_index: 1, .. }
        ));
    }

    #[tokio::test]
    async fn exhaustion_degrades_to_fallback() {
        let first = MockAIProvider::new().failing_with(network());
        let second = MockAIProvider::new().failing_with(MockError::AuthenticationFailed);
        let client = client_with(&[&first, &second]);

        let completion = client.complete("Tell me something", &CancelSignal::never()).await;

        assert!(!completion.text.is_empty());
        assert_eq!(
            completion.source,
            CompletionSource::Fallback(FallbackReason::Exhausted {
                credentials_tried: 2
            })
        );
        assert_eq!(first.call_count(), 3);
        assert_eq!(second.call_count(), 1);
    }

    #[tokio::test]
    async fn placeholders_are_never_called() {
        let provider = MockAIProvider::new().with_response("should not be used");
        let client = ResilientInferenceClient::new(fast_settings()).with_credential(
            Credential::new("key-1", "your-mistral-api-key-here"),
            Arc::new(provider.clone()),
        );

        let completion = client.complete("prompt", &CancelSignal::never()).await;

        assert_eq!(provider.call_count(), 0);
        assert_eq!(client.usable_credentials(), 0);
        assert_eq!(
            completion.source,
            CompletionSource::Fallback(FallbackReason::NoUsableCredentials)
        );
    }

    #[tokio::test]
    async fn slow_attempts_time_out_and_retry() {
        let slow = MockAIProvider::new()
            .with_response("too late")
            .with_delay(Duration::from_millis(500));
        let settings = InferenceSettings {
            max_attempts: 2,
            attempt_timeout: Duration::from_millis(20),
            ..fast_settings()
        };
        let client = ResilientInferenceClient::new(settings)
            .with_credential(Credential::new("key-1", "sk-test"), Arc::new(slow.clone()));

        let completion = client.complete("prompt", &CancelSignal::never()).await;

        assert_eq!(slow.call_count(), 2);
        assert!(!completion.is_authoritative());
    }

    #[tokio::test]
    async fn cancelled_before_start_makes_no_calls() {
        let provider = MockAIProvider::new().with_response("unused");
        let client = client_with(&[&provider]);
        let (tx, rx) = watch::channel(false);
        tx.send(true).unwrap();

        let completion = client.complete("prompt", &CancelSignal::from_watch(rx)).await;

        assert_eq!(provider.call_count(), 0);
        assert_eq!(
            completion.source,
            CompletionSource::Fallback(FallbackReason::Cancelled)
        );
    }

    #[tokio::test]
    async fn cancellation_interrupts_backoff() {
        let provider = MockAIProvider::new().failing_with(network());
        let settings = InferenceSettings {
            backoff_base: Duration::from_secs(60),
            ..fast_settings()
        };
        let client = ResilientInferenceClient::new(settings)
            .with_credential(Credential::new("key-1", "sk-test"), Arc::new(provider.clone()));
        let (tx, rx) = watch::channel(false);

        let cancel = CancelSignal::from_watch(rx);
        let run = client.complete("prompt", &cancel);
        let trigger = async {
            tokio::time::sleep(Duration::from_millis(20)).await;
            tx.send(true).unwrap();
        };
        let (completion, ()) = tokio::time::timeout(Duration::from_secs(5), async {
            tokio::join!(run, trigger)
        })
        .await
        .expect("cancellation should cut the 60s backoff short");

        assert_eq!(provider.call_count(), 1);
        assert_eq!(
            completion.source,
            CompletionSource::Fallback(FallbackReason::Cancelled)
        );
    }
}
