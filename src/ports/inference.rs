//! Inference Client Port - prompt in, usable text out, never an error.
//!
//! Callers get a [`Completion`] whose [`CompletionSource`] says whether the
//! text came from the model or from deterministic fallback synthesis.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::watch;

/// Port for the always-succeeding text completion used by the resolver.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    /// Completes `prompt`. Stops early between attempts once `cancel` fires.
    async fn complete(&self, prompt: &str, cancel: &CancelSignal) -> Completion;
}

/// Completion text plus where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub text: String,
    pub source: CompletionSource,
}

impl Completion {
    pub fn from_model(text: impl Into<String>, credential_index: usize, attempts: u32) -> Self {
        Self {
            text: text.into(),
            source: CompletionSource::Model {
                credential_index,
                attempts,
            },
        }
    }

    pub fn fallback(text: impl Into<String>, reason: FallbackReason) -> Self {
        Self {
            text: text.into(),
            source: CompletionSource::Fallback(reason),
        }
    }

    pub fn is_authoritative(&self) -> bool {
        matches!(self.source, CompletionSource::Model { .. })
    }
}

/// Origin of a completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionSource {
    /// Returned by the endpoint using the credential at `credential_index`.
    Model { credential_index: usize, attempts: u32 },
    /// Synthesized locally.
    Fallback(FallbackReason),
}

/// Why fallback text was synthesized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FallbackReason {
    /// Every configured credential was a placeholder, or none were configured.
    NoUsableCredentials,
    /// Every usable credential failed.
    Exhausted { credentials_tried: usize },
    /// The caller cancelled the run.
    Cancelled,
}

impl fmt::Display for FallbackReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackReason::NoUsableCredentials => write!(f, "no usable credentials configured"),
            FallbackReason::Exhausted { credentials_tried } => {
                write!(f, "all {} credential(s) exhausted", credentials_tried)
            }
            FallbackReason::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// Cooperative cancellation, backed by the same watch channel used for shutdown.
#[derive(Debug, Clone, Default)]
pub struct CancelSignal {
    rx: Option<watch::Receiver<bool>>,
}

impl CancelSignal {
    /// A signal that never fires.
    pub fn never() -> Self {
        Self::default()
    }

    /// Fires once `true` is sent on the channel.
    pub fn from_watch(rx: watch::Receiver<bool>) -> Self {
        Self { rx: Some(rx) }
    }

    pub fn is_cancelled(&self) -> bool {
        self.rx.as_ref().is_some_and(|rx| *rx.borrow())
    }

    /// Resolves when cancellation is requested. Pending forever otherwise,
    /// including after the sender is dropped.
    pub async fn cancelled(&self) {
        let Some(rx) = &self.rx else {
            return std::future::pending().await;
        };
        let mut rx = rx.clone();
        loop {
            if *rx.borrow_and_update() {
                return;
            }
            if rx.changed().await.is_err() {
                return std::future::pending().await;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn never_signal_is_not_cancelled() {
        assert!(!CancelSignal::never().is_cancelled());
    }

    #[tokio::test]
    async fn watch_signal_fires_on_true() {
        let (tx, rx) = watch::channel(false);
        let signal = CancelSignal::from_watch(rx);
        assert!(!signal.is_cancelled());

        tx.send(true).unwrap();
        assert!(signal.is_cancelled());
        tokio::time::timeout(Duration::from_millis(100), signal.cancelled())
            .await
            .expect("cancelled() should resolve once fired");
    }

    #[tokio::test]
    async fn dropped_sender_never_fires() {
        let (tx, rx) = watch::channel(false);
        let signal = CancelSignal::from_watch(rx);
        drop(tx);

        let waited = tokio::time::timeout(Duration::from_millis(20), signal.cancelled()).await;
        assert!(waited.is_err());
        assert!(!signal.is_cancelled());
    }

    #[test]
    fn completion_constructors_tag_source() {
        assert!(Completion::from_model("hi", 0, 1).is_authoritative());
        let degraded = Completion::fallback("offline", FallbackReason::Cancelled);
        assert!(!degraded.is_authoritative());
        assert_eq!(
            FallbackReason::Exhausted { credentials_tried: 2 }.to_string(),
            "all 2 credential(s) exhausted"
        );
    }
}
