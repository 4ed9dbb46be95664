use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
#[error("message delivery failed: {0}")]
pub struct NotifyError(pub String);

/// Outbound channel for operator-facing text.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver `text` to the configured destination.
    async fn deliver(&self, text: &str) -> Result<(), NotifyError>;

    /// Deliver and swallow failures. Returns whether the message went out.
    async fn send(&self, text: &str) -> bool {
        match self.deliver(text).await {
            Ok(()) => {
                debug!("Message delivered: {}", text);
                true
            }
            Err(e) => {
                error!("Failed to send message: {}", e);
                false
            }
        }
    }
}
