pub mod email;

use async_trait::async_trait;
use thiserror::Error;

pub use email::{MockEmailProvider, SmtpProvider};

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Send error: {0}")]
    SendFailed(String),
}

/// A single plain-text notification.
#[derive(Debug, Clone, PartialEq)]
pub struct EmailMessage {
    pub to: Vec<String>,
    pub cc: Vec<String>,
    pub subject: String,
    pub body_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum NotDeliveredReason {
    /// Relay host, user or password missing; nothing was attempted.
    NotConfigured,
    InvalidAddress(String),
    Transport(String),
}

impl std::fmt::Display for NotDeliveredReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NotDeliveredReason::NotConfigured => write!(f, "mail relay not configured"),
            NotDeliveredReason::InvalidAddress(msg) => write!(f, "invalid address: {}", msg),
            NotDeliveredReason::Transport(msg) => write!(f, "transport failure: {}", msg),
        }
    }
}

impl From<ProviderError> for NotDeliveredReason {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::InvalidAddress(msg) => NotDeliveredReason::InvalidAddress(msg),
            other => NotDeliveredReason::Transport(other.to_string()),
        }
    }
}

/// Result of a send attempt. Failures are values, never errors.
#[derive(Debug, Clone, PartialEq)]
pub enum DeliveryOutcome {
    Delivered { provider_id: Option<String> },
    NotDelivered(NotDeliveredReason),
}

impl DeliveryOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, DeliveryOutcome::Delivered { .. })
    }

    /// Metric label for this outcome.
    pub fn label(&self) -> &'static str {
        match self {
            DeliveryOutcome::Delivered { .. } => "delivered",
            DeliveryOutcome::NotDelivered(NotDeliveredReason::NotConfigured) => "not_configured",
            DeliveryOutcome::NotDelivered(NotDeliveredReason::InvalidAddress(_)) => {
                "invalid_address"
            }
            DeliveryOutcome::NotDelivered(NotDeliveredReason::Transport(_)) => "failed",
        }
    }
}

#[async_trait]
pub trait EmailProvider: Send + Sync {
    /// Attempts one delivery. Implementations absorb every failure.
    async fn send(&self, email: &EmailMessage) -> DeliveryOutcome;
    fn is_configured(&self) -> bool;
}
