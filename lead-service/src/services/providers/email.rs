use super::{DeliveryOutcome, EmailMessage, EmailProvider, NotDeliveredReason, ProviderError};
use crate::config::SmtpConfig;
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use secrecy::ExposeSecret;
use std::sync::Mutex;

pub struct SmtpProvider {
    from_email: String,
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
}

impl SmtpProvider {
    /// Builds a STARTTLS relay transport when the configuration is complete.
    ///
    /// Incomplete configuration yields a provider that never touches the
    /// network and reports every send as not configured.
    pub fn new(config: &SmtpConfig) -> Result<Self, ProviderError> {
        let (Some(host), Some(user), Some(password)) = (
            config.host.as_deref(),
            config.user.as_deref(),
            config.password.as_ref(),
        ) else {
            return Ok(Self::unconfigured(config.from_email.clone()));
        };

        let creds = Credentials::new(user.to_string(), password.expose_secret().clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .map_err(|e| {
                ProviderError::Configuration(format!("Failed to create SMTP relay: {}", e))
            })?
            .port(config.port)
            .credentials(creds)
            .build();

        Ok(Self {
            from_email: config.from_email.clone(),
            transport: Some(transport),
        })
    }

    pub fn unconfigured(from_email: String) -> Self {
        Self {
            from_email,
            transport: None,
        }
    }

    fn build_message(&self, email: &EmailMessage) -> Result<Message, ProviderError> {
        let from_mailbox: Mailbox = self.from_email.parse().map_err(|e| {
            ProviderError::InvalidAddress(format!("from {}: {}", self.from_email, e))
        })?;

        let mut message_builder = Message::builder()
            .from(from_mailbox)
            .subject(&email.subject);

        for to in &email.to {
            message_builder = message_builder.to(parse_mailbox(to)?);
        }
        for cc in &email.cc {
            message_builder = message_builder.cc(parse_mailbox(cc)?);
        }

        message_builder
            .header(ContentType::TEXT_PLAIN)
            .body(email.body_text.clone())
            .map_err(|e| ProviderError::SendFailed(format!("Failed to build message: {}", e)))
    }

    async fn deliver(
        &self,
        transport: &AsyncSmtpTransport<Tokio1Executor>,
        email: &EmailMessage,
    ) -> Result<Option<String>, ProviderError> {
        let message = self.build_message(email)?;

        let response = transport
            .send(message)
            .await
            .map_err(|e| ProviderError::SendFailed(format!("Failed to send email: {}", e)))?;

        let provider_id = response.message().next().map(|s| s.to_string());
        Ok(provider_id)
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, ProviderError> {
    address
        .parse()
        .map_err(|e| ProviderError::InvalidAddress(format!("{}: {}", address, e)))
}

#[async_trait]
impl EmailProvider for SmtpProvider {
    async fn send(&self, email: &EmailMessage) -> DeliveryOutcome {
        let Some(transport) = self.transport.as_ref() else {
            tracing::info!(
                subject = %email.subject,
                "SMTP relay not configured, skipping email"
            );
            return DeliveryOutcome::NotDelivered(NotDeliveredReason::NotConfigured);
        };

        match self.deliver(transport, email).await {
            Ok(provider_id) => {
                tracing::info!(
                    to = ?email.to,
                    cc = ?email.cc,
                    subject = %email.subject,
                    "Email sent successfully"
                );
                DeliveryOutcome::Delivered { provider_id }
            }
            Err(e) => {
                tracing::warn!(
                    to = ?email.to,
                    subject = %email.subject,
                    error = %e,
                    "Failed to send email"
                );
                DeliveryOutcome::NotDelivered(e.into())
            }
        }
    }

    fn is_configured(&self) -> bool {
        self.transport.is_some()
    }
}

/// Records messages instead of sending them.
pub struct MockEmailProvider {
    fail: bool,
    sent: Mutex<Vec<EmailMessage>>,
}

impl MockEmailProvider {
    pub fn new() -> Self {
        Self {
            fail: false,
            sent: Mutex::new(Vec::new()),
        }
    }

    /// A provider whose every send fails at the transport.
    pub fn failing() -> Self {
        Self {
            fail: true,
            sent: Mutex::new(Vec::new()),
        }
    }

    pub fn sent_messages(&self) -> Vec<EmailMessage> {
        self.sent
            .lock()
            .map(|sent| sent.clone())
            .unwrap_or_default()
    }

    pub fn send_count(&self) -> usize {
        self.sent.lock().map(|sent| sent.len()).unwrap_or(0)
    }
}

impl Default for MockEmailProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmailProvider for MockEmailProvider {
    async fn send(&self, email: &EmailMessage) -> DeliveryOutcome {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(email.clone());
        }

        if self.fail {
            return DeliveryOutcome::NotDelivered(NotDeliveredReason::Transport(
                "mock relay unreachable".to_string(),
            ));
        }

        tracing::info!(
            to = ?email.to,
            subject = %email.subject,
            "[MOCK] Email would be sent"
        );

        DeliveryOutcome::Delivered {
            provider_id: Some(format!("mock-email-{}", self.send_count())),
        }
    }

    fn is_configured(&self) -> bool {
        true
    }
}
