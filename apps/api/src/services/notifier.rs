use crate::{
    config::Config,
    error::{ApiError, Result},
    services::documents::RenderedDocument,
};
use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use std::time::Duration;
use tracing::{error, info};

pub const EMAIL_SUBJECT: &str = "Your Personalized Yoga Recommendations";
pub const EMAIL_BODY: &str =
    "Hello,\n\nPlease find attached your personalized yoga recommendations.\n\nStay Healthy!";

/// Delivers a rendered document to a recipient.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Any failure is reported as `ApiError::DeliveryError`.
    async fn send(&self, recipient: &str, document: &RenderedDocument) -> Result<()>;
}

/// Sends mail through an authenticated SMTP relay with a STARTTLS upgrade.
///
/// The transport is built per message, so no connection outlives a send.
#[derive(Clone)]
pub struct SmtpNotifier {
    host: String,
    port: u16,
    credentials: Credentials,
    sender: String,
    timeout: Duration,
}

impl SmtpNotifier {
    pub fn new(
        host: &str,
        port: u16,
        username: &str,
        password: &str,
        sender: &str,
        timeout: Duration,
    ) -> Self {
        Self {
            host: host.to_string(),
            port,
            credentials: Credentials::new(username.to_string(), password.to_string()),
            sender: sender.to_string(),
            timeout,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.smtp_host,
            config.smtp_port,
            &config.smtp_username,
            &config.smtp_password,
            config.sender(),
            config.smtp_timeout(),
        )
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.host)
            .map_err(|e| ApiError::DeliveryError(e.to_string()))?
            .port(self.port)
            .credentials(self.credentials.clone())
            .timeout(Some(self.timeout))
            .build();
        Ok(transport)
    }
}

#[async_trait]
impl Mailer for SmtpNotifier {
    async fn send(&self, recipient: &str, document: &RenderedDocument) -> Result<()> {
        let message = build_message(&self.sender, recipient, document)?;

        info!(
            "Sending {} to {} via {}:{}",
            document.file_name, recipient, self.host, self.port
        );

        self.transport()?.send(message).await.map_err(|e| {
            error!("SMTP delivery to {} failed: {}", recipient, e);
            ApiError::DeliveryError(e.to_string())
        })?;

        info!("Recommendations sent to {}", recipient);
        Ok(())
    }
}

/// Plain-text body plus the document as a binary attachment.
pub fn build_message(
    sender: &str,
    recipient: &str,
    document: &RenderedDocument,
) -> Result<Message> {
    let from: Mailbox = sender
        .parse()
        .map_err(|e| ApiError::DeliveryError(format!("invalid sender address: {}", e)))?;
    let to: Mailbox = recipient
        .trim()
        .parse()
        .map_err(|e| ApiError::DeliveryError(format!("invalid recipient address: {}", e)))?;

    let octet_stream = ContentType::parse("application/octet-stream")
        .map_err(|e| ApiError::DeliveryError(e.to_string()))?;

    Message::builder()
        .from(from)
        .to(to)
        .subject(EMAIL_SUBJECT)
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(EMAIL_BODY.to_string()))
                .singlepart(
                    Attachment::new(document.file_name.clone())
                        .body(document.bytes.clone(), octet_stream),
                ),
        )
        .map_err(|e| ApiError::DeliveryError(e.to_string()))
}
