//! Outbound email of interview results.
//!
//! Delivery never fails the caller: every outcome, including a missing relay
//! configuration, is folded into a `DeliveryStatus`.

use std::fmt::Write;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};

use crate::config::SmtpConfig;
use crate::export::{render_report, Artifact, ExportFormat, InterviewReport};

#[derive(Debug, Error)]
pub enum MailError {
    #[error("email delivery is not configured")]
    NotConfigured,

    #[error("invalid email address: {0}")]
    Address(String),

    #[error("could not build the message: {0}")]
    Build(String),

    #[error("SMTP delivery failed: {0}")]
    Transport(String),
}

/// Result of a delivery attempt as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeliveryStatus {
    pub success: bool,
    pub message: String,
}

impl DeliveryStatus {
    fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OutgoingEmail {
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub attachment: Option<Artifact>,
}

// ────────────────────────────────────────────────────────────────────────────
// Mailer trait + implementations
// ────────────────────────────────────────────────────────────────────────────

/// Sends a fully composed email.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError>;
}

/// STARTTLS submission to a relay.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| MailError::Address(format!("{}: {e}", config.from)))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.port);
        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            transport: builder.build(),
            from,
        })
    }

    fn build_message(&self, email: OutgoingEmail) -> Result<Message, MailError> {
        let to = email
            .recipient
            .parse::<Mailbox>()
            .map_err(|e| MailError::Address(format!("{}: {e}", email.recipient)))?;
        let builder = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject);

        let message = match email.attachment {
            Some(artifact) => {
                let content_type = ContentType::parse(artifact.content_type)
                    .map_err(|e| MailError::Build(e.to_string()))?;
                builder.multipart(
                    MultiPart::mixed()
                        .singlepart(SinglePart::plain(email.body))
                        .singlepart(
                            Attachment::new(artifact.filename)
                                .body(artifact.bytes.to_vec(), content_type),
                        ),
                )
            }
            None => builder.singlepart(SinglePart::plain(email.body)),
        };
        message.map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: OutgoingEmail) -> Result<(), MailError> {
        let message = self.build_message(email)?;
        self.transport
            .send(message)
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(())
    }
}

/// Stand-in used when no relay is configured.
pub struct DisabledMailer;

#[async_trait]
impl Mailer for DisabledMailer {
    async fn send(&self, _email: OutgoingEmail) -> Result<(), MailError> {
        Err(MailError::NotConfigured)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Composition
// ────────────────────────────────────────────────────────────────────────────

pub fn default_subject(date: &str) -> String {
    format!("Technical Interview Results - {date}")
}

/// Plain-text summary body. The text format is sent inline below the summary;
/// every other format is referenced as an attachment.
pub fn compose_body(report: &InterviewReport, format: ExportFormat) -> String {
    let mut body = String::from("Technical Interview Results Summary\n\n");
    if let Some(name) = &report.candidate_name {
        let _ = writeln!(body, "Candidate: {name}");
    }
    let _ = writeln!(body, "Date: {}", report.date);
    let _ = writeln!(body, "Overall Score: {:.1}/100", report.overall_score);
    let _ = writeln!(body, "Rating: {}\n", report.rating);
    match format {
        ExportFormat::Pdf => {
            body.push_str("The complete interview results are attached as a PDF.\n")
        }
        ExportFormat::Markdown | ExportFormat::Json => {
            let _ = writeln!(
                body,
                "The complete interview results are attached as a {} file.",
                format.label()
            );
        }
        ExportFormat::Text => {
            body.push_str("The complete interview results follow.\n\n");
            body.push_str(&crate::export::text::render_text(report));
        }
    }
    body
}

/// Renders, composes and sends the results. Every failure becomes a failed status.
pub async fn send_results(
    mailer: &dyn Mailer,
    report: &InterviewReport,
    recipient: &str,
    subject: Option<&str>,
    format: ExportFormat,
) -> DeliveryStatus {
    let recipient = recipient.trim();
    if recipient.is_empty() {
        return DeliveryStatus::failed("Please enter a recipient email address.");
    }

    let attachment = match format {
        ExportFormat::Text => None,
        _ => match render_report(report, format) {
            Ok(artifact) => Some(artifact),
            Err(e) => {
                warn!("Email export failed: {e}");
                let message = format!("Failed to generate {}: {e}", format.label());
                return DeliveryStatus::failed(message);
            }
        },
    };

    let subject = subject
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| default_subject(&report.date));

    let email = OutgoingEmail {
        recipient: recipient.to_string(),
        subject,
        body: compose_body(report, format),
        attachment,
    };

    match mailer.send(email).await {
        Ok(()) => {
            info!(format = format.extension(), "Results emailed");
            DeliveryStatus {
                success: true,
                message: format!("Email sent successfully to {recipient}."),
            }
        }
        Err(e) => {
            warn!("Email delivery failed: {e}");
            DeliveryStatus::failed(format!("Failed to send email: {e}"))
        }
    }
}
