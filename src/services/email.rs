//! Email notification channel over SMTP

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox, Message, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    SmtpTransport, Transport,
};
use std::str::FromStr;

use super::notifications::{DeliveryError, Notification, NotificationChannel};
use crate::config::EmailConfig;

#[derive(Clone)]
pub struct EmailChannel {
    config: EmailConfig,
}

impl EmailChannel {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn build_message(&self, to: &str, subject: &str, body: &str) -> Result<Message, DeliveryError> {
        let from_name = self
            .config
            .smtp_from_name
            .as_deref()
            .unwrap_or("Gatepass");
        let from_mailbox = Mailbox::from_str(&format!("{} <{}>", from_name, self.config.smtp_from))
            .map_err(|e| DeliveryError::Email(format!("Invalid from address: {}", e)))?;

        let to_mailbox = Mailbox::from_str(to)
            .map_err(|e| DeliveryError::Email(format!("Invalid to address: {}", e)))?;

        Message::builder()
            .from(from_mailbox)
            .to(to_mailbox)
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_PLAIN)
                            .body(body.to_string()),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(ContentType::TEXT_HTML)
                            .body(format!(
                                r#"<html><body><p>{}</p></body></html>"#,
                                body.replace('\n', "<br>")
                            )),
                    ),
            )
            .map_err(|e| DeliveryError::Email(format!("Failed to build email: {}", e)))
    }

    fn transport(&self) -> Result<SmtpTransport, DeliveryError> {
        let builder = if self.config.smtp_use_tls {
            SmtpTransport::starttls_relay(&self.config.smtp_host)
                .map_err(|e| DeliveryError::Email(format!("Failed to create SMTP transport: {}", e)))?
        } else {
            SmtpTransport::builder_dangerous(&self.config.smtp_host)
        }
        .port(self.config.smtp_port);

        let builder = match (&self.config.smtp_username, &self.config.smtp_password) {
            (Some(username), Some(password)) => {
                builder.credentials(Credentials::new(username.clone(), password.clone()))
            }
            _ => builder,
        };

        Ok(builder.build())
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let Some(to) = notification.email.as_deref() else {
            return Ok(());
        };

        let message = self.build_message(to, &notification.subject, &notification.message)?;
        let mailer = self.transport()?;

        // SmtpTransport blocks
        tokio::task::spawn_blocking(move || mailer.send(&message))
            .await
            .map_err(|e| DeliveryError::Email(format!("Email task failed: {}", e)))?
            .map_err(|e| DeliveryError::Email(format!("Failed to send email: {}", e)))?;

        tracing::info!("Email sent to {}", to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channel() -> EmailChannel {
        EmailChannel::new(EmailConfig {
            enabled: true,
            smtp_from: "gate@company.com".into(),
            ..EmailConfig::default()
        })
    }

    #[test]
    fn builds_message_for_valid_address() {
        let message = channel()
            .build_message("jane@example.com", "Visit Status Update", "line one\nline two")
            .unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Visit Status Update"));
        assert!(raw.contains("To: jane@example.com"));
    }

    #[test]
    fn rejects_invalid_address() {
        let result = channel().build_message("not an address", "s", "b");
        assert!(matches!(result, Err(DeliveryError::Email(_))));
    }

    #[tokio::test]
    async fn skips_notification_without_email() {
        let notification = Notification {
            email: None,
            phone: Some("+15550001111".into()),
            subject: "s".into(),
            message: "m".into(),
        };
        assert!(channel().deliver(&notification).await.is_ok());
    }
}
