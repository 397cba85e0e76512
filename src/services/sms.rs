//! SMS notification channel backed by the Twilio Messages API

use std::time::Duration;

use async_trait::async_trait;

use super::notifications::{DeliveryError, Notification, NotificationChannel};
use crate::{
    config::SmsConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct SmsChannel {
    client: reqwest::Client,
    config: SmsConfig,
}

impl SmsChannel {
    pub fn new(config: SmsConfig) -> AppResult<Self> {
        if config.account_sid.is_empty() || config.auth_token.is_empty() || config.from_number.is_empty() {
            return Err(AppError::Internal(
                "SMS enabled but account_sid, auth_token or from_number is missing".to_string(),
            ));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build SMS client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.account_sid
        )
    }
}

#[async_trait]
impl NotificationChannel for SmsChannel {
    fn name(&self) -> &'static str {
        "sms"
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
        let Some(to) = notification.phone.as_deref() else {
            return Ok(());
        };

        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", to),
                ("From", self.config.from_number.as_str()),
                ("Body", notification.message.as_str()),
            ])
            .send()
            .await
            .map_err(|e| DeliveryError::Sms(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(DeliveryError::Sms(format!("provider returned {}: {}", status, body)));
        }

        tracing::info!("SMS sent to {}", to);
        Ok(())
    }
}
