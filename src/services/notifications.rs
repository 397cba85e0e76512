//! Outbound visitor / employee notifications
//!
//! Request handlers only enqueue; a worker task delivers each message
//! through every configured channel. Channel failures are logged and
//! dropped, they never reach the request that triggered them.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::models::{employee::Employee, visit::VisitDetails, visit::VisitStatus};

/// Message to deliver; channels skip it when their address is missing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: String,
    pub message: String,
}

impl Notification {
    /// Tell an employee that someone registered to meet them
    pub fn visitor_registered(visitor_name: &str, employee: &Employee) -> Self {
        Self {
            email: Some(employee.email.clone()),
            phone: employee.phone.clone().filter(|p| !p.is_empty()),
            subject: "New Visitor Registration".to_string(),
            message: format!(
                "A new visitor ({}) has registered to meet you. Please approve or reject the visit.",
                visitor_name
            ),
        }
    }

    /// Tell the visitor their visit moved; approval carries the check-in code
    pub fn status_changed(details: &VisitDetails) -> Self {
        let status = details.visit.status;
        let mut message = format!("Your visit status has been updated to: {}", status);
        if status == VisitStatus::Approved {
            message.push_str(&format!("\nYour unique code is: {}", details.visit.unique_code));
        }

        Self {
            email: Some(details.visitor.email.clone()),
            phone: Some(details.visitor.phone.clone()).filter(|p| !p.is_empty()),
            subject: "Visit Status Update".to_string(),
            message,
        }
    }
}

#[derive(Debug, Error)]
pub enum DeliveryError {
    #[error("email delivery failed: {0}")]
    Email(String),
    #[error("sms delivery failed: {0}")]
    Sms(String),
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    fn name(&self) -> &'static str;

    async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError>;
}

/// Try every channel; one failing does not stop the others
pub async fn deliver_all(channels: &[Arc<dyn NotificationChannel>], notification: &Notification) {
    for channel in channels {
        match channel.deliver(notification).await {
            Ok(()) => tracing::debug!(
                channel = channel.name(),
                subject = %notification.subject,
                "Notification delivered"
            ),
            Err(e) => tracing::warn!(
                channel = channel.name(),
                subject = %notification.subject,
                error = %e,
                "Notification delivery failed"
            ),
        }
    }
}

/// Handle for queueing notifications
#[derive(Clone)]
pub struct NotificationDispatcher {
    sender: mpsc::Sender<Notification>,
}

impl NotificationDispatcher {
    /// Start the delivery worker. Must be called inside a tokio runtime.
    pub fn spawn(channels: Vec<Arc<dyn NotificationChannel>>, capacity: usize) -> Self {
        let (sender, mut receiver) = mpsc::channel::<Notification>(capacity.max(1));

        if channels.is_empty() {
            tracing::info!("No notification channel configured, notifications will be discarded");
        }

        tokio::spawn(async move {
            while let Some(notification) = receiver.recv().await {
                deliver_all(&channels, &notification).await;
            }
            tracing::debug!("Notification worker stopped");
        });

        Self { sender }
    }

    /// Queue a notification without waiting for delivery
    pub fn dispatch(&self, notification: Notification) {
        match self.sender.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(dropped)) => {
                tracing::warn!(subject = %dropped.subject, "Notification queue full, message dropped");
            }
            Err(TrySendError::Closed(dropped)) => {
                tracing::warn!(subject = %dropped.subject, "Notification worker gone, message dropped");
            }
        }
    }
}
