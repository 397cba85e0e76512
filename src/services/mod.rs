//! Business logic services

pub mod auth;
pub mod directory;
pub mod email;
pub mod export;
pub mod notifications;
pub mod overstay;
pub mod sms;
pub mod staff_directory;
pub mod visits;

use std::sync::Arc;

use crate::{
    config::{AppConfig, StaffSource},
    error::AppResult,
    repository::Repository,
};

use notifications::{NotificationChannel, NotificationDispatcher};
use staff_directory::{ConfigStaffDirectory, DatabaseStaffDirectory, StaffDirectory};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub directory: directory::DirectoryService,
    pub visits: visits::VisitsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository.
    ///
    /// Spawns the notification worker, so this must run inside a tokio runtime.
    pub fn new(repository: Repository, config: &AppConfig) -> AppResult<Self> {
        let staff: Arc<dyn StaffDirectory> = match config.auth.staff_source {
            StaffSource::Config => {
                tracing::info!(accounts = config.auth.staff.len(), "Using staff accounts from configuration");
                Arc::new(ConfigStaffDirectory::new(config.auth.staff.clone()))
            }
            StaffSource::Database => {
                tracing::info!("Using staff accounts from database");
                Arc::new(DatabaseStaffDirectory::new(repository.staff.clone()))
            }
        };

        let mut channels: Vec<Arc<dyn NotificationChannel>> = Vec::new();
        if config.email.enabled {
            channels.push(Arc::new(email::EmailChannel::new(config.email.clone())));
        }
        if config.sms.enabled {
            channels.push(Arc::new(sms::SmsChannel::new(config.sms.clone())?));
        }
        let notifications =
            NotificationDispatcher::spawn(channels, config.notifications.queue_capacity);

        Ok(Self {
            auth: auth::AuthService::new(staff, config.auth.clone()),
            directory: directory::DirectoryService::new(repository.clone()),
            visits: visits::VisitsService::new(repository.clone(), notifications),
            repository,
        })
    }

    /// Database round-trip for the readiness check
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
