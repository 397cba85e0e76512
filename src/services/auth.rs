//! Staff authentication service

use std::sync::Arc;

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::staff::{LoginRequest, Role, SessionClaims},
};

use super::staff_directory::StaffDirectory;

/// Hash a password into an argon2 PHC string
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}

/// Check a password against a stored hash; malformed hashes never match
pub fn verify_password(hash: &str, password: &str) -> bool {
    match PasswordHash::new(hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            tracing::warn!("Ignoring malformed password hash: {}", e);
            false
        }
    }
}

/// Issued session
#[derive(Debug, Clone)]
pub struct Session {
    pub claims: SessionClaims,
    pub token: String,
}

#[derive(Clone)]
pub struct AuthService {
    directory: Arc<dyn StaffDirectory>,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(directory: Arc<dyn StaffDirectory>, config: AuthConfig) -> Self {
        Self { directory, config }
    }

    /// Authenticate staff credentials and sign a session token
    pub async fn login(&self, request: &LoginRequest) -> AppResult<Session> {
        if request.role == Role::Department
            && request.department_id.as_deref().map_or(true, str::is_empty)
        {
            return Err(AppError::Validation(
                "departmentId is required for department login".to_string(),
            ));
        }

        let account = self
            .directory
            .find_by_credentials(request)
            .await?
            .ok_or_else(|| {
                tracing::info!(role = %request.role, department = ?request.department_id, "Rejected staff login");
                AppError::Authentication("Invalid credentials".to_string())
            })?;

        let claims = SessionClaims::for_account(&account, self.config.jwt_expiration_hours);
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to sign session token: {}", e)))?;

        tracing::info!(staff = %account.id, role = %account.role, "Staff logged in");

        Ok(Session { claims, token })
    }

    /// Validate a session token
    pub fn verify_token(&self, token: &str) -> AppResult<SessionClaims> {
        SessionClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::LoginRequired(format!("Invalid session token: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{models::staff::StaffAccount, services::staff_directory::ConfigStaffDirectory};

    fn service() -> AuthService {
        let accounts = vec![StaffAccount {
            id: "hr_1".into(),
            name: "HR Department".into(),
            username: None,
            role: Role::Department,
            department_id: Some("hr".into()),
            password_hash: hash_password("hr123").unwrap(),
        }];
        AuthService::new(
            Arc::new(ConfigStaffDirectory::new(accounts)),
            AuthConfig::default(),
        )
    }

    fn request(department_id: Option<&str>, password: &str) -> LoginRequest {
        LoginRequest {
            username: None,
            password: password.into(),
            role: Role::Department,
            department_id: department_id.map(str::to_string),
        }
    }

    #[test]
    fn hashes_verify_only_their_password() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&hash, "s3cret"));
        assert!(!verify_password(&hash, "S3cret"));
        assert!(!verify_password("plaintext", "plaintext"));
    }

    #[test]
    fn seeded_accounts_accept_default_passwords() {
        let seed = include_str!("../../migrations/20250301000100_seed_staff_accounts.sql");
        let accounts: Vec<(&str, &str)> = seed
            .lines()
            .filter(|line| line.contains("$argon2id$"))
            .map(|line| {
                let quoted: Vec<&str> = line.split('\'').skip(1).step_by(2).collect();
                (quoted[0], *quoted.last().unwrap())
            })
            .collect();
        assert_eq!(accounts.len(), 6);

        for (id, hash) in accounts {
            let password = format!("{}123", id.trim_end_matches("_1"));
            assert!(verify_password(hash, &password), "{id} does not accept {password}");
            assert!(!verify_password(hash, "wrong"));
        }
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let auth = service();
        let session = auth.login(&request(Some("hr"), "hr123")).await.unwrap();

        assert_eq!(session.claims.department_id.as_deref(), Some("hr"));
        let claims = auth.verify_token(&session.token).unwrap();
        assert_eq!(claims.sub, "hr_1");
        assert_eq!(claims.role, Role::Department);
    }

    #[tokio::test]
    async fn login_rejects_bad_password_and_missing_department() {
        let auth = service();
        assert!(matches!(
            auth.login(&request(Some("hr"), "wrong")).await,
            Err(AppError::Authentication(_))
        ));
        assert!(matches!(
            auth.login(&request(None, "hr123")).await,
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn garbage_token_requires_login() {
        assert!(matches!(
            service().verify_token("not-a-token"),
            Err(AppError::LoginRequired(_))
        ));
    }
}
