//! Authentication and user management service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;

use crate::{
    config::{AdminConfig, AuthConfig},
    error::{AppError, AppResult},
    models::user::{CreateUser, LoginResponse, User, UserClaims},
    repository::{Page, Repository},
};

const INVALID_LOGIN: &str = "Invalid username or password";

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Authenticate by username and return a bearer token
    pub async fn authenticate(&self, username: &str, password: &str) -> AppResult<LoginResponse> {
        let user = self
            .repository
            .users
            .get_by_username(username)
            .await?
            .ok_or_else(|| AppError::Authentication(INVALID_LOGIN.to_string()))?;

        if !user.is_active || !verify_password(&user, password)? {
            tracing::warn!(username = %username, "Failed login attempt");
            return Err(AppError::Authentication(INVALID_LOGIN.to_string()));
        }

        let expires_in = self.config.jwt_expiration_hours as i64 * 3600;
        let token = self.create_token(&user, expires_in)?;
        tracing::info!(user_id = user.id, "User logged in");

        Ok(LoginResponse {
            token,
            token_type: "Bearer".to_string(),
            expires_in,
        })
    }

    fn create_token(&self, user: &User, expires_in: i64) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            is_staff: user.is_staff,
            is_superuser: user.is_superuser,
            permissions: user.granted_permissions(),
            exp: now + expires_in,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    pub async fn list(&self, page: Page) -> AppResult<(Vec<User>, i64)> {
        self.repository.users.list(page).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<User> {
        self.repository.users.get_by_id(id).await
    }

    /// Create a user, hashing the password if one is given
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        data.require_filled()?;
        let username = data.username.trim();
        if self.repository.users.username_exists(username).await? {
            return Err(AppError::field(
                "username",
                "A user with that username already exists.",
            ));
        }

        let password_hash = data
            .password
            .as_deref()
            .map(hash_password)
            .transpose()?;
        let data = CreateUser {
            username: username.to_string(),
            password: None,
            first_name: data.first_name.clone(),
            last_name: data.last_name.clone(),
            email: data.email.clone(),
            is_staff: data.is_staff,
            is_superuser: data.is_superuser,
            permissions: data.permissions.clone(),
        };

        let user = self.repository.users.create(&data, password_hash).await?;
        tracing::info!(user_id = user.id, "User created: {}", user);
        Ok(user)
    }

    /// Delete a user; their loans lose the borrower
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.users.delete(id).await?;
        tracing::info!(user_id = id, "User deleted");
        Ok(())
    }

    /// Create the configured superuser when no account exists yet
    pub async fn ensure_superuser(&self, config: &AdminConfig) -> AppResult<()> {
        let (Some(username), Some(password)) = (&config.superuser_username, &config.superuser_password)
        else {
            return Ok(());
        };
        if self.repository.users.count().await? > 0 {
            return Ok(());
        }

        let data = CreateUser {
            username: username.clone(),
            password: Some(password.clone()),
            first_name: None,
            last_name: None,
            email: None,
            is_staff: true,
            is_superuser: true,
            permissions: Vec::new(),
        };
        self.create(&data).await?;
        tracing::info!(username = %username, "Bootstrap superuser created");
        Ok(())
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Accounts without a password cannot log in
fn verify_password(user: &User, password: &str) -> AppResult<bool> {
    let Some(ref hash) = user.password else {
        return Ok(false);
    };
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(password: Option<String>) -> User {
        User {
            id: 1,
            username: "librarian".to_string(),
            password,
            first_name: None,
            last_name: None,
            email: None,
            is_active: true,
            is_staff: true,
            is_superuser: false,
            permissions: Vec::new(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_password_hash_roundtrip() {
        let hash = hash_password("s3cret").unwrap();
        assert!(hash.starts_with("$argon2"));
        let account = user(Some(hash));
        assert!(verify_password(&account, "s3cret").unwrap());
        assert!(!verify_password(&account, "wrong").unwrap());
    }

    #[test]
    fn test_no_password_never_verifies() {
        assert!(!verify_password(&user(None), "").unwrap());
    }
}
