//! Registration, credential verification and session tokens

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::user::{Credentials, User, UserClaims, UserId},
    repository::Repository,
};

#[derive(Clone)]
pub struct UsersService {
    repository: Repository,
    config: AuthConfig,
}

impl UsersService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Register a user.
    ///
    /// Returns `Ok(None)` when the username is already taken.
    pub async fn create_user(&self, credentials: &Credentials) -> AppResult<Option<UserId>> {
        credentials.validate()?;

        let password_hash = hash_password(&credentials.password)?;
        let id = self
            .repository
            .users
            .create(&credentials.username, &password_hash)
            .await?;

        match id {
            Some(id) => tracing::info!("Registered user {} ({})", credentials.username, id),
            None => tracing::info!("Username {} already taken", credentials.username),
        }
        Ok(id)
    }

    /// Check credentials; `None` for an unknown user and a wrong password alike
    pub async fn verify_user(&self, username: &str, password: &str) -> AppResult<Option<UserId>> {
        let Some(user) = self.repository.users.get_by_username(username).await? else {
            return Ok(None);
        };

        match verify_password(&user.password_hash, password) {
            Ok(true) => Ok(Some(user.id)),
            Ok(false) => Ok(None),
            // Rows from older stores may hold digests that are not PHC strings
            Err(e) => {
                tracing::warn!("Unreadable password hash for user {}: {}", user.id, e);
                Ok(None)
            }
        }
    }

    /// Verify credentials and issue a JWT for the user
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(String, User)> {
        let user_id = self
            .verify_user(username, password)
            .await?
            .ok_or_else(|| AppError::Authentication("Invalid username or password".to_string()))?;
        let user = self.get_user(user_id).await?;

        let now = Utc::now().timestamp();
        let claims = UserClaims {
            sub: user.username.clone(),
            user_id: user.id,
            exp: now + (self.config.jwt_expiration_hours as i64 * 3600),
            iat: now,
        };

        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))?;

        tracing::info!("User {} signed in", user.username);
        Ok((token, user))
    }

    /// Decode a bearer token issued by `login`
    pub fn claims_from_token(&self, token: &str) -> AppResult<UserClaims> {
        UserClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))
    }

    /// Get user by ID
    pub async fn get_user(&self, id: UserId) -> AppResult<User> {
        self.repository
            .users
            .get_by_id(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User with id {} not found", id)))
    }

    /// Count registered users
    pub async fn count(&self) -> AppResult<i64> {
        self.repository.users.count().await
    }
}

/// Hash a password using Argon2 with a fresh random salt
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored PHC hash string
pub fn verify_password(password_hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let first = hash_password("pw1").unwrap();
        let second = hash_password("pw1").unwrap();
        assert_ne!(first, second);
        assert!(verify_password(&first, "pw1").unwrap());
        assert!(verify_password(&second, "pw1").unwrap());
        assert!(!verify_password(&first, "pw2").unwrap());
    }

    #[test]
    fn test_malformed_hash_is_an_error() {
        assert!(verify_password("not-a-phc-string", "pw").is_err());
    }
}
