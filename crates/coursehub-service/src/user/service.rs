//! User registration, login, and token refresh.

use std::sync::Arc;

use tracing::info;

use coursehub_auth::jwt::{JwtDecoder, JwtEncoder, TokenPair};
use coursehub_auth::password::PasswordHasher;
use coursehub_core::error::AppError;
use coursehub_core::result::AppResult;
use coursehub_database::repositories::UserRepository;
use coursehub_entity::user::{User, UserPublic, UserRole};

/// Handles registration and credential verification.
#[derive(Debug, Clone)]
pub struct UserService {
    /// User repository.
    user_repo: Arc<UserRepository>,
    /// Password hasher.
    hasher: Arc<PasswordHasher>,
    /// Token encoder.
    encoder: Arc<JwtEncoder>,
    /// Token decoder for refresh.
    decoder: Arc<JwtDecoder>,
}

impl UserService {
    /// Creates a new user service.
    pub fn new(
        user_repo: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        encoder: Arc<JwtEncoder>,
        decoder: Arc<JwtDecoder>,
    ) -> Self {
        Self {
            user_repo,
            hasher,
            encoder,
            decoder,
        }
    }

    /// Register a new student account.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> AppResult<UserPublic> {
        if self.user_repo.find_by_username(username).await?.is_some() {
            return Err(AppError::validation("Username is already taken"));
        }

        let hash = self.hasher.hash_password(password)?;
        let user = self
            .user_repo
            .create(username, email, &hash, UserRole::Student)
            .await?;

        info!(user_id = %user.id, username, "user registered");
        Ok(UserPublic::from(&user))
    }

    /// Verify credentials and issue a token pair.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<(UserPublic, TokenPair)> {
        let user = self
            .user_repo
            .find_by_username(username)
            .await?
            .ok_or_else(|| AppError::unauthorized("Invalid username or password"))?;

        self.verify_active(&user)?;

        let valid = self.hasher.verify_password(password, &user.password_hash)?;
        if !valid {
            return Err(AppError::unauthorized("Invalid username or password"));
        }

        let tokens = self
            .encoder
            .generate_token_pair(user.id, &user.role, &user.username)?;

        info!(user_id = %user.id, "user logged in");
        Ok((UserPublic::from(&user), tokens))
    }

    /// Exchange a refresh token for a new access token.
    ///
    /// Re-reads the user so a deactivated account or changed role takes
    /// effect at the next refresh, not only at expiry.
    pub async fn refresh(&self, refresh_token: &str) -> AppResult<(String, chrono::DateTime<chrono::Utc>)> {
        let claims = self.decoder.decode_refresh_token(refresh_token)?;

        let user = self
            .user_repo
            .find_by_id(claims.sub)
            .await?
            .ok_or_else(|| AppError::unauthorized("Account no longer exists"))?;

        self.verify_active(&user)?;

        self.encoder
            .generate_access_token(user.id, &user.role, &user.username)
    }

    /// The current user's public profile.
    pub async fn profile(&self, user_id: uuid::Uuid) -> AppResult<UserPublic> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;
        Ok(UserPublic::from(&user))
    }

    fn verify_active(&self, user: &User) -> AppResult<()> {
        if !user.is_active {
            return Err(AppError::forbidden("Account is deactivated"));
        }
        Ok(())
    }
}
