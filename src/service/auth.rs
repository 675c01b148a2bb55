//! Registration, login and profile business logic

use crate::domain::{CreateUserInput, CredentialsInput, UserProfile, DEFAULT_ROLE};
use crate::error::{AppError, Result};
use crate::jwt::JwtManager;
use crate::repository::UserRepository;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::{Arc, OnceLock};
use validator::Validate;

/// Issued access token
#[derive(Debug, Clone)]
pub struct LoginToken {
    pub access_token: String,
    pub expires_in: i64,
}

pub struct AuthService<U: UserRepository> {
    user_repo: Arc<U>,
    jwt_manager: JwtManager,
}

impl<U: UserRepository> AuthService<U> {
    pub fn new(user_repo: Arc<U>, jwt_manager: JwtManager) -> Self {
        Self {
            user_repo,
            jwt_manager,
        }
    }

    /// Register a new user and return its id
    pub async fn register(&self, email: &str, password: &str) -> Result<i64> {
        let input = CredentialsInput::normalized(email, password);
        input.validate()?;

        if self.user_repo.find_by_email(&input.email).await?.is_some() {
            return Err(AppError::EmailTaken);
        }

        let password_hash = hash_password_blocking(input.password).await?;
        let create = CreateUserInput {
            email: input.email,
            password_hash,
            role: DEFAULT_ROLE.to_string(),
        };

        // A concurrent registration can still win between lookup and insert;
        // the unique index rejects ours.
        match self.user_repo.create(&create).await {
            Ok(id) => {
                tracing::info!(user_id = id, "User registered");
                Ok(id)
            }
            Err(AppError::Conflict(_)) => Err(AppError::EmailTaken),
            Err(e) => Err(e),
        }
    }

    /// Check credentials and issue an access token.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginToken> {
        let email = crate::domain::normalize_email(email);

        let Some(user) = self.user_repo.find_by_email(&email).await? else {
            let _ = verify_password_blocking(password.to_string(), dummy_hash().to_string()).await;
            return Err(AppError::InvalidCredentials);
        };

        let matches =
            verify_password_blocking(password.to_string(), user.password_hash.clone()).await?;
        if !matches {
            return Err(AppError::InvalidCredentials);
        }

        let access_token = self.jwt_manager.create_access_token(user.id, &user.role)?;
        tracing::debug!(user_id = user.id, "Issued access token");

        Ok(LoginToken {
            access_token,
            expires_in: self.jwt_manager.access_token_ttl(),
        })
    }

    /// Load the public profile of an authenticated user
    pub async fn profile(&self, user_id: i64) -> Result<UserProfile> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("user_not_found".to_string()))?;
        Ok(user.into())
    }
}

/// Hash a password using Argon2 with default parameters
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Verify a password against its PHC-encoded hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed_hash = PasswordHash::new(hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid hash: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

async fn hash_password_blocking(password: String) -> Result<String> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
}

async fn verify_password_blocking(password: String, hash: String) -> Result<bool> {
    tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(|e| AppError::Internal(e.into()))?
}

/// Hash verified against when the email is unknown
fn dummy_hash() -> &'static str {
    static DUMMY: OnceLock<String> = OnceLock::new();
    DUMMY.get_or_init(|| hash_password("cartkeeper-unknown-user").unwrap_or_default())
}
