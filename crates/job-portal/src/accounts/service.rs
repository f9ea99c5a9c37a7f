use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use super::credentials::{PasswordHasher, TokenIssuer};
use super::domain::{LoginOutcome, LoginRequest, Registration, User, UserId};
use super::repository::UserRepository;
use crate::error::{ApiError, ErrorKind};
use crate::store::StoreError;
use crate::validation::{is_valid_email, is_valid_mobile, normalize_email, present};

pub const MIN_PASSWORD_LEN: usize = 8;

/// Registration and login over a user repository.
pub struct CredentialStore<R> {
    repository: Arc<R>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl<R> CredentialStore<R>
where
    R: UserRepository + 'static,
{
    pub fn new(repository: Arc<R>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self {
            repository,
            hasher,
            tokens,
        }
    }

    /// Validate, hash the password, and persist a new user.
    pub async fn register(&self, registration: Registration) -> Result<User, AccountServiceError> {
        let firstname = present(Some(registration.firstname.as_str()));
        let lastname = present(Some(registration.lastname.as_str()));
        let email = present(Some(registration.email.as_str()));
        let mobile = present(Some(registration.mobile.as_str()));
        let (Some(firstname), Some(lastname), Some(email), Some(mobile)) =
            (firstname, lastname, email, mobile)
        else {
            return Err(AccountServiceError::MissingFields);
        };
        if registration.password.is_empty() {
            return Err(AccountServiceError::MissingFields);
        }
        if !is_valid_mobile(mobile) {
            return Err(AccountServiceError::InvalidMobile);
        }
        if !is_valid_email(email) {
            return Err(AccountServiceError::InvalidEmail);
        }
        if registration.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(AccountServiceError::WeakPassword);
        }

        let email = normalize_email(email);
        if self.repository.find_by_email(&email).await?.is_some() {
            return Err(AccountServiceError::EmailTaken);
        }

        let password_hash = self.hash_password(registration.password).await?;
        let now = Utc::now();
        let user = User {
            id: UserId::generate(),
            firstname: firstname.to_string(),
            lastname: lastname.to_string(),
            email,
            mobile: mobile.to_string(),
            password_hash,
            created_at: now,
            updated_at: now,
        };

        let user = self.repository.insert(user).await.map_err(|err| match err {
            StoreError::Duplicate { .. } => AccountServiceError::EmailTaken,
            other => AccountServiceError::Store(other),
        })?;
        info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Verify credentials and issue a session token.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome, AccountServiceError> {
        let Some(email) = present(Some(request.email.as_str())) else {
            return Err(AccountServiceError::MissingCredentials);
        };
        if request.password.is_empty() {
            return Err(AccountServiceError::MissingCredentials);
        }

        let email = normalize_email(email);
        let Some(user) = self.repository.find_by_email(&email).await? else {
            warn!("login attempt for unknown account");
            return Err(AccountServiceError::InvalidCredentials);
        };

        let hasher = self.hasher;
        let hash = user.password_hash.clone();
        let password = request.password;
        let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|err| AccountServiceError::Hashing(err.to_string()))?
            .map_err(|err| AccountServiceError::Hashing(err.to_string()))?;
        if !matches {
            warn!(user_id = %user.id, "login rejected: password mismatch");
            return Err(AccountServiceError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user, Utc::now())?;
        info!(user_id = %user.id, "user logged in");
        Ok(LoginOutcome {
            token,
            payload: user.profile(),
        })
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    async fn hash_password(&self, password: String) -> Result<String, AccountServiceError> {
        let hasher = self.hasher;
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|err| AccountServiceError::Hashing(err.to_string()))?
            .map_err(|err| AccountServiceError::Hashing(err.to_string()))
    }
}

/// Error raised by the credential store.
#[derive(Debug, thiserror::Error)]
pub enum AccountServiceError {
    #[error("all fields are required")]
    MissingFields,
    #[error("email and password are required")]
    MissingCredentials,
    #[error("mobile number should be exactly 10 digits")]
    InvalidMobile,
    #[error("please enter a valid email address")]
    InvalidEmail,
    #[error("password must be at least 8 characters")]
    WeakPassword,
    #[error("a user with this email already exists")]
    EmailTaken,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("password hashing failed: {0}")]
    Hashing(String),
    #[error("token signing failed: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<AccountServiceError> for ApiError {
    fn from(error: AccountServiceError) -> Self {
        let kind = match &error {
            AccountServiceError::MissingFields
            | AccountServiceError::MissingCredentials
            | AccountServiceError::WeakPassword => ErrorKind::Validation,
            AccountServiceError::InvalidMobile | AccountServiceError::InvalidEmail => {
                ErrorKind::Format
            }
            AccountServiceError::EmailTaken => ErrorKind::Conflict,
            AccountServiceError::InvalidCredentials => ErrorKind::Unauthorized,
            AccountServiceError::Hashing(_) | AccountServiceError::Token(_) => ErrorKind::Internal,
            AccountServiceError::Store(_) => ErrorKind::Persistence,
        };
        ApiError::new(kind, error.to_string())
    }
}
