//! Credential store: registration with hashed passwords and token-issuing login.

pub mod credentials;
pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use credentials::{PasswordHasher, TokenClaims, TokenIssuer};
pub use domain::{LoginOutcome, LoginRequest, Registration, User, UserId, UserProfile, UserView};
pub use repository::UserRepository;
pub use router::account_router;
pub use service::{AccountServiceError, CredentialStore};
