//! Credential handling for Carebook.
//!
//! Argon2id password hashing, random session tokens, and the [`SessionAuth`]
//! axum extractor that turns a bearer token into an authenticated caller.

pub mod error;
pub mod extract;
pub mod password;

pub use error::AuthError;
pub use extract::{AuthState, SessionAuth};
pub use password::{generate_session_token, hash_password, verify_password};
