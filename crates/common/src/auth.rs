//! Wire contracts for the authentication endpoints.

use serde::{Deserialize, Serialize};

use crate::identity::{Identity, Role};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Successful sign-in response: the bearer token plus the authenticated
/// user, including their role.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,

    #[serde(default = "default_token_type")]
    pub token_type: String,

    pub user: Identity,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Registration payload. Registration does not authenticate; the caller
/// signs in separately afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub age: u32,
    pub gender: String,
    pub role: Role,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    pub message: String,
    pub user_id: String,
    pub email: String,
}

/// Error body emitted by the remote API: `{"detail": "..."}`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub detail: String,
}
