//! Request identity.
//!
//! Sessions are verified by the fronting proxy, which forwards the caller as
//! `x-user-email` and `x-user-role`. Handlers receive an [`AuthContext`] and
//! pass plain ids down to the store and recommendation pipeline.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const EMAIL_HEADER: &str = "x-user-email";
pub const ROLE_HEADER: &str = "x-user-role";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Teacher,
    Student,
}

impl Role {
    fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "teacher" => Some(Role::Teacher),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

/// Verified identity of the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub email: String,
    pub role: Role,
}

impl AuthContext {
    pub fn require_teacher(&self) -> Result<&Self, AppError> {
        match self.role {
            Role::Teacher => Ok(self),
            Role::Student => Err(AppError::Forbidden("teacher role required")),
        }
    }

    pub fn require_student(&self) -> Result<&Self, AppError> {
        match self.role {
            Role::Student => Ok(self),
            Role::Teacher => Err(AppError::Forbidden("student role required")),
        }
    }

    fn from_parts(parts: &Parts) -> Result<Self, AppError> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let email = header(EMAIL_HEADER).ok_or(AppError::Unauthorized)?;
        let role = header(ROLE_HEADER)
            .and_then(Role::parse)
            .ok_or(AppError::Unauthorized)?;

        Ok(Self {
            email: email.to_string(),
            role,
        })
    }
}

impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Self::from_parts(parts)
    }
}
