use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::role::Role;

pub const FORBIDDEN_MESSAGE: &str = "Bạn không có quyền thực hiện thao tác này.";

#[derive(Debug, Serialize, Deserialize)]
pub struct JwtClaims {
    pub sub: String,
    pub exp: Option<u64>,
    pub email: Option<String>,
    pub role: Option<String>,
    pub user_metadata: Option<serde_json::Value>,
    pub aud: Option<String>,
    pub iat: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub role: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Identity and role of the caller, handed explicitly to every service call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerContext {
    pub user_id: String,
    pub role: Role,
}

impl CallerContext {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self { user_id: user_id.into(), role }
    }

    /// Builds the context from an authenticated user. A missing or unknown
    /// role claim is forbidden.
    pub fn from_user(user: &User) -> Result<Self, AppError> {
        let role = user
            .role
            .as_deref()
            .and_then(|code| code.parse::<Role>().ok())
            .ok_or_else(|| AppError::Forbidden(FORBIDDEN_MESSAGE.to_string()))?;

        Ok(Self::new(user.id.clone(), role))
    }

    pub fn has_any(&self, roles: &[Role]) -> bool {
        roles.contains(&self.role)
    }

    pub fn require_any(&self, roles: &[Role]) -> Result<(), AppError> {
        self.require_any_or(roles, AppError::Forbidden(FORBIDDEN_MESSAGE.to_string()))
    }

    /// Same as [`require_any`](Self::require_any) with a caller-chosen rejection.
    pub fn require_any_or(&self, roles: &[Role], rejection: AppError) -> Result<(), AppError> {
        if self.has_any(roles) {
            Ok(())
        } else {
            tracing::warn!("User {} with role {} rejected; allowed roles: {:?}",
                           self.user_id, self.role, roles);
            Err(rejection)
        }
    }
}
