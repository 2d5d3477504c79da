use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::UserRole;
use crate::error::ServiceError;

/// Claims embedded in the access token issued by the auth provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // user UUID
    pub role: UserRole,
    pub exp: usize,
    #[serde(default)]
    pub iat: usize,
}

/// Extracted from the validated JWT: available via Axum extractors
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub user_id: Uuid,
    pub role: UserRole,
}

impl AuthenticatedUser {
    /// The caller's business id, or Forbidden for any other kind of account.
    pub fn require_business(&self) -> Result<Uuid, ServiceError> {
        match self.role {
            UserRole::Business => Ok(self.user_id),
            _ => Err(ServiceError::Forbidden),
        }
    }

    pub fn require_client(&self) -> Result<Uuid, ServiceError> {
        match self.role {
            UserRole::Client => Ok(self.user_id),
            _ => Err(ServiceError::Forbidden),
        }
    }
}
