use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A business as seen from a client's "followed" list.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct FollowedBusiness {
    pub business_id: Uuid,
    pub name: String,
    pub category: Option<String>,
    pub logo_url: Option<String>,
    pub followed_at: DateTime<Utc>,
}
