use chrono::NaiveDateTime;
use plans::Tier;
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct Course {
    pub id: Uuid,
    pub owner_id: Option<Uuid>,
    pub title: String,
    pub premium: bool,
    pub tier_required: String,
    pub created_at: NaiveDateTime,
}

impl Course {
    /// Minimum tier for premium access. Premium rows without a valid
    /// tier string fall back to pro.
    pub fn required_tier(&self) -> Tier {
        self.tier_required.parse().unwrap_or(Tier::Pro)
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.owner_id == Some(user_id)
    }
}
