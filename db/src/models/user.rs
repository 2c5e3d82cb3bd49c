use chrono::NaiveDateTime;
use plans::Tier;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub sub_tier: String,
    pub sub_status: String,
    pub sub_expires_at: Option<NaiveDateTime>,
    pub sub_downgraded_at: Option<NaiveDateTime>,
}

impl User {
    /// Effective tier. Anything unparseable in storage counts as free
    /// rather than erroring, so a bad row can never grant paid access.
    pub fn tier(&self) -> Tier {
        self.sub_tier.parse().unwrap_or(Tier::Free)
    }
}
