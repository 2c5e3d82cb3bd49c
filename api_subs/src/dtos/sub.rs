use chrono::NaiveDateTime;
use db::models::user::User;
use plans::Tier;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct SubscriptionResponse {
    pub tier: Tier,
    pub status: String,
    pub expires_at: Option<NaiveDateTime>,
    pub downgraded_at: Option<NaiveDateTime>,
}

impl From<&User> for SubscriptionResponse {
    fn from(user: &User) -> Self {
        SubscriptionResponse {
            tier: user.tier(),
            status: user.sub_status.clone(),
            expires_at: user.sub_expires_at,
            downgraded_at: user.sub_downgraded_at,
        }
    }
}
