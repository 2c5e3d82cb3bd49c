use chrono::NaiveDateTime;
use serde::Serialize;
use uuid::Uuid;

/// One month's worth of usage for one (user, feature) pair. The month
/// column is truncated to the first of the month, so at most one row
/// exists per key per month.
#[derive(Debug, Clone, sqlx::FromRow, Serialize)]
pub struct UsageCounter {
    pub id: Uuid,
    pub user_id: Uuid,
    pub feature: String,
    pub month: NaiveDateTime,
    pub count: i64,
    pub updated_at: NaiveDateTime,
}
