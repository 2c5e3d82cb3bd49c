use chrono::NaiveDateTime;
use common::error::{AppError, Res};
use plans::Feature;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::usage::UsageCounter;

pub async fn get_monthly_count<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    feature: Feature,
    month: NaiveDateTime,
) -> Res<i64> {
    sqlx::query_scalar::<_, i64>(
        "SELECT count FROM api_usage WHERE user_id = $1 AND feature = $2 AND month = $3",
    )
    .bind(user_id)
    .bind(feature.as_str())
    .bind(month)
    .fetch_optional(executor)
    .await
    .map(|count| count.unwrap_or(0))
    .map_err(AppError::from)
}

/// Upsert-increment for the month's counter. A single statement, so
/// concurrent increments never lose updates; the returned value is the
/// post-increment count.
pub async fn increment_monthly_count<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    feature: Feature,
    month: NaiveDateTime,
    now: NaiveDateTime,
) -> Res<i64> {
    sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO api_usage (user_id, feature, month, count, updated_at)
        VALUES ($1, $2, $3, 1, $4)
        ON CONFLICT (user_id, feature, month)
        DO UPDATE SET count = api_usage.count + 1, updated_at = $4
        RETURNING count
        "#,
    )
    .bind(user_id)
    .bind(feature.as_str())
    .bind(month)
    .bind(now)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}

pub async fn get_counters_for_month<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    month: NaiveDateTime,
) -> Res<Vec<UsageCounter>> {
    sqlx::query_as::<_, UsageCounter>(
        "SELECT * FROM api_usage WHERE user_id = $1 AND month = $2",
    )
    .bind(user_id)
    .bind(month)
    .fetch_all(executor)
    .await
    .map_err(AppError::from)
}
