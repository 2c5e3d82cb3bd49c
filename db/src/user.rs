use chrono::NaiveDateTime;
use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::user::User;

pub async fn get_user_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
) -> Res<Option<User>> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

/// Persists the one-way downgrade to free after a subscription expiry.
/// The tier guard in the WHERE clause makes racing downgrades converge
/// on the same row state.
pub async fn downgrade_expired_subscription<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    user_id: Uuid,
    now: NaiveDateTime,
) -> Res<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET sub_tier = 'free',
            sub_status = 'expired',
            sub_expires_at = NULL,
            sub_downgraded_at = $2,
            updated_at = $2
        WHERE id = $1 AND sub_tier <> 'free'
        "#,
    )
    .bind(user_id)
    .bind(now)
    .execute(executor)
    .await?;
    Ok(())
}
