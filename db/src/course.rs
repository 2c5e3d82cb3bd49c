use common::error::{AppError, Res};
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::models::course::Course;

pub async fn get_course_by_id<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    course_id: Uuid,
) -> Res<Option<Course>> {
    sqlx::query_as::<_, Course>("SELECT * FROM courses WHERE id = $1")
        .bind(course_id)
        .fetch_optional(executor)
        .await
        .map_err(AppError::from)
}

/// Inserts a user-generated course. Generated content is owned by its
/// creator and never premium-gated for them.
pub async fn insert_generated_course<'e, E: Executor<'e, Database = Postgres>>(
    executor: E,
    owner_id: Uuid,
    title: String,
) -> Res<Course> {
    sqlx::query_as::<_, Course>(
        r#"
        INSERT INTO courses (owner_id, title, premium)
        VALUES ($1, $2, false)
        RETURNING *
        "#,
    )
    .bind(owner_id)
    .bind(title)
    .fetch_one(executor)
    .await
    .map_err(AppError::from)
}
