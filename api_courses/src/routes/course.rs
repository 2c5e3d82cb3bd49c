use actix_web::{HttpRequest, HttpResponse, get, post, web};
use common::{
    error::{AppError, Res},
    identity::identity_from_request,
};
use plans::Feature;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use api_usage::{
    dtos::usage::{LimitExceededResponse, apply_quota_headers},
    services::usage::{check_limit, track_usage},
};

use crate::{
    dtos::course::GenerateCourseRequest,
    services::{access::check_course_access, generate::generate_course_outline},
};

/// Gated generation endpoint: admission check, then the expensive
/// work, then the usage commit. The commit happens only after the
/// generation and the insert both succeeded, so aborted requests do
/// not consume quota.
#[post("/generate")]
async fn generate_course(
    req: HttpRequest,
    pool: web::Data<Arc<PgPool>>,
    body: web::Json<GenerateCourseRequest>,
) -> Res<HttpResponse> {
    let claims = identity_from_request(&req)?;

    let decision = check_limit(&pool, claims.user_id, Feature::CourseGeneration).await;
    if !decision.within_limit {
        if decision.reason.as_deref() == Some("User not found") {
            return Err(AppError::NotFound("User not found".to_string()));
        }
        return Ok(
            LimitExceededResponse::from_decision(&decision, Feature::CourseGeneration)
                .to_response(),
        );
    }

    let outline = generate_course_outline(&body.topic).await?;
    let course = db::course::insert_generated_course(&***pool, claims.user_id, outline).await?;

    let used = track_usage(&pool, claims.user_id, Feature::CourseGeneration).await;

    let mut builder = HttpResponse::Created();
    apply_quota_headers(&mut builder, decision.limit, used);
    Ok(builder.json(course))
}

#[get("/{course_id}")]
async fn get_course(
    req: HttpRequest,
    pool: web::Data<Arc<PgPool>>,
    path: web::Path<Uuid>,
) -> Res<HttpResponse> {
    let claims = identity_from_request(&req)?;
    let course_id = path.into_inner();

    let (decision, course) = check_course_access(&pool, claims.user_id, course_id).await?;

    if decision.has_access {
        Ok(HttpResponse::Ok().json(course))
    } else {
        Ok(HttpResponse::Forbidden().json(decision))
    }
}

pub fn mount() -> actix_web::Scope {
    web::scope("/courses")
        .service(generate_course)
        .service(get_course)
}
