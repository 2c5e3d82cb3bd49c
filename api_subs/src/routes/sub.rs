use actix_web::{HttpRequest, Responder, get, web};
use common::{
    error::{AppError, Res},
    http::Success,
    identity::identity_from_request,
};
use sqlx::PgPool;
use std::sync::Arc;

use crate::{dtos::sub::SubscriptionResponse, services::sub::validate_subscription};

/// Current subscription state for the authenticated user. Hitting this
/// endpoint also applies the lazy downgrade, so the response always
/// reflects the effective tier.
#[get("")]
async fn get_subscription(
    req: HttpRequest,
    pool: web::Data<Arc<PgPool>>,
) -> Res<impl Responder> {
    let claims = identity_from_request(&req)?;

    match validate_subscription(&pool, claims.user_id).await {
        Some(user) => Success::ok(SubscriptionResponse::from(&user)),
        None => Err(AppError::NotFound("User not found".to_string())),
    }
}

pub fn mount() -> actix_web::Scope {
    web::scope("/subscription").service(get_subscription)
}
