use actix_web::{HttpRequest, Responder, get, web};
use chrono::Utc;
use common::{
    error::{AppError, Res},
    http::Success,
    identity::identity_from_request,
    period,
};
use plans::{Feature, UNLIMITED};
use sqlx::PgPool;
use std::sync::Arc;

use api_subs::services::sub::validate_subscription;

use crate::dtos::usage::{FeatureUsage, UsageSummaryResponse};

/// Current month's consumption across all limited features, with the
/// caps for the user's effective tier.
#[get("")]
async fn get_usage(req: HttpRequest, pool: web::Data<Arc<PgPool>>) -> Res<impl Responder> {
    let claims = identity_from_request(&req)?;

    let user = validate_subscription(&pool, claims.user_id)
        .await
        .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

    let now = Utc::now();
    let month = period::month_start(now);
    let limits = plans::limits_for(user.tier());

    let counters = db::usage::get_counters_for_month(&***pool, claims.user_id, month).await?;

    let features = Feature::ALL
        .into_iter()
        .map(|feature| {
            let used = counters
                .iter()
                .find(|c| c.feature == feature.as_str())
                .map(|c| c.count)
                .unwrap_or(0);
            let limit = limits.limit(feature);
            FeatureUsage {
                feature,
                used,
                limit,
                remaining: (limit != UNLIMITED).then(|| (limit - used).max(0)),
            }
        })
        .collect();

    Success::ok(UsageSummaryResponse {
        tier: user.tier(),
        month,
        next_reset: period::next_month_start(now),
        features,
    })
}

pub fn mount() -> actix_web::Scope {
    web::scope("/usage").service(get_usage)
}
