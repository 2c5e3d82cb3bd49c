use actix_web::{HttpResponse, HttpResponseBuilder};
use chrono::{NaiveDateTime, Utc};
use common::period;
use plans::{Feature, Tier, UNLIMITED};
use serde::Serialize;

use crate::services::usage::LimitDecision;

/// Body of the 429 returned when a monthly feature cap is exhausted.
/// Carries enough for a client to render an upgrade prompt without a
/// follow-up request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LimitExceededResponse {
    pub error: String,
    pub message: String,
    pub tier: Tier,
    pub next_reset: NaiveDateTime,
    pub used: i64,
    pub limit: i64,
}

impl LimitExceededResponse {
    pub fn from_decision(decision: &LimitDecision, feature: Feature) -> Self {
        LimitExceededResponse {
            error: "Limit exceeded".to_string(),
            message: format!(
                "Monthly limit reached for {}. Upgrade your plan or wait for the next reset.",
                feature
            ),
            tier: decision.tier,
            next_reset: period::next_month_start(Utc::now()),
            used: decision.current_usage,
            limit: decision.limit,
        }
    }

    pub fn to_response(&self) -> HttpResponse {
        HttpResponse::TooManyRequests().json(self)
    }
}

/// Attaches the quota headers a gated endpoint reports after a
/// successful, tracked operation. `used` is the post-increment count.
pub fn apply_quota_headers(builder: &mut HttpResponseBuilder, limit: i64, used: i64) {
    let remaining = if limit == UNLIMITED {
        UNLIMITED
    } else {
        (limit - used).max(0)
    };
    builder.insert_header(("X-RateLimit-Limit", limit.to_string()));
    builder.insert_header(("X-RateLimit-Remaining", remaining.to_string()));
    builder.insert_header(("X-RateLimit-Used", used.to_string()));
}

#[derive(Debug, Serialize)]
pub struct FeatureUsage {
    pub feature: Feature,
    pub used: i64,
    pub limit: i64,
    pub remaining: Option<i64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageSummaryResponse {
    pub tier: Tier,
    pub month: NaiveDateTime,
    pub next_reset: NaiveDateTime,
    pub features: Vec<FeatureUsage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn over_limit_body_uses_wire_field_names() {
        let decision = LimitDecision {
            within_limit: false,
            current_usage: 15,
            limit: 15,
            tier: Tier::Pro,
            reason: None,
        };
        let body = LimitExceededResponse::from_decision(&decision, Feature::CourseGeneration);
        let json = serde_json::to_value(&body).unwrap();

        assert_eq!(json["error"], "Limit exceeded");
        assert_eq!(json["tier"], "pro");
        assert_eq!(json["used"], 15);
        assert_eq!(json["limit"], 15);
        assert!(json.get("nextReset").is_some());
    }

    #[test]
    fn quota_headers_present_on_built_response() {
        let mut builder = HttpResponse::Ok();
        apply_quota_headers(&mut builder, 15, 3);
        let resp = builder.finish();

        let headers = resp.headers();
        assert_eq!(headers.get("X-RateLimit-Limit").unwrap(), "15");
        assert_eq!(headers.get("X-RateLimit-Remaining").unwrap(), "12");
        assert_eq!(headers.get("X-RateLimit-Used").unwrap(), "3");
    }

    #[test]
    fn unlimited_reports_negative_one_remaining() {
        let mut builder = HttpResponse::Ok();
        apply_quota_headers(&mut builder, UNLIMITED, 9999);
        let resp = builder.finish();

        assert_eq!(resp.headers().get("X-RateLimit-Remaining").unwrap(), "-1");
    }
}
