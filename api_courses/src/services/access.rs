use db::models::{course::Course, user::User};
use plans::Tier;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use api_subs::services::sub::validate_subscription;
use common::error::{AppError, Res};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessDecision {
    pub has_access: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_tier: Option<Tier>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_tier: Option<Tier>,
}

impl AccessDecision {
    fn granted() -> Self {
        AccessDecision {
            has_access: true,
            reason: None,
            required_tier: None,
            user_tier: None,
        }
    }
}

/// Access policy for one course. Ownership overrides everything: a
/// user always reaches their own generated content. Non-premium items
/// are open; premium items need a paid tier at or above the course's
/// required tier.
pub fn evaluate_access(user: &User, course: &Course) -> AccessDecision {
    if course.is_owned_by(user.id) {
        return AccessDecision::granted();
    }

    if !course.premium {
        return AccessDecision::granted();
    }

    let user_tier = user.tier();
    let required = course.required_tier();

    if !user_tier.is_paid() || user_tier < required {
        return AccessDecision {
            has_access: false,
            reason: Some("This course requires a higher subscription tier".to_string()),
            required_tier: Some(required),
            user_tier: Some(user_tier),
        };
    }

    AccessDecision::granted()
}

/// Validates the subscription (applying the lazy downgrade), loads the
/// course and applies the access policy. A missing course is a
/// not-found error; a missing user is a denial, not an error.
pub async fn check_course_access(
    pool: &PgPool,
    user_id: Uuid,
    course_id: Uuid,
) -> Res<(AccessDecision, Course)> {
    let course = db::course::get_course_by_id(pool, course_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Course not found".to_string()))?;

    let decision = match validate_subscription(pool, user_id).await {
        Some(user) => evaluate_access(&user, &course),
        None => AccessDecision {
            has_access: false,
            reason: Some("User not found".to_string()),
            required_tier: None,
            user_tier: None,
        },
    };

    Ok((decision, course))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn user(tier: Tier) -> User {
        let now = Utc::now().naive_utc();
        User {
            id: Uuid::new_v4(),
            email: "lee@example.com".to_string(),
            name: "Lee".to_string(),
            created_at: now,
            updated_at: now,
            sub_tier: tier.as_str().to_string(),
            sub_status: "active".to_string(),
            sub_expires_at: None,
            sub_downgraded_at: None,
        }
    }

    fn course(owner: Option<Uuid>, premium: bool, required: Tier) -> Course {
        Course {
            id: Uuid::new_v4(),
            owner_id: owner,
            title: "Linear Algebra".to_string(),
            premium,
            tier_required: required.as_str().to_string(),
            created_at: Utc::now().naive_utc(),
        }
    }

    #[test]
    fn non_premium_courses_are_open_to_everyone() {
        let viewer = user(Tier::Free);
        let decision = evaluate_access(&viewer, &course(None, false, Tier::Pro));
        assert!(decision.has_access);
    }

    #[test]
    fn free_tier_is_denied_premium_content() {
        let viewer = user(Tier::Free);
        let decision = evaluate_access(&viewer, &course(None, true, Tier::Pro));
        assert!(!decision.has_access);
        assert_eq!(decision.required_tier, Some(Tier::Pro));
        assert_eq!(decision.user_tier, Some(Tier::Free));
    }

    #[test]
    fn tier_rank_must_reach_the_required_tier() {
        let pro = user(Tier::Pro);
        assert!(evaluate_access(&pro, &course(None, true, Tier::Pro)).has_access);
        assert!(!evaluate_access(&pro, &course(None, true, Tier::Enterprise)).has_access);

        let enterprise = user(Tier::Enterprise);
        assert!(evaluate_access(&enterprise, &course(None, true, Tier::Pro)).has_access);
    }

    #[test]
    fn ownership_overrides_subscription_gating() {
        let viewer = user(Tier::Free);
        let owned = course(Some(viewer.id), true, Tier::Enterprise);
        assert!(evaluate_access(&viewer, &owned).has_access);
    }

    #[test]
    fn downgraded_user_loses_premium_access() {
        // The snapshot a validator returns after an expiry downgrade.
        let now = Utc::now().naive_utc();
        let mut viewer = user(Tier::Pro);
        viewer.sub_tier = "free".to_string();
        viewer.sub_status = "expired".to_string();
        viewer.sub_downgraded_at = Some(now);

        let decision = evaluate_access(&viewer, &course(None, true, Tier::Pro));
        assert!(!decision.has_access);
        assert_eq!(decision.required_tier, Some(Tier::Pro));
    }
}
