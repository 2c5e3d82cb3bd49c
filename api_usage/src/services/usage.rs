use chrono::Utc;
use common::period;
use plans::{Feature, Tier, UNLIMITED};
use sqlx::PgPool;
use uuid::Uuid;

use api_subs::services::sub::validate_subscription;

/// Outcome of an admission check for one (user, feature) pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitDecision {
    pub within_limit: bool,
    pub current_usage: i64,
    pub limit: i64,
    pub tier: Tier,
    pub reason: Option<String>,
}

impl LimitDecision {
    /// Remaining quota this month. `None` means unlimited.
    pub fn remaining(&self) -> Option<i64> {
        if self.limit == UNLIMITED {
            None
        } else {
            Some((self.limit - self.current_usage).max(0))
        }
    }

    fn user_not_found() -> Self {
        LimitDecision {
            within_limit: false,
            current_usage: 0,
            limit: 0,
            tier: Tier::Free,
            reason: Some("User not found".to_string()),
        }
    }

    fn fail_open(tier: Tier, limit: i64) -> Self {
        LimitDecision {
            within_limit: true,
            current_usage: 0,
            limit,
            tier,
            reason: None,
        }
    }
}

/// Pure admission arithmetic: caps are inclusive, `-1` is unlimited.
pub fn evaluate(tier: Tier, feature: Feature, current_usage: i64) -> LimitDecision {
    let limit = plans::limits_for(tier).limit(feature);
    LimitDecision {
        within_limit: limit == UNLIMITED || current_usage < limit,
        current_usage,
        limit,
        tier,
        reason: None,
    }
}

/// Advisory admission check. Purely read-only: callers check, perform
/// the gated work, and only then commit usage via `track_usage`, so a
/// failed generation never consumes quota.
///
/// An unresolved user fails closed. A usage-store failure fails open;
/// an outage in usage accounting must not block the product, and a
/// month of overuse is cheaper than refusing paying users.
pub async fn check_limit(pool: &PgPool, user_id: Uuid, feature: Feature) -> LimitDecision {
    let user = match validate_subscription(pool, user_id).await {
        Some(user) => user,
        None => return LimitDecision::user_not_found(),
    };

    let tier = user.tier();
    let month = period::month_start(Utc::now());

    match db::usage::get_monthly_count(pool, user_id, feature, month).await {
        Ok(current) => evaluate(tier, feature, current),
        Err(e) => {
            log::error!(
                "Usage lookup failed for user {} feature {}: {}. Failing open.",
                user_id,
                feature,
                e
            );
            LimitDecision::fail_open(tier, plans::limits_for(tier).limit(feature))
        }
    }
}

/// Commits one usage event against the current month's counter and
/// returns the post-increment count. Errors are logged and swallowed
/// (returns 0): an unrecorded event under-counts, it never breaks the
/// request that already did its work.
pub async fn track_usage(pool: &PgPool, user_id: Uuid, feature: Feature) -> i64 {
    let now = Utc::now();

    match db::usage::increment_monthly_count(
        pool,
        user_id,
        feature,
        period::month_start(now),
        now.naive_utc(),
    )
    .await
    {
        Ok(count) => {
            log::debug!("Usage for user {} feature {} now {}", user_id, feature, count);
            count
        }
        Err(e) => {
            log::error!("Failed to track usage for user {} feature {}: {}", user_id, feature, e);
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn admission_is_strict_below_the_cap() {
        // Pro course generation caps at 15.
        let under = evaluate(Tier::Pro, Feature::CourseGeneration, 14);
        assert!(under.within_limit);
        assert_eq!(under.remaining(), Some(1));

        let at_cap = evaluate(Tier::Pro, Feature::CourseGeneration, 15);
        assert!(!at_cap.within_limit);
        assert_eq!(at_cap.remaining(), Some(0));

        let over = evaluate(Tier::Pro, Feature::CourseGeneration, 40);
        assert!(!over.within_limit);
        assert_eq!(over.remaining(), Some(0));
    }

    #[test]
    fn unlimited_tier_always_admits() {
        let decision = evaluate(Tier::Enterprise, Feature::TutorChat, 9999);
        assert!(decision.within_limit);
        assert_eq!(decision.limit, UNLIMITED);
        assert_eq!(decision.remaining(), None);
    }

    #[test]
    fn remaining_never_goes_negative() {
        // Soft limiting means concurrent requests can overshoot the
        // cap slightly; the reported remainder still clamps at zero.
        let decision = evaluate(Tier::Free, Feature::CourseGeneration, 7);
        assert_eq!(decision.remaining(), Some(0));
    }

    #[test]
    fn unknown_user_fails_closed() {
        let decision = LimitDecision::user_not_found();
        assert!(!decision.within_limit);
        assert_eq!(decision.reason.as_deref(), Some("User not found"));
        assert_eq!(decision.tier, Tier::Free);
    }

    #[test]
    fn storage_outage_fails_open() {
        let decision = LimitDecision::fail_open(Tier::Pro, 15);
        assert!(decision.within_limit);
        assert!(decision.reason.is_none());
    }
}
