use chrono::{NaiveDateTime, Utc};
use db::models::user::User;
use plans::Tier;
use sqlx::PgPool;
use uuid::Uuid;

/// True when a paid subscription has crossed its expiry. A null expiry
/// means indefinite, and an already-free record never needs work, so
/// the downgrade below is idempotent.
pub fn subscription_expired(user: &User, now: NaiveDateTime) -> bool {
    user.tier() != Tier::Free && user.sub_expires_at.map(|exp| exp < now).unwrap_or(false)
}

/// The corrected in-memory record after a downgrade, mirroring exactly
/// what `downgrade_expired_subscription` writes.
pub fn downgraded_snapshot(mut user: User, now: NaiveDateTime) -> User {
    user.sub_tier = Tier::Free.as_str().to_string();
    user.sub_status = "expired".to_string();
    user.sub_expires_at = None;
    user.sub_downgraded_at = Some(now);
    user.updated_at = now;
    user
}

/// Fetches the user and lazily corrects a stale subscription: if the
/// expiry is strictly in the past and the tier is still paid, the
/// record is downgraded to free in storage and the returned snapshot
/// reflects the write without a re-fetch.
///
/// Unknown users and storage failures both come back as `None`; an
/// unresolved identity must never be granted paid-tier quota.
pub async fn validate_subscription(pool: &PgPool, user_id: Uuid) -> Option<User> {
    let now = Utc::now().naive_utc();

    let user = match db::user::get_user_by_id(pool, user_id).await {
        Ok(Some(user)) => user,
        Ok(None) => return None,
        Err(e) => {
            log::error!("Failed to load user {} for validation: {}", user_id, e);
            return None;
        }
    };

    if !subscription_expired(&user, now) {
        return Some(user);
    }

    if let Err(e) = db::user::downgrade_expired_subscription(pool, user_id, now).await {
        log::error!("Failed to downgrade expired user {}: {}", user_id, e);
        return None;
    }

    log::info!(
        "Subscription expired for user {}, downgraded {} -> free",
        user_id,
        user.sub_tier
    );
    Some(downgraded_snapshot(user, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn paid_user(tier: Tier, expires_at: Option<NaiveDateTime>) -> User {
        let created = Utc::now().naive_utc() - Duration::days(90);
        User {
            id: Uuid::new_v4(),
            email: "sam@example.com".to_string(),
            name: "Sam".to_string(),
            created_at: created,
            updated_at: created,
            sub_tier: tier.as_str().to_string(),
            sub_status: "active".to_string(),
            sub_expires_at: expires_at,
            sub_downgraded_at: None,
        }
    }

    #[test]
    fn expired_paid_subscription_is_flagged() {
        let now = Utc::now().naive_utc();
        let user = paid_user(Tier::Pro, Some(now - Duration::days(1)));
        assert!(subscription_expired(&user, now));
    }

    #[test]
    fn future_or_missing_expiry_is_left_alone() {
        let now = Utc::now().naive_utc();
        let active = paid_user(Tier::Pro, Some(now + Duration::days(10)));
        let lifetime = paid_user(Tier::Enterprise, None);
        assert!(!subscription_expired(&active, now));
        assert!(!subscription_expired(&lifetime, now));
    }

    #[test]
    fn downgrade_is_idempotent_on_free_records() {
        let now = Utc::now().naive_utc();
        let user = paid_user(Tier::Pro, Some(now - Duration::days(1)));
        let downgraded = downgraded_snapshot(user, now);

        // A second evaluation of the corrected record is a no-op.
        assert!(!subscription_expired(&downgraded, now));
        assert_eq!(downgraded.tier(), Tier::Free);
        assert_eq!(downgraded.sub_status, "expired");
        assert_eq!(downgraded.sub_expires_at, None);
        assert_eq!(downgraded.sub_downgraded_at, Some(now));
    }

    #[test]
    fn expiry_at_exactly_now_is_not_expired() {
        let now = Utc::now().naive_utc();
        let user = paid_user(Tier::Pro, Some(now));
        assert!(!subscription_expired(&user, now));
    }
}
