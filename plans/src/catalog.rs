use crate::{Feature, Tier};

/// Sentinel for "no monthly cap" in the plan tables.
pub const UNLIMITED: i64 = -1;

/// Monthly caps for one tier. Caps are inclusive: a user sitting at
/// exactly the cap is at limit and the next attempt is refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanLimits {
    pub course_generation: i64,
    pub flashcard_generation: i64,
    pub quiz_generation: i64,
    pub tutor_chat: i64,
}

impl PlanLimits {
    pub fn limit(&self, feature: Feature) -> i64 {
        match feature {
            Feature::CourseGeneration => self.course_generation,
            Feature::FlashcardGeneration => self.flashcard_generation,
            Feature::QuizGeneration => self.quiz_generation,
            Feature::TutorChat => self.tutor_chat,
        }
    }
}

/// Compiled-in plan tables. Changing a cap means redeploying; there is
/// deliberately no runtime configuration for these.
pub fn limits_for(tier: Tier) -> PlanLimits {
    match tier {
        Tier::Free => PlanLimits {
            course_generation: 3,
            flashcard_generation: 5,
            quiz_generation: 5,
            tutor_chat: 10,
        },
        Tier::Pro => PlanLimits {
            course_generation: 15,
            flashcard_generation: 50,
            quiz_generation: 50,
            tutor_chat: 200,
        },
        Tier::Enterprise => PlanLimits {
            course_generation: UNLIMITED,
            flashcard_generation: UNLIMITED,
            quiz_generation: UNLIMITED,
            tutor_chat: UNLIMITED,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enterprise_is_unlimited_everywhere() {
        let limits = limits_for(Tier::Enterprise);
        for feature in Feature::ALL {
            assert_eq!(limits.limit(feature), UNLIMITED);
        }
    }

    #[test]
    fn free_and_pro_carry_finite_caps() {
        for tier in [Tier::Free, Tier::Pro] {
            let limits = limits_for(tier);
            for feature in Feature::ALL {
                assert!(limits.limit(feature) >= 0, "{tier} {feature} should be capped");
            }
        }
    }

    #[test]
    fn pro_course_generation_cap() {
        assert_eq!(limits_for(Tier::Pro).limit(Feature::CourseGeneration), 15);
    }
}
