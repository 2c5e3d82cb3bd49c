use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A monthly-limited capability. Every call site names the capability
/// through this enum, so there is one canonical identifier per limited
/// resource and the stored counter key is always `as_str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Feature {
    CourseGeneration,
    FlashcardGeneration,
    QuizGeneration,
    TutorChat,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::CourseGeneration,
        Feature::FlashcardGeneration,
        Feature::QuizGeneration,
        Feature::TutorChat,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Feature::CourseGeneration => "course-generation",
            Feature::FlashcardGeneration => "flashcard-generation",
            Feature::QuizGeneration => "quiz-generation",
            Feature::TutorChat => "tutor-chat",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "course-generation" => Ok(Feature::CourseGeneration),
            "flashcard-generation" => Ok(Feature::FlashcardGeneration),
            "quiz-generation" => Ok(Feature::QuizGeneration),
            "tutor-chat" => Ok(Feature::TutorChat),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counter_keys_round_trip() {
        for feature in Feature::ALL {
            assert_eq!(feature.as_str().parse::<Feature>(), Ok(feature));
        }
    }
}
