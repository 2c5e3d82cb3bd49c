use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Subscription tier. The ordering matters: premium content carries a
/// minimum tier, and access checks compare ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Free,
    Pro,
    Enterprise,
}

impl Tier {
    pub fn rank(self) -> u8 {
        match self {
            Tier::Free => 0,
            Tier::Pro => 1,
            Tier::Enterprise => 2,
        }
    }

    pub fn is_paid(self) -> bool {
        self != Tier::Free
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tier::Free => "free",
            Tier::Pro => "pro",
            Tier::Enterprise => "enterprise",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Tier::Free),
            "pro" => Ok(Tier::Pro),
            "enterprise" => Ok(Tier::Enterprise),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_order_free_below_pro_below_enterprise() {
        assert!(Tier::Free < Tier::Pro);
        assert!(Tier::Pro < Tier::Enterprise);
        assert_eq!(Tier::Free.rank(), 0);
        assert_eq!(Tier::Enterprise.rank(), 2);
    }

    #[test]
    fn parses_stored_tier_strings() {
        assert_eq!("pro".parse::<Tier>(), Ok(Tier::Pro));
        assert_eq!("enterprise".parse::<Tier>(), Ok(Tier::Enterprise));
        assert!("platinum".parse::<Tier>().is_err());
    }

    #[test]
    fn only_free_is_unpaid() {
        assert!(!Tier::Free.is_paid());
        assert!(Tier::Pro.is_paid());
        assert!(Tier::Enterprise.is_paid());
    }
}
