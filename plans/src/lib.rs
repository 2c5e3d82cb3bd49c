pub mod catalog;
pub mod feature;
pub mod tier;

pub use catalog::{PlanLimits, UNLIMITED, limits_for};
pub use feature::Feature;
pub use tier::Tier;
