//! Skill rating, matchmaking and standing engines

pub mod matchmaking;
pub mod notify;
pub mod rating;
pub mod rules;
pub mod sports;
pub mod standing;
pub mod store;
pub mod sweep;

pub use matchmaking::MatchmakingScorer;
pub use notify::{Notifier, PgNotifier};
pub use rating::RatingEngine;
pub use standing::StandingEngine;
pub use store::Store;
pub use sweep::{SweepConfig, SweepService};

#[cfg(test)]
mod tests;

#[cfg(test)]
mod rating_test;
#[cfg(test)]
mod rules_test;
