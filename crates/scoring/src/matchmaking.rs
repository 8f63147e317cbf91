//! Join eligibility and activity recommendations
//!
//! Read paths here fail soft: store errors are logged and an empty or
//! conservative default is returned, so a join flow never crashes on a
//! lookup failure.

use std::collections::HashSet;

use chrono::Utc;
use common::models::{
    Activity, DeclaredSkill, MatchmakingPreference, PenaltyKind, SkillLevel, STARTING_RATING,
    STARTING_STANDING,
};
use serde::Serialize;
use tracing::{debug, error};
use uuid::Uuid;

use crate::sports;
use crate::store::Store;

/// Tolerance multiplier when both player and activity are competitive
const COMPETITIVE_TOLERANCE: f64 = 0.6;

/// Whether a player may join an activity, and why not
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Eligibility {
    pub eligible: bool,
    pub reasons: Vec<String>,
}

/// A recommended activity with its fit score
#[derive(Debug, Clone, Serialize)]
pub struct ScoredActivity {
    pub activity: Activity,
    pub score: f64,
}

/// Bonus for a player's bracket against the declared difficulty
fn skill_bonus(player: SkillLevel, declared: DeclaredSkill) -> f64 {
    use DeclaredSkill as D;
    use SkillLevel as P;

    match (declared, player) {
        (D::Mixed, _) => 5.0,
        (D::Beginner, P::Beginner) => 15.0,
        (D::Beginner, P::Intermediate) => 5.0,
        (D::Beginner, P::Advanced) => -10.0,
        (D::Beginner, P::Competitive) => -20.0,
        (D::Intermediate, P::Beginner) => -5.0,
        (D::Intermediate, P::Intermediate) => 15.0,
        (D::Intermediate, P::Advanced) => 5.0,
        (D::Intermediate, P::Competitive) => -10.0,
        (D::Advanced, P::Beginner) => -20.0,
        (D::Advanced, P::Intermediate) => 0.0,
        (D::Advanced, P::Advanced) => 15.0,
        (D::Advanced, P::Competitive) => 10.0,
        (D::Competitive, P::Beginner) => -30.0,
        (D::Competitive, P::Intermediate) => -10.0,
        (D::Competitive, P::Advanced) => 5.0,
        (D::Competitive, P::Competitive) => 15.0,
    }
}

/// Heuristic fit of a player for an activity, starting at 100 and floored at 0
pub fn calculate_skill_match_score(player_rating: i32, activity: &Activity, sport: &str) -> f64 {
    let mut score = 100.0;

    if let Some(min) = activity.min_elo_rating {
        score -= ((player_rating - min).abs() as f64 / 10.0).min(50.0);
    }
    if let Some(max) = activity.max_elo_rating {
        score -= ((player_rating - max).abs() as f64 / 10.0).min(50.0);
    }

    if activity.competitive_mode && player_rating > sports::profile(sport).competitive_threshold {
        score += 20.0;
    }

    if let Some(declared) = activity.skill_level {
        score += skill_bonus(sports::skill_level(player_rating, sport), declared);
    }

    score.max(0.0)
}

/// Gates joins and ranks candidate activities
pub struct MatchmakingScorer<S> {
    store: S,
}

impl<S: Store> MatchmakingScorer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Check whether a player may join an activity.
    ///
    /// The server predicate answers the common case; reasons are only
    /// assembled when it says no.
    pub async fn player_meets_activity_requirements(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
    ) -> Eligibility {
        match self.check_requirements(user_id, activity_id).await {
            Ok(eligibility) => eligibility,
            Err(e) => {
                error!(
                    "Eligibility check failed for {} on {}: {}",
                    user_id, activity_id, e
                );
                Eligibility {
                    eligible: false,
                    reasons: vec!["Unable to verify eligibility right now".to_string()],
                }
            }
        }
    }

    async fn check_requirements(
        &self,
        user_id: Uuid,
        activity_id: Uuid,
    ) -> common::Result<Eligibility> {
        if self.store.can_join(user_id, activity_id).await? {
            return Ok(Eligibility {
                eligible: true,
                reasons: vec![],
            });
        }

        let Some(activity) = self.store.activity(activity_id).await? else {
            return Ok(Eligibility {
                eligible: false,
                reasons: vec!["Game not found".to_string()],
            });
        };

        let mut reasons = Vec::new();
        let now = Utc::now();

        // Every penalty in force is reported, restricting or not
        for penalty in self.store.penalties_in_force(user_id, now).await? {
            reasons.push(match (penalty.penalty_type, penalty.expires_at) {
                (PenaltyKind::TemporaryBan, Some(expires_at)) => format!(
                    "Temporarily restricted until {}: {}",
                    expires_at.format("%Y-%m-%d %H:%M UTC"),
                    penalty.reason
                ),
                (PenaltyKind::TemporaryBan, None) => {
                    format!("Temporarily restricted: {}", penalty.reason)
                }
                (PenaltyKind::EloRestriction, _) => {
                    format!("Restricted from competitive games: {}", penalty.reason)
                }
                (PenaltyKind::Warning, _) => format!("Active warning: {}", penalty.reason),
                (PenaltyKind::ReputationPenalty, _) => {
                    format!("Standing penalty in effect: {}", penalty.reason)
                }
            });
        }

        let rating = self.current_rating(user_id, &activity.sport).await?;
        if let Some(min) = activity.min_elo_rating {
            if rating < min {
                reasons.push(format!(
                    "Your rating ({}) is below the minimum of {}",
                    rating, min
                ));
            }
        }
        if let Some(max) = activity.max_elo_rating {
            if rating > max {
                reasons.push(format!(
                    "Your rating ({}) is above the maximum of {}",
                    rating, max
                ));
            }
        }

        if let Some(min_reputation) = activity.min_reputation {
            let standing = self
                .store
                .standing(user_id)
                .await?
                .map(|s| s.reputation_score)
                .unwrap_or(STARTING_STANDING);
            if standing < min_reputation {
                reasons.push(format!(
                    "Your standing ({}) is below the minimum of {}",
                    standing, min_reputation
                ));
            }
        }

        Ok(Eligibility {
            eligible: false,
            reasons,
        })
    }

    /// Upcoming activities the player can join, best fit first
    pub async fn find_suitable_activities(
        &self,
        user_id: Uuid,
        sport: Option<&str>,
    ) -> Vec<ScoredActivity> {
        match self.rank_activities(user_id, sport).await {
            Ok(ranked) => ranked,
            Err(e) => {
                error!("Failed to find activities for {}: {}", user_id, e);
                vec![]
            }
        }
    }

    async fn rank_activities(
        &self,
        user_id: Uuid,
        sport: Option<&str>,
    ) -> common::Result<Vec<ScoredActivity>> {
        let now = Utc::now();
        let prefs = self.load_preferences(user_id).await?;
        let joined: HashSet<Uuid> = self
            .store
            .joined_activities(user_id)
            .await?
            .into_iter()
            .collect();

        let candidates = self.store.upcoming_activities(now, sport).await?;
        let mut ranked = Vec::new();

        for activity in candidates {
            if joined.contains(&activity.id) {
                continue;
            }
            if !self.store.can_join(user_id, activity.id).await? {
                continue;
            }

            let rating = self.current_rating(user_id, &activity.sport).await?;

            if prefs.skill_matching_enabled && !within_tolerance(rating, &activity, &prefs) {
                debug!("Skipping {}: outside rating tolerance", activity.id);
                continue;
            }
            if !prefs.allow_mixed_skill && activity.skill_level == Some(DeclaredSkill::Mixed) {
                continue;
            }
            if prefs.reputation_threshold > 0 {
                let participants = self.store.participants(activity.id).await?;
                if let Some(lowest) = self.store.lowest_standing(&participants).await? {
                    if lowest < prefs.reputation_threshold {
                        debug!("Skipping {}: participant standing below threshold", activity.id);
                        continue;
                    }
                }
            }

            let score = calculate_skill_match_score(rating, &activity, &activity.sport);
            ranked.push(ScoredActivity { activity, score });
        }

        // Stable sort keeps upcoming order among equal scores
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(ranked)
    }

    /// A player's preferences, or the defaults when none are saved or the read fails
    pub async fn preferences(&self, user_id: Uuid) -> MatchmakingPreference {
        match self.load_preferences(user_id).await {
            Ok(prefs) => prefs,
            Err(e) => {
                error!("Failed to load preferences for {}: {}", user_id, e);
                MatchmakingPreference::defaults_for(user_id)
            }
        }
    }

    /// Save a player's preferences
    pub async fn update_preferences(&self, prefs: &MatchmakingPreference) -> common::Result<()> {
        self.store.save_preferences(prefs).await
    }

    async fn load_preferences(&self, user_id: Uuid) -> common::Result<MatchmakingPreference> {
        Ok(self
            .store
            .preferences(user_id)
            .await?
            .unwrap_or_else(|| MatchmakingPreference::defaults_for(user_id)))
    }

    async fn current_rating(&self, user_id: Uuid, sport: &str) -> common::Result<i32> {
        Ok(self
            .store
            .rating(user_id, sport)
            .await?
            .map(|r| r.elo_rating)
            .unwrap_or(STARTING_RATING))
    }
}

/// Both rating bounds lie within the player's tolerance window
fn within_tolerance(rating: i32, activity: &Activity, prefs: &MatchmakingPreference) -> bool {
    let mut tolerance = prefs.preferred_skill_range as f64;
    if prefs.competitive_mode && activity.competitive_mode {
        tolerance *= COMPETITIVE_TOLERANCE;
    }

    [activity.min_elo_rating, activity.max_elo_rating]
        .into_iter()
        .flatten()
        .all(|bound| ((rating - bound).abs() as f64) <= tolerance)
}
