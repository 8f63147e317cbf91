//! Skill rating updates
//!
//! Ratings follow the paired-comparison (Elo) update with a per-sport
//! K-factor that is boosted for players with few recorded games. Team results
//! are rated against the opposing side's average rating instead of pairwise.

use std::collections::BTreeMap;

use chrono::Utc;
use common::models::{
    ActivityResult, LeaderboardEntry, PlayerRating, ResultType, SkillLevel, STARTING_RATING,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::sports;
use crate::store::Store;

/// No rating ever drops below this
pub const RATING_FLOOR: i32 = 100;

/// Outcome of a game from one player's perspective
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Win,
    Draw,
    Loss,
}

impl Outcome {
    pub fn score(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Draw => 0.5,
            Outcome::Loss => 0.0,
        }
    }
}

/// Expected score of a player against an opponent
pub fn expected_score(rating: i32, opponent_rating: i32) -> f64 {
    1.0 / (1.0 + 10f64.powf((opponent_rating - rating) as f64 / 400.0))
}

/// Sport K-factor, amplified while a player is still new
pub fn k_factor(sport: &str, games_played: i32) -> f64 {
    let base = sports::profile(sport).k_factor;
    if games_played < 10 {
        base * 1.5
    } else if games_played < 30 {
        base * 1.2
    } else {
        base
    }
}

/// Rating delta for one player after one result
pub fn calculate_rating_change(
    current_rating: i32,
    opponent_rating: i32,
    outcome: Outcome,
    sport: &str,
    games_played: i32,
) -> i32 {
    let k = k_factor(sport, games_played);
    let expected = expected_score(current_rating, opponent_rating);
    (k * (outcome.score() - expected)).round() as i32
}

/// Skill bracket for a rating in a sport
pub fn get_skill_level(rating: i32, sport: &str) -> SkillLevel {
    sports::skill_level(rating, sport)
}

/// A single applied rating change
#[derive(Debug, Clone, PartialEq)]
pub struct RatingUpdate {
    pub user_id: Uuid,
    pub old_rating: i32,
    pub new_rating: i32,
    /// Change actually applied, after the floor
    pub delta: i32,
}

/// What the caller knows about a finished activity
#[derive(Debug, Clone, Default)]
pub struct ResultInput {
    pub sport: String,
    pub participants: Vec<Uuid>,
    pub winners: Vec<Uuid>,
    pub losers: Vec<Uuid>,
    pub is_draw: bool,
}

/// Computes and persists rating changes
pub struct RatingEngine<S> {
    store: S,
}

impl<S: Store> RatingEngine<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Apply one result to a player's rating in a sport.
    ///
    /// Creates the rating row at the starting value if the player has none.
    pub async fn update_player_rating(
        &self,
        user_id: Uuid,
        sport: &str,
        opponent_rating: i32,
        outcome: Outcome,
    ) -> common::Result<RatingUpdate> {
        let now = Utc::now();
        let mut rating = self
            .store
            .rating(user_id, sport)
            .await?
            .unwrap_or_else(|| PlayerRating::starting(user_id, sport, now));

        let old_rating = rating.elo_rating;
        let change = calculate_rating_change(
            old_rating,
            opponent_rating,
            outcome,
            sport,
            rating.games_played,
        );

        rating.elo_rating = (old_rating + change).max(RATING_FLOOR);
        rating.games_played += 1;
        match outcome {
            Outcome::Win => rating.wins += 1,
            Outcome::Draw => rating.draws += 1,
            Outcome::Loss => rating.losses += 1,
        }
        rating.last_updated = now;

        self.store.save_rating(&rating).await?;

        debug!(
            "{} rating for {}: {} -> {} ({:?} vs {})",
            sport, user_id, old_rating, rating.elo_rating, outcome, opponent_rating
        );

        Ok(RatingUpdate {
            user_id,
            old_rating,
            new_rating: rating.elo_rating,
            delta: rating.elo_rating - old_rating,
        })
    }

    /// Record the result of an activity and update everyone's rating.
    ///
    /// Side averages are taken before any rating changes. Updates run one
    /// player at a time; the first store failure aborts the whole call.
    pub async fn record_activity_result(
        &self,
        game_id: Uuid,
        result_type: ResultType,
        input: ResultInput,
        recorded_by: Option<Uuid>,
    ) -> common::Result<ActivityResult> {
        if self.store.result_exists(game_id).await? {
            return Err(common::Error::Conflict(format!(
                "result already recorded for activity {}",
                game_id
            )));
        }

        let sport = input.sport.as_str();
        let mut elo_changes = BTreeMap::new();

        if result_type == ResultType::Completed {
            if input.is_draw {
                if let Some(average) = self.average_rating(&input.participants, sport).await? {
                    for &user_id in &input.participants {
                        let update = self
                            .update_player_rating(user_id, sport, average, Outcome::Draw)
                            .await?;
                        elo_changes.insert(user_id, update.delta);
                    }
                }
            } else {
                let winners_avg = self.average_rating(&input.winners, sport).await?;
                let losers_avg = self.average_rating(&input.losers, sport).await?;

                match (winners_avg, losers_avg) {
                    (Some(winners_avg), Some(losers_avg)) => {
                        for &user_id in &input.winners {
                            let update = self
                                .update_player_rating(user_id, sport, losers_avg, Outcome::Win)
                                .await?;
                            elo_changes.insert(user_id, update.delta);
                        }
                        for &user_id in &input.losers {
                            let update = self
                                .update_player_rating(user_id, sport, winners_avg, Outcome::Loss)
                                .await?;
                            elo_changes.insert(user_id, update.delta);
                        }
                    }
                    _ => warn!(
                        "Decisive result for activity {} is missing a side; ratings unchanged",
                        game_id
                    ),
                }
            }
        }

        let result = ActivityResult {
            game_id,
            result_type,
            winning_team: input.winners,
            losing_team: input.losers,
            is_draw: input.is_draw,
            recorded_by,
            elo_changes,
            created_at: Utc::now(),
        };
        self.store.insert_result(&result).await?;

        info!(
            "Recorded {} result for activity {} ({} rating changes)",
            result_type.as_str(),
            game_id,
            result.elo_changes.len()
        );

        Ok(result)
    }

    /// Every rating a player holds
    pub async fn player_ratings(&self, user_id: Uuid) -> common::Result<Vec<PlayerRating>> {
        self.store.ratings_for_user(user_id).await
    }

    /// Highest-rated players in a sport
    pub async fn leaderboard(
        &self,
        sport: &str,
        limit: i64,
    ) -> common::Result<Vec<LeaderboardEntry>> {
        let ratings = self.store.top_ratings(sport, limit).await?;
        Ok(ratings
            .into_iter()
            .enumerate()
            .map(|(idx, rating)| LeaderboardEntry {
                rank: (idx + 1) as i32,
                rating,
            })
            .collect())
    }

    /// Mean current rating of a group, rounded. None for an empty group.
    async fn average_rating(&self, user_ids: &[Uuid], sport: &str) -> common::Result<Option<i32>> {
        if user_ids.is_empty() {
            return Ok(None);
        }

        let mut total: i64 = 0;
        for &user_id in user_ids {
            let rating = self
                .store
                .rating(user_id, sport)
                .await?
                .map(|r| r.elo_rating)
                .unwrap_or(STARTING_RATING);
            total += rating as i64;
        }

        Ok(Some((total as f64 / user_ids.len() as f64).round() as i32))
    }
}
