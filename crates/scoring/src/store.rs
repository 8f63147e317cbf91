//! Persistence seam between the engines and the relational store
//!
//! Every engine reads current values through this trait on each call and
//! writes back explicitly. `PgPool` implements it by delegating to the `db`
//! crate.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::models::{
    Activity, ActivityResult, BehaviorEvent, BehaviorKind, MatchmakingPreference, Penalty,
    PlayerRating, PlayerStanding,
};
use common::Result;
use sqlx::PgPool;
use uuid::Uuid;

#[async_trait]
pub trait Store: Send + Sync {
    async fn rating(&self, user_id: Uuid, sport: &str) -> Result<Option<PlayerRating>>;
    async fn save_rating(&self, rating: &PlayerRating) -> Result<()>;
    async fn ratings_for_user(&self, user_id: Uuid) -> Result<Vec<PlayerRating>>;
    async fn top_ratings(&self, sport: &str, limit: i64) -> Result<Vec<PlayerRating>>;

    async fn result_exists(&self, game_id: Uuid) -> Result<bool>;
    async fn insert_result(&self, result: &ActivityResult) -> Result<()>;

    async fn activity(&self, id: Uuid) -> Result<Option<Activity>>;
    async fn upcoming_activities(
        &self,
        now: DateTime<Utc>,
        sport: Option<&str>,
    ) -> Result<Vec<Activity>>;
    async fn activities_awaiting_result(&self, cutoff: DateTime<Utc>) -> Result<Vec<Activity>>;
    async fn participants(&self, game_id: Uuid) -> Result<Vec<Uuid>>;
    async fn joined_activities(&self, user_id: Uuid) -> Result<Vec<Uuid>>;
    /// Fast server-side eligibility predicate
    async fn can_join(&self, user_id: Uuid, game_id: Uuid) -> Result<bool>;

    async fn standing(&self, user_id: Uuid) -> Result<Option<PlayerStanding>>;
    async fn save_standing(&self, standing: &PlayerStanding) -> Result<()>;
    async fn lowest_standing(&self, user_ids: &[Uuid]) -> Result<Option<i32>>;

    async fn insert_behavior(&self, event: &BehaviorEvent) -> Result<()>;
    async fn count_behavior_since(
        &self,
        user_id: Uuid,
        kind: BehaviorKind,
        since: DateTime<Utc>,
    ) -> Result<i64>;
    async fn behavior_counts_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<(BehaviorKind, i64)>>;

    async fn insert_penalty(&self, penalty: &Penalty) -> Result<()>;
    /// Active penalties not past their expiry, newest first
    async fn penalties_in_force(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Vec<Penalty>>;
    async fn expire_penalties(&self, now: DateTime<Utc>) -> Result<u64>;
    async fn count_active_penalties(&self) -> Result<i64>;
    async fn count_auto_penalties_since(&self, since: DateTime<Utc>) -> Result<i64>;

    async fn preferences(&self, user_id: Uuid) -> Result<Option<MatchmakingPreference>>;
    async fn save_preferences(&self, prefs: &MatchmakingPreference) -> Result<()>;
}

/// Convert sqlx errors into the crate error
trait DbResultExt<T> {
    fn db_err(self) -> Result<T>;
}

impl<T> DbResultExt<T> for std::result::Result<T, sqlx::Error> {
    fn db_err(self) -> Result<T> {
        self.map_err(|e| common::Error::Database(e.to_string()))
    }
}

#[async_trait]
impl Store for PgPool {
    async fn rating(&self, user_id: Uuid, sport: &str) -> Result<Option<PlayerRating>> {
        db::ratings::get(self, user_id, sport).await.db_err()
    }

    async fn save_rating(&self, rating: &PlayerRating) -> Result<()> {
        db::ratings::upsert(self, rating).await.db_err()
    }

    async fn ratings_for_user(&self, user_id: Uuid) -> Result<Vec<PlayerRating>> {
        db::ratings::list_for_user(self, user_id).await.db_err()
    }

    async fn top_ratings(&self, sport: &str, limit: i64) -> Result<Vec<PlayerRating>> {
        db::ratings::top_for_sport(self, sport, limit).await.db_err()
    }

    async fn result_exists(&self, game_id: Uuid) -> Result<bool> {
        db::results::exists(self, game_id).await.db_err()
    }

    async fn insert_result(&self, result: &ActivityResult) -> Result<()> {
        db::results::insert(self, result).await.db_err()
    }

    async fn activity(&self, id: Uuid) -> Result<Option<Activity>> {
        db::activities::get(self, id).await.db_err()
    }

    async fn upcoming_activities(
        &self,
        now: DateTime<Utc>,
        sport: Option<&str>,
    ) -> Result<Vec<Activity>> {
        db::activities::list_upcoming(self, now, sport).await.db_err()
    }

    async fn activities_awaiting_result(&self, cutoff: DateTime<Utc>) -> Result<Vec<Activity>> {
        db::activities::list_awaiting_result(self, cutoff).await.db_err()
    }

    async fn participants(&self, game_id: Uuid) -> Result<Vec<Uuid>> {
        db::activities::participants(self, game_id).await.db_err()
    }

    async fn joined_activities(&self, user_id: Uuid) -> Result<Vec<Uuid>> {
        db::activities::joined_by(self, user_id).await.db_err()
    }

    async fn can_join(&self, user_id: Uuid, game_id: Uuid) -> Result<bool> {
        db::activities::can_join(self, user_id, game_id).await.db_err()
    }

    async fn standing(&self, user_id: Uuid) -> Result<Option<PlayerStanding>> {
        db::standing::get(self, user_id).await.db_err()
    }

    async fn save_standing(&self, standing: &PlayerStanding) -> Result<()> {
        db::standing::upsert(self, standing).await.db_err()
    }

    async fn lowest_standing(&self, user_ids: &[Uuid]) -> Result<Option<i32>> {
        db::standing::lowest_score(self, user_ids).await.db_err()
    }

    async fn insert_behavior(&self, event: &BehaviorEvent) -> Result<()> {
        db::behavior::insert(self, event).await.db_err()
    }

    async fn count_behavior_since(
        &self,
        user_id: Uuid,
        kind: BehaviorKind,
        since: DateTime<Utc>,
    ) -> Result<i64> {
        db::behavior::count_since(self, user_id, kind, since)
            .await
            .db_err()
    }

    async fn behavior_counts_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<(BehaviorKind, i64)>> {
        db::behavior::counts_by_kind_since(self, since).await.db_err()
    }

    async fn insert_penalty(&self, penalty: &Penalty) -> Result<()> {
        db::penalties::insert(self, penalty).await.db_err()
    }

    async fn penalties_in_force(&self, user_id: Uuid, now: DateTime<Utc>) -> Result<Vec<Penalty>> {
        db::penalties::in_force_for_user(self, user_id, now)
            .await
            .db_err()
    }

    async fn expire_penalties(&self, now: DateTime<Utc>) -> Result<u64> {
        db::penalties::expire_due(self, now).await.db_err()
    }

    async fn count_active_penalties(&self) -> Result<i64> {
        db::penalties::count_active(self).await.db_err()
    }

    async fn count_auto_penalties_since(&self, since: DateTime<Utc>) -> Result<i64> {
        db::penalties::count_auto_applied_since(self, since)
            .await
            .db_err()
    }

    async fn preferences(&self, user_id: Uuid) -> Result<Option<MatchmakingPreference>> {
        db::preferences::get(self, user_id).await.db_err()
    }

    async fn save_preferences(&self, prefs: &MatchmakingPreference) -> Result<()> {
        db::preferences::upsert(self, prefs).await.db_err()
    }
}
