//! Player standing (reputation) queries

use common::models::PlayerStanding;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Get a player's standing row
pub async fn get(pool: &PgPool, user_id: Uuid) -> Result<Option<PlayerStanding>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT user_id, reputation_score, reliability_score, sportsmanship_score,
               total_games, no_shows, late_arrivals, positive_feedback, negative_feedback,
               updated_at
        FROM player_reputation
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| PlayerStanding {
        user_id: r.get("user_id"),
        reputation_score: r.get("reputation_score"),
        reliability_score: r.get("reliability_score"),
        sportsmanship_score: r.get("sportsmanship_score"),
        total_games: r.get("total_games"),
        no_shows: r.get("no_shows"),
        late_arrivals: r.get("late_arrivals"),
        positive_feedback: r.get("positive_feedback"),
        negative_feedback: r.get("negative_feedback"),
        updated_at: r.get("updated_at"),
    }))
}

/// Insert a standing row or overwrite the existing one
pub async fn upsert(pool: &PgPool, standing: &PlayerStanding) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO player_reputation
            (user_id, reputation_score, reliability_score, sportsmanship_score,
             total_games, no_shows, late_arrivals, positive_feedback, negative_feedback, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        ON CONFLICT (user_id) DO UPDATE
        SET reputation_score = EXCLUDED.reputation_score,
            reliability_score = EXCLUDED.reliability_score,
            sportsmanship_score = EXCLUDED.sportsmanship_score,
            total_games = EXCLUDED.total_games,
            no_shows = EXCLUDED.no_shows,
            late_arrivals = EXCLUDED.late_arrivals,
            positive_feedback = EXCLUDED.positive_feedback,
            negative_feedback = EXCLUDED.negative_feedback,
            updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(standing.user_id)
    .bind(standing.reputation_score)
    .bind(standing.reliability_score)
    .bind(standing.sportsmanship_score)
    .bind(standing.total_games)
    .bind(standing.no_shows)
    .bind(standing.late_arrivals)
    .bind(standing.positive_feedback)
    .bind(standing.negative_feedback)
    .bind(standing.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Lowest standing score among the given players.
///
/// Players without a row count as a fresh 100.
pub async fn lowest_score(pool: &PgPool, user_ids: &[Uuid]) -> Result<Option<i32>, sqlx::Error> {
    if user_ids.is_empty() {
        return Ok(None);
    }

    let row = sqlx::query(
        r#"
        SELECT MIN(COALESCE(pr.reputation_score, 100)) as lowest
        FROM UNNEST($1::uuid[]) AS u(user_id)
        LEFT JOIN player_reputation pr ON pr.user_id = u.user_id
        "#,
    )
    .bind(user_ids)
    .fetch_one(pool)
    .await?;

    Ok(row.get("lowest"))
}
