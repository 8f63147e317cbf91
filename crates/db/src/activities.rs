//! Activity (game) and participant queries

use chrono::{DateTime, Utc};
use common::models::{Activity, DeclaredSkill};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

fn parse_declared_skill(s: Option<String>) -> Option<DeclaredSkill> {
    match s.as_deref() {
        Some("beginner") => Some(DeclaredSkill::Beginner),
        Some("intermediate") => Some(DeclaredSkill::Intermediate),
        Some("advanced") => Some(DeclaredSkill::Advanced),
        Some("mixed") => Some(DeclaredSkill::Mixed),
        Some("competitive") => Some(DeclaredSkill::Competitive),
        _ => None,
    }
}

fn activity_from_row(row: &PgRow) -> Activity {
    Activity {
        id: row.get("id"),
        sport: row.get("sport"),
        title: row.get("title"),
        starts_at: row.get("starts_at"),
        min_elo_rating: row.get("min_elo_rating"),
        max_elo_rating: row.get("max_elo_rating"),
        min_reputation: row.get("min_reputation"),
        competitive_mode: row.get("competitive_mode"),
        skill_level: parse_declared_skill(row.get("skill_level")),
        creator_id: row.get("creator_id"),
    }
}

/// Get an activity by ID
pub async fn get(pool: &PgPool, id: Uuid) -> Result<Option<Activity>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, sport, title, starts_at, min_elo_rating, max_elo_rating, min_reputation,
               competitive_mode, skill_level, creator_id
        FROM games
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(activity_from_row))
}

/// Activities starting after `now`, soonest first, optionally for one sport
pub async fn list_upcoming(
    pool: &PgPool,
    now: DateTime<Utc>,
    sport: Option<&str>,
) -> Result<Vec<Activity>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, sport, title, starts_at, min_elo_rating, max_elo_rating, min_reputation,
               competitive_mode, skill_level, creator_id
        FROM games
        WHERE starts_at > $1
          AND ($2::text IS NULL OR sport = $2)
        ORDER BY starts_at ASC
        "#,
    )
    .bind(now)
    .bind(sport)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(activity_from_row).collect())
}

/// Activities that started before `cutoff` and still have no result
pub async fn list_awaiting_result(
    pool: &PgPool,
    cutoff: DateTime<Utc>,
) -> Result<Vec<Activity>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT g.id, g.sport, g.title, g.starts_at, g.min_elo_rating, g.max_elo_rating,
               g.min_reputation, g.competitive_mode, g.skill_level, g.creator_id
        FROM games g
        LEFT JOIN game_results gr ON gr.game_id = g.id
        WHERE g.starts_at < $1 AND gr.game_id IS NULL
        ORDER BY g.starts_at ASC
        "#,
    )
    .bind(cutoff)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(activity_from_row).collect())
}

/// IDs of the players who joined an activity
pub async fn participants(pool: &PgPool, game_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT user_id FROM game_participants WHERE game_id = $1 ORDER BY joined_at ASC",
    )
    .bind(game_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(|r| r.get("user_id")).collect())
}

/// IDs of the activities a player has joined
pub async fn joined_by(pool: &PgPool, user_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows = sqlx::query("SELECT game_id FROM game_participants WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(|r| r.get("game_id")).collect())
}

/// Server-side eligibility predicate
pub async fn can_join(pool: &PgPool, user_id: Uuid, game_id: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT can_join_game($1, $2) as eligible")
        .bind(user_id)
        .bind(game_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<bool, _>("eligible"))
}
