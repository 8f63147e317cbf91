//! Activity result queries

use common::models::ActivityResult;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Check whether an activity already has a recorded result
pub async fn exists(pool: &PgPool, game_id: Uuid) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT EXISTS(SELECT 1 FROM game_results WHERE game_id = $1) as found")
        .bind(game_id)
        .fetch_one(pool)
        .await?;

    Ok(row.get::<bool, _>("found"))
}

/// Insert the result of an activity
pub async fn insert(pool: &PgPool, result: &ActivityResult) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO game_results
            (game_id, result_type, winning_team, losing_team, is_draw, recorded_by,
             elo_changes, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        "#,
    )
    .bind(result.game_id)
    .bind(result.result_type.as_str())
    .bind(&result.winning_team)
    .bind(&result.losing_team)
    .bind(result.is_draw)
    .bind(result.recorded_by)
    .bind(Json(&result.elo_changes))
    .bind(result.created_at)
    .execute(pool)
    .await?;
    Ok(())
}
