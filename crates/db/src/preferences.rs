//! Matchmaking preference queries

use common::models::MatchmakingPreference;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// Get a player's matchmaking preferences
pub async fn get(
    pool: &PgPool,
    user_id: Uuid,
) -> Result<Option<MatchmakingPreference>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT user_id, skill_matching_enabled, preferred_skill_range, competitive_mode,
               allow_mixed_skill, reputation_threshold
        FROM matchmaking_preferences
        WHERE user_id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|r| MatchmakingPreference {
        user_id: r.get("user_id"),
        skill_matching_enabled: r.get("skill_matching_enabled"),
        preferred_skill_range: r.get("preferred_skill_range"),
        competitive_mode: r.get("competitive_mode"),
        allow_mixed_skill: r.get("allow_mixed_skill"),
        reputation_threshold: r.get("reputation_threshold"),
    }))
}

/// Save a player's matchmaking preferences
pub async fn upsert(pool: &PgPool, prefs: &MatchmakingPreference) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO matchmaking_preferences
            (user_id, skill_matching_enabled, preferred_skill_range, competitive_mode,
             allow_mixed_skill, reputation_threshold)
        VALUES ($1, $2, $3, $4, $5, $6)
        ON CONFLICT (user_id) DO UPDATE
        SET skill_matching_enabled = EXCLUDED.skill_matching_enabled,
            preferred_skill_range = EXCLUDED.preferred_skill_range,
            competitive_mode = EXCLUDED.competitive_mode,
            allow_mixed_skill = EXCLUDED.allow_mixed_skill,
            reputation_threshold = EXCLUDED.reputation_threshold
        "#,
    )
    .bind(prefs.user_id)
    .bind(prefs.skill_matching_enabled)
    .bind(prefs.preferred_skill_range)
    .bind(prefs.competitive_mode)
    .bind(prefs.allow_mixed_skill)
    .bind(prefs.reputation_threshold)
    .execute(pool)
    .await?;
    Ok(())
}
