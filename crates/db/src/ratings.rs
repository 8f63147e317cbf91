//! Player rating queries

use common::models::PlayerRating;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

fn rating_from_row(row: &PgRow) -> PlayerRating {
    PlayerRating {
        user_id: row.get("user_id"),
        sport: row.get("sport"),
        elo_rating: row.get("elo_rating"),
        games_played: row.get("games_played"),
        wins: row.get("wins"),
        losses: row.get("losses"),
        draws: row.get("draws"),
        last_updated: row.get("last_updated"),
    }
}

/// Get a player's rating in one sport
pub async fn get(
    pool: &PgPool,
    user_id: Uuid,
    sport: &str,
) -> Result<Option<PlayerRating>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT user_id, sport, elo_rating, games_played, wins, losses, draws, last_updated
        FROM player_elo_ratings
        WHERE user_id = $1 AND sport = $2
        "#,
    )
    .bind(user_id)
    .bind(sport)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(rating_from_row))
}

/// Insert a rating row or overwrite the existing one
pub async fn upsert(pool: &PgPool, rating: &PlayerRating) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO player_elo_ratings
            (user_id, sport, elo_rating, games_played, wins, losses, draws, last_updated)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
        ON CONFLICT (user_id, sport) DO UPDATE
        SET elo_rating = EXCLUDED.elo_rating,
            games_played = EXCLUDED.games_played,
            wins = EXCLUDED.wins,
            losses = EXCLUDED.losses,
            draws = EXCLUDED.draws,
            last_updated = EXCLUDED.last_updated
        "#,
    )
    .bind(rating.user_id)
    .bind(&rating.sport)
    .bind(rating.elo_rating)
    .bind(rating.games_played)
    .bind(rating.wins)
    .bind(rating.losses)
    .bind(rating.draws)
    .bind(rating.last_updated)
    .execute(pool)
    .await?;
    Ok(())
}

/// All ratings a player holds, best first
pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<PlayerRating>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT user_id, sport, elo_rating, games_played, wins, losses, draws, last_updated
        FROM player_elo_ratings
        WHERE user_id = $1
        ORDER BY elo_rating DESC
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(rating_from_row).collect())
}

/// Top-rated players in a sport
pub async fn top_for_sport(
    pool: &PgPool,
    sport: &str,
    limit: i64,
) -> Result<Vec<PlayerRating>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT user_id, sport, elo_rating, games_played, wins, losses, draws, last_updated
        FROM player_elo_ratings
        WHERE sport = $1 AND games_played > 0
        ORDER BY elo_rating DESC, games_played DESC
        LIMIT $2
        "#,
    )
    .bind(sport)
    .bind(limit)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(rating_from_row).collect())
}
