//! Penalty queries

use chrono::{DateTime, Utc};
use common::models::{Penalty, PenaltyKind};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use crate::behavior::parse_severity;

fn parse_penalty_kind(s: &str) -> PenaltyKind {
    match s {
        "temporary_ban" => PenaltyKind::TemporaryBan,
        "elo_restriction" => PenaltyKind::EloRestriction,
        "reputation_penalty" => PenaltyKind::ReputationPenalty,
        _ => PenaltyKind::Warning,
    }
}

fn penalty_from_row(row: &PgRow) -> Penalty {
    Penalty {
        id: row.get("id"),
        user_id: row.get("user_id"),
        penalty_type: parse_penalty_kind(row.get("penalty_type")),
        reason: row.get("reason"),
        severity: parse_severity(row.get("severity")),
        duration_hours: row.get("duration_hours"),
        active: row.get("active"),
        auto_applied: row.get("auto_applied"),
        applied_by: row.get("applied_by"),
        expires_at: row.get("expires_at"),
        created_at: row.get("created_at"),
    }
}

/// Insert a new penalty
pub async fn insert(pool: &PgPool, penalty: &Penalty) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO player_penalties
            (id, user_id, penalty_type, reason, severity, duration_hours, active,
             auto_applied, applied_by, expires_at, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
        "#,
    )
    .bind(penalty.id)
    .bind(penalty.user_id)
    .bind(penalty.penalty_type.as_str())
    .bind(&penalty.reason)
    .bind(penalty.severity.as_str())
    .bind(penalty.duration_hours)
    .bind(penalty.active)
    .bind(penalty.auto_applied)
    .bind(penalty.applied_by)
    .bind(penalty.expires_at)
    .bind(penalty.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Active penalties that have not yet passed their expiry, newest first
pub async fn in_force_for_user(
    pool: &PgPool,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> Result<Vec<Penalty>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT id, user_id, penalty_type, reason, severity, duration_hours, active,
               auto_applied, applied_by, expires_at, created_at
        FROM player_penalties
        WHERE user_id = $1
          AND active
          AND (expires_at IS NULL OR expires_at > $2)
        ORDER BY created_at DESC
        "#,
    )
    .bind(user_id)
    .bind(now)
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(penalty_from_row).collect())
}

/// Deactivate every active penalty whose expiry has passed.
///
/// Returns how many rows were flipped.
pub async fn expire_due(pool: &PgPool, now: DateTime<Utc>) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE player_penalties
        SET active = FALSE
        WHERE active AND expires_at IS NOT NULL AND expires_at < $1
        "#,
    )
    .bind(now)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Count penalties that are currently active
pub async fn count_active(pool: &PgPool) -> Result<i64, sqlx::Error> {
    let row = sqlx::query("SELECT COUNT(*) as count FROM player_penalties WHERE active")
        .fetch_one(pool)
        .await?;

    Ok(row.get::<i64, _>("count"))
}

/// Count automatically applied penalties created since a point in time
pub async fn count_auto_applied_since(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        "SELECT COUNT(*) as count FROM player_penalties WHERE auto_applied AND created_at >= $1",
    )
    .bind(since)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<i64, _>("count"))
}
