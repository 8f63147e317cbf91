//! Behavior event queries

use chrono::{DateTime, Utc};
use common::models::{BehaviorEvent, BehaviorKind, Severity};
use sqlx::{PgPool, Row};
use uuid::Uuid;

pub(crate) fn parse_severity(s: &str) -> Severity {
    match s {
        "moderate" => Severity::Moderate,
        "severe" => Severity::Severe,
        _ => Severity::Minor,
    }
}

fn parse_behavior_kind(s: &str) -> Option<BehaviorKind> {
    match s {
        "no_show" => Some(BehaviorKind::NoShow),
        "late_arrival" => Some(BehaviorKind::LateArrival),
        "early_leave" => Some(BehaviorKind::EarlyLeave),
        "disruptive" => Some(BehaviorKind::Disruptive),
        "positive" => Some(BehaviorKind::Positive),
        _ => None,
    }
}

/// Append a behavior event
pub async fn insert(pool: &PgPool, event: &BehaviorEvent) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        INSERT INTO player_behavior
            (id, user_id, behavior_type, game_id, severity, description, reported_by,
             auto_detected, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(event.id)
    .bind(event.user_id)
    .bind(event.behavior_type.as_str())
    .bind(event.game_id)
    .bind(event.severity.as_str())
    .bind(event.description.as_deref())
    .bind(event.reported_by)
    .bind(event.auto_detected)
    .bind(event.created_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Count a player's events of one kind since a point in time
pub async fn count_since(
    pool: &PgPool,
    user_id: Uuid,
    kind: BehaviorKind,
    since: DateTime<Utc>,
) -> Result<i64, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT COUNT(*) as count
        FROM player_behavior
        WHERE user_id = $1 AND behavior_type = $2 AND created_at >= $3
        "#,
    )
    .bind(user_id)
    .bind(kind.as_str())
    .bind(since)
    .fetch_one(pool)
    .await?;

    Ok(row.get::<i64, _>("count"))
}

/// Event counts per kind across all players since a point in time
pub async fn counts_by_kind_since(
    pool: &PgPool,
    since: DateTime<Utc>,
) -> Result<Vec<(BehaviorKind, i64)>, sqlx::Error> {
    let rows = sqlx::query(
        r#"
        SELECT behavior_type, COUNT(*) as count
        FROM player_behavior
        WHERE created_at >= $1
        GROUP BY behavior_type
        ORDER BY behavior_type
        "#,
    )
    .bind(since)
    .fetch_all(pool)
    .await?;

    Ok(rows
        .into_iter()
        .filter_map(|r| {
            let kind = parse_behavior_kind(r.get("behavior_type"))?;
            Some((kind, r.get::<i64, _>("count")))
        })
        .collect())
}
