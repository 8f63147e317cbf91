//! Notification dispatch

use async_trait::async_trait;
use common::models::{Notification, Penalty, PenaltyKind};
use common::Result;
use serde_json::json;
use sqlx::PgPool;
use tracing::debug;

/// Delivers notifications to players
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn dispatch(&self, notification: Notification) -> Result<()>;
}

/// Queues notifications in the `notifications` table for the app to deliver
#[derive(Clone)]
pub struct PgNotifier {
    pool: PgPool,
}

impl PgNotifier {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Notifier for PgNotifier {
    async fn dispatch(&self, notification: Notification) -> Result<()> {
        let id = db::notifications::insert(&self.pool, &notification)
            .await
            .map_err(|e| common::Error::Notification(e.to_string()))?;
        debug!(
            "Queued {} notification {} for {}",
            notification.kind, id, notification.user_id
        );
        Ok(())
    }
}

/// Build the notification sent when a penalty is applied
pub fn penalty_notification(penalty: &Penalty, standing_delta: i32) -> Notification {
    let title = match penalty.penalty_type {
        PenaltyKind::Warning => "Warning issued",
        PenaltyKind::TemporaryBan => "Temporarily restricted from joining games",
        PenaltyKind::EloRestriction => "Restricted from competitive games",
        PenaltyKind::ReputationPenalty => "Standing reduced",
    };

    let mut message = format!(
        "{}. Your standing changed by {}.",
        penalty.reason, standing_delta
    );
    if let Some(expires_at) = penalty.expires_at {
        message.push_str(&format!(
            " The restriction lifts at {}.",
            expires_at.format("%Y-%m-%d %H:%M UTC")
        ));
    }

    Notification {
        user_id: penalty.user_id,
        kind: "penalty_applied".to_string(),
        title: title.to_string(),
        message,
        data: json!({
            "penalty_id": penalty.id,
            "penalty_type": penalty.penalty_type.as_str(),
            "severity": penalty.severity.as_str(),
            "duration_hours": penalty.duration_hours,
            "expires_at": penalty.expires_at,
            "standing_delta": standing_delta,
        }),
    }
}
