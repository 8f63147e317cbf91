//! Notification queries

use common::models::Notification;
use sqlx::PgPool;
use uuid::Uuid;

/// Queue a notification for delivery to a user
pub async fn insert(pool: &PgPool, notification: &Notification) -> Result<Uuid, sqlx::Error> {
    let id = Uuid::new_v4();
    sqlx::query(
        r#"
        INSERT INTO notifications (id, user_id, type, title, message, data, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        "#,
    )
    .bind(id)
    .bind(notification.user_id)
    .bind(&notification.kind)
    .bind(&notification.title)
    .bind(&notification.message)
    .bind(&notification.data)
    .execute(pool)
    .await?;
    Ok(id)
}
